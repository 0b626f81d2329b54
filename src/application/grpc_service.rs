use std::time::Duration;

use log::{debug, info};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

use super::mappers::{self, optdispatch};
use super::Dispatcher;
use crate::domain::{CancellationToken, SolveContext};

/// gRPC service implementation
#[derive(Clone)]
pub struct GrpcDispatchService {
    dispatcher: Dispatcher,
    default_timeout: Option<Duration>,
}

impl GrpcDispatchService {
    pub fn new(dispatcher: Dispatcher, default_timeout: Option<Duration>) -> Self {
        Self {
            dispatcher,
            default_timeout,
        }
    }

    /// Blocking solve of one request, always producing a reply
    fn solve_one(
        &self,
        request: optdispatch::SolveRequest,
        cancellation: CancellationToken,
    ) -> optdispatch::SolveReply {
        let problem = match mappers::decode_problem(&request.problem_json) {
            Ok(problem) => problem,
            Err(reason) => return mappers::invalid_request_reply(reason),
        };

        let ctx = SolveContext::new().with_cancellation(cancellation);
        let ctx = match mappers::request_timeout(&request, self.default_timeout) {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        };
        let capability = if request.capability.is_empty() {
            problem.family().capability_id()
        } else {
            request.capability.as_str()
        };

        match self.dispatcher.dispatch(capability, &problem, &ctx) {
            Ok(solution) => {
                debug!("{} -> {}", capability, solution.status);
                mappers::solution_to_reply(solution)
            }
            Err(e) => mappers::error_to_reply(problem.family(), &e),
        }
    }

    async fn solve_on_blocking_pool(
        &self,
        request: optdispatch::SolveRequest,
    ) -> Result<optdispatch::SolveReply, Status> {
        let service = self.clone();
        spawn_cancel_on_drop(move |cancellation| service.solve_one(request, cancellation)).await
    }
}

/// Runs `task` on the blocking pool. If the returned future is dropped before
/// the task finishes, the token handed to `task` is cancelled.
async fn spawn_cancel_on_drop<Out, Task>(task: Task) -> Result<Out, Status>
where
    Task: FnOnce(CancellationToken) -> Out + Send + 'static,
    Out: Send + 'static,
{
    let cancellation = CancellationToken::new();
    let guard = cancellation.clone().drop_guard();
    let output = tokio::task::spawn_blocking(move || task(cancellation))
        .await
        .map_err(|e| Status::internal(format!("solver task failed: {}", e)))?;
    guard.disarm();
    Ok(output)
}

#[tonic::async_trait]
impl optdispatch::optimization_dispatch_server::OptimizationDispatch for GrpcDispatchService {
    async fn solve(
        &self,
        request: Request<optdispatch::SolveRequest>,
    ) -> Result<Response<optdispatch::SolveReply>, Status> {
        let request = request.into_inner();
        info!("solve request for '{}'", request.capability);

        let reply = self.solve_on_blocking_pool(request).await?;
        Ok(Response::new(reply))
    }

    type SolveBatchStream = ReceiverStream<Result<optdispatch::SolveReply, Status>>;

    async fn solve_batch(
        &self,
        request: Request<optdispatch::SolveBatchRequest>,
    ) -> Result<Response<Self::SolveBatchStream>, Status> {
        let requests = request.into_inner().requests;
        info!("batch of {} solve requests", requests.len());

        let (tx, rx) = mpsc::channel(16);
        let service = self.clone();
        tokio::spawn(async move {
            for request in requests {
                let reply = service.solve_on_blocking_pool(request).await;
                if tx.send(reply).await.is_err() {
                    debug!("batch client disconnected, dropping remaining requests");
                    break;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn list_capabilities(
        &self,
        _request: Request<optdispatch::Empty>,
    ) -> Result<Response<optdispatch::CapabilityList>, Status> {
        let capabilities = self
            .dispatcher
            .capabilities()
            .into_iter()
            .map(mappers::capability_to_proto)
            .collect();

        Ok(Response::new(optdispatch::CapabilityList { capabilities }))
    }
}
