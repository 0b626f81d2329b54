// Example: Streaming a batch of mixed problems through SolveBatch
//
// One request carries a knapsack, a shortest path, a max flow and a
// min-cost flow problem. Replies stream back in request order, and a
// failing entry (here an unknown capability) does not stop the rest.

use optdispatch::prelude::*;
use tokio_stream::StreamExt;
use tonic::Request;

pub mod optdispatch_proto {
    tonic::include_proto!("optdispatch");
}

use optdispatch_proto::{
    optimization_dispatch_client::OptimizationDispatchClient, ErrorKind as ProtoErrorKind,
    SolveBatchRequest, SolveRequest,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = OptimizationDispatchClient::connect("http://127.0.0.1:50051").await?;

    let network = FlowNetwork::new(4)
        .add_costed_arc(0, 1, 10, 1)
        .add_costed_arc(0, 2, 10, 3)
        .add_costed_arc(1, 3, 10, 1)
        .add_costed_arc(2, 3, 10, 3);

    let problems: Vec<(&str, Problem)> = vec![
        (
            capability::KNAPSACK,
            KnapsackProblem::new(vec![10, 20, 30], vec![60, 100, 120], 50).into(),
        ),
        (
            capability::SHORTEST_PATH,
            ShortestPathProblem::new(
                WeightedGraph::undirected(5)
                    .add_edge(0, 1, 2.0)
                    .add_edge(1, 2, 3.0)
                    .add_edge(2, 3, 1.0)
                    .add_edge(3, 4, 1.0)
                    .add_edge(0, 4, 10.0),
                0,
            )
            .with_target(4)
            .into(),
        ),
        (
            capability::MAX_FLOW,
            MaxFlowProblem::new(network.clone(), 0, 3).into(),
        ),
        (
            capability::MIN_COST_FLOW,
            MinCostFlowProblem::with_value(network.clone(), 0, 3, 15).into(),
        ),
        ("optimize.vehicle_routing", MaxFlowProblem::new(network, 0, 3).into()),
    ];

    let mut requests = Vec::with_capacity(problems.len());
    for (capability, problem) in &problems {
        requests.push(SolveRequest {
            capability: capability.to_string(),
            problem_json: serde_json::to_string(problem)?,
            timeout_ms: 2_000,
        });
    }

    println!("=== Batch of {} problems ===\n", requests.len());
    let mut replies = client
        .solve_batch(Request::new(SolveBatchRequest { requests }))
        .await?
        .into_inner();

    let mut index = 0;
    while let Some(reply) = replies.next().await {
        let reply = reply?;
        let (capability, _) = &problems[index];
        index += 1;

        match reply.objective_value {
            Some(objective) => println!("{:<28} objective {}", capability, objective),
            None => println!("{:<28} no objective", capability),
        }
        if reply.error_kind != ProtoErrorKind::None as i32 {
            println!("{:<28} {}", "", reply.message);
        }
    }

    Ok(())
}
