// Mappers: Convert between gRPC protobuf types and domain models
// Problems and payloads travel as JSON, so the protobuf schema stays family-agnostic

use crate::domain::{Error, ErrorKind, Problem, ProblemFamily, Solution, SolutionStatus};
use crate::solver::CapabilityInfo;
use std::time::Duration;

pub mod optdispatch {
    tonic::include_proto!("optdispatch");
}

use optdispatch as proto;

/// Decode the JSON problem of a request
pub fn decode_problem(problem_json: &str) -> std::result::Result<Problem, String> {
    serde_json::from_str(problem_json).map_err(|e| format!("malformed problem JSON: {}", e))
}

/// Request deadline, falling back to the server default when unset
pub fn request_timeout(request: &proto::SolveRequest, default: Option<Duration>) -> Option<Duration> {
    if request.timeout_ms > 0 {
        Some(Duration::from_millis(request.timeout_ms))
    } else {
        default
    }
}

pub fn status_to_proto(status: SolutionStatus) -> proto::SolutionStatus {
    match status {
        SolutionStatus::Optimal => proto::SolutionStatus::Optimal,
        SolutionStatus::Infeasible => proto::SolutionStatus::Infeasible,
        SolutionStatus::Unbounded => proto::SolutionStatus::Unbounded,
        SolutionStatus::TimedOut => proto::SolutionStatus::TimedOut,
        SolutionStatus::Error => proto::SolutionStatus::Error,
    }
}

pub fn error_kind_to_proto(kind: ErrorKind) -> proto::ErrorKind {
    match kind {
        ErrorKind::InvalidInput => proto::ErrorKind::InvalidInput,
        ErrorKind::Infeasible => proto::ErrorKind::InfeasibleProblem,
        ErrorKind::Unbounded => proto::ErrorKind::UnboundedProblem,
        ErrorKind::TimedOut => proto::ErrorKind::DeadlineExceeded,
        ErrorKind::UnsupportedCapability => proto::ErrorKind::UnsupportedCapability,
        ErrorKind::InternalSolverError => proto::ErrorKind::InternalSolverError,
    }
}

/// Kind carried by a non-optimal status folded by the dispatcher
fn folded_error_kind(status: SolutionStatus) -> proto::ErrorKind {
    match status {
        SolutionStatus::Infeasible => proto::ErrorKind::InfeasibleProblem,
        SolutionStatus::Unbounded => proto::ErrorKind::UnboundedProblem,
        SolutionStatus::TimedOut => proto::ErrorKind::DeadlineExceeded,
        SolutionStatus::Optimal | SolutionStatus::Error => proto::ErrorKind::None,
    }
}

/// Convert domain Solution to protobuf SolveReply
pub fn solution_to_reply(solution: Solution) -> proto::SolveReply {
    let solution_json = solution
        .payload
        .as_ref()
        .and_then(|payload| serde_json::to_string(payload).ok())
        .unwrap_or_default();

    proto::SolveReply {
        status: status_to_proto(solution.status) as i32,
        family: solution.family.to_string(),
        objective_value: solution.objective_value,
        solution_json,
        message: solution.message,
        error_kind: folded_error_kind(solution.status) as i32,
        statistics: Some(proto::SolverStatistics {
            algorithm: solution.statistics.algorithm,
            iterations: solution.statistics.iterations,
            solve_time_ms: solution.statistics.solve_time_ms,
        }),
    }
}

/// Error reply for a request the dispatcher rejected
pub fn error_to_reply(family: ProblemFamily, error: &Error) -> proto::SolveReply {
    let mut reply = solution_to_reply(Solution::from_error(family, error));
    reply.error_kind = error_kind_to_proto(error.kind()) as i32;
    reply
}

/// Error reply for a request whose problem could not be decoded
pub fn invalid_request_reply(reason: String) -> proto::SolveReply {
    proto::SolveReply {
        status: proto::SolutionStatus::Error as i32,
        message: reason,
        error_kind: proto::ErrorKind::InvalidInput as i32,
        ..Default::default()
    }
}

pub fn capability_to_proto(info: CapabilityInfo) -> proto::CapabilityInfo {
    proto::CapabilityInfo {
        id: info.id,
        family: info.family.to_string(),
        provider: info.provider,
        enabled: info.enabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SolutionPayload, SolverStatistics};

    #[test]
    fn test_optimal_solution_reply() {
        let solution = Solution::optimal(
            ProblemFamily::Assignment,
            Some(12.0),
            SolutionPayload::Assignment {
                pairs: vec![(0, 1), (1, 0), (2, 2)],
            },
        )
        .with_statistics(SolverStatistics::new("hungarian", 9));

        let reply = solution_to_reply(solution);
        assert_eq!(reply.status, proto::SolutionStatus::Optimal as i32);
        assert_eq!(reply.objective_value, Some(12.0));
        assert_eq!(reply.error_kind, proto::ErrorKind::None as i32);
        assert!(reply.solution_json.contains("\"pairs\""));
        assert_eq!(reply.statistics.unwrap().algorithm, "hungarian");
    }

    #[test]
    fn test_error_reply_carries_kind() {
        let error = Error::unsupported("optimize.tsp", "no provider is registered under this id");
        let reply = error_to_reply(ProblemFamily::GenericConstraint, &error);
        assert_eq!(reply.status, proto::SolutionStatus::Error as i32);
        assert_eq!(reply.error_kind, proto::ErrorKind::UnsupportedCapability as i32);
        assert!(reply.solution_json.is_empty());
    }

    #[test]
    fn test_request_timeout_fallback() {
        let request = proto::SolveRequest::default();
        assert_eq!(request_timeout(&request, None), None);
        assert_eq!(
            request_timeout(&request, Some(Duration::from_secs(1))),
            Some(Duration::from_secs(1))
        );
        let request = proto::SolveRequest {
            timeout_ms: 250,
            ..Default::default()
        };
        assert_eq!(request_timeout(&request, None), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_decode_problem_errors_are_readable() {
        assert!(decode_problem("{\"family\": \"knapsack\"}")
            .unwrap_err()
            .contains("malformed problem JSON"));
    }
}
