// Example client demonstrating how to use the dispatch gRPC service
//
// This example staffs three shifts with three workers:
// - Each worker quotes a cost for each shift
// - Every shift needs exactly one worker, and nobody works twice
//
// Objective: Minimize total staffing cost
//
//             early  late  night
//   alice       4     1     3
//   bob         2     0     5
//   carol       3     2     2

use optdispatch::prelude::*;
use tonic::Request;

pub mod optdispatch_proto {
    tonic::include_proto!("optdispatch");
}

use optdispatch_proto::{
    optimization_dispatch_client::OptimizationDispatchClient, Empty, SolveRequest,
};

const WORKERS: [&str; 3] = ["alice", "bob", "carol"];
const SHIFTS: [&str; 3] = ["early", "late", "night"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Connect to the gRPC server
    let mut client = OptimizationDispatchClient::connect("http://127.0.0.1:50051").await?;

    println!("=== Available Capabilities ===\n");
    let capabilities = client
        .list_capabilities(Request::new(Empty {}))
        .await?
        .into_inner()
        .capabilities;
    for capability in &capabilities {
        let state = if capability.enabled { "" } else { " (disabled)" };
        println!("  {} -> {}{}", capability.id, capability.provider, state);
    }

    println!("\n=== Shift Staffing Problem ===\n");

    let problem: Problem = AssignmentProblem::from_costs(vec![
        vec![4.0, 1.0, 3.0],
        vec![2.0, 0.0, 5.0],
        vec![3.0, 2.0, 2.0],
    ])
    .into();

    let request = SolveRequest {
        capability: capability::ASSIGNMENT.to_string(),
        problem_json: serde_json::to_string(&problem)?,
        timeout_ms: 5_000,
    };

    println!("Sending problem to the dispatcher...\n");
    let reply = client.solve(Request::new(request)).await?.into_inner();

    println!("=== Solution ===\n");
    println!("Status: {}", status_name(reply.status));

    if !reply.solution_json.is_empty() {
        let payload: SolutionPayload = serde_json::from_str(&reply.solution_json)?;
        if let SolutionPayload::Assignment { pairs } = payload {
            for (worker, shift) in pairs {
                println!("  {:<6} -> {}", WORKERS[worker], SHIFTS[shift]);
            }
        }
    }
    if let Some(cost) = reply.objective_value {
        println!("\nTotal cost: {}", cost);
    }
    if let Some(stats) = reply.statistics {
        println!("\nSolver Statistics:");
        println!("  Algorithm:   {}", stats.algorithm);
        println!("  Iterations:  {}", stats.iterations);
        println!("  Solve Time:  {:.3} ms", stats.solve_time_ms);
    }

    println!("\nMessage: {}", reply.message);

    Ok(())
}

fn status_name(status: i32) -> &'static str {
    use optdispatch_proto::SolutionStatus;
    match SolutionStatus::try_from(status) {
        Ok(SolutionStatus::Optimal) => "optimal",
        Ok(SolutionStatus::Infeasible) => "infeasible",
        Ok(SolutionStatus::Unbounded) => "unbounded",
        Ok(SolutionStatus::TimedOut) => "timed out",
        _ => "error",
    }
}
