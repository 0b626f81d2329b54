// Provider adapters: native solvers, the capability registry and the constraint gateway

pub mod assignment_solver;
pub mod constraint;
pub mod knapsack_solver;
pub mod max_flow_solver;
pub mod min_cost_flow_solver;
pub mod registry;
pub mod shortest_path_solver;

pub use assignment_solver::AssignmentSolver;
pub use constraint::ConstraintGateway;
pub use knapsack_solver::KnapsackSolver;
pub use max_flow_solver::MaxFlowSolver;
pub use min_cost_flow_solver::MinCostFlowSolver;
pub use registry::{CapabilityEntry, CapabilityInfo, CapabilityRegistry, RegistryError};
pub use shortest_path_solver::ShortestPathSolver;

use std::time::Instant;

fn elapsed_ms(start_time: Instant) -> f64 {
    start_time.elapsed().as_secs_f64() * 1000.0
}
