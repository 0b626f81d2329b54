// Domain value objects shared by every problem family

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable capability identifiers, one per problem family.
pub mod capability {
    pub const ASSIGNMENT: &str = "optimize.assignment";
    pub const KNAPSACK: &str = "optimize.knapsack";
    pub const SHORTEST_PATH: &str = "optimize.shortest_path";
    pub const MAX_FLOW: &str = "optimize.max_flow";
    pub const MIN_COST_FLOW: &str = "optimize.min_cost_flow";
    pub const CONSTRAINT: &str = "optimize.constraint";
}

/// Problem family served by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemFamily {
    Assignment,
    Knapsack,
    ShortestPath,
    MaxFlow,
    MinCostFlow,
    GenericConstraint,
}

impl ProblemFamily {
    pub const ALL: [ProblemFamily; 6] = [
        ProblemFamily::Assignment,
        ProblemFamily::Knapsack,
        ProblemFamily::ShortestPath,
        ProblemFamily::MaxFlow,
        ProblemFamily::MinCostFlow,
        ProblemFamily::GenericConstraint,
    ];

    /// Capability identifier this family dispatches to by default.
    pub fn capability_id(self) -> &'static str {
        match self {
            ProblemFamily::Assignment => capability::ASSIGNMENT,
            ProblemFamily::Knapsack => capability::KNAPSACK,
            ProblemFamily::ShortestPath => capability::SHORTEST_PATH,
            ProblemFamily::MaxFlow => capability::MAX_FLOW,
            ProblemFamily::MinCostFlow => capability::MIN_COST_FLOW,
            ProblemFamily::GenericConstraint => capability::CONSTRAINT,
        }
    }
}

impl fmt::Display for ProblemFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemFamily::Assignment => write!(f, "assignment"),
            ProblemFamily::Knapsack => write!(f, "knapsack"),
            ProblemFamily::ShortestPath => write!(f, "shortest-path"),
            ProblemFamily::MaxFlow => write!(f, "max-flow"),
            ProblemFamily::MinCostFlow => write!(f, "min-cost-flow"),
            ProblemFamily::GenericConstraint => write!(f, "generic-constraint"),
        }
    }
}

/// Terminal status of a solve call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    /// Proven optimal solution
    Optimal,
    /// Well-formed problem without a solution
    Infeasible,
    /// Objective can be improved without limit
    Unbounded,
    /// Deadline elapsed (or the call was cancelled) before a definite answer
    TimedOut,
    /// Invalid input, unsupported capability or internal solver failure
    Error,
}

impl SolutionStatus {
    pub fn is_optimal(self) -> bool {
        self == SolutionStatus::Optimal
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::TimedOut => write!(f, "Timed Out"),
            SolutionStatus::Error => write!(f, "Error"),
        }
    }
}

/// Whether graph edges can be traversed in one or both directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    #[default]
    Directed,
    Undirected,
}
