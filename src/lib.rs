// Domain layer: Problem model, provider contract and validation
pub mod domain;

// Native algorithms: Assignment, knapsack, shortest path and network flow
pub mod algorithms;

// Provider adapters: Native solvers, capability registry and constraint gateway
pub mod solver;

// Application layer: Dispatch facade and gRPC service
pub mod application;

// Infrastructure layer: External concerns (gRPC, server)
#[cfg(feature = "server")]
pub mod infrastructure;

// Re-export commonly used types
pub use domain::{
    capability, ConfigError, Error, ErrorKind, Problem, ProblemFamily, Provider, ProviderConfig,
    Result, Solution, SolutionPayload, SolutionStatus, SolveContext,
};

pub use application::Dispatcher;
pub use solver::{CapabilityInfo, CapabilityRegistry, RegistryError};

#[cfg(feature = "server")]
pub use application::GrpcDispatchService;

#[cfg(feature = "server")]
pub use infrastructure::{start_server, ServerConfig};

/// Everything needed to build and solve problems in one import
pub mod prelude {
    pub use crate::application::Dispatcher;
    pub use crate::domain::{
        capability, AssignmentProblem, CancellationToken, ConstraintProblem, Error, ErrorKind,
        FlowDemand, FlowNetwork, KnapsackProblem, MaxFlowProblem, MinCostFlowProblem, Problem,
        ProblemFamily, Provider, ProviderConfig, ShortestPathProblem, Solution,
        SolutionPayload, SolutionStatus, SolveContext, WeightedGraph,
    };
    pub use crate::solver::CapabilityRegistry;
}
