// Dispatch facade: the single entry point for solve requests
// Resolves the capability, validates, solves, and maps terminal outcomes uniformly

use crate::domain::{validation, Error, ErrorKind, Problem, Result, Solution, SolveContext};
use crate::solver::{CapabilityInfo, CapabilityRegistry};
use log::{debug, warn};
use std::sync::Arc;

/// Routes problems to registered providers
///
/// Solves are synchronous and share nothing but the read-only registry, so a
/// dispatcher can be cloned across threads freely.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<CapabilityRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Solve with the default capability of the problem's family.
    pub fn solve(&self, problem: &Problem, ctx: &SolveContext) -> Result<Solution> {
        self.dispatch(problem.family().capability_id(), problem, ctx)
    }

    /// Solve with an explicit capability.
    ///
    /// Infeasible, unbounded and timed-out outcomes come back as a `Solution`
    /// with that status. Invalid input, unsupported capabilities and internal
    /// solver errors are returned as `Err`. A failed provider is never
    /// replaced by another one.
    pub fn dispatch(&self, capability_id: &str, problem: &Problem, ctx: &SolveContext) -> Result<Solution> {
        let provider = self.registry.resolve(capability_id).map_err(|e| {
            warn!("{}", e);
            e
        })?;
        let family = provider.family();

        validation::validate_family(family, problem)?;
        provider.validate(problem)?;

        debug!("dispatching {} problem to {} via '{}'", family, provider.name(), capability_id);

        match provider.solve(problem, ctx) {
            Ok(solution) => Ok(solution),
            Err(e) => Self::fold(family, e),
        }
    }

    pub fn capabilities(&self) -> Vec<CapabilityInfo> {
        self.registry.capabilities()
    }

    fn fold(family: crate::domain::ProblemFamily, error: Error) -> Result<Solution> {
        match error.kind() {
            ErrorKind::Infeasible | ErrorKind::Unbounded => {
                debug!("{}", error);
                Ok(Solution::from_error(family, &error))
            }
            ErrorKind::TimedOut => {
                warn!("{}", error);
                Ok(Solution::from_error(family, &error))
            }
            ErrorKind::InternalSolverError => {
                warn!("{}", error);
                Err(error)
            }
            ErrorKind::InvalidInput | ErrorKind::UnsupportedCapability => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        capability, KnapsackProblem, ProviderConfig, ShortestPathProblem, SolutionStatus,
        WeightedGraph,
    };
    use std::time::Instant;

    fn dispatcher() -> Dispatcher {
        let registry = CapabilityRegistry::with_defaults(&ProviderConfig::default()).unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    #[test]
    fn test_infeasible_is_folded_into_solution() {
        let graph = WeightedGraph::directed(2);
        let problem = ShortestPathProblem::new(graph, 0).with_target(1).into();
        let solution = dispatcher().solve(&problem, &SolveContext::new()).unwrap();
        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.message.contains("shortest-path"));
        assert!(solution.objective_value.is_none());
    }

    #[test]
    fn test_timeout_is_folded_into_solution() {
        let problem = KnapsackProblem::new(vec![1, 2], vec![3, 4], 3).into();
        let ctx = SolveContext::new().with_deadline(Instant::now());
        let solution = dispatcher().solve(&problem, &ctx).unwrap();
        assert_eq!(solution.status, SolutionStatus::TimedOut);
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        let problem = KnapsackProblem::new(vec![1, 2], vec![3], 3).into();
        let err = dispatcher().solve(&problem, &SolveContext::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_explicit_capability_must_match_family() {
        let problem = KnapsackProblem::new(vec![1], vec![1], 1).into();
        let err = dispatcher()
            .dispatch(capability::ASSIGNMENT, &problem, &SolveContext::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_capability_listing_is_sorted() {
        let ids: Vec<String> = dispatcher().capabilities().into_iter().map(|c| c.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 6);
    }
}
