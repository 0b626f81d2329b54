// Native assignment adapter
// Implements the Provider interface over the Hungarian and auction solvers

use super::elapsed_ms;
use crate::algorithms::assignment;
use crate::domain::{
    family_mismatch, AssignmentConfig, Problem, ProblemFamily, Provider, Result, Solution,
    SolutionPayload, SolveContext, SolverStatistics,
};
use std::time::Instant;

pub struct AssignmentSolver {
    config: AssignmentConfig,
}

impl AssignmentSolver {
    pub fn new(config: AssignmentConfig) -> Self {
        Self { config }
    }
}

impl Default for AssignmentSolver {
    fn default() -> Self {
        Self::new(AssignmentConfig::default())
    }
}

impl Provider for AssignmentSolver {
    fn solve(&self, problem: &Problem, ctx: &SolveContext) -> Result<Solution> {
        let Problem::Assignment(problem) = problem else {
            return Err(family_mismatch(self.family(), problem));
        };

        let start_time = Instant::now();
        let matching = assignment::solve(&problem.costs, &self.config, ctx)?;

        let mut statistics = SolverStatistics::new(matching.algorithm, matching.iterations);
        statistics.solve_time_ms = elapsed_ms(start_time);

        let message = format!(
            "Optimal assignment of {} pairs at cost {}",
            matching.pairs.len(),
            matching.total_cost
        );
        let payload = SolutionPayload::Assignment {
            pairs: matching.pairs,
        };

        Ok(
            Solution::optimal(self.family(), Some(matching.total_cost), payload)
                .with_statistics(statistics)
                .with_message(message),
        )
    }

    fn family(&self) -> ProblemFamily {
        ProblemFamily::Assignment
    }

    fn name(&self) -> &str {
        "native-assignment"
    }
}
