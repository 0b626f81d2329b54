// Native knapsack adapter
// Rejects over-budget capacities during validation, before the table is allocated

use super::elapsed_ms;
use crate::algorithms::knapsack;
use crate::domain::{
    family_mismatch, KnapsackConfig, Problem, ProblemFamily, Provider, Result, Solution,
    SolutionPayload, SolveContext, SolverStatistics,
};
use std::time::Instant;

pub struct KnapsackSolver {
    config: KnapsackConfig,
}

impl KnapsackSolver {
    pub fn new(config: KnapsackConfig) -> Self {
        Self { config }
    }
}

impl Default for KnapsackSolver {
    fn default() -> Self {
        Self::new(KnapsackConfig::default())
    }
}

impl Provider for KnapsackSolver {
    fn solve(&self, problem: &Problem, ctx: &SolveContext) -> Result<Solution> {
        let Problem::Knapsack(problem) = problem else {
            return Err(family_mismatch(self.family(), problem));
        };

        let start_time = Instant::now();
        let selection = knapsack::solve(problem, self.config.memory_budget_bytes, ctx)?;

        let mut statistics = SolverStatistics::new(knapsack::NAME, selection.iterations);
        statistics.solve_time_ms = elapsed_ms(start_time);

        let message = format!(
            "Optimal packing of {} items with value {} and weight {}/{}",
            selection.selected.len(),
            selection.total_value,
            selection.total_weight,
            problem.capacity
        );
        let objective = selection.total_value as f64;
        let payload = SolutionPayload::Knapsack {
            selected: selection.selected,
            total_weight: selection.total_weight,
            total_value: selection.total_value,
        };

        Ok(Solution::optimal(self.family(), Some(objective), payload)
            .with_statistics(statistics)
            .with_message(message))
    }

    fn validate(&self, problem: &Problem) -> Result<()> {
        match problem {
            Problem::Knapsack(problem) => {
                knapsack::check_memory_budget(problem, self.config.memory_budget_bytes)
            }
            other => Err(family_mismatch(self.family(), other)),
        }
    }

    fn family(&self) -> ProblemFamily {
        ProblemFamily::Knapsack
    }

    fn name(&self) -> &str {
        "native-knapsack"
    }
}
