// Native min-cost flow adapter

use super::elapsed_ms;
use crate::algorithms::flow::min_cost_flow;
use crate::domain::{
    family_mismatch, Problem, ProblemFamily, Provider, Result, Solution, SolutionPayload,
    SolveContext, SolverStatistics,
};
use std::time::Instant;

#[derive(Default)]
pub struct MinCostFlowSolver;

impl MinCostFlowSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Provider for MinCostFlowSolver {
    fn solve(&self, problem: &Problem, ctx: &SolveContext) -> Result<Solution> {
        let Problem::MinCostFlow(problem) = problem else {
            return Err(family_mismatch(self.family(), problem));
        };

        let start_time = Instant::now();
        let flow = min_cost_flow::solve(problem, ctx)?;

        let mut statistics = SolverStatistics::new(min_cost_flow::NAME, flow.augmentations);
        statistics.solve_time_ms = elapsed_ms(start_time);

        let message = format!(
            "Minimum-cost flow of {} units at cost {}",
            flow.flow_value, flow.total_cost
        );
        let objective = flow.total_cost as f64;
        let payload = SolutionPayload::MinCostFlow {
            flow_value: flow.flow_value,
            total_cost: flow.total_cost,
            arc_flows: flow.arc_flows,
        };

        Ok(Solution::optimal(self.family(), Some(objective), payload)
            .with_statistics(statistics)
            .with_message(message))
    }

    fn family(&self) -> ProblemFamily {
        ProblemFamily::MinCostFlow
    }

    fn name(&self) -> &str {
        "native-min-cost-flow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FlowNetwork, MinCostFlowProblem};

    #[test]
    fn test_objective_is_total_cost() {
        let network = FlowNetwork::new(3)
            .add_costed_arc(0, 1, 5, 2)
            .add_costed_arc(1, 2, 5, 3);
        let problem: Problem = MinCostFlowProblem::with_value(network, 0, 2, 4).into();
        let solution = MinCostFlowSolver::new()
            .solve(&problem, &SolveContext::new())
            .unwrap();
        assert_eq!(solution.objective_value, Some(20.0));
        assert_eq!(solution.statistics.algorithm, min_cost_flow::NAME);
    }
}
