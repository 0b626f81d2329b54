// Native max-flow adapter

use super::elapsed_ms;
use crate::algorithms::flow::max_flow;
use crate::domain::{
    family_mismatch, FlowConfig, Problem, ProblemFamily, Provider, Result, Solution,
    SolutionPayload, SolveContext, SolverStatistics,
};
use std::time::Instant;

pub struct MaxFlowSolver {
    config: FlowConfig,
}

impl MaxFlowSolver {
    pub fn new(config: FlowConfig) -> Self {
        Self { config }
    }
}

impl Default for MaxFlowSolver {
    fn default() -> Self {
        Self::new(FlowConfig::default())
    }
}

impl Provider for MaxFlowSolver {
    fn solve(&self, problem: &Problem, ctx: &SolveContext) -> Result<Solution> {
        let Problem::MaxFlow(problem) = problem else {
            return Err(family_mismatch(self.family(), problem));
        };

        let start_time = Instant::now();
        let flow = max_flow::solve(problem, &self.config, ctx)?;

        let mut statistics = SolverStatistics::new(max_flow::NAME, flow.pushes + flow.relabels);
        statistics.solve_time_ms = elapsed_ms(start_time);

        let message = format!(
            "Maximum flow {} from {} to {}, certified by a cut of {} nodes",
            flow.flow_value,
            problem.source,
            problem.sink,
            flow.min_cut.len()
        );
        let objective = flow.flow_value as f64;
        let payload = SolutionPayload::MaxFlow {
            flow_value: flow.flow_value,
            arc_flows: flow.arc_flows,
            min_cut: flow.min_cut,
        };

        Ok(Solution::optimal(self.family(), Some(objective), payload)
            .with_statistics(statistics)
            .with_message(message))
    }

    fn family(&self) -> ProblemFamily {
        ProblemFamily::MaxFlow
    }

    fn name(&self) -> &str {
        "native-max-flow"
    }
}
