// Native shortest path adapter

use super::elapsed_ms;
use crate::algorithms::shortest_path;
use crate::domain::{
    family_mismatch, Error, Problem, ProblemFamily, Provider, Result, Solution, SolutionPayload,
    SolveContext, SolverStatistics,
};
use std::time::Instant;

#[derive(Default)]
pub struct ShortestPathSolver;

impl ShortestPathSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Provider for ShortestPathSolver {
    fn solve(&self, problem: &Problem, ctx: &SolveContext) -> Result<Solution> {
        let Problem::ShortestPath(problem) = problem else {
            return Err(family_mismatch(self.family(), problem));
        };

        let start_time = Instant::now();
        let tree = shortest_path::solve(problem, ctx)?;

        let (objective, path, message) = match problem.target {
            Some(target) => {
                let distance = tree.distance(target).ok_or_else(|| {
                    Error::infeasible(
                        self.family(),
                        format!("target {} is unreachable from source {}", target, problem.source),
                    )
                })?;
                let path = tree.path_to(target);
                let message = format!(
                    "Shortest path from {} to {} has length {}",
                    problem.source, target, distance
                );
                (Some(distance), path, message)
            }
            None => {
                let reached = tree.distances.iter().filter(|d| d.is_some()).count();
                let message = format!(
                    "Shortest-path tree from {} reaches {} of {} nodes",
                    problem.source,
                    reached,
                    tree.distances.len()
                );
                (None, None, message)
            }
        };

        let mut statistics = SolverStatistics::new(shortest_path::NAME, tree.iterations);
        statistics.solve_time_ms = elapsed_ms(start_time);

        let payload = SolutionPayload::ShortestPath {
            distances: tree.distances,
            predecessors: tree.predecessors,
            path,
        };

        Ok(Solution::optimal(self.family(), objective, payload)
            .with_statistics(statistics)
            .with_message(message))
    }

    fn family(&self) -> ProblemFamily {
        ProblemFamily::ShortestPath
    }

    fn name(&self) -> &str {
        "native-shortest-path"
    }
}
