//! Linear assignment problem solvers
//!
//! Finds a one-to-one pairing of agents (rows) to tasks (columns) with
//! minimum total cost. Rectangular matrices are padded to a square one with
//! zero-cost dummy entries; pairings with a dummy are dropped from the
//! result.
//!
//! ## Algorithms
//!
//! - [`hungarian`] - O(k³) successive shortest augmenting paths with dual
//!   potentials; exact for real-valued costs
//! - [`auction`] - ε-scaling forward auction; exact for integral costs,
//!   used above the configured size threshold
//!
//! Both are deterministic: the Hungarian method augments rows in index
//! order scanning columns left to right, the auction serves unassigned
//! agents first-in first-out and breaks ties towards the lowest task index.

pub mod auction;
pub mod hungarian;

use crate::domain::{AssignmentConfig, Error, ProblemFamily, Result, SolveContext};
use log::debug;

const FAMILY: ProblemFamily = ProblemFamily::Assignment;

/// Optimal matching between agents and tasks
#[derive(Debug, Clone, PartialEq)]
pub struct Matching {
    /// `(agent, task)` pairs sorted by agent
    pub pairs: Vec<(usize, usize)>,
    pub total_cost: f64,
    pub iterations: u64,
    pub algorithm: &'static str,
}

impl Matching {
    /// Task matched to an agent, if any
    pub fn task_for_agent(&self, agent: usize) -> Option<usize> {
        self.pairs
            .iter()
            .find(|&&(a, _)| a == agent)
            .map(|&(_, t)| t)
    }
}

/// Dimensions `(agents, tasks, padded size)`, or `Infeasible` for an empty side.
fn dimensions(costs: &[Vec<f64>]) -> Result<(usize, usize, usize)> {
    let n = costs.len();
    let m = costs.first().map_or(0, Vec::len);
    if n == 0 || m == 0 {
        return Err(Error::infeasible(
            FAMILY,
            format!("{} agents and {} tasks leave nothing to assign", n, m),
        ));
    }
    Ok((n, m, n.max(m)))
}

/// Cost of the zero-padded square matrix.
#[inline]
fn padded_cost(costs: &[Vec<f64>], n: usize, m: usize, i: usize, j: usize) -> f64 {
    if i < n && j < m {
        costs[i][j]
    } else {
        0.0
    }
}

fn finish(
    costs: &[Vec<f64>],
    mut pairs: Vec<(usize, usize)>,
    iterations: u64,
    algorithm: &'static str,
) -> Matching {
    pairs.sort_unstable();
    let total_cost = pairs.iter().map(|&(i, j)| costs[i][j]).sum();
    Matching {
        pairs,
        total_cost,
        iterations,
        algorithm,
    }
}

/// Solve with the configured algorithm selection policy.
pub fn solve(costs: &[Vec<f64>], config: &AssignmentConfig, ctx: &SolveContext) -> Result<Matching> {
    let (_, _, size) = dimensions(costs)?;

    if size > config.auction_threshold {
        if auction::is_supported(costs) {
            debug!("assignment of size {} uses the auction solver", size);
            return auction::solve(costs, ctx);
        }
        debug!(
            "assignment of size {} has non-integral costs, using the Hungarian solver",
            size
        );
    }

    hungarian::solve(costs, ctx)
}
