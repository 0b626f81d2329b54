//! ε-scaling auction algorithm for the linear assignment problem
//!
//! Agents bid for tasks at current prices; each bid raises the price of the
//! contested task by the bidder's margin over its second choice plus ε.
//! Costs are multiplied by `k + 1`, so the final phase at ε = 1 satisfies
//! ε < (k + 1) / k and the ε-optimal assignment is exactly optimal.
//!
//! Only integral cost matrices are supported; see [`is_supported`].

use super::{dimensions, finish, padded_cost, Matching, FAMILY};
use crate::domain::{Error, Result, SolveContext};
use std::collections::VecDeque;

pub const NAME: &str = "auction";

/// Largest scaled benefit magnitude; keeps prices well inside `i64`.
const MAX_SCALED_BENEFIT: f64 = (1u64 << 40) as f64;

/// ε is divided by this factor between phases.
const EPSILON_FACTOR: i64 = 4;

const CHECK_INTERVAL: u32 = 1024;

/// True when every cost is integral and small enough to scale exactly.
pub fn is_supported(costs: &[Vec<f64>]) -> bool {
    let n = costs.len();
    let m = costs.first().map_or(0, Vec::len);
    let scale = (n.max(m) + 1) as f64;
    costs.iter().flatten().all(|&c| {
        c.is_finite() && c.fract() == 0.0 && (c.abs() * scale) <= MAX_SCALED_BENEFIT
    })
}

/// Solve an integral cost matrix exactly.
pub fn solve(costs: &[Vec<f64>], ctx: &SolveContext) -> Result<Matching> {
    let (n, m, k) = dimensions(costs)?;
    if !is_supported(costs) {
        return Err(Error::invalid_input(
            FAMILY,
            "auction solver requires integral costs within scaling range",
        ));
    }

    // Benefit of giving task j to agent i; maximization of -cost scaled by k + 1
    let scale = (k + 1) as i64;
    let benefit: Vec<Vec<i64>> = (0..k)
        .map(|i| {
            (0..k)
                .map(|j| -(padded_cost(costs, n, m, i, j) as i64) * scale)
                .collect()
        })
        .collect();

    let range = benefit
        .iter()
        .flatten()
        .map(|b| b.abs())
        .max()
        .unwrap_or(0);

    let mut prices = vec![0i64; k];
    let mut agent_task: Vec<Option<usize>> = vec![None; k];
    let mut task_agent: Vec<Option<usize>> = vec![None; k];
    let mut iterations = 0u64;
    let mut ticker = ctx.ticker(FAMILY, CHECK_INTERVAL);

    let mut epsilon = (range / EPSILON_FACTOR).max(1);
    loop {
        agent_task.fill(None);
        task_agent.fill(None);
        let mut unassigned: VecDeque<usize> = (0..k).collect();

        while let Some(agent) = unassigned.pop_front() {
            ticker.tick()?;
            iterations += 1;

            let row = &benefit[agent];
            let mut best_task = 0usize;
            let mut best_value = i64::MIN;
            let mut second_value = i64::MIN;
            for (task, (&b, &price)) in row.iter().zip(prices.iter()).enumerate() {
                let value = b - price;
                if value > best_value {
                    second_value = best_value;
                    best_value = value;
                    best_task = task;
                } else if value > second_value {
                    second_value = value;
                }
            }
            if second_value == i64::MIN {
                // Single task: no competition
                second_value = best_value;
            }

            prices[best_task] += best_value - second_value + epsilon;

            if let Some(previous) = task_agent[best_task].replace(agent) {
                agent_task[previous] = None;
                unassigned.push_back(previous);
            }
            agent_task[agent] = Some(best_task);
        }

        if epsilon == 1 {
            break;
        }
        epsilon = (epsilon / EPSILON_FACTOR).max(1);
    }

    let mut pairs = Vec::with_capacity(n.min(m));
    for (agent, task) in agent_task.iter().enumerate() {
        let task = task.ok_or_else(|| {
            Error::internal(FAMILY, format!("agent {} left unassigned by auction", agent))
        })?;
        if agent < n && task < m {
            pairs.push((agent, task));
        }
    }

    Ok(finish(costs, pairs, iterations, NAME))
}
