//! Hungarian algorithm for the linear assignment problem
//!
//! Kuhn-Munkres in its O(k³) shortest augmenting path form: rows are added
//! one at a time, and each row is routed to a free column along a shortest
//! path in reduced costs while the dual potentials `u` (rows) and `v`
//! (columns) keep every reduced cost non-negative.

use super::{dimensions, finish, padded_cost, Matching, FAMILY};
use crate::domain::{Error, Result, SolveContext};

pub const NAME: &str = "hungarian";

/// Solve a (possibly rectangular) non-negative cost matrix.
pub fn solve(costs: &[Vec<f64>], ctx: &SolveContext) -> Result<Matching> {
    let (n, m, k) = dimensions(costs)?;

    // 1-indexed; index 0 is the virtual column the augmenting path starts from
    let mut u = vec![0.0f64; k + 1];
    let mut v = vec![0.0f64; k + 1];
    // p[j] = row matched to column j (0 = free)
    let mut p = vec![0usize; k + 1];
    // way[j] = previous column on the augmenting path to j
    let mut way = vec![0usize; k + 1];
    let mut minv = vec![f64::INFINITY; k + 1];
    let mut used = vec![false; k + 1];
    let mut iterations = 0u64;

    for i in 1..=k {
        ctx.checkpoint(FAMILY)?;

        p[0] = i;
        let mut j0 = 0usize;
        minv.fill(f64::INFINITY);
        used.fill(false);

        loop {
            iterations += 1;
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=k {
                if used[j] {
                    continue;
                }
                let cur = padded_cost(costs, n, m, i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                // Strict comparison keeps the leftmost column among ties
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            if j1 == 0 {
                return Err(Error::internal(
                    FAMILY,
                    format!("no augmenting column found for row {}", i - 1),
                ));
            }

            for j in 0..=k {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let pairs = (1..=k)
        .filter(|&j| p[j] != 0 && p[j] <= n && j <= m)
        .map(|j| (p[j] - 1, j - 1))
        .collect();

    Ok(finish(costs, pairs, iterations, NAME))
}
