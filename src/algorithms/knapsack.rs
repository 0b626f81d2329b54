//! 0/1 knapsack by dynamic programming
//!
//! `best[c]` holds the best value reachable with residual capacity `c`
//! over the items processed so far; a per-item keep table records the
//! choices for backtracking. Items heavier than the capacity are dropped
//! before the table is sized, so time and space are O(n'·C) for the n'
//! items that fit.

use crate::domain::{Error, KnapsackProblem, ProblemFamily, Result, SolveContext};

pub const NAME: &str = "dynamic_programming";

const FAMILY: ProblemFamily = ProblemFamily::Knapsack;

/// Chosen items of an optimal packing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Selected item indices, ascending
    pub selected: Vec<usize>,
    pub total_weight: i64,
    pub total_value: i64,
    pub iterations: u64,
}

/// Bytes the dynamic-programming tables need, `None` on overflow.
pub fn table_bytes(problem: &KnapsackProblem) -> Option<usize> {
    let width = usize::try_from(problem.capacity).ok()?.checked_add(1)?;
    let rows = problem
        .weights
        .iter()
        .filter(|&&w| w <= problem.capacity)
        .count();
    let keep = rows.checked_mul(width)?;
    let best = width.checked_mul(std::mem::size_of::<i64>())?;
    keep.checked_add(best)
}

/// Reject problems whose tables would exceed `budget_bytes`.
pub fn check_memory_budget(problem: &KnapsackProblem, budget_bytes: usize) -> Result<()> {
    match table_bytes(problem) {
        Some(bytes) if bytes <= budget_bytes => Ok(()),
        Some(bytes) => Err(Error::invalid_input(
            FAMILY,
            format!(
                "capacity {} needs a {} byte table, over the {} byte budget",
                problem.capacity, bytes, budget_bytes
            ),
        )),
        None => Err(Error::invalid_input(
            FAMILY,
            format!("capacity {} is too large to tabulate", problem.capacity),
        )),
    }
}

/// Solve a validated problem within the memory budget.
pub fn solve(problem: &KnapsackProblem, budget_bytes: usize, ctx: &SolveContext) -> Result<Selection> {
    check_memory_budget(problem, budget_bytes)?;

    // An empty knapsack takes nothing, zero-weight items included
    if problem.capacity == 0 {
        return Ok(Selection {
            selected: Vec::new(),
            total_weight: 0,
            total_value: 0,
            iterations: 0,
        });
    }

    let capacity = usize::try_from(problem.capacity)
        .map_err(|_| Error::invalid_input(FAMILY, "capacity does not fit in memory"))?;
    let width = capacity + 1;

    let candidates: Vec<usize> = (0..problem.num_items())
        .filter(|&i| problem.weights[i] <= problem.capacity)
        .collect();

    let mut best = vec![0i64; width];
    let mut keep = vec![false; candidates.len() * width];
    let mut iterations = 0u64;

    for (row, &item) in candidates.iter().enumerate() {
        ctx.checkpoint(FAMILY)?;

        let weight = problem.weights[item] as usize;
        let value = problem.values[item];
        if value == 0 {
            continue;
        }

        let keep_row = &mut keep[row * width..(row + 1) * width];
        // Descending capacities so each item is used at most once
        for c in (weight..=capacity).rev() {
            let with_item = best[c - weight] + value;
            if with_item > best[c] {
                best[c] = with_item;
                keep_row[c] = true;
            }
        }
        iterations += (width - weight) as u64;
    }

    let mut selected = Vec::new();
    let mut remaining = capacity;
    for row in (0..candidates.len()).rev() {
        if keep[row * width + remaining] {
            let item = candidates[row];
            selected.push(item);
            remaining -= problem.weights[item] as usize;
        }
    }
    selected.reverse();

    let total_weight = selected.iter().map(|&i| problem.weights[i]).sum();
    let total_value = selected.iter().map(|&i| problem.values[i]).sum();

    if total_value != best[capacity] {
        return Err(Error::internal(
            FAMILY,
            format!(
                "backtracked value {} differs from table optimum {}",
                total_value, best[capacity]
            ),
        ));
    }

    Ok(Selection {
        selected,
        total_weight,
        total_value,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    const BUDGET: usize = 64 * 1024 * 1024;

    fn run(weights: Vec<i64>, values: Vec<i64>, capacity: i64) -> Selection {
        let problem = KnapsackProblem::new(weights, values, capacity);
        solve(&problem, BUDGET, &SolveContext::new()).unwrap()
    }

    #[test]
    fn test_small_instance() {
        let selection = run(vec![2, 3, 4], vec![3, 4, 5], 5);
        assert_eq!(selection.total_value, 7);
        assert_eq!(selection.selected, vec![0, 1]);
        assert_eq!(selection.total_weight, 5);
    }

    #[test]
    fn test_classic_instance() {
        let selection = run(vec![10, 20, 30], vec![60, 100, 120], 50);
        assert_eq!(selection.total_value, 220);
        assert_eq!(selection.selected, vec![1, 2]);
    }

    #[test]
    fn test_zero_capacity_is_empty() {
        let selection = run(vec![1, 2], vec![5, 6], 0);
        assert!(selection.selected.is_empty());
        assert_eq!(selection.total_value, 0);
    }

    #[test]
    fn test_no_items() {
        let selection = run(vec![], vec![], 10);
        assert!(selection.selected.is_empty());
        assert_eq!(selection.total_weight, 0);
    }

    #[test]
    fn test_oversized_items_excluded() {
        let selection = run(vec![100, 3], vec![1000, 4], 10);
        assert_eq!(selection.selected, vec![1]);
        assert_eq!(table_bytes(&KnapsackProblem::new(vec![100, 3], vec![1, 1], 10)), Some(11 + 88));
    }

    #[test]
    fn test_zero_capacity_selects_nothing() {
        let selection = run(vec![0, 4], vec![3, 9], 0);
        assert!(selection.selected.is_empty());
        assert_eq!(selection.total_value, 0);
        assert_eq!(selection.total_weight, 0);
    }

    #[test]
    fn test_zero_weight_items_fit_positive_capacity() {
        let selection = run(vec![0, 4], vec![3, 9], 1);
        assert_eq!(selection.selected, vec![0]);
        assert_eq!(selection.total_value, 3);
    }

    #[test]
    fn test_budget_exceeded_is_invalid_input() {
        let problem = KnapsackProblem::new(vec![1, 2], vec![1, 2], 1_000_000);
        let err = solve(&problem, 1024, &SolveContext::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("budget"));
    }

    #[test]
    fn test_huge_capacity_overflow_is_invalid_input() {
        let problem = KnapsackProblem::new(vec![1], vec![1], i64::MAX);
        assert!(check_memory_budget(&problem, usize::MAX).is_err());
    }
}
