// Structural validation, run by the dispatch facade before any provider

use super::models::{
    AssignmentProblem, FlowDemand, FlowNetwork, KnapsackProblem, MaxFlowProblem,
    MinCostFlowProblem, Problem, ShortestPathProblem,
};
use super::provider::{Error, Result};
use super::value_objects::ProblemFamily;

/// Largest total finite capacity of a flow network, keeping every excess in range.
pub const MAX_TOTAL_CAPACITY: i64 = 1 << 60;

/// Largest arc cost magnitude, keeping shortest-path potentials in range.
pub const MAX_ARC_COST: i64 = 1 << 40;

/// Check the dimension and sign invariants of a problem.
///
/// All violations are reported together in one `InvalidInput` error.
pub fn validate(problem: &Problem) -> Result<()> {
    let errors = match problem {
        Problem::Assignment(p) => assignment_errors(p),
        Problem::Knapsack(p) => knapsack_errors(p),
        Problem::ShortestPath(p) => shortest_path_errors(p),
        Problem::MaxFlow(p) => max_flow_errors(p),
        Problem::MinCostFlow(p) => min_cost_flow_errors(p),
        // Opaque to the native core
        Problem::GenericConstraint(_) => Vec::new(),
    };

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::invalid_input(problem.family(), errors.join("; ")))
    }
}

fn assignment_errors(problem: &AssignmentProblem) -> Vec<String> {
    let mut errors = Vec::new();
    let num_tasks = problem.num_tasks();

    for (i, row) in problem.costs.iter().enumerate() {
        if row.len() != num_tasks {
            errors.push(format!(
                "row {} has {} columns but row 0 has {}",
                i,
                row.len(),
                num_tasks
            ));
        }
        for (j, &cost) in row.iter().enumerate() {
            if !cost.is_finite() {
                errors.push(format!("cost[{}][{}] is not finite", i, j));
            } else if cost < 0.0 {
                errors.push(format!("cost[{}][{}] = {} is negative", i, j, cost));
            }
        }
    }

    errors
}

fn knapsack_errors(problem: &KnapsackProblem) -> Vec<String> {
    let mut errors = Vec::new();

    if problem.weights.len() != problem.values.len() {
        errors.push(format!(
            "{} weights but {} values",
            problem.weights.len(),
            problem.values.len()
        ));
    }
    if problem.capacity < 0 {
        errors.push(format!("capacity {} is negative", problem.capacity));
    }
    for (i, &w) in problem.weights.iter().enumerate() {
        if w < 0 {
            errors.push(format!("weight[{}] = {} is negative", i, w));
        }
    }
    for (i, &v) in problem.values.iter().enumerate() {
        if v < 0 {
            errors.push(format!("value[{}] = {} is negative", i, v));
        }
    }
    if errors.is_empty()
        && problem
            .values
            .iter()
            .try_fold(0i64, |acc, &v| acc.checked_add(v))
            .is_none()
    {
        errors.push("total value overflows a 64-bit integer".to_string());
    }

    errors
}

fn shortest_path_errors(problem: &ShortestPathProblem) -> Vec<String> {
    let mut errors = Vec::new();
    let n = problem.graph.num_nodes;

    if problem.source >= n {
        errors.push(format!("source {} is not one of {} nodes", problem.source, n));
    }
    if let Some(target) = problem.target {
        if target >= n {
            errors.push(format!("target {} is not one of {} nodes", target, n));
        }
    }
    for (i, edge) in problem.graph.edges.iter().enumerate() {
        if edge.from >= n || edge.to >= n {
            errors.push(format!(
                "edge {} ({} -> {}) references an undeclared node",
                i, edge.from, edge.to
            ));
        }
        if !edge.weight.is_finite() {
            errors.push(format!("edge {} weight is not finite", i));
        } else if edge.weight < 0.0 {
            errors.push(format!("edge {} has negative weight {}", i, edge.weight));
        }
    }

    errors
}

fn network_errors(network: &FlowNetwork, costed: bool, errors: &mut Vec<String>) {
    let n = network.num_nodes;
    let mut total_capacity = 0i64;
    for (i, arc) in network.arcs.iter().enumerate() {
        if arc.from >= n || arc.to >= n {
            errors.push(format!(
                "arc {} ({} -> {}) references an undeclared node",
                i, arc.from, arc.to
            ));
        }
        if let Some(capacity) = arc.capacity {
            if capacity < 0 {
                errors.push(format!("arc {} has negative capacity {}", i, capacity));
            } else {
                total_capacity = total_capacity.saturating_add(capacity);
            }
        }
        if costed && arc.cost.checked_abs().map_or(true, |c| c > MAX_ARC_COST) {
            errors.push(format!("arc {} cost {} exceeds magnitude 2^40", i, arc.cost));
        }
    }
    if total_capacity > MAX_TOTAL_CAPACITY {
        errors.push("total arc capacity exceeds 2^60".to_string());
    }
}

fn terminal_errors(n: usize, source: usize, sink: usize, errors: &mut Vec<String>) {
    if source >= n {
        errors.push(format!("source {} is not one of {} nodes", source, n));
    }
    if sink >= n {
        errors.push(format!("sink {} is not one of {} nodes", sink, n));
    }
    if source == sink {
        errors.push("source and sink must be different".to_string());
    }
}

fn max_flow_errors(problem: &MaxFlowProblem) -> Vec<String> {
    let mut errors = Vec::new();
    terminal_errors(problem.network.num_nodes, problem.source, problem.sink, &mut errors);
    network_errors(&problem.network, false, &mut errors);
    errors
}

fn min_cost_flow_errors(problem: &MinCostFlowProblem) -> Vec<String> {
    let mut errors = Vec::new();
    let n = problem.network.num_nodes;

    match &problem.demand {
        FlowDemand::SourceSink {
            source,
            sink,
            value,
        } => {
            terminal_errors(n, *source, *sink, &mut errors);
            if let Some(v) = value {
                if *v < 0 {
                    errors.push(format!("requested flow value {} is negative", v));
                } else if *v > MAX_TOTAL_CAPACITY {
                    errors.push(format!("requested flow value {} exceeds 2^60", v));
                }
            }
        }
        FlowDemand::Supplies(supplies) => {
            if supplies.len() != n {
                errors.push(format!("{} supplies for {} nodes", supplies.len(), n));
            }
            let positive = supplies
                .iter()
                .filter(|&&s| s > 0)
                .try_fold(0i64, |acc, &s| acc.checked_add(s));
            if positive.map_or(true, |p| p > MAX_TOTAL_CAPACITY) {
                errors.push("total supply exceeds 2^60".to_string());
            }
            match supplies.iter().try_fold(0i64, |acc, &s| acc.checked_add(s)) {
                Some(0) => {}
                Some(total) => errors.push(format!("supplies must sum to 0, got {}", total)),
                None => errors.push("supply total overflows a 64-bit integer".to_string()),
            }
        }
    }
    network_errors(&problem.network, true, &mut errors);

    errors
}

/// Family tag helper for callers that validate a bare family problem.
pub fn validate_family(family: ProblemFamily, problem: &Problem) -> Result<()> {
    if problem.family() != family {
        return Err(Error::invalid_input(
            family,
            format!("expected a {} problem, got {}", family, problem.family()),
        ));
    }
    validate(problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FlowNetwork, WeightedGraph};
    use crate::domain::provider::ErrorKind;

    fn kind_of(problem: Problem) -> Option<ErrorKind> {
        validate(&problem).err().map(|e| e.kind())
    }

    #[test]
    fn test_ragged_cost_matrix_rejected() {
        let problem = AssignmentProblem::from_costs(vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(kind_of(problem.into()), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_negative_and_nan_costs_rejected() {
        let problem = AssignmentProblem::from_costs(vec![vec![-1.0, f64::NAN]]);
        let err = validate(&problem.into()).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("negative"));
        assert!(text.contains("not finite"));
    }

    #[test]
    fn test_empty_assignment_is_well_formed() {
        assert!(validate(&AssignmentProblem::from_costs(vec![]).into()).is_ok());
    }

    #[test]
    fn test_knapsack_length_mismatch() {
        let problem = KnapsackProblem::new(vec![1, 2], vec![1], 3);
        assert_eq!(kind_of(problem.into()), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_knapsack_negative_capacity() {
        let problem = KnapsackProblem::new(vec![1], vec![1], -1);
        assert_eq!(kind_of(problem.into()), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_knapsack_value_overflow() {
        let problem = KnapsackProblem::new(vec![1, 1], vec![i64::MAX, 1], 3);
        assert_eq!(kind_of(problem.into()), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_negative_edge_weight_rejected() {
        let graph = WeightedGraph::directed(2).add_edge(0, 1, -1.0);
        let problem = ShortestPathProblem::new(graph, 0);
        let err = validate(&problem.into()).unwrap_err();
        assert!(err.to_string().contains("negative weight"));
    }

    #[test]
    fn test_edge_to_undeclared_node_rejected() {
        let graph = WeightedGraph::directed(2).add_edge(0, 5, 1.0);
        let problem = ShortestPathProblem::new(graph, 0).with_target(1);
        assert_eq!(kind_of(problem.into()), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_flow_source_equals_sink() {
        let network = FlowNetwork::new(2).add_arc(0, 1, 1);
        let problem = MaxFlowProblem::new(network, 1, 1);
        assert_eq!(kind_of(problem.into()), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let network = FlowNetwork::new(2).add_arc(0, 1, -3);
        let problem = MaxFlowProblem::new(network, 0, 1);
        assert_eq!(kind_of(problem.into()), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_unbalanced_supplies_rejected() {
        let network = FlowNetwork::new(2).add_costed_arc(0, 1, 5, 1);
        let problem = MinCostFlowProblem::with_supplies(network, vec![3, -2]);
        let err = validate(&problem.into()).unwrap_err();
        assert!(err.to_string().contains("sum to 0"));
    }

    #[test]
    fn test_oversized_cost_rejected() {
        let network = FlowNetwork::new(2).add_costed_arc(0, 1, 5, i64::MIN);
        let problem = MinCostFlowProblem::with_value(network, 0, 1, 1);
        let err = validate(&problem.into()).unwrap_err();
        assert!(err.to_string().contains("2^40"));
    }

    #[test]
    fn test_total_capacity_limit() {
        let network = FlowNetwork::new(2)
            .add_arc(0, 1, MAX_TOTAL_CAPACITY)
            .add_arc(0, 1, 1);
        let problem = MaxFlowProblem::new(network, 0, 1);
        assert_eq!(kind_of(problem.into()), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_family_mismatch_rejected() {
        let problem: Problem = KnapsackProblem::new(vec![], vec![], 0).into();
        assert!(validate_family(ProblemFamily::Assignment, &problem).is_err());
        assert!(validate_family(ProblemFamily::Knapsack, &problem).is_ok());
    }
}
