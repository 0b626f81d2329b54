// End-to-end solves through the dispatcher with the default registry

use optdispatch::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn dispatcher_with(config: ProviderConfig) -> Dispatcher {
    let registry = CapabilityRegistry::with_defaults(&config).unwrap();
    Dispatcher::new(Arc::new(registry))
}

fn dispatcher() -> Dispatcher {
    dispatcher_with(ProviderConfig::default())
}

#[test]
fn test_assignment_three_by_three() {
    let problem = AssignmentProblem::from_integer_costs(vec![
        vec![4, 2, 8],
        vec![4, 3, 7],
        vec![3, 1, 6],
    ]);
    let solution = dispatcher()
        .solve(&problem.into(), &SolveContext::new())
        .unwrap();

    // Three permutations reach 12; none is cheaper.
    assert_eq!(solution.status, SolutionStatus::Optimal);
    assert_eq!(solution.objective_value, Some(12.0));
    let Some(SolutionPayload::Assignment { pairs }) = solution.payload else {
        panic!("expected an assignment payload");
    };
    let mut tasks: Vec<_> = pairs.iter().map(|&(_, task)| task).collect();
    tasks.sort_unstable();
    assert_eq!(tasks, vec![0, 1, 2]);
}

#[test]
fn test_knapsack_small() {
    let problem = KnapsackProblem::new(vec![2, 3, 4], vec![3, 4, 5], 5);
    let solution = dispatcher()
        .dispatch(capability::KNAPSACK, &problem.into(), &SolveContext::new())
        .unwrap();

    assert_eq!(solution.objective_value, Some(7.0));
    assert_eq!(
        solution.payload,
        Some(SolutionPayload::Knapsack {
            selected: vec![0, 1],
            total_weight: 5,
            total_value: 7,
        })
    );
}

#[test]
fn test_knapsack_zero_capacity_is_empty() {
    let problem = KnapsackProblem::new(vec![0, 4], vec![3, 9], 0);
    let solution = dispatcher()
        .dispatch(capability::KNAPSACK, &problem.into(), &SolveContext::new())
        .unwrap();

    assert_eq!(solution.status, SolutionStatus::Optimal);
    assert_eq!(solution.objective_value, Some(0.0));
    assert_eq!(
        solution.payload,
        Some(SolutionPayload::Knapsack {
            selected: vec![],
            total_weight: 0,
            total_value: 0,
        })
    );
}

#[test]
fn test_shortest_path_five_nodes() {
    let graph = WeightedGraph::undirected(5)
        .add_edge(0, 1, 1.0)
        .add_edge(1, 2, 2.0)
        .add_edge(0, 2, 4.0)
        .add_edge(2, 3, 1.0)
        .add_edge(3, 4, 3.0);
    let problem = ShortestPathProblem::new(graph, 0).with_target(4);
    let solution = dispatcher()
        .solve(&problem.into(), &SolveContext::new())
        .unwrap();

    assert_eq!(solution.objective_value, Some(7.0));
    let Some(SolutionPayload::ShortestPath { path, .. }) = solution.payload else {
        panic!("expected a shortest-path payload");
    };
    assert_eq!(path, Some(vec![0, 1, 2, 3, 4]));
}

#[test]
fn test_max_flow_four_nodes() {
    // S=0, A=1, B=2, T=3
    let network = FlowNetwork::new(4)
        .add_arc(0, 1, 3)
        .add_arc(0, 2, 2)
        .add_arc(1, 3, 2)
        .add_arc(2, 3, 3)
        .add_arc(1, 2, 1);
    let solution = dispatcher()
        .solve(&MaxFlowProblem::new(network, 0, 3).into(), &SolveContext::new())
        .unwrap();

    // {S} is a minimum cut: 3 + 2
    assert_eq!(solution.objective_value, Some(5.0));
    let Some(SolutionPayload::MaxFlow { flow_value, min_cut, .. }) = solution.payload else {
        panic!("expected a max-flow payload");
    };
    assert_eq!(flow_value, 5);
    assert_eq!(min_cut, vec![0]);
}

#[test]
fn test_max_flow_with_reversed_cross_arc() {
    let network = FlowNetwork::new(4)
        .add_arc(0, 1, 3)
        .add_arc(0, 2, 2)
        .add_arc(1, 3, 2)
        .add_arc(2, 3, 3)
        .add_arc(2, 1, 1);
    let solution = dispatcher()
        .solve(&MaxFlowProblem::new(network, 0, 3).into(), &SolveContext::new())
        .unwrap();
    assert_eq!(solution.objective_value, Some(4.0));
}

#[test]
fn test_unregistered_capability() {
    let problem: Problem = KnapsackProblem::new(vec![1], vec![1], 1).into();
    let err = dispatcher()
        .dispatch("optimize.vehicle_routing", &problem, &SolveContext::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedCapability);
}

#[test]
fn test_knapsack_over_memory_budget() {
    let dispatcher = dispatcher_with(ProviderConfig::default().with_knapsack_memory_budget(4096));
    let problem = KnapsackProblem::new(vec![1, 2, 3], vec![1, 2, 3], 1_000_000);
    let err = dispatcher
        .solve(&problem.into(), &SolveContext::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(err.to_string().contains("budget"));
}

#[test]
fn test_min_cost_flow_diamond() {
    let network = FlowNetwork::new(4)
        .add_costed_arc(0, 1, 10, 1)
        .add_costed_arc(0, 2, 10, 3)
        .add_costed_arc(1, 3, 10, 1)
        .add_costed_arc(2, 3, 10, 3);
    let solution = dispatcher()
        .solve(
            &MinCostFlowProblem::with_value(network, 0, 3, 15).into(),
            &SolveContext::new(),
        )
        .unwrap();
    assert_eq!(solution.objective_value, Some(50.0));
}

#[test]
fn test_infeasible_outcomes_are_solutions() {
    let graph = WeightedGraph::directed(3).add_edge(0, 1, 1.0);
    let problem = ShortestPathProblem::new(graph, 0).with_target(2);
    let solution = dispatcher()
        .solve(&problem.into(), &SolveContext::new())
        .unwrap();
    assert_eq!(solution.status, SolutionStatus::Infeasible);
    assert!(solution.payload.is_none());

    let network = FlowNetwork::new(2).add_arc(0, 1, 3);
    let solution = dispatcher()
        .solve(
            &MinCostFlowProblem::with_value(network, 0, 1, 4).into(),
            &SolveContext::new(),
        )
        .unwrap();
    assert_eq!(solution.status, SolutionStatus::Infeasible);
}

#[test]
fn test_invalid_input_is_an_error() {
    let problem = KnapsackProblem::new(vec![1, 2], vec![1], 3);
    let err = dispatcher()
        .solve(&problem.into(), &SolveContext::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_cancelled_solve_times_out() {
    let token = CancellationToken::new();
    token.cancel();
    let ctx = SolveContext::new().with_cancellation(token);
    let problem = KnapsackProblem::new(vec![2, 3, 4], vec![3, 4, 5], 5);
    let solution = dispatcher().solve(&problem.into(), &ctx).unwrap();
    assert_eq!(solution.status, SolutionStatus::TimedOut);
}

#[test]
fn test_expired_deadline_times_out() {
    let ctx = SolveContext::new().with_timeout(Duration::ZERO);
    let problem = KnapsackProblem::new(vec![1, 1], vec![1, 1], 2);
    let solution = dispatcher().solve(&problem.into(), &ctx).unwrap();
    assert_eq!(solution.status, SolutionStatus::TimedOut);
    assert!(solution.objective_value.is_none());
}

#[test]
fn test_constraint_capability_follows_feature() {
    let problem: Problem = ConstraintProblem::new(serde_json::json!({
        "sense": "minimize",
        "objective": [1.0, 1.0],
        "constraints": [{ "coefficients": [1.0, 1.0], "comparison": "ge", "bound": 3.0 }]
    }))
    .into();
    let outcome = dispatcher().solve(&problem, &SolveContext::new());

    if cfg!(feature = "ffi") {
        let solution = outcome.unwrap();
        assert!((solution.objective_value.unwrap() - 3.0).abs() < 1e-6);
    } else {
        assert_eq!(outcome.unwrap_err().kind(), ErrorKind::UnsupportedCapability);
    }
}
