use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use optdispatch::prelude::*;
use std::sync::Arc;

/// Deterministic linear congruential generator, so runs are comparable
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn dispatcher() -> Dispatcher {
    let registry = CapabilityRegistry::with_defaults(&ProviderConfig::default())
        .expect("default registry");
    Dispatcher::new(Arc::new(registry))
}

fn assignment(n: usize, rng: &mut Lcg) -> Problem {
    let costs = (0..n)
        .map(|_| (0..n).map(|_| rng.next(1000) as i64).collect())
        .collect();
    AssignmentProblem::from_integer_costs(costs).into()
}

fn knapsack(items: usize, capacity: i64, rng: &mut Lcg) -> Problem {
    let weights = (0..items).map(|_| 1 + rng.next(100) as i64).collect();
    let values = (0..items).map(|_| 1 + rng.next(500) as i64).collect();
    KnapsackProblem::new(weights, values, capacity).into()
}

fn grid_network(side: usize, rng: &mut Lcg) -> FlowNetwork {
    let id = |r: usize, c: usize| r * side + c;
    let mut network = FlowNetwork::new(side * side);
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                network = network.add_costed_arc(id(r, c), id(r, c + 1), 1 + rng.next(50) as i64, rng.next(20) as i64);
            }
            if r + 1 < side {
                network = network.add_costed_arc(id(r, c), id(r + 1, c), 1 + rng.next(50) as i64, rng.next(20) as i64);
            }
        }
    }
    network
}

fn shortest_path(nodes: usize, edges: usize, rng: &mut Lcg) -> Problem {
    let mut graph = WeightedGraph::directed(nodes);
    for _ in 0..edges {
        let from = rng.next(nodes as u64) as usize;
        let to = rng.next(nodes as u64) as usize;
        graph = graph.add_edge(from, to, rng.next(100) as f64);
    }
    ShortestPathProblem::new(graph, 0).into()
}

fn bench_assignment(c: &mut Criterion) {
    let dispatcher = dispatcher();
    let mut rng = Lcg(7);
    let mut group = c.benchmark_group("assignment");
    for n in [16, 64, 300] {
        let problem = assignment(n, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &problem, |b, problem| {
            b.iter(|| dispatcher.solve(black_box(problem), &SolveContext::new()))
        });
    }
    group.finish();
}

fn bench_knapsack(c: &mut Criterion) {
    let dispatcher = dispatcher();
    let mut rng = Lcg(11);
    let problem = knapsack(200, 5_000, &mut rng);
    c.bench_function("knapsack/200x5000", |b| {
        b.iter(|| dispatcher.solve(black_box(&problem), &SolveContext::new()))
    });
}

fn bench_shortest_path(c: &mut Criterion) {
    let dispatcher = dispatcher();
    let mut rng = Lcg(13);
    let problem = shortest_path(10_000, 50_000, &mut rng);
    c.bench_function("shortest_path/10k", |b| {
        b.iter(|| dispatcher.solve(black_box(&problem), &SolveContext::new()))
    });
}

fn bench_flows(c: &mut Criterion) {
    let dispatcher = dispatcher();
    let mut rng = Lcg(17);
    let network = grid_network(40, &mut rng);
    let sink = network.num_nodes - 1;

    let max_flow: Problem = MaxFlowProblem::new(network.clone(), 0, sink).into();
    c.bench_function("max_flow/grid40", |b| {
        b.iter(|| dispatcher.solve(black_box(&max_flow), &SolveContext::new()))
    });

    let min_cost: Problem = MinCostFlowProblem::maximum(network, 0, sink).into();
    c.bench_function("min_cost_flow/grid40", |b| {
        b.iter(|| dispatcher.solve(black_box(&min_cost), &SolveContext::new()))
    });
}

criterion_group!(benches, bench_assignment, bench_knapsack, bench_shortest_path, bench_flows);
criterion_main!(benches);
