//! Single-source shortest paths by Dijkstra's algorithm
//!
//! Binary heap keyed on `(distance, node)` with lazy deletion. Labels are only
//! replaced on strict improvement and equal distances pop lowest node first,
//! so the predecessor tree is a function of the input order alone.

use crate::domain::{ProblemFamily, Result, ShortestPathProblem, SolveContext};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

pub const NAME: &str = "dijkstra";

const FAMILY: ProblemFamily = ProblemFamily::ShortestPath;

const CHECK_INTERVAL: u32 = 4096;

/// Shortest-path tree rooted at the source
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    pub source: usize,
    /// `None` for nodes the source cannot reach
    pub distances: Vec<Option<f64>>,
    pub predecessors: Vec<Option<usize>>,
    pub iterations: u64,
}

impl ShortestPaths {
    pub fn distance(&self, node: usize) -> Option<f64> {
        self.distances.get(node).copied().flatten()
    }

    /// Node sequence from the source to `target`, if reachable.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        self.distance(target)?;
        let mut path = vec![target];
        let mut node = target;
        while let Some(prev) = self.predecessors[node] {
            path.push(prev);
            node = prev;
        }
        path.reverse();
        Some(path)
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    node: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    // Reversed so the max-heap yields the smallest distance, then the lowest node
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Outgoing `(head, weight)` lists, undirected edges stored in both directions.
fn adjacency(problem: &ShortestPathProblem) -> Vec<Vec<(usize, f64)>> {
    let graph = &problem.graph;
    let mut adjacency = vec![Vec::new(); graph.num_nodes];
    for edge in &graph.edges {
        adjacency[edge.from].push((edge.to, edge.weight));
        if !graph.is_directed() && edge.from != edge.to {
            adjacency[edge.to].push((edge.from, edge.weight));
        }
    }
    adjacency
}

/// Compute the full shortest-path tree of a validated problem.
pub fn solve(problem: &ShortestPathProblem, ctx: &SolveContext) -> Result<ShortestPaths> {
    let n = problem.graph.num_nodes;
    let adjacency = adjacency(problem);

    let mut distances: Vec<Option<f64>> = vec![None; n];
    let mut predecessors: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();
    let mut ticker = ctx.ticker(FAMILY, CHECK_INTERVAL);
    let mut iterations = 0u64;

    distances[problem.source] = Some(0.0);
    heap.push(Candidate {
        distance: 0.0,
        node: problem.source,
    });

    while let Some(Candidate { distance, node }) = heap.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;
        ticker.tick()?;

        for &(head, weight) in &adjacency[node] {
            iterations += 1;
            if settled[head] {
                continue;
            }
            let candidate = distance + weight;
            if distances[head].map_or(true, |d| candidate < d) {
                distances[head] = Some(candidate);
                predecessors[head] = Some(node);
                heap.push(Candidate {
                    distance: candidate,
                    node: head,
                });
            }
        }
    }

    Ok(ShortestPaths {
        source: problem.source,
        distances,
        predecessors,
        iterations,
    })
}
