//! Network flow algorithms over a shared residual graph
//!
//! - [`max_flow`] - FIFO push-relabel with global relabeling on gaps
//! - [`min_cost_flow`] - successive shortest paths with node potentials
//!
//! Input arc `i` becomes residual arc `2 * i`, its reverse `2 * i + 1`.
//! Uncapacitated arcs are given a finite bound strictly larger than any
//! flow they can carry in an optimal solution. Residual capacities are
//! `i128` so that many saturated uncapacitated arcs can pile up on one node;
//! flows on input arcs always fit back into `i64`.

pub mod max_flow;
pub mod min_cost_flow;

use crate::domain::{Error, FlowNetwork, ProblemFamily, Result};
use std::collections::VecDeque;

/// Residual graph in paired-arc form
#[derive(Debug, Clone)]
pub(crate) struct Residual {
    pub head: Vec<usize>,
    pub capacity: Vec<i128>,
    pub cost: Vec<i64>,
    /// Starting capacity of each arc, for flow extraction
    pub initial: Vec<i128>,
    pub adjacency: Vec<Vec<usize>>,
}

impl Residual {
    pub fn with_nodes(num_nodes: usize) -> Self {
        Self {
            head: Vec::new(),
            capacity: Vec::new(),
            cost: Vec::new(),
            initial: Vec::new(),
            adjacency: vec![Vec::new(); num_nodes],
        }
    }

    /// Residual graph of `network` plus `extra_nodes` auxiliary nodes, with
    /// uncapacitated arcs bounded by `bound`.
    pub fn from_network(network: &FlowNetwork, bound: i64, extra_nodes: usize) -> Self {
        let mut graph = Self::with_nodes(network.num_nodes + extra_nodes);
        for arc in &network.arcs {
            let capacity = arc.capacity.unwrap_or(bound);
            graph.add_arc(arc.from, arc.to, i128::from(capacity), arc.cost);
        }
        graph
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Add an arc and its reverse, returning the forward arc id.
    ///
    /// Self-loops get ids but never appear in adjacency lists.
    pub fn add_arc(&mut self, from: usize, to: usize, capacity: i128, cost: i64) -> usize {
        let id = self.head.len();
        self.head.extend([to, from]);
        self.capacity.extend([capacity, 0]);
        self.initial.extend([capacity, 0]);
        self.cost.extend([cost, -cost]);
        if from != to {
            self.adjacency[from].push(id);
            self.adjacency[to].push(id ^ 1);
        }
        id
    }

    /// Tail of an arc
    #[inline]
    pub fn tail(&self, arc: usize) -> usize {
        self.head[arc ^ 1]
    }

    #[inline]
    pub fn push(&mut self, arc: usize, amount: i128) {
        self.capacity[arc] -= amount;
        self.capacity[arc ^ 1] += amount;
    }

    /// Flow on a forward arc
    #[inline]
    pub fn flow(&self, arc: usize) -> i128 {
        self.initial[arc] - self.capacity[arc]
    }

    /// Flows on the first `num_arcs` input arcs, in input order.
    pub fn input_flows(&self, num_arcs: usize, family: ProblemFamily) -> Result<Vec<i64>> {
        (0..num_arcs)
            .map(|i| {
                i64::try_from(self.flow(2 * i)).map_err(|_| {
                    Error::internal(family, format!("flow on arc {} overflows a 64-bit integer", i))
                })
            })
            .collect()
    }

    /// Net flow leaving `node` over the first `num_arcs` input arcs.
    pub fn net_outflow(&self, node: usize, num_arcs: usize) -> i128 {
        (0..num_arcs)
            .map(|i| {
                let (from, to) = (self.tail(2 * i), self.head[2 * i]);
                match (from == node, to == node) {
                    (true, false) => self.flow(2 * i),
                    (false, true) => -self.flow(2 * i),
                    _ => 0,
                }
            })
            .sum()
    }

    /// Nodes reachable from `source` through arcs with residual capacity.
    pub fn reachable_from(&self, source: usize) -> Vec<bool> {
        let mut seen = vec![false; self.num_nodes()];
        let mut queue = VecDeque::from([source]);
        seen[source] = true;
        while let Some(node) = queue.pop_front() {
            for &arc in &self.adjacency[node] {
                let next = self.head[arc];
                if self.capacity[arc] > 0 && !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}

/// Bound for uncapacitated arcs: all finite capacity plus `extra`, plus one.
pub(crate) fn uncapacitated_bound(network: &FlowNetwork, extra: i64, family: ProblemFamily) -> Result<i64> {
    network
        .arcs
        .iter()
        .filter_map(|arc| arc.capacity)
        .try_fold(extra, |acc, c| acc.checked_add(c))
        .and_then(|total| total.checked_add(1))
        .ok_or_else(|| Error::invalid_input(family, "total capacity overflows a 64-bit integer"))
}

/// True when `sink` is reachable from `source` over uncapacitated arcs alone.
pub(crate) fn uncapacitated_path(network: &FlowNetwork, source: usize, sink: usize) -> bool {
    let mut adjacency = vec![Vec::new(); network.num_nodes];
    for arc in network.arcs.iter().filter(|a| a.capacity.is_none()) {
        adjacency[arc.from].push(arc.to);
    }

    let mut seen = vec![false; network.num_nodes];
    let mut queue = VecDeque::from([source]);
    seen[source] = true;
    while let Some(node) = queue.pop_front() {
        if node == sink {
            return true;
        }
        for &next in &adjacency[node] {
            if !seen[next] {
                seen[next] = true;
                queue.push_back(next);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paired_arc_ids() {
        let network = FlowNetwork::new(3).add_costed_arc(0, 1, 4, 2).add_arc(1, 2, 1);
        let mut graph = Residual::from_network(&network, 100, 0);
        assert_eq!(graph.head, vec![1, 0, 2, 1]);
        assert_eq!(graph.cost, vec![2, -2, 0, 0]);
        assert_eq!(graph.tail(2), 1);

        graph.push(0, 3);
        assert_eq!(graph.flow(0), 3);
        assert_eq!(graph.capacity[1], 3);
        assert_eq!(graph.reachable_from(0), vec![true, true, true]);
        graph.push(2, 1);
        assert_eq!(graph.reachable_from(0), vec![true, true, false]);
    }

    #[test]
    fn test_self_loops_stay_out_of_adjacency() {
        let network = FlowNetwork::new(2).add_arc(1, 1, 5).add_arc(0, 1, 1);
        let graph = Residual::from_network(&network, 10, 1);
        assert_eq!(graph.num_nodes(), 3);
        assert!(graph.adjacency[1].iter().all(|&a| a != 0 && a != 1));
        assert_eq!(graph.adjacency[0], vec![2]);
    }

    #[test]
    fn test_uncapacitated_helpers() {
        let network = FlowNetwork::new(3)
            .add_uncapacitated_arc(0, 1, 0)
            .add_arc(1, 2, 7)
            .add_arc(0, 2, 5);
        assert!(uncapacitated_path(&network, 0, 1));
        assert!(!uncapacitated_path(&network, 0, 2));
        assert_eq!(uncapacitated_bound(&network, 3, ProblemFamily::MaxFlow).unwrap(), 16);
    }

    #[test]
    fn test_flow_extraction() {
        let network = FlowNetwork::new(3)
            .add_arc(0, 1, 4)
            .add_arc(1, 2, 4)
            .add_arc(2, 0, 4);
        let mut graph = Residual::from_network(&network, 10, 0);
        graph.push(0, 3);
        graph.push(2, 3);
        graph.push(4, 1);
        assert_eq!(graph.input_flows(3, ProblemFamily::MaxFlow).unwrap(), vec![3, 3, 1]);
        assert_eq!(graph.net_outflow(0, 3), 2);
        assert_eq!(graph.net_outflow(1, 3), 0);

        graph.push(0, i128::from(i64::MAX));
        assert!(graph.input_flows(3, ProblemFamily::MaxFlow).is_err());
    }
}
