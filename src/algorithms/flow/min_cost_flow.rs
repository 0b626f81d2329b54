//! Minimum-cost flow by successive shortest paths
//!
//! Negative-cost arcs start saturated, which leaves every residual arc with
//! a non-negative cost and moves the imbalance onto node supplies. A super
//! source and super sink then route the remaining supplies along shortest
//! paths in reduced costs, with Dijkstra potentials kept valid after each
//! augmentation. In maximum-flow mode augmentation continues from source to
//! sink until the sink becomes unreachable.

use super::{uncapacitated_bound, uncapacitated_path, Residual};
use crate::domain::{
    Error, FlowDemand, FlowNetwork, MinCostFlowProblem, ProblemFamily, Result, SolveContext,
};
use log::debug;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

pub const NAME: &str = "successive_shortest_paths";

const FAMILY: ProblemFamily = ProblemFamily::MinCostFlow;

const UNREACHED: i64 = i64::MAX;

/// Minimum-cost flow on the input arcs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinCostFlow {
    pub flow_value: i64,
    pub total_cost: i64,
    /// Flow on each input arc, in input order
    pub arc_flows: Vec<i64>,
    pub augmentations: u64,
}

/// True when uncapacitated arcs alone close a negative-cost cycle.
fn has_negative_uncapacitated_cycle(network: &FlowNetwork, ctx: &SolveContext) -> Result<bool> {
    let arcs: Vec<_> = network
        .arcs
        .iter()
        .filter(|a| a.capacity.is_none())
        .collect();
    if arcs.iter().all(|a| a.cost >= 0) {
        return Ok(false);
    }

    // Bellman-Ford from a virtual root joined to every node at cost zero
    let mut distance = vec![0i64; network.num_nodes];
    for _ in 0..network.num_nodes {
        ctx.checkpoint(FAMILY)?;
        let mut changed = false;
        for arc in &arcs {
            let candidate = distance[arc.from] + arc.cost;
            if candidate < distance[arc.to] {
                distance[arc.to] = candidate;
                changed = true;
            }
        }
        if !changed {
            return Ok(false);
        }
    }
    Ok(true)
}

struct ShortestPaths<'a> {
    graph: &'a mut Residual,
    potential: Vec<i64>,
    distance: Vec<i64>,
    parent_arc: Vec<Option<usize>>,
    augmentations: u64,
}

impl<'a> ShortestPaths<'a> {
    fn new(graph: &'a mut Residual) -> Self {
        let n = graph.num_nodes();
        Self {
            graph,
            potential: vec![0; n],
            distance: vec![UNREACHED; n],
            parent_arc: vec![None; n],
            augmentations: 0,
        }
    }

    /// Dijkstra over reduced costs; returns whether `sink` was reached.
    fn search(&mut self, source: usize, sink: usize) -> bool {
        self.distance.fill(UNREACHED);
        self.parent_arc.fill(None);
        self.distance[source] = 0;

        let mut heap = BinaryHeap::from([Reverse((0i64, source))]);
        while let Some(Reverse((d, node))) = heap.pop() {
            if d > self.distance[node] {
                continue;
            }
            for &arc in &self.graph.adjacency[node] {
                if self.graph.capacity[arc] <= 0 {
                    continue;
                }
                let head = self.graph.head[arc];
                let reduced = self.graph.cost[arc] + self.potential[node] - self.potential[head];
                let candidate = d + reduced;
                if candidate < self.distance[head] {
                    self.distance[head] = candidate;
                    self.parent_arc[head] = Some(arc);
                    heap.push(Reverse((candidate, head)));
                }
            }
        }

        // Unreached nodes move by the largest distance so reduced costs stay non-negative
        let farthest = self
            .distance
            .iter()
            .copied()
            .filter(|&d| d != UNREACHED)
            .max()
            .unwrap_or(0);
        for (p, &d) in self.potential.iter_mut().zip(&self.distance) {
            *p = p.saturating_add(if d == UNREACHED { farthest } else { d });
        }

        self.distance[sink] != UNREACHED
    }

    /// Route up to `limit` units from `source` to `sink`, returning the routed amount.
    fn augment(&mut self, source: usize, sink: usize, limit: i128, ctx: &SolveContext) -> Result<i128> {
        let mut routed = 0i128;
        while routed < limit {
            ctx.checkpoint(FAMILY)?;
            if !self.search(source, sink) {
                break;
            }

            let mut amount = limit - routed;
            let mut node = sink;
            while let Some(arc) = self.parent_arc[node] {
                amount = amount.min(self.graph.capacity[arc]);
                node = self.graph.tail(arc);
            }

            let mut node = sink;
            while let Some(arc) = self.parent_arc[node] {
                self.graph.push(arc, amount);
                node = self.graph.tail(arc);
            }

            routed += amount;
            self.augmentations += 1;
        }
        Ok(routed)
    }
}

/// Solve a validated min-cost flow problem.
pub fn solve(problem: &MinCostFlowProblem, ctx: &SolveContext) -> Result<MinCostFlow> {
    let network = &problem.network;
    let n = network.num_nodes;

    let (mut supply, maximize) = match &problem.demand {
        FlowDemand::SourceSink {
            source,
            sink,
            value,
        } => {
            let mut supply = vec![0i128; n];
            match value {
                Some(value) => {
                    supply[*source] += i128::from(*value);
                    supply[*sink] -= i128::from(*value);
                    (supply, None)
                }
                None => (supply, Some((*source, *sink))),
            }
        }
        FlowDemand::Supplies(supplies) => (supplies.iter().map(|&s| i128::from(s)).collect(), None),
    };

    let negative_cycle = has_negative_uncapacitated_cycle(network, ctx)?;
    if let Some((source, sink)) = maximize {
        if uncapacitated_path(network, source, sink) {
            return Err(Error::unbounded(
                FAMILY,
                "an uncapacitated path joins source and sink",
            ));
        }
        if negative_cycle {
            return Err(Error::unbounded(
                FAMILY,
                "uncapacitated arcs form a negative-cost cycle",
            ));
        }
    }

    let requested = i64::try_from(supply.iter().filter(|&&s| s > 0).sum::<i128>())
        .map_err(|_| Error::invalid_input(FAMILY, "total supply overflows a 64-bit integer"))?;
    let bound = uncapacitated_bound(network, requested, FAMILY)?;
    let (super_source, super_sink) = (n, n + 1);
    let mut graph = Residual::from_network(network, bound, 2);

    // Saturate negative arcs; their reverse residuals then cost -c > 0
    for (i, arc) in network.arcs.iter().enumerate() {
        if arc.cost < 0 {
            let amount = graph.capacity[2 * i];
            graph.push(2 * i, amount);
            supply[arc.from] -= amount;
            supply[arc.to] += amount;
        }
    }

    let mut imbalance = 0i128;
    for (node, &s) in supply.iter().enumerate() {
        if s > 0 {
            graph.add_arc(super_source, node, s, 0);
            imbalance += s;
        } else if s < 0 {
            graph.add_arc(node, super_sink, -s, 0);
        }
    }

    let mut paths = ShortestPaths::new(&mut graph);
    let balanced = paths.augment(super_source, super_sink, imbalance, ctx)?;
    if balanced < imbalance {
        let reason = match &problem.demand {
            FlowDemand::SourceSink {
                source,
                sink,
                value: Some(value),
            } => {
                let num_arcs = network.num_arcs();
                let shipped = paths.graph.net_outflow(*source, num_arcs);
                let delivered = -paths.graph.net_outflow(*sink, num_arcs);
                let routed = shipped.min(delivered).clamp(0, i128::from(*value));
                format!("only {} of {} requested units can be routed", routed, value)
            }
            _ => format!("{} units of supply cannot reach a demand", imbalance - balanced),
        };
        return Err(Error::infeasible(FAMILY, reason));
    }
    if negative_cycle {
        return Err(Error::unbounded(
            FAMILY,
            "uncapacitated arcs form a negative-cost cycle",
        ));
    }

    if let Some((source, sink)) = maximize {
        paths.augment(source, sink, i128::MAX, ctx)?;
    }
    let augmentations = paths.augmentations;

    let arc_flows = graph.input_flows(network.num_arcs(), FAMILY)?;

    let total_cost: i128 = network
        .arcs
        .iter()
        .zip(&arc_flows)
        .map(|(arc, &flow)| i128::from(arc.cost) * i128::from(flow))
        .sum();
    let total_cost = i64::try_from(total_cost)
        .map_err(|_| Error::internal(FAMILY, "total cost overflows a 64-bit integer"))?;

    let flow_value = match &problem.demand {
        FlowDemand::SourceSink { source, .. } => {
            i64::try_from(graph.net_outflow(*source, network.num_arcs()))
                .map_err(|_| Error::internal(FAMILY, "flow value overflows a 64-bit integer"))?
        }
        FlowDemand::Supplies(_) => requested,
    };

    debug!(
        "min cost flow {} at cost {} after {} augmentations",
        flow_value, total_cost, augmentations
    );

    Ok(MinCostFlow {
        flow_value,
        total_cost,
        arc_flows,
        augmentations,
    })
}
