//! Maximum flow by FIFO push-relabel
//!
//! Active nodes are discharged first-in first-out. Heights are recomputed
//! exactly by a two-sided breadth-first search (distance to the sink, or
//! `n` plus distance to the source) at start, after every `interval`
//! relabels, and whenever a relabel empties a height level below `n`.
//! After termination the source side of the residual graph is taken as a
//! minimum cut and its capacity is checked against the flow value.

use super::{uncapacitated_bound, uncapacitated_path, Residual};
use crate::domain::{Error, FlowConfig, MaxFlowProblem, ProblemFamily, Result, SolveContext};
use log::debug;
use std::collections::VecDeque;

pub const NAME: &str = "push_relabel";

const FAMILY: ProblemFamily = ProblemFamily::MaxFlow;

const CHECK_INTERVAL: u32 = 1024;

/// Maximum flow with a certifying minimum cut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxFlow {
    pub flow_value: i64,
    /// Flow on each input arc, in input order
    pub arc_flows: Vec<i64>,
    /// Source side of a minimum cut, ascending
    pub min_cut: Vec<usize>,
    pub pushes: u64,
    pub relabels: u64,
    pub global_relabels: u64,
}

struct PushRelabel<'a> {
    graph: &'a mut Residual,
    source: usize,
    sink: usize,
    height: Vec<usize>,
    excess: Vec<i128>,
    current: Vec<usize>,
    /// Nodes per height, indices `0..=2n`
    level_count: Vec<usize>,
    active: VecDeque<usize>,
    queued: Vec<bool>,
    interval: usize,
    relabels_since_global: usize,
    pushes: u64,
    relabels: u64,
    global_relabels: u64,
}

impl<'a> PushRelabel<'a> {
    fn new(graph: &'a mut Residual, source: usize, sink: usize, interval: usize) -> Self {
        let n = graph.num_nodes();
        Self {
            graph,
            source,
            sink,
            height: vec![0; n],
            excess: vec![0; n],
            current: vec![0; n],
            level_count: vec![0; 2 * n + 1],
            active: VecDeque::new(),
            queued: vec![false; n],
            interval: interval.max(1),
            relabels_since_global: 0,
            pushes: 0,
            relabels: 0,
            global_relabels: 0,
        }
    }

    fn n(&self) -> usize {
        self.height.len()
    }

    fn activate(&mut self, node: usize) {
        if node != self.source && node != self.sink && !self.queued[node] {
            self.queued[node] = true;
            self.active.push_back(node);
        }
    }

    /// Saturate every arc leaving the source.
    fn saturate_source(&mut self) {
        for i in 0..self.graph.adjacency[self.source].len() {
            let arc = self.graph.adjacency[self.source][i];
            let amount = self.graph.capacity[arc];
            if amount > 0 {
                let head = self.graph.head[arc];
                self.graph.push(arc, amount);
                self.excess[self.source] -= amount;
                self.excess[head] += amount;
                self.pushes += 1;
                self.activate(head);
            }
        }
    }

    /// Backward breadth-first search over residual arcs from `root`,
    /// labelling each unvisited node one above its discoverer.
    fn label_from(&mut self, root: usize, unset: usize) {
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            let next_height = self.height[node] + 1;
            for &arc in &self.graph.adjacency[node] {
                let tail = self.graph.head[arc];
                // The reverse of `arc` runs tail -> node
                if self.graph.capacity[arc ^ 1] > 0 && self.height[tail] == unset {
                    self.height[tail] = next_height;
                    queue.push_back(tail);
                }
            }
        }
    }

    fn global_relabel(&mut self) {
        let n = self.n();
        let unset = usize::MAX;
        self.height.fill(unset);
        self.height[self.sink] = 0;
        self.height[self.source] = n;

        self.label_from(self.sink, unset);
        self.label_from(self.source, unset);

        self.level_count.fill(0);
        for h in self.height.iter_mut() {
            if *h == unset {
                *h = 2 * n;
            }
            self.level_count[*h] += 1;
        }
        self.current.fill(0);
        self.relabels_since_global = 0;
        self.global_relabels += 1;
    }

    fn relabel(&mut self, node: usize) -> Result<()> {
        let n = self.n();
        let lowest = self.graph.adjacency[node]
            .iter()
            .filter(|&&arc| self.graph.capacity[arc] > 0)
            .map(|&arc| self.height[self.graph.head[arc]])
            .min()
            .ok_or_else(|| {
                Error::internal(FAMILY, format!("node {} holds excess without residual arcs", node))
            })?;

        let old = self.height[node];
        let new = (lowest + 1).min(2 * n);
        self.level_count[old] -= 1;
        self.level_count[new] += 1;
        self.height[node] = new;
        self.current[node] = 0;
        self.relabels += 1;
        self.relabels_since_global += 1;

        let gap = old < n && self.level_count[old] == 0;
        if gap || self.relabels_since_global >= self.interval {
            self.global_relabel();
        }
        Ok(())
    }

    fn discharge(&mut self, node: usize) -> Result<()> {
        while self.excess[node] > 0 {
            if self.current[node] == self.graph.adjacency[node].len() {
                self.relabel(node)?;
                continue;
            }

            let arc = self.graph.adjacency[node][self.current[node]];
            let head = self.graph.head[arc];
            let residual = self.graph.capacity[arc];
            if residual > 0 && self.height[node] == self.height[head] + 1 {
                let amount = residual.min(self.excess[node]);
                self.graph.push(arc, amount);
                self.excess[node] -= amount;
                self.excess[head] += amount;
                self.pushes += 1;
                self.activate(head);
            } else {
                self.current[node] += 1;
            }
        }
        Ok(())
    }

    fn run(&mut self, ctx: &SolveContext) -> Result<()> {
        self.saturate_source();
        self.global_relabel();

        let mut ticker = ctx.ticker(FAMILY, CHECK_INTERVAL);
        while let Some(node) = self.active.pop_front() {
            self.queued[node] = false;
            ticker.tick()?;
            self.discharge(node)?;
        }
        Ok(())
    }
}

/// Solve a validated max-flow problem.
pub fn solve(problem: &MaxFlowProblem, config: &FlowConfig, ctx: &SolveContext) -> Result<MaxFlow> {
    let network = &problem.network;
    let (source, sink) = (problem.source, problem.sink);

    if uncapacitated_path(network, source, sink) {
        return Err(Error::unbounded(
            FAMILY,
            "an uncapacitated path joins source and sink",
        ));
    }

    let bound = uncapacitated_bound(network, 0, FAMILY)?;
    let mut graph = Residual::from_network(network, bound, 0);
    let interval = config.global_relabel_interval.unwrap_or(network.num_nodes);

    let mut engine = PushRelabel::new(&mut graph, source, sink, interval);
    engine.run(ctx)?;

    let flow_value = engine.excess[sink];
    if let Some(node) = (0..network.num_nodes)
        .find(|&v| v != source && v != sink && engine.excess[v] != 0)
    {
        return Err(Error::internal(
            FAMILY,
            format!("node {} kept excess {} after termination", node, engine.excess[node]),
        ));
    }
    let (pushes, relabels, global_relabels) =
        (engine.pushes, engine.relabels, engine.global_relabels);

    let source_side = graph.reachable_from(source);
    if source_side[sink] {
        return Err(Error::internal(FAMILY, "sink still reachable in the residual graph"));
    }

    let cut_capacity: i128 = network
        .arcs
        .iter()
        .filter(|arc| source_side[arc.from] && !source_side[arc.to])
        .map(|arc| i128::from(arc.capacity.unwrap_or(bound)))
        .sum();
    if cut_capacity != flow_value {
        return Err(Error::internal(
            FAMILY,
            format!(
                "flow value {} differs from cut capacity {}",
                flow_value, cut_capacity
            ),
        ));
    }
    let flow_value = i64::try_from(flow_value)
        .map_err(|_| Error::internal(FAMILY, "flow value overflows a 64-bit integer"))?;
    let arc_flows = graph.input_flows(network.num_arcs(), FAMILY)?;

    debug!(
        "max flow {} after {} pushes, {} relabels, {} global relabels",
        flow_value, pushes, relabels, global_relabels
    );

    Ok(MaxFlow {
        flow_value,
        arc_flows,
        min_cut: (0..network.num_nodes).filter(|&v| source_side[v]).collect(),
        pushes,
        relabels,
        global_relabels,
    })
}
