use super::value_objects::{EdgeDirection, ProblemFamily, SolutionStatus};
use serde::{Deserialize, Serialize};

/// Linear assignment: `costs[agent][task]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentProblem {
    pub costs: Vec<Vec<f64>>,
}

impl AssignmentProblem {
    pub fn from_costs(costs: Vec<Vec<f64>>) -> Self {
        Self { costs }
    }

    pub fn from_integer_costs(costs: Vec<Vec<i64>>) -> Self {
        let costs = costs
            .into_iter()
            .map(|row| row.into_iter().map(|c| c as f64).collect())
            .collect();
        Self { costs }
    }

    pub fn num_agents(&self) -> usize {
        self.costs.len()
    }

    pub fn num_tasks(&self) -> usize {
        self.costs.first().map_or(0, Vec::len)
    }
}

/// 0/1 knapsack over parallel weight and value sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnapsackProblem {
    pub weights: Vec<i64>,
    pub values: Vec<i64>,
    pub capacity: i64,
}

impl KnapsackProblem {
    pub fn new(weights: Vec<i64>, values: Vec<i64>, capacity: i64) -> Self {
        Self {
            weights,
            values,
            capacity,
        }
    }

    pub fn num_items(&self) -> usize {
        self.weights.len()
    }
}

/// Weighted edge between two declared nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

/// Graph over nodes `0..num_nodes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedGraph {
    pub num_nodes: usize,
    #[serde(default)]
    pub direction: EdgeDirection,
    pub edges: Vec<WeightedEdge>,
}

impl WeightedGraph {
    pub fn directed(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            direction: EdgeDirection::Directed,
            edges: Vec::new(),
        }
    }

    pub fn undirected(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            direction: EdgeDirection::Undirected,
            edges: Vec::new(),
        }
    }

    pub fn add_edge(mut self, from: usize, to: usize, weight: f64) -> Self {
        self.edges.push(WeightedEdge { from, to, weight });
        self
    }

    pub fn is_directed(&self) -> bool {
        self.direction == EdgeDirection::Directed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortestPathProblem {
    pub graph: WeightedGraph,
    pub source: usize,
    #[serde(default)]
    pub target: Option<usize>,
}

impl ShortestPathProblem {
    pub fn new(graph: WeightedGraph, source: usize) -> Self {
        Self {
            graph,
            source,
            target: None,
        }
    }

    pub fn with_target(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }
}

/// Directed arc of a flow network. `capacity: None` means uncapacitated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowArc {
    pub from: usize,
    pub to: usize,
    pub capacity: Option<i64>,
    #[serde(default)]
    pub cost: i64,
}

/// Capacitated directed network over nodes `0..num_nodes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNetwork {
    pub num_nodes: usize,
    pub arcs: Vec<FlowArc>,
}

impl FlowNetwork {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            arcs: Vec::new(),
        }
    }

    pub fn add_arc(self, from: usize, to: usize, capacity: i64) -> Self {
        self.add_costed_arc(from, to, capacity, 0)
    }

    pub fn add_costed_arc(mut self, from: usize, to: usize, capacity: i64, cost: i64) -> Self {
        self.arcs.push(FlowArc {
            from,
            to,
            capacity: Some(capacity),
            cost,
        });
        self
    }

    pub fn add_uncapacitated_arc(mut self, from: usize, to: usize, cost: i64) -> Self {
        self.arcs.push(FlowArc {
            from,
            to,
            capacity: None,
            cost,
        });
        self
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxFlowProblem {
    pub network: FlowNetwork,
    pub source: usize,
    pub sink: usize,
}

impl MaxFlowProblem {
    pub fn new(network: FlowNetwork, source: usize, sink: usize) -> Self {
        Self {
            network,
            source,
            sink,
        }
    }
}

/// What a min-cost flow has to route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDemand {
    /// Route `value` units from source to sink, or the maximum flow when `None`
    SourceSink {
        source: usize,
        sink: usize,
        value: Option<i64>,
    },
    /// Per-node supply (positive) or demand (negative), summing to zero
    Supplies(Vec<i64>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCostFlowProblem {
    pub network: FlowNetwork,
    pub demand: FlowDemand,
}

impl MinCostFlowProblem {
    pub fn with_value(network: FlowNetwork, source: usize, sink: usize, value: i64) -> Self {
        Self {
            network,
            demand: FlowDemand::SourceSink {
                source,
                sink,
                value: Some(value),
            },
        }
    }

    pub fn maximum(network: FlowNetwork, source: usize, sink: usize) -> Self {
        Self {
            network,
            demand: FlowDemand::SourceSink {
                source,
                sink,
                value: None,
            },
        }
    }

    pub fn with_supplies(network: FlowNetwork, supplies: Vec<i64>) -> Self {
        Self {
            network,
            demand: FlowDemand::Supplies(supplies),
        }
    }
}

/// Opaque request forwarded verbatim to the constraint gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintProblem {
    pub payload: serde_json::Value,
}

impl ConstraintProblem {
    pub fn new(payload: serde_json::Value) -> Self {
        Self { payload }
    }
}

/// One request, one case per supported family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Problem {
    Assignment(AssignmentProblem),
    Knapsack(KnapsackProblem),
    ShortestPath(ShortestPathProblem),
    MaxFlow(MaxFlowProblem),
    MinCostFlow(MinCostFlowProblem),
    GenericConstraint(ConstraintProblem),
}

impl Problem {
    pub fn family(&self) -> ProblemFamily {
        match self {
            Problem::Assignment(_) => ProblemFamily::Assignment,
            Problem::Knapsack(_) => ProblemFamily::Knapsack,
            Problem::ShortestPath(_) => ProblemFamily::ShortestPath,
            Problem::MaxFlow(_) => ProblemFamily::MaxFlow,
            Problem::MinCostFlow(_) => ProblemFamily::MinCostFlow,
            Problem::GenericConstraint(_) => ProblemFamily::GenericConstraint,
        }
    }
}

impl From<AssignmentProblem> for Problem {
    fn from(p: AssignmentProblem) -> Self {
        Problem::Assignment(p)
    }
}

impl From<KnapsackProblem> for Problem {
    fn from(p: KnapsackProblem) -> Self {
        Problem::Knapsack(p)
    }
}

impl From<ShortestPathProblem> for Problem {
    fn from(p: ShortestPathProblem) -> Self {
        Problem::ShortestPath(p)
    }
}

impl From<MaxFlowProblem> for Problem {
    fn from(p: MaxFlowProblem) -> Self {
        Problem::MaxFlow(p)
    }
}

impl From<MinCostFlowProblem> for Problem {
    fn from(p: MinCostFlowProblem) -> Self {
        Problem::MinCostFlow(p)
    }
}

impl From<ConstraintProblem> for Problem {
    fn from(p: ConstraintProblem) -> Self {
        Problem::GenericConstraint(p)
    }
}

/// Family-specific part of an optimal solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum SolutionPayload {
    Assignment {
        /// `(agent, task)` pairs sorted by agent; dummy pairings excluded
        pairs: Vec<(usize, usize)>,
    },
    Knapsack {
        /// Selected item indices, ascending
        selected: Vec<usize>,
        total_weight: i64,
        total_value: i64,
    },
    ShortestPath {
        /// `distances[v]` is `None` when `v` is unreachable
        distances: Vec<Option<f64>>,
        predecessors: Vec<Option<usize>>,
        path: Option<Vec<usize>>,
    },
    MaxFlow {
        flow_value: i64,
        /// Flow on each input arc, in input order
        arc_flows: Vec<i64>,
        /// Source side of a minimum cut, ascending
        min_cut: Vec<usize>,
    },
    MinCostFlow {
        flow_value: i64,
        total_cost: i64,
        arc_flows: Vec<i64>,
    },
    GenericConstraint {
        backend: String,
        variable_values: Vec<f64>,
    },
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverStatistics {
    pub algorithm: String,
    pub iterations: u64,
    pub solve_time_ms: f64,
}

impl SolverStatistics {
    pub fn new(algorithm: impl Into<String>, iterations: u64) -> Self {
        Self {
            algorithm: algorithm.into(),
            iterations,
            solve_time_ms: 0.0,
        }
    }
}

/// Outcome of one solve call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub family: ProblemFamily,
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub payload: Option<SolutionPayload>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(family: ProblemFamily, status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            family,
            status,
            objective_value: None,
            payload: None,
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(family: ProblemFamily, objective_value: Option<f64>, payload: SolutionPayload) -> Self {
        Self {
            family,
            status: SolutionStatus::Optimal,
            objective_value,
            payload: Some(payload),
            message: format!("Optimal {} solution found", family),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}
