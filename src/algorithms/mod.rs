//! Native algorithm library
//!
//! Self-contained solvers that know nothing about dispatch. Each takes a
//! structurally valid problem plus a [`SolveContext`](crate::domain::SolveContext)
//! and reports domain errors only.

pub mod assignment;
pub mod flow;
pub mod knapsack;
pub mod shortest_path;
