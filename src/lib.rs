//! # converge-flow
//!
//! Minimum-cost flow and maximum-flow solvers for converge.zone: a shared
//! graph substrate plus three engines built on it.
//!
//! ## Modules
//!
//! - [`graph`] - the five graph containers (static/dynamic, with/without
//!   reverse arcs, plus two implicit O(1) variants) behind one interface.
//! - [`collections`] - the signed-index arrays and priority queue the
//!   engines are built from.
//! - [`maxflow`] - push-relabel (Goldberg-Tarjan) maximum flow.
//! - [`simplex`] - primal Network Simplex minimum-cost flow.
//! - [`cost_scaling`] - ε-scaling push-relabel minimum-cost flow.
//! - [`validator`] - independent post-hoc solution checking.
//!
//! ## Quick Start
//!
//! ```rust
//! use converge_flow::graph::ReverseArcStaticGraph;
//! use converge_flow::maxflow::MaxFlow;
//!
//! let mut g = ReverseArcStaticGraph::new();
//! let a0 = g.add_arc(0, 1);
//! let a1 = g.add_arc(1, 2);
//! let perm = g.build().unwrap();
//!
//! let mut mf = MaxFlow::new(&g, 0, 2);
//! mf.set_arc_capacity(perm[a0 as usize], 5)?;
//! mf.set_arc_capacity(perm[a1 as usize], 3)?;
//! mf.solve();
//! assert_eq!(mf.optimal_flow(), 3);
//! # Ok::<(), converge_flow::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod collections;
pub mod cost_scaling;
pub mod graph;
pub mod maxflow;
pub mod simplex;
pub mod validator;

mod error;
mod types;

pub use error::{Error, Result};
pub use types::*;

/// Common imports for callers driving one of the three engines directly.
pub mod prelude {
    pub use crate::cost_scaling::CostScaling;
    pub use crate::graph::{BaseGraph, ReverseArcGraph};
    pub use crate::maxflow::MaxFlow;
    pub use crate::simplex::{NetworkSimplex, SupplyType};
    pub use crate::validator::{validate, Solution, ValidationError};
    pub use crate::{Error, Result, Status};
}
