// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # flow-mincut
//!
//! Capacitated flow networks and minimum s/t-cut computation.
//!
//! This crate is deliberately ignorant of what the vertices mean: callers
//! build a [`FlowNetwork`], run a [`MinCutSolver`], and interpret the
//! resulting [`MinCut`] themselves. Capacities are exact integers with an
//! explicit [`Capacity::Infinite`] for structural edges that must never
//! be cut.
//!
//! # Example
//! ```
//! use flow_mincut::{Capacity, EdmondsKarp, FlowNetwork, MinCutSolver};
//!
//! let mut net = FlowNetwork::new();
//! let s = net.add_vertex();
//! let a = net.add_vertex();
//! let t = net.add_vertex();
//! net.add_edge(s, a, Capacity::Infinite);
//! net.add_edge(a, t, Capacity::Finite(8));
//!
//! let cut = EdmondsKarp::new().min_cut(&net, s, t).unwrap();
//! assert_eq!(cut.value, Capacity::Finite(8));
//! assert_eq!(cut.cut_edges, vec![(a, t)]);
//! ```

mod error;
mod network;
mod solver;

pub use error::FlowError;
pub use network::{Capacity, FlowNetwork, VertexId};
pub use solver::{EdmondsKarp, MinCut, MinCutSolver};
