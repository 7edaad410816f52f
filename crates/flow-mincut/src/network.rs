// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Capacitated directed flow networks.

use std::fmt;

/// Handle to a vertex of a [`FlowNetwork`].
///
/// Only valid for the network whose `add_vertex` created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    /// Returns the underlying index (dense, insertion-ordered).
    pub fn index(self) -> usize {
        self.0
    }
}

/// An edge capacity.
///
/// Infinite capacities model structural edges that must never be cut;
/// a minimum cut consists of finite edges only. Variant order matters:
/// the derived ordering puts every `Finite` below `Infinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capacity {
    /// A finite capacity in cost units (bytes, for the partitioner).
    Finite(u64),
    /// An uncuttable edge.
    Infinite,
}

impl Capacity {
    /// The zero capacity.
    pub const ZERO: Capacity = Capacity::Finite(0);

    /// Returns `true` for [`Capacity::Infinite`].
    pub fn is_infinite(self) -> bool {
        matches!(self, Capacity::Infinite)
    }

    /// Returns `true` if any residual capacity remains.
    pub fn is_positive(self) -> bool {
        self > Capacity::ZERO
    }

    /// Adds two capacities; finite overflow saturates to `u64::MAX`.
    pub fn saturating_add(self, other: Capacity) -> Capacity {
        match (self, other) {
            (Capacity::Finite(a), Capacity::Finite(b)) => Capacity::Finite(a.saturating_add(b)),
            _ => Capacity::Infinite,
        }
    }

    /// Subtracts a finite amount; infinity is unaffected and finite
    /// underflow saturates to zero.
    pub fn saturating_sub(self, amount: u64) -> Capacity {
        match self {
            Capacity::Finite(a) => Capacity::Finite(a.saturating_sub(amount)),
            Capacity::Infinite => Capacity::Infinite,
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Finite(v) => write!(f, "{v}"),
            Capacity::Infinite => write!(f, "inf"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub(crate) to: usize,
    pub(crate) cap: Capacity,
}

/// A directed graph with edge capacities.
///
/// Edges are stored as residual pairs: a real edge at an even index is
/// immediately followed by its zero-capacity reverse companion. Parallel
/// edges are permitted.
#[derive(Debug, Clone, Default)]
pub struct FlowNetwork {
    pub(crate) adj: Vec<Vec<usize>>,
    pub(crate) edges: Vec<Edge>,
}

impl FlowNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex and returns its handle.
    pub fn add_vertex(&mut self) -> VertexId {
        self.adj.push(Vec::new());
        VertexId(self.adj.len() - 1)
    }

    /// Adds a directed edge with the given capacity.
    ///
    /// Both endpoints must come from this network's `add_vertex`.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, cap: Capacity) {
        debug_assert!(from.0 < self.adj.len() && to.0 < self.adj.len());
        let fwd = self.edges.len();
        self.edges.push(Edge { to: to.0, cap });
        self.edges.push(Edge {
            to: from.0,
            cap: Capacity::ZERO,
        });
        self.adj[from.0].push(fwd);
        self.adj[to.0].push(fwd + 1);
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.adj.len()
    }

    /// Returns the number of real (caller-added) edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len() / 2
    }

    /// Returns the endpoints of a real edge by its insertion index.
    pub(crate) fn endpoints(&self, edge_pair: usize) -> (usize, usize) {
        let fwd = edge_pair * 2;
        (self.edges[fwd + 1].to, self.edges[fwd].to)
    }
}
