// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Minimum s/t-cut computation.
//!
//! The solver is a trait so callers can inject a different algorithm (or
//! a deterministic stub in tests) without touching the code that builds
//! networks and consumes cuts.

use crate::{Capacity, FlowError, FlowNetwork, VertexId};
use std::collections::VecDeque;

/// The result of a minimum-cut computation.
#[derive(Debug, Clone)]
pub struct MinCut {
    /// Total capacity crossing the cut (equals the maximum flow value).
    pub value: Capacity,
    /// Per-vertex membership of the source-side partition.
    pub source_side: Vec<bool>,
    /// The cut: every real edge leading from the source side to the rest.
    pub cut_edges: Vec<(VertexId, VertexId)>,
}

impl MinCut {
    /// Returns `true` if a vertex ended up on the source side.
    pub fn is_source_side(&self, v: VertexId) -> bool {
        self.source_side.get(v.index()).copied().unwrap_or(false)
    }
}

/// A minimum s/t-cut algorithm.
pub trait MinCutSolver {
    /// Computes a minimum cut separating `source` from `sink`.
    fn min_cut(
        &self,
        net: &FlowNetwork,
        source: VertexId,
        sink: VertexId,
    ) -> Result<MinCut, FlowError>;
}

/// Edmonds–Karp maximum flow with cut extraction.
///
/// BFS augmenting paths over a residual edge list, `O(V · E²)`. Vertices
/// and edges are scanned in insertion order, so results are
/// deterministic; among multiple minimum cuts this returns the saturated
/// frontier of the residual-source-reachable set, i.e. the cut nearest
/// the source.
#[derive(Debug, Clone, Default)]
pub struct EdmondsKarp;

impl EdmondsKarp {
    pub fn new() -> Self {
        Self
    }
}

impl MinCutSolver for EdmondsKarp {
    fn min_cut(
        &self,
        net: &FlowNetwork,
        source: VertexId,
        sink: VertexId,
    ) -> Result<MinCut, FlowError> {
        let n = net.num_vertices();
        if source.index() >= n {
            return Err(FlowError::InvalidVertex {
                index: source.index(),
            });
        }
        if sink.index() >= n || sink == source {
            return Err(FlowError::InvalidVertex { index: sink.index() });
        }

        let mut residual: Vec<Capacity> = net.edges.iter().map(|e| e.cap).collect();
        let mut total = Capacity::ZERO;

        // Augment until the sink becomes unreachable in the residual graph.
        while let Some(parent_edge) = bfs(net, &residual, source.index(), sink.index()) {
            let mut bottleneck = Capacity::Infinite;
            let mut v = sink.index();
            while v != source.index() {
                let e = parent_edge[v].expect("BFS produced a complete path");
                bottleneck = bottleneck.min(residual[e]);
                v = net.edges[e ^ 1].to;
            }

            let Capacity::Finite(delta) = bottleneck else {
                return Err(FlowError::UnboundedFlow);
            };

            let mut v = sink.index();
            while v != source.index() {
                let e = parent_edge[v].expect("BFS produced a complete path");
                residual[e] = residual[e].saturating_sub(delta);
                residual[e ^ 1] = residual[e ^ 1].saturating_add(Capacity::Finite(delta));
                v = net.edges[e ^ 1].to;
            }
            total = total.saturating_add(Capacity::Finite(delta));
        }

        // The source side is whatever the residual graph still reaches.
        let mut source_side = vec![false; n];
        source_side[source.index()] = true;
        let mut queue = VecDeque::from([source.index()]);
        while let Some(u) = queue.pop_front() {
            for &e in &net.adj[u] {
                let v = net.edges[e].to;
                if !source_side[v] && residual[e].is_positive() {
                    source_side[v] = true;
                    queue.push_back(v);
                }
            }
        }

        let mut cut_edges = Vec::new();
        for pair in 0..net.num_edges() {
            let (u, v) = net.endpoints(pair);
            if source_side[u] && !source_side[v] {
                cut_edges.push((VertexId(u), VertexId(v)));
            }
        }

        Ok(MinCut {
            value: total,
            source_side,
            cut_edges,
        })
    }
}

/// One BFS over the residual graph; returns the incoming edge per vertex
/// on a shortest augmenting path, or `None` when the sink is unreachable.
fn bfs(
    net: &FlowNetwork,
    residual: &[Capacity],
    source: usize,
    sink: usize,
) -> Option<Vec<Option<usize>>> {
    let mut parent_edge: Vec<Option<usize>> = vec![None; net.num_vertices()];
    let mut visited = vec![false; net.num_vertices()];
    visited[source] = true;
    let mut queue = VecDeque::from([source]);

    while let Some(u) = queue.pop_front() {
        for &e in &net.adj[u] {
            let v = net.edges[e].to;
            if !visited[v] && residual[e].is_positive() {
                visited[v] = true;
                parent_edge[v] = Some(e);
                if v == sink {
                    return Some(parent_edge);
                }
                queue.push_back(v);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(net: &FlowNetwork, s: VertexId, t: VertexId) -> MinCut {
        EdmondsKarp::new().min_cut(net, s, t).unwrap()
    }

    #[test]
    fn test_single_edge() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex();
        let t = net.add_vertex();
        net.add_edge(s, t, Capacity::Finite(7));

        let cut = solve(&net, s, t);
        assert_eq!(cut.value, Capacity::Finite(7));
        assert_eq!(cut.cut_edges, vec![(s, t)]);
    }

    #[test]
    fn test_series_takes_smaller() {
        // s --10--> a --3--> t : the bottleneck edge is the cut.
        let mut net = FlowNetwork::new();
        let s = net.add_vertex();
        let a = net.add_vertex();
        let t = net.add_vertex();
        net.add_edge(s, a, Capacity::Finite(10));
        net.add_edge(a, t, Capacity::Finite(3));

        let cut = solve(&net, s, t);
        assert_eq!(cut.value, Capacity::Finite(3));
        assert_eq!(cut.cut_edges, vec![(a, t)]);
        assert!(cut.is_source_side(a));
    }

    #[test]
    fn test_diamond() {
        // Two disjoint paths: flow adds up, both bottlenecks get cut.
        let mut net = FlowNetwork::new();
        let s = net.add_vertex();
        let a = net.add_vertex();
        let b = net.add_vertex();
        let t = net.add_vertex();
        net.add_edge(s, a, Capacity::Finite(4));
        net.add_edge(s, b, Capacity::Finite(9));
        net.add_edge(a, t, Capacity::Finite(6));
        net.add_edge(b, t, Capacity::Finite(2));

        let cut = solve(&net, s, t);
        assert_eq!(cut.value, Capacity::Finite(6));
        assert_eq!(cut.cut_edges, vec![(s, a), (b, t)]);
    }

    #[test]
    fn test_infinite_edges_never_cut() {
        // s --inf--> a --5--> b --inf--> t : only the finite edge can go.
        let mut net = FlowNetwork::new();
        let s = net.add_vertex();
        let a = net.add_vertex();
        let b = net.add_vertex();
        let t = net.add_vertex();
        net.add_edge(s, a, Capacity::Infinite);
        net.add_edge(a, b, Capacity::Finite(5));
        net.add_edge(b, t, Capacity::Infinite);

        let cut = solve(&net, s, t);
        assert_eq!(cut.value, Capacity::Finite(5));
        assert_eq!(cut.cut_edges, vec![(a, b)]);
    }

    #[test]
    fn test_unbounded() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex();
        let t = net.add_vertex();
        net.add_edge(s, t, Capacity::Infinite);

        let err = EdmondsKarp::new().min_cut(&net, s, t).unwrap_err();
        assert!(matches!(err, FlowError::UnboundedFlow));
    }

    #[test]
    fn test_disconnected() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex();
        let t = net.add_vertex();
        net.add_vertex();

        let cut = solve(&net, s, t);
        assert_eq!(cut.value, Capacity::ZERO);
        assert!(cut.cut_edges.is_empty());
        assert!(cut.is_source_side(s));
        assert!(!cut.is_source_side(t));
    }

    #[test]
    fn test_parallel_edges() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex();
        let t = net.add_vertex();
        net.add_edge(s, t, Capacity::Finite(2));
        net.add_edge(s, t, Capacity::Finite(3));

        let cut = solve(&net, s, t);
        assert_eq!(cut.value, Capacity::Finite(5));
        assert_eq!(cut.cut_edges.len(), 2);
    }

    #[test]
    fn test_backflow_rerouting() {
        // Classic case where a naive greedy path assignment is suboptimal
        // and flow must be pushed back along a residual edge.
        let mut net = FlowNetwork::new();
        let s = net.add_vertex();
        let a = net.add_vertex();
        let b = net.add_vertex();
        let t = net.add_vertex();
        net.add_edge(s, a, Capacity::Finite(1));
        net.add_edge(s, b, Capacity::Finite(1));
        net.add_edge(a, b, Capacity::Finite(1));
        net.add_edge(a, t, Capacity::Finite(1));
        net.add_edge(b, t, Capacity::Finite(1));

        let cut = solve(&net, s, t);
        assert_eq!(cut.value, Capacity::Finite(2));
    }

    #[test]
    fn test_invalid_terminals() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex();
        let err = EdmondsKarp::new().min_cut(&net, s, s).unwrap_err();
        assert!(matches!(err, FlowError::InvalidVertex { .. }));
    }
}
