// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Min-cut rematerialization strategy.
//!
//! Models the save-versus-recompute decision as a minimum s/t-cut. Every
//! node is split into an `in` and an `out` vertex joined by an edge whose
//! capacity is the node's saving cost; all structural edges are infinite.
//! A minimum cut then crosses only `in → out` edges, and those edges name
//! exactly the values that must travel from forward to backward.
//!
//! # Network construction
//!
//! For each non-output node of the joint graph:
//! - tangent-closure member: `in → sink` at infinity — backward-exclusive
//!   values sit on the sink side whatever they cost;
//! - placeholder: `source → in` at infinity — inputs are already resident
//!   on the forward side (tangent placeholders are closure members and
//!   take the sink edge instead);
//! - recompute-banned: `source → in` at infinity — the only way to cut
//!   its availability off is at its own output edge, which carries its
//!   real memory weight;
//! - always: `in → out` at the classifier weight, and `out → consumer.in`
//!   at infinity for every consumer.

use crate::recompute::{Classifier, RecomputeMode, RecomputeRules};
use crate::strategy::Partitioner;
use crate::PlannerError;
use flow_mincut::{Capacity, EdmondsKarp, FlowNetwork, MinCutSolver, VertexId};
use joint_ir::JointGraph;
use std::collections::HashMap;

/// Choose saved values by minimum-cut over a capacitated flow network.
pub struct MinCutRemat {
    classifier: Classifier,
    solver: Box<dyn MinCutSolver>,
}

impl MinCutRemat {
    /// Creates the strategy with stock rules and the built-in solver.
    pub fn new(mode: RecomputeMode) -> Self {
        Self {
            classifier: Classifier::new(mode),
            solver: Box::new(EdmondsKarp::new()),
        }
    }

    /// Creates the strategy with custom classification rules.
    pub fn with_rules(mode: RecomputeMode, rules: RecomputeRules) -> Self {
        Self {
            classifier: Classifier::with_rules(mode, rules),
            solver: Box::new(EdmondsKarp::new()),
        }
    }

    /// Replaces the min-cut solver (e.g. with a test stub).
    pub fn with_solver(mut self, solver: Box<dyn MinCutSolver>) -> Self {
        self.solver = solver;
        self
    }
}

impl std::fmt::Debug for MinCutRemat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinCutRemat")
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

impl Partitioner for MinCutRemat {
    fn name(&self) -> &str {
        "min-cut-remat"
    }

    fn choose_saved_values(&self, joint: &JointGraph) -> Result<Vec<String>, PlannerError> {
        let graph = joint.graph();
        let closure = joint.tangent_closure();

        let mut net = FlowNetwork::new();
        let source = net.add_vertex();
        let sink = net.add_vertex();

        // The output node produces no value and gets no vertices.
        let mut vertices: HashMap<&str, (VertexId, VertexId)> = HashMap::new();
        for node in graph.nodes() {
            if node.is_output() {
                continue;
            }
            let v_in = net.add_vertex();
            let v_out = net.add_vertex();
            vertices.insert(&node.name, (v_in, v_out));
        }

        let mut weight_edges: HashMap<(VertexId, VertexId), &str> = HashMap::new();
        for node in graph.nodes() {
            let Some(&(v_in, v_out)) = vertices.get(node.name.as_str()) else {
                continue;
            };

            if closure.contains(&node.name) {
                net.add_edge(v_in, sink, Capacity::Infinite);
                continue;
            }

            if node.is_placeholder() {
                net.add_edge(source, v_in, Capacity::Infinite);
            }
            if self.classifier.is_recompute_banned(graph, node) {
                net.add_edge(source, v_in, Capacity::Infinite);
            }

            net.add_edge(v_in, v_out, self.classifier.weight(node));
            weight_edges.insert((v_in, v_out), &node.name);

            for consumer in graph.consumers(&node.name) {
                if let Some(&(c_in, _)) = vertices.get(consumer.as_str()) {
                    net.add_edge(v_out, c_in, Capacity::Infinite);
                }
            }
        }

        let cut = self.solver.min_cut(&net, source, sink)?;
        tracing::debug!(
            "min-cut over {} vertices: value {}, {} cut edges",
            net.num_vertices(),
            cut.value,
            cut.cut_edges.len(),
        );

        let mut cut_names: Vec<&str> = Vec::with_capacity(cut.cut_edges.len());
        for edge in &cut.cut_edges {
            match weight_edges.get(edge) {
                Some(&name) => cut_names.push(name),
                // Only finite edges can be cut, and every finite edge is an
                // in→out pair; anything else means the solver is broken.
                None => {
                    return Err(PlannerError::StrategyFailed {
                        strategy: self.name().to_string(),
                        detail: format!(
                            "cut contains a structural edge {:?} -> {:?}",
                            edge.0, edge.1
                        ),
                    })
                }
            }
        }

        // Report in joint-graph insertion order for determinism.
        let cut_set: std::collections::HashSet<&str> = cut_names.into_iter().collect();
        Ok(graph
            .nodes()
            .iter()
            .filter(|n| cut_set.contains(n.name.as_str()))
            .map(|n| n.name.clone())
            .collect())
    }
}
