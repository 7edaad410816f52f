// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A joint forward/backward graph with its output-structure descriptor.
//!
//! The differentiation front-end traces the user function and its
//! gradient into a single graph whose flat output list is the forward
//! outputs followed by the backward outputs. `num_forward_outputs` is the
//! boundary; it is computed upstream and required here.

use crate::graph::Validated;
use crate::{Arg, Graph, GraphError, InputRole, Node, NodeKind};
use std::collections::HashSet;

/// A validated joint graph plus the forward/backward output split.
#[derive(Debug, Clone)]
pub struct JointGraph {
    graph: Graph<Validated>,
    num_forward_outputs: usize,
}

impl JointGraph {
    /// Wraps a validated graph with its output split.
    ///
    /// Fails with [`GraphError::BadForwardSplit`] if `num_forward_outputs`
    /// exceeds the graph's flat output count.
    pub fn new(graph: Graph<Validated>, num_forward_outputs: usize) -> Result<Self, GraphError> {
        let total = graph.output_values().len();
        if num_forward_outputs > total {
            return Err(GraphError::BadForwardSplit {
                requested: num_forward_outputs,
                total,
            });
        }
        Ok(Self {
            graph,
            num_forward_outputs,
        })
    }

    /// Returns the underlying graph.
    pub fn graph(&self) -> &Graph<Validated> {
        &self.graph
    }

    /// Returns how many flat outputs belong to the forward computation.
    pub fn num_forward_outputs(&self) -> usize {
        self.num_forward_outputs
    }

    /// Returns the placeholders feeding the forward computation, in order.
    ///
    /// Anything that is not a tangent counts: primals, and carried values
    /// in graphs that have already been sliced once.
    pub fn primal_inputs(&self) -> Vec<&Node> {
        self.graph
            .placeholders()
            .filter(|n| match n.kind {
                NodeKind::Placeholder { role } => match role {
                    InputRole::Primal | InputRole::Saved => true,
                    InputRole::Tangent => false,
                },
                _ => unreachable!("placeholders() yields placeholder nodes"),
            })
            .collect()
    }

    /// Returns the tangent placeholders, in order.
    pub fn tangent_inputs(&self) -> Vec<&Node> {
        self.graph.placeholders().filter(|n| n.is_tangent()).collect()
    }

    /// Returns the forward slice of the flat output list.
    pub fn forward_outputs(&self) -> &[Arg] {
        &self.graph.output_values()[..self.num_forward_outputs]
    }

    /// Returns the backward slice of the flat output list.
    pub fn backward_outputs(&self) -> &[Arg] {
        &self.graph.output_values()[self.num_forward_outputs..]
    }

    /// Computes the tangent closure: every tangent placeholder plus every
    /// node transitively consuming one.
    ///
    /// A single forward sweep suffices because consumers always appear
    /// after their producers in a validated graph.
    pub fn tangent_closure(&self) -> HashSet<String> {
        let mut closure: HashSet<String> = HashSet::new();
        for node in self.graph.nodes() {
            if node.is_tangent() {
                closure.insert(node.name.clone());
            }
            if closure.contains(&node.name) {
                for user in self.graph.consumers(&node.name) {
                    closure.insert(user.clone());
                }
            }
        }
        closure
    }
}
