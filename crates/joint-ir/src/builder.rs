// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Incremental construction of validated graphs.
//!
//! The builder is the front door for the tracing front-end (and for
//! tests): append nodes in evaluation order, set the outputs, and
//! `build()` — validation happens once, at the end.

use crate::graph::Validated;
use crate::{Arg, Graph, GraphError, InputRole, Node};
use tensor_meta::TensorMeta;

/// Builds a [`Graph`] node by node, validating on [`GraphBuilder::build`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
}

impl GraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a primal (original input) placeholder.
    pub fn primal(&mut self, name: &str, meta: TensorMeta) -> &mut Self {
        self.nodes
            .push(Node::placeholder(name, InputRole::Primal, Some(meta)));
        self
    }

    /// Appends a tangent (incoming gradient) placeholder.
    pub fn tangent(&mut self, name: &str, meta: TensorMeta) -> &mut Self {
        self.nodes
            .push(Node::placeholder(name, InputRole::Tangent, Some(meta)));
        self
    }

    /// Appends a placeholder with an explicit role and optional metadata.
    pub fn placeholder(
        &mut self,
        name: &str,
        role: InputRole,
        meta: Option<TensorMeta>,
    ) -> &mut Self {
        self.nodes.push(Node::placeholder(name, role, meta));
        self
    }

    /// Appends a constant-reference node.
    pub fn get_attr(&mut self, name: &str, attr: &str, meta: Option<TensorMeta>) -> &mut Self {
        self.nodes.push(Node::get_attr(name, attr, meta));
        self
    }

    /// Appends an operator application whose operands are all node
    /// references.
    pub fn call(&mut self, name: &str, op: &str, args: &[&str], meta: Option<TensorMeta>) -> &mut Self {
        let args = args.iter().map(|a| Arg::node(*a)).collect();
        self.nodes.push(Node::call_op(name, op, args, meta));
        self
    }

    /// Appends an operator application with arbitrary operands.
    pub fn call_args(
        &mut self,
        name: &str,
        op: &str,
        args: Vec<Arg>,
        meta: Option<TensorMeta>,
    ) -> &mut Self {
        self.nodes.push(Node::call_op(name, op, args, meta));
        self
    }

    /// Appends the terminal output node producing the named values.
    pub fn output(&mut self, values: &[&str]) -> &mut Self {
        let values = values.iter().map(|v| Arg::node(*v)).collect();
        self.nodes.push(Node::output("output", values));
        self
    }

    /// Appends the terminal output node with arbitrary values.
    pub fn output_args(&mut self, values: Vec<Arg>) -> &mut Self {
        self.nodes.push(Node::output("output", values));
        self
    }

    /// Consumes the builder, validating the assembled graph.
    pub fn build(self) -> Result<Graph<Validated>, GraphError> {
        Graph::from_nodes(self.nodes)?.validate()
    }
}
