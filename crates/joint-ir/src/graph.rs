// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The dataflow graph: an insertion-ordered DAG of [`Node`]s.
//!
//! # Type-State Pattern
//!
//! The graph transitions through states enforced at compile time:
//!
//! ```text
//! Graph<Draft>      — nodes appended, not yet checked.
//!       │  .validate()
//!       ▼
//! Graph<Validated>  — references checked, use-def index built,
//!                     ready for slicing and partitioning.
//! ```
//!
//! This prevents the partitioner from ever receiving a malformed graph.
//! The transition consumes the old state and returns the new one; the
//! marker types are `PhantomData` (ZST).
//!
//! # Invariants of `Graph<Validated>`
//!
//! - Node names are unique.
//! - Every node argument references a node defined strictly earlier, so
//!   insertion order is a valid evaluation order and the graph is acyclic.
//! - Exactly one [`NodeKind::Output`] node exists, and it is the terminal
//!   node.

use crate::{GraphError, Node, NodeKind};
use std::collections::{HashMap, HashSet};
use std::fmt;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: graph is under construction and unchecked.
#[derive(Debug, Clone)]
pub struct Draft;

/// Marker: graph has been validated and indexed.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for graph states.
pub trait GraphState: fmt::Debug + Clone {}
impl GraphState for Draft {}
impl GraphState for Validated {}

// ── Graph ──────────────────────────────────────────────────────────

/// A dataflow graph as an ordered sequence of nodes.
///
/// The generic parameter `S` encodes the validation state at compile time.
#[derive(Debug, Clone)]
pub struct Graph<S: GraphState = Draft> {
    nodes: Vec<Node>,
    /// Name → position in `nodes`.
    index: HashMap<String, usize>,
    /// Name → names of consuming nodes (in insertion order, deduplicated).
    /// Populated by `validate()`; empty in the `Draft` state.
    users: HashMap<String, Vec<String>>,
    _state: std::marker::PhantomData<S>,
}

// ── Draft state ────────────────────────────────────────────────────

impl Graph<Draft> {
    /// Creates a new empty draft graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            users: HashMap::new(),
            _state: std::marker::PhantomData,
        }
    }

    /// Creates a draft graph from a node sequence.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for node in nodes {
            graph.push(node)?;
        }
        Ok(graph)
    }

    /// Appends a node, rejecting duplicate names.
    pub fn push(&mut self, node: Node) -> Result<(), GraphError> {
        if self.index.contains_key(&node.name) {
            return Err(GraphError::DuplicateNode {
                name: node.name.clone(),
            });
        }
        self.index.insert(node.name.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Removes nodes whose value is never consumed and never output.
    ///
    /// Placeholders are exempt: they are part of the graph's calling
    /// convention and removing them would change its signature. A missing
    /// output node makes this a no-op.
    pub fn eliminate_dead_code(&mut self) {
        let Some(output_pos) = self.nodes.iter().rposition(Node::is_output) else {
            return;
        };

        let mut live: HashSet<String> = self.nodes[output_pos]
            .arg_nodes()
            .map(str::to_string)
            .collect();
        let mut keep = vec![true; self.nodes.len()];

        for i in (0..output_pos).rev() {
            let node = &self.nodes[i];
            if node.is_placeholder() {
                continue;
            }
            if live.contains(&node.name) {
                for arg in node.arg_nodes() {
                    live.insert(arg.to_string());
                }
            } else {
                keep[i] = false;
            }
        }

        if keep.iter().all(|&k| k) {
            return;
        }

        let removed = keep.iter().filter(|&&k| !k).count();
        tracing::debug!("dead-code elimination removed {removed} nodes");

        let mut i = 0;
        self.nodes.retain(|_| {
            let k = keep[i];
            i += 1;
            k
        });
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(pos, n)| (n.name.clone(), pos))
            .collect();
    }

    /// Validates the graph and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - Every argument references a node defined strictly earlier
    ///   (catches both undefined names and forward references, which
    ///   together guarantee acyclicity).
    /// - Exactly one output node exists and it is the terminal node.
    ///
    /// Also builds the use-def index consumed by `consumers()`.
    pub fn validate(self) -> Result<Graph<Validated>, GraphError> {
        let mut output_name: Option<&str> = None;
        for (pos, node) in self.nodes.iter().enumerate() {
            if node.is_output() {
                if output_name.is_some() || pos != self.nodes.len() - 1 {
                    return Err(GraphError::MisplacedOutput {
                        name: node.name.clone(),
                    });
                }
                output_name = Some(node.name.as_str());
            }

            for arg in node.arg_nodes() {
                match self.index.get(arg) {
                    None => {
                        return Err(GraphError::UndefinedReference {
                            node: node.name.clone(),
                            arg: arg.to_string(),
                        })
                    }
                    Some(&def_pos) if def_pos >= pos => {
                        return Err(GraphError::UseBeforeDef {
                            node: node.name.clone(),
                            arg: arg.to_string(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
        if output_name.is_none() {
            return Err(GraphError::MissingOutput);
        }

        let mut users: HashMap<String, Vec<String>> = HashMap::new();
        for node in &self.nodes {
            let mut seen: HashSet<&str> = HashSet::new();
            for arg in node.arg_nodes() {
                if seen.insert(arg) {
                    users
                        .entry(arg.to_string())
                        .or_default()
                        .push(node.name.clone());
                }
            }
        }

        Ok(Graph {
            nodes: self.nodes,
            index: self.index,
            users,
            _state: std::marker::PhantomData,
        })
    }
}

impl Default for Graph<Draft> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Validated state ────────────────────────────────────────────────

impl Graph<Validated> {
    /// Returns the nodes in insertion (evaluation) order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&pos| &self.nodes[pos])
    }

    /// Returns `true` if a node with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the names of the nodes consuming `name`'s value, in
    /// insertion order. The terminal output node counts as a consumer.
    pub fn consumers(&self, name: &str) -> &[String] {
        self.users.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the total number of nodes, including the output node.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an iterator over the placeholder nodes, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_placeholder())
    }

    /// Returns the terminal output node.
    pub fn output_node(&self) -> &Node {
        // Validation guarantees the last node is the single output.
        self.nodes.last().expect("validated graph is non-empty")
    }

    /// Returns the flat list of values the graph produces.
    pub fn output_values(&self) -> &[crate::Arg] {
        match &self.output_node().kind {
            NodeKind::Output { values } => values,
            _ => unreachable!("validated graph ends with an output node"),
        }
    }

    /// Returns a summary string describing the graph.
    pub fn summary(&self) -> String {
        let placeholders = self.placeholders().count();
        let ops = self
            .nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::CallOp { .. }))
            .count();
        format!(
            "Graph: {} nodes ({} placeholders, {} ops, {} outputs)",
            self.num_nodes(),
            placeholders,
            ops,
            self.output_values().len(),
        )
    }
}

// ── Shared implementations ─────────────────────────────────────────

impl<S: GraphState> fmt::Display for Graph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "graph {{")?;
        for node in &self.nodes {
            writeln!(f, "  {}", node.summary())?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arg, InputRole};
    use tensor_meta::{DType, TensorMeta};

    fn meta(elems: usize) -> TensorMeta {
        TensorMeta::new(vec![elems], DType::F32)
    }

    /// Helper: a → relu → mul(by itself) → output.
    fn chain() -> Graph<Draft> {
        let mut g = Graph::new();
        g.push(Node::placeholder("a", InputRole::Primal, Some(meta(4))))
            .unwrap();
        g.push(Node::call_op(
            "b",
            "relu",
            vec![Arg::node("a")],
            Some(meta(4)),
        ))
        .unwrap();
        g.push(Node::call_op(
            "c",
            "mul",
            vec![Arg::node("b"), Arg::node("b")],
            Some(meta(4)),
        ))
        .unwrap();
        g.push(Node::output("out", vec![Arg::node("c")])).unwrap();
        g
    }

    #[test]
    fn test_validate_ok() {
        let g = chain().validate().unwrap();
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.output_values(), &[Arg::node("c")]);
    }

    #[test]
    fn test_duplicate_name() {
        let mut g = Graph::new();
        g.push(Node::placeholder("a", InputRole::Primal, None))
            .unwrap();
        let err = g
            .push(Node::placeholder("a", InputRole::Primal, None))
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNode { .. }));
    }

    #[test]
    fn test_undefined_reference() {
        let mut g = Graph::new();
        g.push(Node::call_op("b", "relu", vec![Arg::node("ghost")], None))
            .unwrap();
        g.push(Node::output("out", vec![Arg::node("b")])).unwrap();
        assert!(matches!(
            g.validate(),
            Err(GraphError::UndefinedReference { .. })
        ));
    }

    #[test]
    fn test_use_before_def() {
        let mut g = Graph::new();
        g.push(Node::call_op("b", "relu", vec![Arg::node("a")], None))
            .unwrap();
        g.push(Node::placeholder("a", InputRole::Primal, None))
            .unwrap();
        g.push(Node::output("out", vec![Arg::node("b")])).unwrap();
        assert!(matches!(g.validate(), Err(GraphError::UseBeforeDef { .. })));
    }

    #[test]
    fn test_missing_output() {
        let mut g = Graph::new();
        g.push(Node::placeholder("a", InputRole::Primal, None))
            .unwrap();
        assert!(matches!(g.validate(), Err(GraphError::MissingOutput)));
    }

    #[test]
    fn test_output_not_last() {
        let mut g = Graph::new();
        g.push(Node::placeholder("a", InputRole::Primal, None))
            .unwrap();
        g.push(Node::output("out", vec![Arg::node("a")])).unwrap();
        g.push(Node::call_op("b", "relu", vec![Arg::node("a")], None))
            .unwrap();
        assert!(matches!(
            g.validate(),
            Err(GraphError::MisplacedOutput { .. })
        ));
    }

    #[test]
    fn test_consumers() {
        let g = chain().validate().unwrap();
        assert_eq!(g.consumers("a"), &["b".to_string()]);
        // `c` uses `b` twice but appears once; `out` consumes `c`.
        assert_eq!(g.consumers("b"), &["c".to_string()]);
        assert_eq!(g.consumers("c"), &["out".to_string()]);
        assert!(g.consumers("out").is_empty());
    }

    #[test]
    fn test_dead_code_elimination() {
        let mut g = Graph::new();
        g.push(Node::placeholder("a", InputRole::Primal, Some(meta(4))))
            .unwrap();
        g.push(Node::call_op("b", "relu", vec![Arg::node("a")], None))
            .unwrap();
        // A dangling op nobody consumes.
        g.push(Node::call_op("dead", "exp", vec![Arg::node("a")], None))
            .unwrap();
        g.push(Node::output("out", vec![Arg::node("b")])).unwrap();

        g.eliminate_dead_code();
        let g = g.validate().unwrap();
        assert!(!g.contains("dead"));
        assert_eq!(g.num_nodes(), 3);
    }

    #[test]
    fn test_dce_keeps_unused_placeholders() {
        let mut g = Graph::new();
        g.push(Node::placeholder("a", InputRole::Primal, Some(meta(4))))
            .unwrap();
        g.push(Node::placeholder("unused", InputRole::Primal, Some(meta(4))))
            .unwrap();
        g.push(Node::output("out", vec![Arg::node("a")])).unwrap();
        g.eliminate_dead_code();
        let g = g.validate().unwrap();
        assert!(g.contains("unused"));
    }

    #[test]
    fn test_dce_transitive() {
        let mut g = Graph::new();
        g.push(Node::placeholder("a", InputRole::Primal, Some(meta(4))))
            .unwrap();
        g.push(Node::call_op("d1", "exp", vec![Arg::node("a")], None))
            .unwrap();
        g.push(Node::call_op("d2", "exp", vec![Arg::node("d1")], None))
            .unwrap();
        g.push(Node::output("out", vec![Arg::node("a")])).unwrap();
        g.eliminate_dead_code();
        let g = g.validate().unwrap();
        assert!(!g.contains("d1"));
        assert!(!g.contains("d2"));
        assert_eq!(g.num_nodes(), 2);
    }

    #[test]
    fn test_display() {
        let g = chain().validate().unwrap();
        let s = format!("{g}");
        assert!(s.contains("%b = relu(%a)"));
        assert!(s.contains("output(%c)"));
    }

    #[test]
    fn test_summary() {
        let g = chain().validate().unwrap();
        let s = g.summary();
        assert!(s.contains("4 nodes"));
        assert!(s.contains("1 placeholders"));
    }
}
