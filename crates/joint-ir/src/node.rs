// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Node definitions for the joint-computation dataflow IR.
//!
//! Each [`Node`] is one operation in the graph: its unique name, its
//! [`NodeKind`], and optional [`TensorMeta`] describing the value it
//! produces. Nodes store no tensor data — partitioning only needs names,
//! dataflow edges, and byte sizes.

use tensor_meta::TensorMeta;

/// A literal (non-node) operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal (axis indices, element counts, ...).
    Int(i64),
    /// Floating-point literal (scalar multipliers, epsilon values, ...).
    Float(f64),
    /// Boolean literal (keepdim flags, ...).
    Bool(bool),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v}"),
            Literal::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// An operand of an operation: either another node (by name) or a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Reference to the value produced by a named node.
    Node(String),
    /// An inline constant.
    Lit(Literal),
}

impl Arg {
    /// Creates a node-reference argument.
    pub fn node(name: impl Into<String>) -> Self {
        Arg::Node(name.into())
    }

    /// Returns the referenced node name, or `None` for literals.
    pub fn as_node(&self) -> Option<&str> {
        match self {
            Arg::Node(name) => Some(name),
            Arg::Lit(_) => None,
        }
    }
}

impl From<Literal> for Arg {
    fn from(lit: Literal) -> Self {
        Arg::Lit(lit)
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Lit(Literal::Int(v))
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Lit(Literal::Float(v))
    }
}

impl std::fmt::Display for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Node(name) => write!(f, "%{name}"),
            Arg::Lit(lit) => write!(f, "{lit}"),
        }
    }
}

/// Distinguishes the kinds of graph inputs.
///
/// The differentiation front-end marks each placeholder explicitly; the
/// partitioner never infers gradient-ness from operator semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputRole {
    /// An original input to the user function.
    Primal,
    /// An incoming gradient supplied to the backward computation.
    Tangent,
    /// An intermediate value carried across a partition boundary.
    ///
    /// Never present in a joint graph — synthesized by subgraph extraction
    /// when a non-placeholder node becomes an input of the slice.
    Saved,
}

impl InputRole {
    /// Returns a human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            InputRole::Primal => "primal",
            InputRole::Tangent => "tangent",
            InputRole::Saved => "saved",
        }
    }
}

/// The kind of a graph node.
///
/// This is a closed set: code that dispatches on node kind matches
/// exhaustively, so a future kind cannot be silently mishandled.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A graph input.
    Placeholder {
        /// What kind of input this is.
        role: InputRole,
    },
    /// An operator application.
    CallOp {
        /// Target operator identifier (e.g. `"matmul"`, `"relu"`).
        op: String,
        /// Ordered operands, each a node reference or a literal.
        args: Vec<Arg>,
    },
    /// A reference to a constant attribute (weights baked into the module).
    GetAttr {
        /// Qualified attribute path.
        attr: String,
    },
    /// The terminal node listing the flat values the graph produces.
    Output {
        /// Produced values, in order.
        values: Vec<Arg>,
    },
}

/// A single node in the dataflow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier within the graph.
    pub name: String,
    /// What the node does.
    pub kind: NodeKind,
    /// Shape/dtype of the produced value, absent for non-tensor results.
    pub meta: Option<TensorMeta>,
}

impl Node {
    /// Creates a placeholder node.
    pub fn placeholder(name: impl Into<String>, role: InputRole, meta: Option<TensorMeta>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Placeholder { role },
            meta,
        }
    }

    /// Creates an operator-application node.
    pub fn call_op(
        name: impl Into<String>,
        op: impl Into<String>,
        args: Vec<Arg>,
        meta: Option<TensorMeta>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::CallOp {
                op: op.into(),
                args,
            },
            meta,
        }
    }

    /// Creates a constant-reference node.
    pub fn get_attr(
        name: impl Into<String>,
        attr: impl Into<String>,
        meta: Option<TensorMeta>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::GetAttr { attr: attr.into() },
            meta,
        }
    }

    /// Creates the terminal output node.
    pub fn output(name: impl Into<String>, values: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Output { values },
            meta: None,
        }
    }

    /// Returns `true` for placeholder nodes of any role.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, NodeKind::Placeholder { .. })
    }

    /// Returns the input role, or `None` for non-placeholder nodes.
    pub fn input_role(&self) -> Option<InputRole> {
        match self.kind {
            NodeKind::Placeholder { role } => Some(role),
            _ => None,
        }
    }

    /// Returns `true` for tangent placeholders.
    pub fn is_tangent(&self) -> bool {
        self.input_role() == Some(InputRole::Tangent)
    }

    /// Returns `true` for the terminal output node.
    pub fn is_output(&self) -> bool {
        matches!(self.kind, NodeKind::Output { .. })
    }

    /// Returns the target operator, or `None` for non-operation nodes.
    pub fn op(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::CallOp { op, .. } => Some(op),
            _ => None,
        }
    }

    /// Iterates over the names of nodes this node consumes, in argument
    /// order, duplicates included.
    pub fn arg_nodes(&self) -> impl Iterator<Item = &str> {
        let args: &[Arg] = match &self.kind {
            NodeKind::CallOp { args, .. } => args,
            NodeKind::Output { values } => values,
            NodeKind::Placeholder { .. } | NodeKind::GetAttr { .. } => &[],
        };
        args.iter().filter_map(|a| a.as_node())
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        let meta = match &self.meta {
            Some(m) => format!(" : {m}"),
            None => String::new(),
        };
        match &self.kind {
            NodeKind::Placeholder { role } => {
                format!("%{} = placeholder({}){}", self.name, role.as_str(), meta)
            }
            NodeKind::CallOp { op, args } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                format!("%{} = {}({}){}", self.name, op, args.join(", "), meta)
            }
            NodeKind::GetAttr { attr } => {
                format!("%{} = get_attr({attr}){}", self.name, meta)
            }
            NodeKind::Output { values } => {
                let values: Vec<String> = values.iter().map(|a| a.to_string()).collect();
                format!("output({})", values.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_meta::{DType, TensorMeta};

    #[test]
    fn test_arg_nodes_call() {
        let n = Node::call_op(
            "c",
            "add",
            vec![Arg::node("a"), Arg::from(2i64), Arg::node("b")],
            None,
        );
        let names: Vec<&str> = n.arg_nodes().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_arg_nodes_placeholder_empty() {
        let n = Node::placeholder("a", InputRole::Primal, None);
        assert_eq!(n.arg_nodes().count(), 0);
    }

    #[test]
    fn test_roles() {
        let p = Node::placeholder("a", InputRole::Primal, None);
        let t = Node::placeholder("da", InputRole::Tangent, None);
        assert!(p.is_placeholder());
        assert!(!p.is_tangent());
        assert!(t.is_tangent());
        assert_eq!(p.input_role(), Some(InputRole::Primal));

        let c = Node::call_op("c", "relu", vec![Arg::node("a")], None);
        assert_eq!(c.input_role(), None);
        assert_eq!(c.op(), Some("relu"));
    }

    #[test]
    fn test_summary() {
        let meta = TensorMeta::new(vec![2, 2], DType::F32);
        let n = Node::call_op(
            "c",
            "mul",
            vec![Arg::node("a"), Arg::from(0.5f64)],
            Some(meta),
        );
        let s = n.summary();
        assert!(s.contains("%c = mul(%a, 0.5)"));
        assert!(s.contains("f32[2, 2]"));
    }

    #[test]
    fn test_output_summary() {
        let n = Node::output("out", vec![Arg::node("y"), Arg::from(1i64)]);
        assert_eq!(n.summary(), "output(%y, 1)");
    }
}
