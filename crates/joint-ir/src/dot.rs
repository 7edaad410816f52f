// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Graphviz rendering for debugging partitioner decisions.
//!
//! Produces a `dot` source string; writing it to disk and invoking
//! Graphviz is left to the caller.

use crate::graph::Validated;
use crate::{Graph, NodeKind};
use std::fmt::Write;

impl Graph<Validated> {
    /// Renders the graph as Graphviz `dot` source.
    ///
    /// Placeholders are drawn as ellipses, operations as boxes, constants
    /// as diamonds. Tensor metadata is included in the label when present.
    pub fn to_dot(&self, name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph {name} {{");
        let _ = writeln!(out, "  rankdir=TB;");

        for node in self.nodes() {
            let (label, shape) = match &node.kind {
                NodeKind::Placeholder { role } => {
                    (format!("{}\\n({})", node.name, role.as_str()), "ellipse")
                }
                NodeKind::CallOp { op, .. } => (format!("{}\\n{}", node.name, op), "box"),
                NodeKind::GetAttr { attr } => (format!("{}\\n{}", node.name, attr), "diamond"),
                NodeKind::Output { .. } => ("output".to_string(), "doubleoctagon"),
            };
            let label = match &node.meta {
                Some(m) => format!("{label}\\n{m}"),
                None => label,
            };
            let _ = writeln!(out, "  \"{}\" [label=\"{}\" shape={}];", node.name, label, shape);
        }

        for node in self.nodes() {
            for arg in node.arg_nodes() {
                let _ = writeln!(out, "  \"{}\" -> \"{}\";", arg, node.name);
            }
        }

        let _ = writeln!(out, "}}");
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::GraphBuilder;
    use tensor_meta::{DType, TensorMeta};

    #[test]
    fn test_dot_output() {
        let mut b = GraphBuilder::new();
        b.primal("a", TensorMeta::new(vec![4], DType::F32))
            .call("b", "relu", &["a"], None)
            .output(&["b"]);
        let g = b.build().unwrap();
        let dot = g.to_dot("joint");

        assert!(dot.starts_with("digraph joint {"));
        assert!(dot.contains("\"a\" [label=\"a\\n(primal)\\nf32[4]\" shape=ellipse];"));
        assert!(dot.contains("\"b\" [label=\"b\\nrelu\" shape=box];"));
        assert!(dot.contains("\"a\" -> \"b\";"));
        assert!(dot.contains("\"b\" -> \"output\";"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
