// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subgraph extraction (slicing).
//!
//! Given a validated graph, an ordered set of designated input nodes, and
//! a list of desired output values, produces the minimal closed subgraph
//! computing those outputs from those inputs. Designated inputs become
//! placeholders even when the original node is an operation; every node
//! reachable only through an undesignated placeholder is unreachable and
//! must not be requested as an output.

use crate::SliceError;
use joint_ir::graph::Validated;
use joint_ir::{Arg, Graph, InputRole, Node, NodeKind};
use std::collections::{HashMap, HashSet};

/// How an original node maps into the slice.
///
/// `Invalid` tags nodes with no value in the new graph: undesignated
/// placeholders and anything depending on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mapped {
    /// The node exists in the slice (names are preserved).
    Valid,
    /// The node is unreachable from the designated inputs.
    Invalid,
}

/// Extracts the subgraph computing `outputs` from `inputs`.
///
/// Inputs are named nodes of `graph` and become the slice's placeholders,
/// in the given order; placeholder originals keep their [`InputRole`],
/// everything else becomes [`InputRole::Saved`]. Literal outputs pass
/// through untouched. Dead code is eliminated before the slice is
/// re-validated.
pub fn extract_subgraph(
    graph: &Graph<Validated>,
    inputs: &[String],
    outputs: &[Arg],
) -> Result<Graph<Validated>, SliceError> {
    let mut sliced = Graph::new();
    let mut env: HashMap<&str, Mapped> = HashMap::new();
    let input_set: HashSet<&str> = inputs.iter().map(String::as_str).collect();

    for name in inputs {
        let node = graph
            .node(name)
            .ok_or_else(|| SliceError::UnknownInput { name: name.clone() })?;
        let role = node.input_role().unwrap_or(InputRole::Saved);
        sliced.push(Node::placeholder(name.as_str(), role, node.meta.clone()))?;
        env.insert(name, Mapped::Valid);
    }

    for node in graph.nodes() {
        if input_set.contains(node.name.as_str()) {
            continue;
        }
        match &node.kind {
            NodeKind::Placeholder { .. } => {
                // Not designated as an input: no source for its value.
                env.insert(&node.name, Mapped::Invalid);
            }
            NodeKind::GetAttr { .. } => {
                // Constants are always available.
                sliced.push(node.clone())?;
                env.insert(&node.name, Mapped::Valid);
            }
            NodeKind::CallOp { .. } => {
                let reachable = node
                    .arg_nodes()
                    .all(|arg| env.get(arg) == Some(&Mapped::Valid));
                if reachable {
                    sliced.push(node.clone())?;
                    env.insert(&node.name, Mapped::Valid);
                } else {
                    env.insert(&node.name, Mapped::Invalid);
                }
            }
            NodeKind::Output { .. } => {}
        }
    }

    let mut values = Vec::with_capacity(outputs.len());
    for arg in outputs {
        match arg {
            Arg::Lit(_) => values.push(arg.clone()),
            Arg::Node(name) => match env.get(name.as_str()) {
                None => return Err(SliceError::UnknownOutput { name: name.clone() }),
                Some(Mapped::Invalid) => {
                    return Err(SliceError::UnreachableOutput { name: name.clone() })
                }
                Some(Mapped::Valid) => values.push(arg.clone()),
            },
        }
    }
    sliced.push(Node::output("output", values))?;

    sliced.eliminate_dead_code();
    Ok(sliced.validate()?)
}
