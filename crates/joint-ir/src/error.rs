// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for graph construction and validation.

/// Errors that can occur when building or validating a graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Two nodes share the same name.
    #[error("duplicate node name '{name}'")]
    DuplicateNode { name: String },

    /// A node argument references a name that is never defined.
    #[error("node '{node}' references undefined node '{arg}'")]
    UndefinedReference { node: String, arg: String },

    /// A node argument references a node defined later in the graph.
    #[error("node '{node}' references '{arg}' before its definition")]
    UseBeforeDef { node: String, arg: String },

    /// The graph has no terminal output node.
    #[error("graph has no output node")]
    MissingOutput,

    /// The graph has more than one output node, or the output node is not last.
    #[error("output node '{name}' must be the single terminal node")]
    MisplacedOutput { name: String },

    /// The forward/backward output split exceeds the flat output count.
    #[error("forward output count {requested} exceeds total output count {total}")]
    BadForwardSplit { requested: usize, total: usize },
}
