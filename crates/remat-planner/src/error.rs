// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the rematerialization planner.

use joint_ir::GraphError;

/// Errors from subgraph extraction.
///
/// All variants indicate a malformed slicing request — a logic defect in
/// whatever produced the input/output sets — and are never recovered.
#[derive(Debug, thiserror::Error)]
pub enum SliceError {
    /// A designated input node does not exist in the source graph.
    #[error("input node '{name}' not found in graph")]
    UnknownInput { name: String },

    /// A requested output node does not exist in the source graph.
    #[error("output node '{name}' not found in graph")]
    UnknownOutput { name: String },

    /// A requested output is not computable from the designated inputs.
    #[error("output '{name}' is unreachable from the designated inputs")]
    UnreachableOutput { name: String },

    /// The sliced graph failed re-validation.
    #[error("extracted subgraph is malformed: {0}")]
    Malformed(#[from] GraphError),
}

/// Errors that can occur during partition planning.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Subgraph extraction failed. Fatal: the saved-value set or the
    /// joint graph itself is inconsistent.
    #[error("subgraph slicing failed: {0}")]
    Slice(#[from] SliceError),

    /// The min-cut solver failed or produced no finite cut. Non-fatal:
    /// callers may fall back to save-everything partitioning.
    #[error("min-cut computation failed: {0}")]
    Solver(#[from] flow_mincut::FlowError),

    /// A strategy produced an internally inconsistent result.
    #[error("strategy '{strategy}' failed: {detail}")]
    StrategyFailed { strategy: String, detail: String },
}
