// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Recompute classification and the saved-value weight model.
//!
//! Two questions are answered per node: may the backward pass recompute
//! it instead of reading a saved copy, and what does saving it cost.
//! Operator classification lives in explicit, immutable tables owned by
//! the caller — never module-level state — so policies can differ per
//! invocation.

use flow_mincut::Capacity;
use joint_ir::graph::Validated;
use joint_ir::{Graph, InputRole, Node, NodeKind};
use std::collections::HashSet;

/// Recompute policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecomputeMode {
    /// Allow-list policy: only known-cheap operators may be recomputed,
    /// and reductions only when they substantially shrink their input.
    #[default]
    Conservative,
    /// Deny-list policy: everything may be recomputed except operators
    /// that are expensive or non-deterministic.
    Aggressive,
}

/// Immutable operator classification tables.
///
/// `default()` carries the stock tables; custom sets can be supplied for
/// backends with different operator economics.
#[derive(Debug, Clone)]
pub struct RecomputeRules {
    pointwise: HashSet<String>,
    misc: HashSet<String>,
    reductions: HashSet<String>,
    never: HashSet<String>,
}

impl RecomputeRules {
    /// Builds rules from explicit operator sets.
    pub fn new(
        pointwise: impl IntoIterator<Item = String>,
        misc: impl IntoIterator<Item = String>,
        reductions: impl IntoIterator<Item = String>,
        never: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            pointwise: pointwise.into_iter().collect(),
            misc: misc.into_iter().collect(),
            reductions: reductions.into_iter().collect(),
            never: never.into_iter().collect(),
        }
    }

    /// Returns `true` if the operator is classified as a reduction.
    pub fn is_reduction(&self, op: &str) -> bool {
        self.reductions.contains(op)
    }

    /// Returns `true` if the operator is in the conservative allow-list.
    fn is_allowed(&self, op: &str) -> bool {
        self.pointwise.contains(op) || self.misc.contains(op) || self.reductions.contains(op)
    }

    /// Returns `true` if the operator is in the aggressive deny-list.
    fn is_denied(&self, op: &str) -> bool {
        self.never.contains(op)
    }
}

impl Default for RecomputeRules {
    fn default() -> Self {
        const POINTWISE: &[&str] = &[
            "add", "sub", "div", "atan2", "mul", "max", "min", "pow", "remainder", "fmod",
            "bitwise_and", "bitwise_or", "bitwise_xor", "lshift", "rshift", "eq", "ne", "ge",
            "gt", "le", "lt", "abs", "bitwise_not", "ceil", "floor", "frac", "neg", "relu",
            "round", "silu", "trunc", "log", "log10", "log1p", "log2", "lgamma", "exp", "expm1",
            "erf", "erfc", "cos", "acos", "cosh", "sin", "asin", "sinh", "tan", "atan", "tanh",
            "atanh", "sqrt", "rsqrt", "reciprocal", "sigmoid", "softplus", "threshold",
            "threshold_backward", "clamp", "where", "lerp", "addcmul", "gelu", "gelu_backward",
        ];
        const MISC: &[&str] = &["cast", "type_as", "select"];
        const REDUCTIONS: &[&str] = &[
            "softmax",
            "softmax_backward",
            "sum",
            "mean",
            "grad_sum_to_size",
            "sum_to_size",
            "amax",
        ];
        // Expensive to redo, or involving randomness.
        const NEVER: &[&str] = &[
            "matmul",
            "bmm",
            "addmm",
            "convolution",
            "convolution_backward",
            "dropout",
            "rand_like",
            "randn_like",
            "upsample_bilinear2d",
        ];

        let owned = |ops: &[&str]| ops.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self::new(
            owned(POINTWISE),
            owned(MISC),
            owned(REDUCTIONS),
            owned(NEVER),
        )
    }
}

/// Per-node recompute and memory-weight decisions.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    mode: RecomputeMode,
    rules: RecomputeRules,
}

impl Classifier {
    /// Creates a classifier with the stock rules.
    pub fn new(mode: RecomputeMode) -> Self {
        Self {
            mode,
            rules: RecomputeRules::default(),
        }
    }

    /// Creates a classifier with custom rules.
    pub fn with_rules(mode: RecomputeMode, rules: RecomputeRules) -> Self {
        Self { mode, rules }
    }

    /// Decides whether the backward pass is forbidden from recomputing
    /// this node.
    ///
    /// Non-operation nodes are never banned. In conservative mode a
    /// reduction is only recomputable when its output is less than a
    /// quarter of its summed tensor-input bytes: a reduction that barely
    /// shrinks its input offers too little memory benefit for its
    /// compute cost. Unknown byte sizes degrade toward banning, i.e.
    /// toward saving.
    pub fn is_recompute_banned(&self, graph: &Graph<Validated>, node: &Node) -> bool {
        let NodeKind::CallOp { op, .. } = &node.kind else {
            return false;
        };
        match self.mode {
            RecomputeMode::Aggressive => self.rules.is_denied(op),
            RecomputeMode::Conservative => {
                if !self.rules.is_allowed(op) {
                    return true;
                }
                if self.rules.is_reduction(op) {
                    let input_bytes: usize = node
                        .arg_nodes()
                        .filter_map(|arg| graph.node(arg))
                        .filter_map(|n| n.meta.as_ref())
                        .map(tensor_meta::TensorMeta::size_bytes)
                        .sum();
                    let Some(output_bytes) = node.meta.as_ref().map(|m| m.size_bytes()) else {
                        return true;
                    };
                    return output_bytes * 4 >= input_bytes;
                }
                false
            }
        }
    }

    /// Returns the memory cost of saving this node's output.
    ///
    /// Nodes without tensor metadata are infinitely expensive (never the
    /// cheapest place to cut). Primal inputs cost their plain byte size —
    /// they are already resident. Everything else is charged double,
    /// covering the producing write plus the later read.
    pub fn weight(&self, node: &Node) -> Capacity {
        let Some(meta) = &node.meta else {
            return Capacity::Infinite;
        };
        let bytes = meta.size_bytes() as u64;
        match node.kind {
            NodeKind::Placeholder {
                role: InputRole::Primal,
            } => Capacity::Finite(bytes),
            _ => Capacity::Finite(2 * bytes),
        }
    }
}
