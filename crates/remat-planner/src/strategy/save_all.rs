// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Save-everything partitioning strategy.
//!
//! The simplest correct choice: every tensor-bearing value computed by
//! the forward pass is saved, nothing is recomputed. Peak memory is the
//! worst case, but the strategy needs no solver and cannot fail on
//! pathological graphs.
//!
//! # When to use
//! - As the fallback when the min-cut solver is unavailable or errors.
//! - Debugging: removes rematerialization from the picture entirely.
//! - Baseline for measuring how much memory min-cut planning recovers.

use crate::extract::extract_subgraph;
use crate::strategy::Partitioner;
use crate::PlannerError;
use joint_ir::JointGraph;
use std::collections::HashSet;

/// Save every forward intermediate with known tensor metadata.
#[derive(Debug, Clone, Default)]
pub struct SaveAll;

impl SaveAll {
    pub fn new() -> Self {
        Self
    }
}

impl Partitioner for SaveAll {
    fn name(&self) -> &str {
        "save-all"
    }

    fn choose_saved_values(&self, joint: &JointGraph) -> Result<Vec<String>, PlannerError> {
        let primals: Vec<String> = joint
            .primal_inputs()
            .iter()
            .map(|n| n.name.clone())
            .collect();
        let forward_only =
            extract_subgraph(joint.graph(), &primals, joint.forward_outputs())?;

        let forward_names: HashSet<&str> = forward_only
            .nodes()
            .iter()
            .filter(|n| !n.is_output())
            .map(|n| n.name.as_str())
            .collect();

        // Joint-graph insertion order keeps the result deterministic.
        let saved = joint
            .graph()
            .nodes()
            .iter()
            .filter(|n| forward_names.contains(n.name.as_str()) && n.meta.is_some())
            .map(|n| n.name.clone())
            .collect();
        Ok(saved)
    }
}
