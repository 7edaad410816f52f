// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # remat-planner
//!
//! Splits a joint forward/backward dataflow graph into two independently
//! executable subgraphs, choosing which intermediate values to carry
//! ("save") across the boundary and which to recompute.
//!
//! # Strategies
//!
//! | Strategy | Saved set | Peak memory | Needs solver |
//! |---|---|---|---|
//! | [`SaveAll`] | every forward tensor the backward uses | Highest | No |
//! | [`MinCutRemat`] | minimum-byte-weight cut | Lowest | Yes |
//!
//! # Trait-Based Extensibility
//!
//! All strategies implement [`Partitioner`], so new selection policies can
//! be added without touching extraction or orchestration:
//!
//! ```ignore
//! struct MyStrategy;
//! impl Partitioner for MyStrategy {
//!     fn name(&self) -> &str { "custom" }
//!     fn choose_saved_values(&self, joint: &JointGraph)
//!         -> Result<Vec<String>, PlannerError> { /* ... */ }
//! }
//! ```
//!
//! # Example
//! ```
//! use joint_ir::{GraphBuilder, JointGraph};
//! use remat_planner::{auto_partition, PartitionOptions};
//! use tensor_meta::{DType, TensorMeta};
//!
//! let meta = |n| TensorMeta::new(vec![n], DType::F32);
//! let mut b = GraphBuilder::new();
//! b.primal("a", meta(4))
//!     .tangent("dy", meta(4))
//!     .call("y", "relu", &["a"], Some(meta(4)))
//!     .call("da", "threshold_backward", &["dy", "a"], Some(meta(4)))
//!     .output(&["y", "da"]);
//! let joint = JointGraph::new(b.build().unwrap(), 1).unwrap();
//!
//! let partition = auto_partition(&joint, PartitionOptions::default()).unwrap();
//! println!("{}", partition.summary());
//! ```

mod error;
mod extract;
pub mod partition;
mod recompute;
pub mod strategy;

pub use error::{PlannerError, SliceError};
pub use extract::extract_subgraph;
pub use partition::{partition, Partition, PartitionStats};
pub use recompute::{Classifier, RecomputeMode, RecomputeRules};
pub use strategy::min_cut::MinCutRemat;
pub use strategy::save_all::SaveAll;
pub use strategy::Partitioner;

use joint_ir::JointGraph;

/// Saved-value selection strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Min-cut rematerialization planning with save-all fallback.
    #[default]
    MinCut,
    /// Save every tensor-bearing forward intermediate.
    SaveAll,
}

/// Configuration surface of the partitioning pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionOptions {
    /// Recompute policy (conservative allow-list by default).
    pub mode: RecomputeMode,
    /// Which strategy to run.
    pub strategy: StrategyKind,
}

/// Partitions a joint graph, degrading gracefully when min-cut planning
/// is impossible.
///
/// Slicing failures are programming errors and propagate. A solver
/// failure (for instance an unbounded flow from a recompute-banned node
/// with unknown size feeding the backward pass) only costs memory, not
/// correctness, so it downgrades to [`SaveAll`] with a warning.
pub fn auto_partition(
    joint: &JointGraph,
    options: PartitionOptions,
) -> Result<Partition, PlannerError> {
    match options.strategy {
        StrategyKind::SaveAll => {
            tracing::info!("partitioning with save-all strategy");
            partition(joint, &SaveAll::new())
        }
        StrategyKind::MinCut => {
            let strategy = MinCutRemat::new(options.mode);
            match partition(joint, &strategy) {
                Err(PlannerError::Solver(err)) => {
                    tracing::warn!(
                        "min-cut planning failed ({err}); falling back to save-all partitioning",
                    );
                    partition(joint, &SaveAll::new())
                }
                other => other,
            }
        }
    }
}
