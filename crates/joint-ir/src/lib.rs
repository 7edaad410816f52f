// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # joint-ir
//!
//! A lightweight dataflow IR for joint forward/backward computations.
//!
//! Rather than depending on a full autodiff framework, this crate defines
//! the minimal graph representation a partitioning pass needs:
//!
//! - [`Node`] / [`NodeKind`] — one operation per node, over a closed set
//!   of kinds (placeholder, operator call, constant reference, output).
//! - [`Graph`] — the computation as an insertion-ordered DAG, with a
//!   **type-state pattern** (`Draft` → `Validated`).
//! - [`GraphBuilder`] — programmatic construction with end-of-build
//!   validation.
//! - [`JointGraph`] — a validated graph plus the forward/backward output
//!   split (`num_forward_outputs`) and tangent-closure analysis.
//!
//! Tensor data never appears here; nodes carry
//! [`tensor_meta::TensorMeta`] so passes can reason about byte sizes.
//!
//! # Example
//! ```
//! use joint_ir::{GraphBuilder, JointGraph};
//! use tensor_meta::{DType, TensorMeta};
//!
//! let mut b = GraphBuilder::new();
//! b.primal("a", TensorMeta::new(vec![4], DType::F32))
//!     .tangent("dy", TensorMeta::new(vec![4], DType::F32))
//!     .call("y", "relu", &["a"], Some(TensorMeta::new(vec![4], DType::F32)))
//!     .call("da", "mul", &["dy", "y"], Some(TensorMeta::new(vec![4], DType::F32)))
//!     .output(&["y", "da"]);
//! let joint = JointGraph::new(b.build().unwrap(), 1).unwrap();
//! assert_eq!(joint.forward_outputs().len(), 1);
//! ```

mod builder;
mod dot;
mod error;
pub mod graph;
mod joint;
mod node;

pub use builder::GraphBuilder;
pub use error::GraphError;
pub use graph::{Draft, Graph, GraphState, Validated};
pub use joint::JointGraph;
pub use node::{Arg, InputRole, Literal, Node, NodeKind};
