// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-node tensor metadata: a shape/dtype pair with a byte size.

use crate::{DType, Shape};

/// Metadata attached to a tensor-valued graph node.
///
/// Nodes whose results are not tensors (ints, bools, structural markers)
/// carry no `TensorMeta`; consumers treat the absence as "size unknown".
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TensorMeta {
    /// Shape of the value.
    pub shape: Shape,
    /// Element type of the value.
    pub dtype: DType,
}

impl TensorMeta {
    /// Creates metadata from a shape and dtype.
    pub fn new(shape: impl Into<Shape>, dtype: DType) -> Self {
        Self {
            shape: shape.into(),
            dtype,
        }
    }

    /// Returns the memory footprint of the value in bytes.
    pub fn size_bytes(&self) -> usize {
        self.shape.size_bytes(self.dtype)
    }

    /// Returns a concise label for display, e.g. `"f32[2, 3]"`.
    pub fn summary(&self) -> String {
        format!("{}{}", self.dtype, self.shape)
    }
}

impl std::fmt::Display for TensorMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.dtype, self.shape)
    }
}
