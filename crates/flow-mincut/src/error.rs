// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for flow-network computations.

/// Errors that can occur while computing a minimum cut.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// A terminal vertex does not belong to the network, or source and
    /// sink coincide.
    #[error("invalid terminal vertex {index}")]
    InvalidVertex { index: usize },

    /// An augmenting path of infinite capacity exists: no finite cut
    /// separates source from sink.
    #[error("maximum flow is unbounded: no finite cut separates the terminals")]
    UnboundedFlow,
}
