// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Structural violations raised by [`DirectedGraph`](crate::graph::DirectedGraph).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The graph was built without self-loop support.
    #[error("self loops are not allowed: {node}")]
    SelfLoop { node: String },

    /// A neighbour query named a node the graph does not contain.
    #[error("{node} is not a node of this graph")]
    UnknownNode { node: String },
}
