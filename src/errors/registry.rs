// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for extension registration and load ordering.

use thiserror::Error;

use super::{GraphError, StateError};

/// Errors returned by [`ExtensionRegistry`](crate::extensions::ExtensionRegistry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A required dependency was never registered.
    #[error("extension '{extension}' requires '{dependency}' but it is not registered")]
    MissingDependency {
        /// The extension declaring the dependency
        extension: String,
        /// The dependency that couldn't be resolved
        dependency: String,
    },

    /// The dependency graph contains a cycle.
    #[error("circular dependency detected: {}", .cycle.join(" -> "))]
    CircularDependency {
        /// The cycle path, starting and ending at the same extension
        cycle: Vec<String>,
    },

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
