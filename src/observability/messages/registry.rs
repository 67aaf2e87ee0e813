// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for extension registration and load ordering.
//!
//! This module contains message types for logging events related to:
//! * Extension registration and replacement
//! * Dependency resolution (skipped optional and missing required dependencies)
//! * Cyclic dependency detection
//! * Load order resolution

use std::fmt::{Display, Formatter};

use crate::observability::messages::StructuredLog;

/// An extension declaration was stored.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ExtensionRegistered<'a> {
    pub extension_id: &'a str,
    pub dependency_count: usize,
}

impl Display for ExtensionRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Extension '{}' registered with {} declared dependencies",
            self.extension_id, self.dependency_count
        )
    }
}

impl StructuredLog for ExtensionRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            extension_id = self.extension_id,
            dependency_count = self.dependency_count,
            "{}", self
        );
    }
}

/// An extension id was registered again; the new declaration wins.
///
/// # Log Level
/// `warn!` - Potential issue
pub struct ExtensionReplaced<'a> {
    pub extension_id: &'a str,
}

impl Display for ExtensionReplaced<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Extension '{}' was already registered, replacing its declaration",
            self.extension_id
        )
    }
}

impl StructuredLog for ExtensionReplaced<'_> {
    fn log(&self) {
        tracing::warn!(extension_id = self.extension_id, "{}", self);
    }
}

/// An optional dependency is not registered and was ignored.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct OptionalDependencySkipped<'a> {
    pub extension_id: &'a str,
    pub dependency: &'a str,
}

impl Display for OptionalDependencySkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Extension '{}' optionally depends on '{}', which is not registered",
            self.extension_id, self.dependency
        )
    }
}

impl StructuredLog for OptionalDependencySkipped<'_> {
    fn log(&self) {
        tracing::debug!(
            extension_id = self.extension_id,
            dependency = self.dependency,
            "{}", self
        );
    }
}

/// A required dependency is not registered.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct MissingDependency<'a> {
    pub extension_id: &'a str,
    pub dependency: &'a str,
}

impl Display for MissingDependency<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Extension '{}' depends on missing extension '{}'",
            self.extension_id, self.dependency
        )
    }
}

impl StructuredLog for MissingDependency<'_> {
    fn log(&self) {
        tracing::error!(
            extension_id = self.extension_id,
            dependency = self.dependency,
            "{}", self
        );
    }
}

/// Cyclic dependency detected while ordering extensions.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_switchyard::observability::messages::registry::CyclicDependencyDetected;
///
/// let cycle = vec!["a", "b", "a"];
/// let msg = CyclicDependencyDetected { cycle: &cycle };
///
/// assert_eq!(msg.to_string(), "Cyclic dependency detected: a -> b -> a");
/// ```
pub struct CyclicDependencyDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic dependency detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = %self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }
}

/// Load order computed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct LoadOrderResolved<'a> {
    pub order: &'a [&'a str],
    pub edge_count: usize,
}

impl Display for LoadOrderResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved load order for {} extensions ({} dependency edges): {}",
            self.order.len(),
            self.edge_count,
            self.order.join(", ")
        )
    }
}

impl StructuredLog for LoadOrderResolved<'_> {
    fn log(&self) {
        tracing::info!(
            extension_count = self.order.len(),
            edge_count = self.edge_count,
            "{}", self
        );
    }
}
