// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised synchronously while wiring subscribers or declaring event types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A subscriber was registered without an event type.
    #[error("subscriber '{subscriber}' does not have an event type, use subscribe_to or set one on the builder")]
    MissingEventType { subscriber: String },

    /// The event type is not part of the bus's hierarchy.
    #[error("event type '{event_type}' is not declared in the event hierarchy")]
    UndeclaredEventType { event_type: String },

    /// The subscriber builder was finished without a handler.
    #[error("subscriber '{subscriber}' has no handler")]
    MissingHandler { subscriber: String },

    /// An event type names a parent that was never declared.
    #[error("event type '{event_type}' declares unknown parent '{parent}'")]
    UnknownParent { event_type: String, parent: String },

    /// The same event type was declared twice.
    #[error("event type '{event_type}' is declared more than once")]
    DuplicateEventType { event_type: String },

    /// Parent declarations loop back on themselves.
    #[error("event hierarchy contains a cycle: {}", .cycle.join(" -> "))]
    CyclicHierarchy { cycle: Vec<String> },

    /// The same extension id appears twice in a manifest.
    #[error("extension '{id}' is declared more than once")]
    DuplicateExtension { id: String },
}
