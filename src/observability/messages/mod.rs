// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! [`StructuredLog`] to emit a `tracing` event (and optionally a span) carrying
//! the same data as structured fields.
//!
//! # Organization
//!
//! * `bus` - subscription lifecycle and dispatch events
//! * `registry` - extension registration and load ordering events
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_switchyard::observability::messages::{registry::LoadOrderResolved, StructuredLog};
//!
//! let order = vec!["storage", "economy"];
//! let msg = LoadOrderResolved {
//!     order: &order,
//!     edge_count: 1,
//! };
//!
//! msg.log();
//! tracing::info!("{}", msg);
//! ```

use tracing::Span;

pub mod bus;
pub mod registry;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emits the message as a `tracing` event.
    fn log(&self);

    /// Opens a span carrying the message's fields. Messages that never scope
    /// work return a disabled span.
    fn span(&self, _name: &str) -> Span {
        Span::none()
    }
}
