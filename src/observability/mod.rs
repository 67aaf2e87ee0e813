// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the crate. Message types follow a struct-based pattern
//! with a `Display` implementation, so log text lives in one place and each
//! message carries its own level and structured fields.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::bus` - subscription lifecycle, dispatch and handler failures
//! * `messages::registry` - extension registration and load ordering
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the binary (or the embedding host).
//!
//! # Usage
//!
//! ```rust
//! use the_switchyard::observability::messages::registry::MissingDependency;
//!
//! let msg = MissingDependency {
//!     extension_id: "shops",
//!     dependency: "economy",
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
