// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the event bus.
//!
//! This module contains message types for logging events related to:
//! * Subscription lifecycle (registration, revocation, bulk removal)
//! * Dispatch cache rebuilds
//! * Dispatch lifecycle and handler failures

use std::fmt::{Display, Formatter};
use tracing::Span;

use crate::errors::HandlerError;
use crate::events::{EventType, Priority};
use crate::observability::messages::StructuredLog;

/// A subscriber was registered.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct SubscriberRegistered<'a> {
    pub subscriber: &'a str,
    pub registration_id: u64,
    pub event_type: &'a EventType,
    pub priority: Priority,
}

impl Display for SubscriberRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Subscriber '{}' registered for '{}' at {} priority (registration {})",
            self.subscriber, self.event_type, self.priority, self.registration_id
        )
    }
}

impl StructuredLog for SubscriberRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            subscriber = self.subscriber,
            registration_id = self.registration_id,
            event_type = %self.event_type,
            priority = %self.priority,
            "{}", self
        );
    }
}

/// A single registration was revoked (explicitly or by expiry).
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct SubscriptionRevoked<'a> {
    pub subscriber: &'a str,
    pub registration_id: u64,
    pub event_type: &'a EventType,
}

impl Display for SubscriptionRevoked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Subscriber '{}' revoked from '{}' (registration {})",
            self.subscriber, self.event_type, self.registration_id
        )
    }
}

impl StructuredLog for SubscriptionRevoked<'_> {
    fn log(&self) {
        tracing::debug!(
            subscriber = self.subscriber,
            registration_id = self.registration_id,
            event_type = %self.event_type,
            "{}", self
        );
    }
}

/// `unsubscribe_if` removed one or more registrations.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct SubscribersRemoved {
    pub removed: usize,
}

impl Display for SubscribersRemoved {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Removed {} subscriber(s) matching predicate", self.removed)
    }
}

impl StructuredLog for SubscribersRemoved {
    fn log(&self) {
        tracing::debug!(removed = self.removed, "{}", self);
    }
}

/// The sorted dispatch list for a concrete type was rebuilt.
///
/// # Log Level
/// `trace!` - Hot path detail
pub struct DispatchCacheRebuilt<'a> {
    pub event_type: &'a EventType,
    pub lineage_length: usize,
    pub subscriber_count: usize,
}

impl Display for DispatchCacheRebuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rebuilt dispatch list for '{}': {} subscriber(s) across {} type(s)",
            self.event_type, self.subscriber_count, self.lineage_length
        )
    }
}

impl StructuredLog for DispatchCacheRebuilt<'_> {
    fn log(&self) {
        tracing::trace!(
            event_type = %self.event_type,
            lineage_length = self.lineage_length,
            subscriber_count = self.subscriber_count,
            "{}", self
        );
    }
}

/// Dispatch of one event occurrence started.
///
/// # Log Level
/// `trace!` - Hot path detail
pub struct DispatchStarted<'a> {
    pub event_type: &'a EventType,
    pub subscriber_count: usize,
}

impl Display for DispatchStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatching '{}' to {} subscriber(s)",
            self.event_type, self.subscriber_count
        )
    }
}

impl StructuredLog for DispatchStarted<'_> {
    fn log(&self) {
        tracing::trace!(
            event_type = %self.event_type,
            subscriber_count = self.subscriber_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "dispatch",
            span_name = name,
            event_type = %self.event_type,
            subscriber_count = self.subscriber_count,
        )
    }
}

/// A handler returned an error or panicked.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_switchyard::errors::{HandlerError, HandlerFailure};
/// use the_switchyard::observability::messages::bus::HandlerFailed;
///
/// let error = HandlerError {
///     subscriber: "audit#3".to_string(),
///     event_type: "player.chat".to_string(),
///     failure: HandlerFailure::Panicked("boom".to_string()),
/// };
/// let msg = HandlerFailed { error: &error };
///
/// tracing::error!("{}", msg);
/// ```
pub struct HandlerFailed<'a> {
    pub error: &'a HandlerError,
}

impl Display for HandlerFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Handler failed: {}", self.error)
    }
}

impl StructuredLog for HandlerFailed<'_> {
    fn log(&self) {
        tracing::error!(
            subscriber = %self.error.subscriber,
            event_type = %self.error.event_type,
            panicked = self.error.is_panic(),
            "{}", self
        );
    }
}
