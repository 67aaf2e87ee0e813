// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared event fixtures for bus tests.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::events::{Cancellable, Event, EventHierarchy, EventType};

pub const ROOT: EventType = EventType::new("root");
pub const TEST: EventType = EventType::new("test");
pub const CHILD: EventType = EventType::new("test.child");
pub const SIDE: EventType = EventType::new("side");
pub const MULTI: EventType = EventType::new("test.side");
pub const OTHER: EventType = EventType::new("other");

/// ```text
///          root
///        /   |   \
///     test  side  other
///     /   \  /
///  child  multi
/// ```
pub fn hierarchy() -> EventHierarchy {
    EventHierarchy::builder()
        .root(ROOT)
        .declare(TEST, [ROOT])
        .declare(CHILD, [TEST])
        .declare(SIDE, [ROOT])
        .declare(MULTI, [TEST, SIDE])
        .declare(OTHER, [ROOT])
        .build()
        .unwrap()
}

/// Cancellable event whose type is chosen per instance.
#[derive(Debug)]
pub struct TestEvent {
    pub event_type: EventType,
    pub cancelled: bool,
    pub touches: usize,
}

impl TestEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            cancelled: false,
            touches: 0,
        }
    }

    pub fn cancelled(event_type: EventType) -> Self {
        Self {
            cancelled: true,
            ..Self::new(event_type)
        }
    }
}

impl Cancellable for TestEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

impl Event for TestEvent {
    fn event_type(&self) -> EventType {
        self.event_type.clone()
    }

    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        Some(self)
    }

    fn as_cancellable_mut(&mut self) -> Option<&mut dyn Cancellable> {
        Some(self)
    }
}

/// Event without cancellation support.
#[derive(Debug)]
pub struct PlainEvent;

impl Event for PlainEvent {
    fn event_type(&self) -> EventType {
        OTHER
    }
}

/// Records handler names in invocation order.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, name: &str) {
        self.0.lock().push(name.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }
}
