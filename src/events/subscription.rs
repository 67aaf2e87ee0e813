// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Weak;

use crate::events::bus::BusShared;
use crate::events::EventType;

/// Revocation handle for exactly one registration.
///
/// Holds only a weak reference to the bus: the bus owns its registrations, and
/// a subscription (including the copy handed to a handler) never keeps the bus alive.
/// Cloning yields another handle to the same registration.
#[derive(Debug, Clone)]
pub struct Subscription {
    bus: Weak<BusShared>,
    event_type: EventType,
    id: u64,
}

impl Subscription {
    pub(crate) fn new(bus: Weak<BusShared>, event_type: EventType, id: u64) -> Self {
        Self { bus, event_type, id }
    }

    /// Registration id; ids increase in registration order.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    /// Removes the registration from the bus.
    ///
    /// Returns `false` if it was already gone or the bus has been dropped.
    pub fn revoke(&self) -> bool {
        match self.bus.upgrade() {
            Some(bus) => bus.remove(&self.event_type, self.id),
            None => false,
        }
    }

    /// True while the registration is still on a live bus.
    pub fn is_active(&self) -> bool {
        self.bus
            .upgrade()
            .is_some_and(|bus| bus.contains(&self.event_type, self.id))
    }
}
