// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::borrow::Cow;
use std::fmt::{self, Display};

/// Type tag carried by every event.
///
/// Tags are compared by name. Declare them as constants for statically known
/// events, or build them at runtime with [`EventType::owned`] (e.g. from a manifest).
///
/// ```
/// use the_switchyard::events::EventType;
///
/// const PLAYER_JOIN: EventType = EventType::new("player.join");
/// assert_eq!(PLAYER_JOIN, EventType::owned("player.join".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(Cow<'static, str>);

impl EventType {
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn owned(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for EventType {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        Self::owned(name)
    }
}

/// Capability for events that can be cancelled.
///
/// Cancellation is observed by every later subscriber of the same dispatch:
/// subscribers that do not accept cancelled events are skipped.
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    fn set_cancelled(&mut self, cancelled: bool);

    fn cancel(&mut self) {
        self.set_cancelled(true);
    }

    fn uncancel(&mut self) {
        self.set_cancelled(false);
    }
}

/// Upcast to [`Any`], implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A value that can be dispatched on an [`EventBus`](crate::events::EventBus).
///
/// Cancellable events override both `as_cancellable` accessors:
///
/// ```
/// use the_switchyard::events::{Cancellable, Event, EventType};
///
/// struct Chat {
///     message: String,
///     cancelled: bool,
/// }
///
/// impl Cancellable for Chat {
///     fn is_cancelled(&self) -> bool {
///         self.cancelled
///     }
///
///     fn set_cancelled(&mut self, cancelled: bool) {
///         self.cancelled = cancelled;
///     }
/// }
///
/// impl Event for Chat {
///     fn event_type(&self) -> EventType {
///         EventType::new("player.chat")
///     }
///
///     fn as_cancellable(&self) -> Option<&dyn Cancellable> {
///         Some(self)
///     }
///
///     fn as_cancellable_mut(&mut self) -> Option<&mut dyn Cancellable> {
///         Some(self)
///     }
/// }
///
/// let mut chat = Chat { message: "hi".to_string(), cancelled: false };
/// let event: &mut dyn Event = &mut chat;
/// assert!(event.cancel());
/// assert!(event.is_cancelled());
/// assert_eq!(event.downcast_ref::<Chat>().unwrap().message, "hi");
/// ```
pub trait Event: AsAny + 'static {
    /// Concrete type of this event occurrence.
    fn event_type(&self) -> EventType;

    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        None
    }

    fn as_cancellable_mut(&mut self) -> Option<&mut dyn Cancellable> {
        None
    }
}

impl dyn Event {
    pub fn is<T: Event>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Event>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// `false` for events that are not cancellable.
    pub fn is_cancelled(&self) -> bool {
        self.as_cancellable().is_some_and(|c| c.is_cancelled())
    }

    /// Cancels the event. Returns `false` if it is not cancellable.
    pub fn cancel(&mut self) -> bool {
        match self.as_cancellable_mut() {
            Some(cancellable) => {
                cancellable.cancel();
                true
            }
            None => false,
        }
    }
}
