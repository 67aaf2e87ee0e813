// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Polymorphic, priority-ordered, cancellation-aware event dispatch.
//!
//! # Model
//!
//! * [`EventType`] - tag carried by every [`Event`]
//! * [`EventHierarchy`] - explicit parent table; dispatching `U` reaches
//!   registrations for `U` and every ancestor of `U`
//! * [`Subscriber`] - reusable blueprint: handler, [`Priority`], filters and expiry rules
//! * [`Registration`] - one live entry created by one `subscribe` call
//! * [`Subscription`] - weak revocation handle for exactly one registration
//! * [`EventBus`] - the registry and dispatch loop
//!
//! # Example
//!
//! ```
//! use the_switchyard::events::{
//!     Cancellable, Event, EventBus, EventHierarchy, EventType, Priority, Subscriber,
//! };
//!
//! const PLAYER: EventType = EventType::new("player");
//! const CHAT: EventType = EventType::new("player.chat");
//!
//! struct Chat {
//!     message: String,
//!     cancelled: bool,
//! }
//!
//! impl Cancellable for Chat {
//!     fn is_cancelled(&self) -> bool {
//!         self.cancelled
//!     }
//!     fn set_cancelled(&mut self, cancelled: bool) {
//!         self.cancelled = cancelled;
//!     }
//! }
//!
//! impl Event for Chat {
//!     fn event_type(&self) -> EventType {
//!         CHAT
//!     }
//!     fn as_cancellable(&self) -> Option<&dyn Cancellable> {
//!         Some(self)
//!     }
//!     fn as_cancellable_mut(&mut self) -> Option<&mut dyn Cancellable> {
//!         Some(self)
//!     }
//! }
//!
//! let hierarchy = EventHierarchy::builder()
//!     .root(PLAYER)
//!     .declare(CHAT, [PLAYER])
//!     .build()?;
//! let bus = EventBus::new(hierarchy);
//!
//! // Runs first and cancels anything containing a banned word.
//! bus.subscribe(
//!     Subscriber::builder()
//!         .name("moderation")
//!         .event_type(CHAT)
//!         .priority(Priority::Highest)
//!         .handler(|event: &mut dyn Event| {
//!             let banned = event
//!                 .downcast_ref::<Chat>()
//!                 .is_some_and(|chat| chat.message.contains("spam"));
//!             if banned {
//!                 event.cancel();
//!             }
//!             Ok(())
//!         })
//!         .build()?,
//! )?;
//!
//! // Registered for the parent type; skipped for cancelled events.
//! bus.subscribe(
//!     Subscriber::builder()
//!         .name("broadcast")
//!         .event_type(PLAYER)
//!         .handler(|_: &mut dyn Event| Ok(()))
//!         .build()?,
//! )?;
//!
//! let outcome = bus.dispatch(&mut Chat { message: "buy spam".into(), cancelled: false });
//! assert_eq!(outcome.invoked, 1);
//! assert_eq!(outcome.skipped, 1);
//! # Ok::<(), the_switchyard::errors::ConfigurationError>(())
//! ```

mod bus;
mod event;
mod hierarchy;
mod priority;
mod subscriber;
mod subscription;

pub use bus::{DispatchOutcome, EventBus};
pub use event::{AsAny, Cancellable, Event, EventType};
pub use hierarchy::{EventHierarchy, EventHierarchyBuilder};
pub use priority::Priority;
pub use subscriber::{Registration, Subscriber, SubscriberBuilder};
pub use subscription::Subscription;

#[cfg(test)]
pub(crate) mod test_events;
