// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Subscriber blueprints and the live registrations created from them.
//!
//! A [`Subscriber`] is immutable and reusable: every `subscribe` call turns it
//! into a fresh [`Registration`] with its own id, invocation counter and
//! liveness flag, so the same subscriber may be registered several times.

use std::fmt;
use std::num::NonZeroU32;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use crate::errors::{ConfigurationError, HandlerFailure};
use crate::events::{Event, EventType, Priority, Subscription};

pub(crate) type Handler =
    Arc<dyn Fn(&mut dyn Event, &Subscription) -> anyhow::Result<()> + Send + Sync>;
pub(crate) type Predicate = Arc<dyn Fn(&dyn Event) -> bool + Send + Sync>;

const ANONYMOUS: &str = "anonymous";

/// Handler plus its dispatch rules.
///
/// ```
/// use the_switchyard::events::{Event, EventType, Priority, Subscriber};
///
/// let subscriber = Subscriber::builder()
///     .name("audit")
///     .event_type(EventType::new("player.chat"))
///     .priority(Priority::High)
///     .filter(|event: &dyn Event| !event.is_cancelled())
///     .expire_after(3)
///     .handler(|_event: &mut dyn Event| Ok(()))
///     .build()
///     .unwrap();
///
/// assert_eq!(subscriber.name(), "audit");
/// assert_eq!(subscriber.priority(), Priority::High);
/// ```
#[derive(Clone)]
pub struct Subscriber {
    name: String,
    event_type: Option<EventType>,
    priority: Priority,
    accepts_cancelled: bool,
    handler: Handler,
    filters: Vec<Predicate>,
    expire_when: Option<Predicate>,
    expire_after: Option<NonZeroU32>,
}

impl Subscriber {
    pub fn builder() -> SubscriberBuilder {
        SubscriberBuilder::default()
    }

    /// Untyped subscriber with default rules; register it with
    /// [`EventBus::subscribe_to`](crate::events::EventBus::subscribe_to).
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(&mut dyn Event) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: ANONYMOUS.to_string(),
            event_type: None,
            priority: Priority::default(),
            accepts_cancelled: false,
            handler: wrap_handler(handler),
            filters: Vec::new(),
            expire_when: None,
            expire_after: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn event_type(&self) -> Option<&EventType> {
        self.event_type.as_ref()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn accepts_cancelled(&self) -> bool {
        self.accepts_cancelled
    }

    /// Invocation limit, if any.
    pub fn expire_after(&self) -> Option<u32> {
        self.expire_after.map(NonZeroU32::get)
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("name", &self.name)
            .field("event_type", &self.event_type)
            .field("priority", &self.priority)
            .field("accepts_cancelled", &self.accepts_cancelled)
            .field("filters", &self.filters.len())
            .field("expire_when", &self.expire_when.is_some())
            .field("expire_after", &self.expire_after)
            .finish()
    }
}

fn wrap_handler<F>(handler: F) -> Handler
where
    F: Fn(&mut dyn Event) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(move |event: &mut dyn Event, _: &Subscription| handler(event))
}

/// Builder for [`Subscriber`]. Only the handler is mandatory.
#[derive(Default)]
pub struct SubscriberBuilder {
    name: Option<String>,
    event_type: Option<EventType>,
    priority: Priority,
    accepts_cancelled: bool,
    handler: Option<Handler>,
    filters: Vec<Predicate>,
    expire_when: Option<Predicate>,
    expire_after: Option<NonZeroU32>,
}

impl SubscriberBuilder {
    /// Identity used in logs and handler errors.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn accepts_cancelled(mut self, accepts: bool) -> Self {
        self.accepts_cancelled = accepts;
        self
    }

    pub fn accept_cancelled(self) -> Self {
        self.accepts_cancelled(true)
    }

    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut dyn Event) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handler = Some(wrap_handler(handler));
        self
    }

    /// Handler that also receives the subscription of its own registration,
    /// e.g. to revoke itself.
    pub fn handler_with_subscription<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut dyn Event, &Subscription) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Adds a filter; all filters must pass for the handler to run.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&dyn Event) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Revoke instead of invoking once `predicate` matches an event that passed the filters.
    pub fn expire_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&dyn Event) -> bool + Send + Sync + 'static,
    {
        self.expire_when = Some(Arc::new(predicate));
        self
    }

    /// Revoke after `invocations` successful invocations; `0` means no limit.
    pub fn expire_after(mut self, invocations: u32) -> Self {
        self.expire_after = NonZeroU32::new(invocations);
        self
    }

    pub fn build(self) -> Result<Subscriber, ConfigurationError> {
        let name = self.name.unwrap_or_else(|| ANONYMOUS.to_string());
        let Some(handler) = self.handler else {
            return Err(ConfigurationError::MissingHandler { subscriber: name });
        };

        Ok(Subscriber {
            name,
            event_type: self.event_type,
            priority: self.priority,
            accepts_cancelled: self.accepts_cancelled,
            handler,
            filters: self.filters,
            expire_when: self.expire_when,
            expire_after: self.expire_after,
        })
    }
}

/// What happened when a registration was offered an event.
#[derive(Debug)]
pub(crate) enum Delivery {
    Filtered,
    Expired,
    Invoked,
    Failed(HandlerFailure),
}

/// One live entry in the bus registry.
///
/// `active -> expired` is the only transition; an expired registration is never
/// invoked again.
pub struct Registration {
    id: u64,
    event_type: EventType,
    subscriber: Subscriber,
    remaining: Option<AtomicU32>,
    live: AtomicBool,
    subscription: Subscription,
}

impl Registration {
    pub(crate) fn new(
        id: u64,
        event_type: EventType,
        subscriber: Subscriber,
        subscription: Subscription,
    ) -> Self {
        let remaining = subscriber
            .expire_after
            .map(|limit| AtomicU32::new(limit.get()));
        Self {
            id,
            event_type,
            subscriber,
            remaining,
            live: AtomicBool::new(true),
            subscription,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Type this registration was made for (not necessarily the dispatched type).
    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn name(&self) -> &str {
        &self.subscriber.name
    }

    pub fn priority(&self) -> Priority {
        self.subscriber.priority
    }

    pub fn accepts_cancelled(&self) -> bool {
        self.subscriber.accepts_cancelled
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Invocations left before automatic revocation, if limited.
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
            .as_ref()
            .map(|counter| counter.load(Ordering::Acquire))
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// `name#id`, used in logs and handler errors.
    pub fn identity(&self) -> String {
        format!("{}#{}", self.subscriber.name, self.id)
    }

    pub(crate) fn expire(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Applies filters and expiry rules, then runs the handler.
    ///
    /// Cancellation is checked by the caller. Errors and panics from filters,
    /// `expire_when` and the handler are all caught here; a failed delivery does
    /// not count toward `expire_after`.
    pub(crate) fn deliver(&self, event: &mut dyn Event) -> Delivery {
        panic::catch_unwind(AssertUnwindSafe(|| self.offer(&mut *event)))
            .unwrap_or_else(|payload| Delivery::Failed(HandlerFailure::from_panic(payload)))
    }

    fn offer(&self, event: &mut dyn Event) -> Delivery {
        if !self.subscriber.filters.iter().all(|filter| filter(&*event)) {
            return Delivery::Filtered;
        }

        if let Some(expire_when) = &self.subscriber.expire_when {
            if expire_when(&*event) {
                self.subscription.revoke();
                return Delivery::Expired;
            }
        }

        if let Err(error) = (self.subscriber.handler)(&mut *event, &self.subscription) {
            return Delivery::Failed(HandlerFailure::Returned(error));
        }

        if let Some(remaining) = &self.remaining {
            let previous =
                remaining.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
            if previous == Ok(1) {
                self.subscription.revoke();
            }
        }
        Delivery::Invoked
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .field("subscriber", &self.subscriber)
            .field("remaining", &self.remaining())
            .field("live", &self.is_live())
            .finish()
    }
}
