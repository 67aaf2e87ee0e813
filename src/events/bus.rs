// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The event bus: registry, dispatch cache and dispatch loop.
//!
//! # Locking
//!
//! Two `parking_lot::RwLock`s guard the shared state:
//!
//! * `registry` - authoritative registrations, keyed by registered type then id
//! * `cache` - priority-sorted dispatch lists, keyed by concrete dispatched type
//!
//! They are always acquired registry first, then cache. Every registry mutation
//! clears the cache while still holding the registry write lock, and a cache
//! rebuild holds the registry read lock for its whole duration, so a rebuilt list
//! can never reflect a registry state older than the last invalidation.
//!
//! Dispatch clones an `Arc<[Arc<Registration>]>` snapshot and releases both locks
//! before running any handler. Handlers may therefore subscribe, revoke or
//! dispatch re-entrantly.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::errors::{ConfigurationError, HandlerError};
use crate::events::subscriber::Delivery;
use crate::events::{Event, EventHierarchy, EventType, Registration, Subscriber, Subscription};
use crate::observability::messages::bus::{
    DispatchCacheRebuilt, DispatchStarted, HandlerFailed, SubscriberRegistered,
    SubscribersRemoved, SubscriptionRevoked,
};
use crate::observability::messages::StructuredLog;

type DispatchList = Arc<[Arc<Registration>]>;

/// State shared by every clone of an [`EventBus`] and referenced weakly by
/// every [`Subscription`].
pub(crate) struct BusShared {
    hierarchy: EventHierarchy,
    registry: RwLock<HashMap<EventType, BTreeMap<u64, Arc<Registration>>>>,
    cache: RwLock<HashMap<EventType, DispatchList>>,
    next_id: AtomicU64,
}

impl BusShared {
    fn new(hierarchy: EventHierarchy) -> Self {
        Self {
            hierarchy,
            registry: RwLock::new(HashMap::new()),
            cache: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Removes one registration and invalidates the dispatch cache.
    pub(crate) fn remove(&self, event_type: &EventType, id: u64) -> bool {
        let removed = {
            let mut registry = self.registry.write();
            let Some(registrations) = registry.get_mut(event_type) else {
                return false;
            };
            let removed = registrations.remove(&id);
            if registrations.is_empty() {
                registry.remove(event_type);
            }
            if let Some(registration) = &removed {
                registration.expire();
                self.cache.write().clear();
            }
            removed
        };

        match removed {
            Some(registration) => {
                SubscriptionRevoked {
                    subscriber: registration.name(),
                    registration_id: id,
                    event_type,
                }
                .log();
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, event_type: &EventType, id: u64) -> bool {
        self.registry
            .read()
            .get(event_type)
            .is_some_and(|registrations| registrations.contains_key(&id))
    }

    /// Returns the sorted dispatch list for `concrete`, building it on a miss.
    ///
    /// Undeclared types cannot hold registrations and are never cached.
    fn dispatch_list(&self, concrete: &EventType) -> DispatchList {
        if !self.hierarchy.contains(concrete) {
            return Arc::from(Vec::new());
        }

        let cached = self.cache.read().get(concrete).cloned();
        if let Some(list) = cached {
            return list;
        }

        let registry = self.registry.read();
        let mut cache = self.cache.write();
        if let Some(list) = cache.get(concrete) {
            return Arc::clone(list);
        }

        let lineage = self.hierarchy.lineage(concrete);
        let mut matching: Vec<Arc<Registration>> = lineage
            .iter()
            .filter_map(|event_type| registry.get(event_type))
            .flat_map(|registrations| registrations.values().cloned())
            .collect();
        matching.sort_by_key(|registration| (registration.priority(), registration.id()));

        DispatchCacheRebuilt {
            event_type: concrete,
            lineage_length: lineage.len(),
            subscriber_count: matching.len(),
        }
        .log();

        let list: DispatchList = matching.into();
        cache.insert(concrete.clone(), Arc::clone(&list));
        list
    }
}

impl fmt::Debug for BusShared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusShared")
            .field("event_types", &self.hierarchy.len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Summary of one [`EventBus::dispatch`] call.
///
/// Handler failures are collected here rather than returned as `Err`; each one
/// has already been logged at `error` level.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Handlers that ran to completion.
    pub invoked: usize,
    /// Registrations passed over: revoked mid-dispatch, cancelled event,
    /// failed filter or expire-when match.
    pub skipped: usize,
    pub errors: Vec<HandlerError>,
}

impl DispatchOutcome {
    /// True when no handler failed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Polymorphic, priority-ordered event bus.
///
/// A subscriber registered for type `T` receives every dispatched event whose
/// concrete type is `T` or a descendant of `T` in the bus's [`EventHierarchy`].
/// Subscribers run sequentially on the dispatching thread, ordered by
/// [`Priority`](crate::events::Priority) and then by registration order.
///
/// Cloning is cheap; all clones share one registry.
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use the_switchyard::events::{Event, EventBus, EventHierarchy, EventType, Subscriber};
///
/// const ANY: EventType = EventType::new("any");
/// const PING: EventType = EventType::new("ping");
///
/// struct Ping;
/// impl Event for Ping {
///     fn event_type(&self) -> EventType {
///         PING
///     }
/// }
///
/// let hierarchy = EventHierarchy::builder()
///     .root(ANY)
///     .declare(PING, [ANY])
///     .build()
///     .unwrap();
/// let bus = EventBus::new(hierarchy);
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
/// bus.subscribe_to(ANY, Subscriber::from_fn(move |_: &mut dyn Event| {
///     counter.fetch_add(1, Ordering::SeqCst);
///     Ok(())
/// }))
/// .unwrap();
///
/// let outcome = bus.dispatch(&mut Ping);
/// assert_eq!(outcome.invoked, 1);
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    shared: Arc<BusShared>,
}

impl EventBus {
    pub fn new(hierarchy: EventHierarchy) -> Self {
        Self {
            shared: Arc::new(BusShared::new(hierarchy)),
        }
    }

    pub fn hierarchy(&self) -> &EventHierarchy {
        &self.shared.hierarchy
    }

    /// Registers `subscriber` for the event type set on its builder.
    pub fn subscribe(&self, subscriber: Subscriber) -> Result<Subscription, ConfigurationError> {
        let Some(event_type) = subscriber.event_type().cloned() else {
            return Err(ConfigurationError::MissingEventType {
                subscriber: subscriber.name().to_string(),
            });
        };
        self.subscribe_to(event_type, subscriber)
    }

    /// Registers `subscriber` for `event_type`, ignoring any type set on the
    /// subscriber itself. Each call creates an independent registration.
    pub fn subscribe_to(
        &self,
        event_type: EventType,
        subscriber: Subscriber,
    ) -> Result<Subscription, ConfigurationError> {
        if !self.shared.hierarchy.contains(&event_type) {
            return Err(ConfigurationError::UndeclaredEventType {
                event_type: event_type.to_string(),
            });
        }

        let registration = {
            let mut registry = self.shared.registry.write();
            let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
            let subscription =
                Subscription::new(Arc::downgrade(&self.shared), event_type.clone(), id);
            let registration = Arc::new(Registration::new(
                id,
                event_type.clone(),
                subscriber,
                subscription,
            ));
            registry
                .entry(event_type)
                .or_default()
                .insert(id, Arc::clone(&registration));
            self.shared.cache.write().clear();
            registration
        };

        SubscriberRegistered {
            subscriber: registration.name(),
            registration_id: registration.id(),
            event_type: registration.event_type(),
            priority: registration.priority(),
        }
        .log();

        Ok(registration.subscription().clone())
    }

    /// Delivers `event` to every matching registration.
    ///
    /// Handler errors and panics are caught, logged and collected in the
    /// returned [`DispatchOutcome`]; dispatch always visits the whole snapshot.
    pub fn dispatch(&self, event: &mut dyn Event) -> DispatchOutcome {
        let concrete = event.event_type();
        let targets = self.shared.dispatch_list(&concrete);
        let mut outcome = DispatchOutcome::default();
        if targets.is_empty() {
            return outcome;
        }

        let started = DispatchStarted {
            event_type: &concrete,
            subscriber_count: targets.len(),
        };
        let span = started.span("dispatch");
        let _guard = span.enter();
        started.log();

        for registration in targets.iter() {
            if !registration.is_live() {
                outcome.skipped += 1;
                continue;
            }
            if event.is_cancelled() && !registration.accepts_cancelled() {
                outcome.skipped += 1;
                continue;
            }

            match registration.deliver(event) {
                Delivery::Invoked => outcome.invoked += 1,
                Delivery::Filtered | Delivery::Expired => outcome.skipped += 1,
                Delivery::Failed(failure) => {
                    let error = HandlerError {
                        subscriber: registration.identity(),
                        event_type: concrete.to_string(),
                        failure,
                    };
                    HandlerFailed { error: &error }.log();
                    outcome.errors.push(error);
                }
            }
        }

        outcome
    }

    /// True if a dispatch of `event_type` would reach at least one registration.
    pub fn subscribed(&self, event_type: &EventType) -> bool {
        self.subscriber_count(event_type) > 0
    }

    /// Number of registrations a dispatch of `event_type` would visit.
    pub fn subscriber_count(&self, event_type: &EventType) -> usize {
        let registry = self.shared.registry.read();
        self.shared
            .hierarchy
            .lineage(event_type)
            .iter()
            .filter_map(|ancestor| registry.get(ancestor))
            .map(BTreeMap::len)
            .sum()
    }

    /// Revokes every registration matching `predicate` and returns how many
    /// were removed.
    ///
    /// The predicate runs under the registry write lock and must not call back
    /// into the bus.
    pub fn unsubscribe_if<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Registration) -> bool,
    {
        let removed: Vec<Arc<Registration>> = {
            let mut registry = self.shared.registry.write();
            let mut removed = Vec::new();
            for registrations in registry.values_mut() {
                registrations.retain(|_, registration| {
                    let matches = predicate(registration);
                    if matches {
                        registration.expire();
                        removed.push(Arc::clone(registration));
                    }
                    !matches
                });
            }
            if !removed.is_empty() {
                registry.retain(|_, registrations| !registrations.is_empty());
                self.shared.cache.write().clear();
            }
            removed
        };

        if !removed.is_empty() {
            SubscribersRemoved {
                removed: removed.len(),
            }
            .log();
        }
        removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_events::{hierarchy, TestEvent, CHILD, ROOT, TEST};

    fn noop() -> Subscriber {
        Subscriber::from_fn(|_: &mut dyn Event| Ok(()))
    }

    #[test]
    fn test_subscribe_without_type_fails() {
        let bus = EventBus::new(hierarchy());
        let err = bus.subscribe(noop()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingEventType {
                subscriber: "anonymous".to_string()
            }
        );
    }

    #[test]
    fn test_subscribe_undeclared_type_fails() {
        let bus = EventBus::new(hierarchy());
        let err = bus
            .subscribe_to(EventType::new("nowhere"), noop())
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::UndeclaredEventType { .. }
        ));
    }

    #[test]
    fn test_registration_ids_increase() {
        let bus = EventBus::new(hierarchy());
        let first = bus.subscribe_to(TEST, noop()).unwrap();
        let second = bus.subscribe_to(TEST, noop()).unwrap();
        assert!(first.id() < second.id());
    }

    #[test]
    fn test_dispatch_list_is_cached_until_mutation() {
        let bus = EventBus::new(hierarchy());
        bus.subscribe_to(ROOT, noop()).unwrap();

        let first = bus.shared.dispatch_list(&CHILD);
        let second = bus.shared.dispatch_list(&CHILD);
        assert!(Arc::ptr_eq(&first, &second));

        bus.subscribe_to(TEST, noop()).unwrap();
        let rebuilt = bus.shared.dispatch_list(&CHILD);
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(rebuilt.len(), 2);
    }

    #[test]
    fn test_undeclared_types_are_not_cached() {
        let bus = EventBus::new(hierarchy());
        bus.subscribe_to(ROOT, noop()).unwrap();

        for n in 0..10 {
            let outcome = bus.dispatch(&mut TestEvent::new(EventType::owned(format!("stray-{n}"))));
            assert_eq!(outcome.invoked, 0);
        }
        assert!(bus.shared.cache.read().is_empty());

        bus.dispatch(&mut TestEvent::new(CHILD));
        assert_eq!(bus.shared.cache.read().len(), 1);
    }

    #[test]
    fn test_remove_clears_empty_sets() {
        let bus = EventBus::new(hierarchy());
        let subscription = bus.subscribe_to(TEST, noop()).unwrap();

        assert!(bus.shared.remove(&TEST, subscription.id()));
        assert!(!bus.shared.remove(&TEST, subscription.id()));
        assert!(bus.shared.registry.read().get(&TEST).is_none());
    }

    #[test]
    fn test_dispatch_without_subscribers_is_empty() {
        let bus = EventBus::new(hierarchy());
        let outcome = bus.dispatch(&mut TestEvent::new(TEST));
        assert_eq!(outcome.invoked, 0);
        assert_eq!(outcome.skipped, 0);
        assert!(outcome.is_clean());
    }
}
