//! Subscription registry: event tag → handlers in subscription order.
//!
//! Handlers are stored type-erased so one map can hold buckets for any
//! [`ChannelEvent`]. Each registration remembers the address of its handler
//! allocation, which is what `remove` matches on.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::realtime::ChannelEvent;
use crate::ports::EventHandler;

/// Payload handed to a registration.
pub(crate) enum Payload<'a> {
    /// Raw `data` of an inbound frame; decoded per handler.
    Wire(&'a Value),
    /// Already-typed event raised locally by the channel.
    Local(&'a (dyn Any + Send + Sync)),
}

type Invoke = dyn Fn(Payload<'_>) -> Result<(), DomainError> + Send + Sync;

/// One handler registered against one tag.
#[derive(Clone)]
pub(crate) struct Registration {
    handler_addr: usize,
    name: &'static str,
    invoke: Arc<Invoke>,
}

impl Registration {
    fn new<E: ChannelEvent>(handler: Arc<dyn EventHandler<E>>) -> Self {
        let handler_addr = handler_address(&handler);
        let name = handler.name();
        let invoke = move |payload: Payload<'_>| -> Result<(), DomainError> {
            match payload {
                Payload::Wire(data) => {
                    let event = <E as Deserialize<'_>>::deserialize(data).map_err(|err| {
                        DomainError::new(ErrorCode::PayloadMismatch, err.to_string())
                            .with_detail("event_type", E::TYPE)
                    })?;
                    handler.handle(&event)
                }
                Payload::Local(any) => match any.downcast_ref::<E>() {
                    Some(event) => handler.handle(event),
                    None => Err(DomainError::new(
                        ErrorCode::InternalError,
                        format!("local event is not a {}", std::any::type_name::<E>()),
                    )),
                },
            }
        };
        Self {
            handler_addr,
            name,
            invoke: Arc::new(invoke),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn invoke(&self, payload: Payload<'_>) -> Result<(), DomainError> {
        (self.invoke)(payload)
    }
}

/// Multiset of handlers per event tag.
#[derive(Default)]
pub(crate) struct SubscriptionRegistry {
    buckets: HashMap<&'static str, Vec<Registration>>,
}

impl SubscriptionRegistry {
    /// Appends a handler; the bucket is created on first use.
    pub(crate) fn add<E: ChannelEvent>(&mut self, handler: Arc<dyn EventHandler<E>>) {
        self.buckets
            .entry(E::TYPE)
            .or_default()
            .push(Registration::new(handler));
    }

    /// Removes the earliest registration of exactly this handler.
    ///
    /// Returns false if it was not registered.
    pub(crate) fn remove<E: ChannelEvent>(&mut self, handler: &Arc<dyn EventHandler<E>>) -> bool {
        let addr = handler_address(handler);
        let Some(bucket) = self.buckets.get_mut(E::TYPE) else {
            return false;
        };
        let Some(index) = bucket.iter().position(|r| r.handler_addr == addr) else {
            return false;
        };
        bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(E::TYPE);
        }
        true
    }

    /// Copy of the handlers for `event_type`, in subscription order.
    ///
    /// Dispatch works on the copy so handlers may subscribe or unsubscribe
    /// while an event is being delivered.
    pub(crate) fn snapshot(&self, event_type: &str) -> Vec<Registration> {
        self.buckets.get(event_type).cloned().unwrap_or_default()
    }

    pub(crate) fn count(&self, event_type: &str) -> usize {
        self.buckets.get(event_type).map_or(0, Vec::len)
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }
}

fn handler_address<E>(handler: &Arc<dyn EventHandler<E>>) -> usize {
    Arc::as_ptr(handler) as *const () as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::realtime::ConnectionStateChanged;
    use crate::domain::realtime::{ConnectionState, OrderUpdate};
    use crate::ports::handler;
    use parking_lot::Mutex;
    use serde_json::json;

    fn order_json() -> Value {
        json!({"orderId": "ORD-1", "status": "ready", "timestamp": "2025-03-01T12:00:00Z"})
    }

    #[test]
    fn snapshot_preserves_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SubscriptionRegistry::default();

        for label in ["first", "second", "third"] {
            let seen = seen.clone();
            registry.add(handler(move |_: &OrderUpdate| {
                seen.lock().push(label);
                Ok(())
            }));
        }

        let data = order_json();
        for registration in registry.snapshot(OrderUpdate::TYPE) {
            registration.invoke(Payload::Wire(&data)).unwrap();
        }

        assert_eq!(*seen.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn remove_matches_identity_and_removes_one() {
        let mut registry = SubscriptionRegistry::default();
        let h = handler(|_: &OrderUpdate| Ok(()));
        let other = handler(|_: &OrderUpdate| Ok(()));

        registry.add(h.clone());
        registry.add(h.clone());
        registry.add(other.clone());
        assert_eq!(registry.count(OrderUpdate::TYPE), 3);

        assert!(registry.remove(&h));
        assert_eq!(registry.count(OrderUpdate::TYPE), 2);
        assert!(registry.remove(&h));
        assert!(!registry.remove(&h));
        assert_eq!(registry.count(OrderUpdate::TYPE), 1);
    }

    #[test]
    fn remove_unknown_type_is_noop() {
        let mut registry = SubscriptionRegistry::default();
        let h = handler(|_: &OrderUpdate| Ok(()));
        assert!(!registry.remove(&h));
    }

    #[test]
    fn wire_payload_mismatch_is_reported() {
        let mut registry = SubscriptionRegistry::default();
        registry.add(handler(|_: &OrderUpdate| Ok(())));

        let bad = json!({"orderId": 7});
        let err = registry.snapshot(OrderUpdate::TYPE)[0]
            .invoke(Payload::Wire(&bad))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PayloadMismatch);
    }

    #[test]
    fn local_payload_is_passed_without_decoding() {
        let seen = Arc::new(Mutex::new(None));
        let mut registry = SubscriptionRegistry::default();
        let sink = seen.clone();
        registry.add(handler(move |change: &ConnectionStateChanged| {
            *sink.lock() = Some(change.current);
            Ok(())
        }));

        let change = ConnectionStateChanged {
            previous: ConnectionState::Idle,
            current: ConnectionState::Connecting,
        };
        registry.snapshot(ConnectionStateChanged::TYPE)[0]
            .invoke(Payload::Local(&change))
            .unwrap();

        assert_eq!(*seen.lock(), Some(ConnectionState::Connecting));
    }

    #[test]
    fn clear_empties_every_bucket() {
        let mut registry = SubscriptionRegistry::default();
        registry.add(handler(|_: &OrderUpdate| Ok(())));
        registry.add(handler(|_: &ConnectionStateChanged| Ok(())));

        registry.clear();

        assert_eq!(registry.count(OrderUpdate::TYPE), 0);
        assert_eq!(registry.count(ConnectionStateChanged::TYPE), 0);
    }
}
