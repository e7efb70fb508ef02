//! In-memory read models fed by the event channel.
//!
//! Both models are plain [`EventHandler`]s. `attach` subscribes them and
//! returns the registered handle so callers can detach again; a channel
//! `disconnect()` drops them like any other subscriber.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::foundation::{DomainError, EntityId, NotificationId};
use crate::domain::realtime::{LocationUpdate, Notification};
use crate::ports::EventHandler;

use super::EventChannel;

/// Number of notifications an inbox keeps unless configured otherwise.
pub const DEFAULT_INBOX_CAPACITY: usize = 50;

// ============================================
// Rider / vehicle positions
// ============================================

/// Latest known position of every tracked entity.
///
/// Updates carrying an older timestamp than the stored one are ignored, so
/// out-of-order delivery never moves a marker backwards.
#[derive(Clone, Default)]
pub struct LocationTracker {
    positions: Arc<Mutex<HashMap<EntityId, LocationUpdate>>>,
}

impl LocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes this tracker to `location_update` events.
    pub fn attach(&self, channel: &EventChannel) -> Arc<dyn EventHandler<LocationUpdate>> {
        let handler: Arc<dyn EventHandler<LocationUpdate>> = Arc::new(self.clone());
        channel.subscribe(handler.clone());
        handler
    }

    /// Records an update.
    ///
    /// # Errors
    ///
    /// Returns a validation error for coordinates outside WGS84 bounds.
    pub fn apply(&self, update: &LocationUpdate) -> Result<(), DomainError> {
        update.validate()?;

        let mut positions = self.positions.lock();
        match positions.get(&update.entity_id) {
            Some(current) if current.timestamp.is_after(&update.timestamp) => {
                tracing::trace!(entity_id = %update.entity_id, "ignoring stale location update");
            }
            _ => {
                positions.insert(update.entity_id.clone(), update.clone());
            }
        }
        Ok(())
    }

    /// Latest position of `entity_id`.
    pub fn position(&self, entity_id: &EntityId) -> Option<LocationUpdate> {
        self.positions.lock().get(entity_id).cloned()
    }

    /// Number of entities with a known position.
    pub fn tracked(&self) -> usize {
        self.positions.lock().len()
    }
}

impl EventHandler<LocationUpdate> for LocationTracker {
    fn handle(&self, event: &LocationUpdate) -> Result<(), DomainError> {
        self.apply(event)
    }

    fn name(&self) -> &'static str {
        "LocationTracker"
    }
}

// ============================================
// Notification inbox
// ============================================

struct InboxEntry {
    notification: Notification,
    read: bool,
}

/// Bounded, newest-first list of notifications with read tracking.
#[derive(Clone)]
pub struct NotificationInbox {
    capacity: usize,
    entries: Arc<Mutex<VecDeque<InboxEntry>>>,
}

impl NotificationInbox {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INBOX_CAPACITY)
    }

    /// Inbox that keeps at most `capacity` notifications (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    /// Subscribes this inbox to `notification` events.
    pub fn attach(&self, channel: &EventChannel) -> Arc<dyn EventHandler<Notification>> {
        let handler: Arc<dyn EventHandler<Notification>> = Arc::new(self.clone());
        channel.subscribe(handler.clone());
        handler
    }

    /// Adds a notification as unread. Redelivered ids are ignored.
    pub fn push(&self, notification: &Notification) {
        let mut entries = self.entries.lock();
        if entries
            .iter()
            .any(|entry| entry.notification.id == notification.id)
        {
            return;
        }
        entries.push_front(InboxEntry {
            notification: notification.clone(),
            read: false,
        });
        entries.truncate(self.capacity);
    }

    /// Notifications, newest first.
    pub fn recent(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.lock().iter().filter(|entry| !entry.read).count()
    }

    /// Marks one notification read. Returns false if it is not in the inbox.
    pub fn mark_read(&self, id: &NotificationId) -> bool {
        let mut entries = self.entries.lock();
        match entries
            .iter_mut()
            .find(|entry| entry.notification.id == *id)
        {
            Some(entry) => {
                entry.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&self) {
        for entry in self.entries.lock().iter_mut() {
            entry.read = true;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for NotificationInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler<Notification> for NotificationInbox {
    fn handle(&self, event: &Notification) -> Result<(), DomainError> {
        self.push(event);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NotificationInbox"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTransport;
    use crate::config::RealtimeConfig;
    use crate::domain::foundation::{ErrorCode, Timestamp};
    use crate::domain::realtime::{ChannelEvent, NotificationKind};

    fn location(entity: &str, lat: f64, lng: f64, millis: i64) -> LocationUpdate {
        LocationUpdate {
            entity_id: EntityId::new(entity).unwrap(),
            lat,
            lng,
            timestamp: Timestamp::from_unix_millis(millis).unwrap(),
        }
    }

    fn notification(id: &str) -> Notification {
        Notification {
            id: NotificationId::new(id).unwrap(),
            notification_type: NotificationKind::NewOrder,
            message: format!("notification {id}"),
            timestamp: Timestamp::now(),
            order_id: None,
        }
    }

    #[test]
    fn tracker_keeps_latest_position_per_entity() {
        let tracker = LocationTracker::new();
        tracker.apply(&location("rider-1", 40.0, -3.0, 1_000)).unwrap();
        tracker.apply(&location("rider-1", 40.1, -3.1, 2_000)).unwrap();
        tracker.apply(&location("rider-2", 41.0, -4.0, 1_500)).unwrap();

        let rider = EntityId::new("rider-1").unwrap();
        assert_eq!(tracker.position(&rider).unwrap().lat, 40.1);
        assert_eq!(tracker.tracked(), 2);
    }

    #[test]
    fn tracker_ignores_out_of_order_updates() {
        let tracker = LocationTracker::new();
        tracker.apply(&location("rider-1", 40.1, -3.1, 2_000)).unwrap();
        tracker.apply(&location("rider-1", 40.0, -3.0, 1_000)).unwrap();

        let rider = EntityId::new("rider-1").unwrap();
        assert_eq!(tracker.position(&rider).unwrap().lat, 40.1);
    }

    #[test]
    fn tracker_rejects_invalid_coordinates() {
        let tracker = LocationTracker::new();
        let err = tracker
            .apply(&location("rider-1", 123.0, 0.0, 1_000))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(tracker.tracked(), 0);
    }

    #[test]
    fn inbox_is_newest_first_and_bounded() {
        let inbox = NotificationInbox::with_capacity(2);
        inbox.push(&notification("n-1"));
        inbox.push(&notification("n-2"));
        inbox.push(&notification("n-3"));

        let ids: Vec<_> = inbox
            .recent()
            .into_iter()
            .map(|n| n.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["n-3", "n-2"]);
    }

    #[test]
    fn inbox_ignores_redelivered_ids() {
        let inbox = NotificationInbox::new();
        inbox.push(&notification("n-1"));
        inbox.push(&notification("n-1"));

        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.unread_count(), 1);
    }

    #[test]
    fn inbox_read_tracking() {
        let inbox = NotificationInbox::new();
        inbox.push(&notification("n-1"));
        inbox.push(&notification("n-2"));

        assert!(inbox.mark_read(&NotificationId::new("n-1").unwrap()));
        assert!(!inbox.mark_read(&NotificationId::new("missing").unwrap()));
        assert_eq!(inbox.unread_count(), 1);

        inbox.mark_all_read();
        assert_eq!(inbox.unread_count(), 0);
    }

    #[test]
    fn attach_subscribes_and_returns_removable_handle() {
        let channel = EventChannel::new(
            RealtimeConfig::default(),
            Arc::new(InMemoryTransport::new()),
        );
        let tracker = LocationTracker::new();
        let inbox = NotificationInbox::new();

        let tracker_handle = tracker.attach(&channel);
        inbox.attach(&channel);
        assert_eq!(channel.subscriber_count(LocationUpdate::TYPE), 1);
        assert_eq!(channel.subscriber_count(Notification::TYPE), 1);

        channel.unsubscribe(&tracker_handle);
        assert_eq!(channel.subscriber_count(LocationUpdate::TYPE), 0);
    }
}
