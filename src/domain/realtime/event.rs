//! Event types carried over the real-time channel.
//!
//! Each routing tag is a Rust type implementing [`ChannelEvent`]. Handlers
//! subscribe to the type, so they receive the decoded payload rather than a
//! loosely-typed JSON value. Adding a tag means adding a type; the channel
//! itself routes by [`ChannelEvent::TYPE`] and never needs to change.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntityId, NotificationId, OrderId, Timestamp, ValidationError};

/// A payload type that can travel over the channel under a routing tag.
pub trait ChannelEvent: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Wire routing tag (the `type` field of the envelope).
    const TYPE: &'static str;
}

// ============================================
// Notification
// ============================================

/// Admin/store notification shown in the dashboard bell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub notification_type: NotificationKind,
    pub message: String,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
}

impl ChannelEvent for Notification {
    const TYPE: &'static str = "notification";
}

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewOrder,
    StatusUpdate,
    Alert,
}

// ============================================
// Order update
// ============================================

/// Status change of a customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub timestamp: Timestamp,
}

impl ChannelEvent for OrderUpdate {
    const TYPE: &'static str = "order_update";
}

/// Lifecycle status of an order.
///
/// Statuses this client does not know decode to [`OrderStatus::Other`] so a
/// server rollout never breaks dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
    #[serde(other)]
    Other,
}

impl OrderStatus {
    /// Returns true once the order can no longer change.
    pub fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other => "other",
        };
        write!(f, "{}", s)
    }
}

// ============================================
// Location update
// ============================================

/// Live position ping of a rider or driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub entity_id: EntityId,
    pub lat: f64,
    pub lng: f64,
    pub timestamp: Timestamp,
}

impl ChannelEvent for LocationUpdate {
    const TYPE: &'static str = "location_update";
}

impl LocationUpdate {
    /// Checks that the coordinates are on the globe.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(ValidationError::out_of_range("lat", -90.0, 90.0, self.lat));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(ValidationError::out_of_range("lng", -180.0, 180.0, self.lng));
        }
        Ok(())
    }
}

// ============================================
// Closed set
// ============================================

/// Every event type the marketplace server currently emits.
///
/// The serde representation is the wire envelope itself:
/// `{"type": "order_update", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RealtimeEvent {
    Notification(Notification),
    OrderUpdate(OrderUpdate),
    LocationUpdate(LocationUpdate),
}

impl RealtimeEvent {
    /// Routing tag of this event.
    pub fn event_type(&self) -> &'static str {
        match self {
            RealtimeEvent::Notification(_) => Notification::TYPE,
            RealtimeEvent::OrderUpdate(_) => OrderUpdate::TYPE,
            RealtimeEvent::LocationUpdate(_) => LocationUpdate::TYPE,
        }
    }
}

impl From<Notification> for RealtimeEvent {
    fn from(value: Notification) -> Self {
        RealtimeEvent::Notification(value)
    }
}

impl From<OrderUpdate> for RealtimeEvent {
    fn from(value: OrderUpdate) -> Self {
        RealtimeEvent::OrderUpdate(value)
    }
}

impl From<LocationUpdate> for RealtimeEvent {
    fn from(value: LocationUpdate) -> Self {
        RealtimeEvent::LocationUpdate(value)
    }
}
