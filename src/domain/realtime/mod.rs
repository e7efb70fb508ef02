//! Real-time event vocabulary: typed payloads, the wire envelope, the
//! connection lifecycle and its reconnection backoff.

mod backoff;
mod connection_state;
mod event;
mod frame;

pub use backoff::{Backoff, BASE_RECONNECT_DELAY, MAX_RECONNECT_ATTEMPTS};
pub use connection_state::{ConnectionState, ConnectionStateChanged};
pub use event::{
    ChannelEvent, LocationUpdate, Notification, NotificationKind, OrderStatus, OrderUpdate,
    RealtimeEvent,
};
pub use frame::Frame;
