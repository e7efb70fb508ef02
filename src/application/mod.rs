//! Application layer - The event channel and the read models it feeds.
//!
//! [`EventChannel`] coordinates the ports: it drives a [`Transport`] through
//! the reconnection state machine and fans decoded events out to
//! [`EventHandler`]s.
//!
//! [`Transport`]: crate::ports::Transport
//! [`EventHandler`]: crate::ports::EventHandler

mod event_channel;
mod read_models;
mod registry;

pub use event_channel::{ChannelError, EventChannel};
pub use read_models::{LocationTracker, NotificationInbox, DEFAULT_INBOX_CAPACITY};
