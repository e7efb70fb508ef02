//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the channel and the outside world. Adapters implement these ports.
//!
//! - `Transport` / `TransportConnection` - The socket the channel runs over
//! - `EventHandler` - Callback registered against an event type

mod event_handler;
mod transport;

pub use event_handler::{handler, EventHandler};
pub use transport::{Transport, TransportConnection, TransportError, TransportEvent, TransportLink};
