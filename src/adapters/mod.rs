//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the channel to the outside world:
//! - `websocket` - WebSocket client transport (`tokio-tungstenite`)
//! - `transport` - In-memory transport for tests and offline development

pub mod transport;
pub mod websocket;

pub use transport::{InMemorySession, InMemoryTransport};
pub use websocket::TungsteniteTransport;
