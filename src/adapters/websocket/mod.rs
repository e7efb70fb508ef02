//! WebSocket adapter for the event channel.
//!
//! - [`TungsteniteTransport`] - client transport over `tokio-tungstenite`

mod tungstenite_transport;

pub use tungstenite_transport::TungsteniteTransport;
