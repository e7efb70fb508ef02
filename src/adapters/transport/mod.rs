//! Transport adapters that do not touch the network.

mod in_memory;

pub use in_memory::{InMemorySession, InMemoryTransport};
