//! Domain layer containing the real-time event vocabulary.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `realtime` - Event payloads, wire envelope, connection lifecycle and backoff

pub mod foundation;
pub mod realtime;
