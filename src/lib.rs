//! Marketplace Realtime - Event channel for the delivery marketplace
//!
//! This crate multiplexes order-status changes, admin notifications and live
//! rider locations over one reconnecting WebSocket, with exponential backoff
//! and per-event-type handler fan-out.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
