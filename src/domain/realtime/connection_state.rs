//! Connection lifecycle of the event channel.
//!
//! ```text
//! Idle --connect--> Connecting --open--> Open
//!                       |                  |
//!                       +------close-------+--> Closed
//! Closed --attempts left--> Reconnecting --timer--> Connecting
//! Closed --attempts exhausted--> Failed --connect--> Connecting
//! any --disconnect--> Idle
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ChannelEvent;
use crate::domain::foundation::StateMachine;

/// Where the channel is in its connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionState {
    /// Constructed or torn down; nothing happens until `connect()`.
    Idle,
    /// Transport attempt in flight.
    Connecting,
    /// Transport open; frames flow both ways.
    Open,
    /// Transport lost; the reconnection check runs immediately.
    Closed,
    /// Retry `attempt` is scheduled after `delay_ms`.
    #[serde(rename_all = "camelCase")]
    Reconnecting { attempt: u32, delay_ms: u64 },
    /// Retries exhausted. Only an explicit `connect()` leaves this state.
    Failed,
}

impl ConnectionState {
    /// Returns true while outbound frames can be sent.
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }

    /// Returns true while a transport attempt is live or about to start.
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Open)
    }

    /// Scheduled retry delay, if reconnecting.
    pub fn retry_delay(&self) -> Option<Duration> {
        match self {
            ConnectionState::Reconnecting { delay_ms, .. } => {
                Some(Duration::from_millis(*delay_ms))
            }
            _ => None,
        }
    }
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConnectionState::*;
        match (self, target) {
            (Idle, Idle) => false,
            (_, Idle) => true,
            (Idle | Reconnecting { .. } | Failed, Connecting) => true,
            (Connecting, Open) => true,
            (Connecting | Open, Closed) => true,
            (Closed, Reconnecting { .. } | Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "idle"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Open => write!(f, "open"),
            ConnectionState::Closed => write!(f, "closed"),
            ConnectionState::Reconnecting { attempt, delay_ms } => {
                write!(f, "reconnecting(attempt {}, in {}ms)", attempt, delay_ms)
            }
            ConnectionState::Failed => write!(f, "failed"),
        }
    }
}

/// Local notification published on every state transition.
///
/// Dispatched through the subscription registry under the reserved
/// `connection_state` tag so dashboards can render a "disconnected" banner.
/// It is never sent on the wire, and inbound frames using the tag are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStateChanged {
    pub previous: ConnectionState,
    pub current: ConnectionState,
}

impl ChannelEvent for ConnectionStateChanged {
    const TYPE: &'static str = "connection_state";
}
