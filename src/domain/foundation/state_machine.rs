//! State machine trait for lifecycle enums.
//!
//! Gives lifecycle enums (the connection state in particular) one place to
//! declare their legal transitions and a checked way to perform them.

use super::{DomainError, ErrorCode};

/// Trait for enums that represent state machines.
///
/// Implementors declare legal edges with [`can_transition_to`] and get a
/// validated [`transition_to`] for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ConnectionState {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Idle, Connecting) | (Connecting, Open) /* ... */)
///     }
/// }
///
/// let next = state.transition_to(ConnectionState::Open)?;
/// ```
///
/// [`can_transition_to`]: StateMachine::can_transition_to
/// [`transition_to`]: StateMachine::transition_to
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }
}
