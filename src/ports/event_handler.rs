//! EventHandler port - Callback invoked for every matching inbound event.
//!
//! Handlers run synchronously on the channel's dispatch path, in the order
//! they were subscribed.

use std::sync::Arc;

use crate::domain::foundation::DomainError;

/// Handler for one event type.
///
/// Implementations should be:
/// - **Quick** - They run inline on the dispatch path; hand long work to a task
/// - **Isolated** - A failing handler never stops the others for the same event
///
/// Any `Fn(&E) -> Result<(), DomainError>` closure is a handler.
///
/// # Example
///
/// ```ignore
/// struct BadgeCounter { /* ... */ }
///
/// impl EventHandler<Notification> for BadgeCounter {
///     fn handle(&self, event: &Notification) -> Result<(), DomainError> {
///         self.increment();
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "BadgeCounter"
///     }
/// }
/// ```
pub trait EventHandler<E>: Send + Sync {
    /// Process one event.
    fn handle(&self, event: &E) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<E, F> EventHandler<E> for F
where
    F: Fn(&E) -> Result<(), DomainError> + Send + Sync,
{
    fn handle(&self, event: &E) -> Result<(), DomainError> {
        self(event)
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}

/// Wraps a closure as a shareable handler.
///
/// Keep the returned `Arc` to unsubscribe later; identity is the allocation.
pub fn handler<E, F>(f: F) -> Arc<dyn EventHandler<E>>
where
    E: 'static,
    F: Fn(&E) -> Result<(), DomainError> + Send + Sync + 'static,
{
    Arc::new(f)
}
