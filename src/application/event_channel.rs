//! EventChannel - one reconnecting transport, typed fan-out to subscribers.
//!
//! The channel owns a single connection to the real-time endpoint, routes
//! every inbound frame to the handlers registered for its tag, sends
//! outbound frames while open, and reconnects on its own after a failure.
//!
//! # Lifecycle
//!
//! ```text
//! connect() ──► Connecting ──Opened──► Open
//!                   │                   │
//!      construction │ failure    Closed │ (or Error + no close within grace)
//!                   ▼                   ▼
//!                 Closed ◄──────────────┘
//!                   │
//!      attempts < 5 ├──► Reconnecting{attempt, delay} ──timer──► Connecting
//!      attempts = 5 └──► Failed (until connect() is called again)
//! ```
//!
//! A successful open resets the backoff to 1s. `disconnect()` cancels every
//! background task, closes the transport, clears all subscriptions and
//! returns the channel to `Idle`.
//!
//! # Ordering
//!
//! Handlers for one tag run synchronously in subscription order. Outbound
//! frames go out in call order while open. Nothing is queued while closed:
//! `send` fails fast with [`ChannelError::NotConnected`].

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::RealtimeConfig;
use crate::domain::foundation::{ConnectionId, DomainError, ErrorCode, StateMachine};
use crate::domain::realtime::{
    Backoff, ChannelEvent, ConnectionState, ConnectionStateChanged, Frame, RealtimeEvent,
};
use crate::ports::{EventHandler, Transport, TransportConnection, TransportError, TransportEvent};

use super::registry::{Payload, Registration, SubscriptionRegistry};

/// Errors reported by [`EventChannel::send`] and friends.
///
/// None of these are fatal; the channel keeps running.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel is not open; dropped outbound '{event_type}' event")]
    NotConnected { event_type: String },

    #[error("Event type '{0}' is reserved for local notifications")]
    ReservedType(String),

    #[error("Failed to serialize '{event_type}' event: {source}")]
    Serialization {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed inbound frame: {0}")]
    MalformedFrame(#[source] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Connection bookkeeping guarded by one lock.
struct Link {
    state: ConnectionState,
    /// Bumped on every transport attempt and every teardown. Background
    /// tasks carry the value they were started with and give up on mismatch.
    generation: u64,
    connection: Option<Box<dyn TransportConnection>>,
    connection_id: Option<ConnectionId>,
    backoff: Backoff,
    pending_reconnect: Option<JoinHandle<()>>,
    pump: Option<JoinHandle<()>>,
    error_watchdog: Option<JoinHandle<()>>,
}

impl Link {
    fn new() -> Self {
        Self {
            state: ConnectionState::Idle,
            generation: 0,
            connection: None,
            connection_id: None,
            backoff: Backoff::default(),
            pending_reconnect: None,
            pump: None,
            error_watchdog: None,
        }
    }

    fn cancel_tasks(&mut self) {
        for task in [
            self.pending_reconnect.take(),
            self.pump.take(),
            self.error_watchdog.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }
}

struct Inner {
    config: RealtimeConfig,
    transport: Arc<dyn Transport>,
    registry: Mutex<SubscriptionRegistry>,
    link: Mutex<Link>,
    state_tx: watch::Sender<ConnectionState>,
}

/// Publish/subscribe client for the marketplace real-time endpoint.
///
/// Cloning is cheap and every clone drives the same connection; build one in
/// the composition root and hand clones to collaborators.
///
/// `connect` spawns background tasks and must be called inside a Tokio
/// runtime. All other methods are plain synchronous calls.
///
/// # Example
///
/// ```ignore
/// let channel = EventChannel::new(config.realtime, Arc::new(TungsteniteTransport::new()));
///
/// let on_update = handler(|update: &OrderUpdate| {
///     println!("{} is now {}", update.order_id, update.status);
///     Ok(())
/// });
/// channel.subscribe(on_update.clone());
/// channel.connect();
///
/// channel.send(&location)?;          // Err(NotConnected) while offline
/// channel.unsubscribe(&on_update);
/// channel.disconnect();
/// ```
#[derive(Clone)]
pub struct EventChannel {
    inner: Arc<Inner>,
}

impl EventChannel {
    /// Creates an idle channel. Nothing happens until [`connect`](Self::connect).
    pub fn new(config: RealtimeConfig, transport: Arc<dyn Transport>) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Idle);
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                registry: Mutex::new(SubscriptionRegistry::default()),
                link: Mutex::new(Link::new()),
                state_tx,
            }),
        }
    }

    /// Starts connecting to the configured endpoint.
    ///
    /// Ignored while an attempt is already connecting or open. Cancels a
    /// pending retry timer and connects immediately when reconnecting. Leaves
    /// `Failed` for a fresh attempt. Transport failures are never returned;
    /// they feed the reconnection path.
    pub fn connect(&self) {
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::error!("EventChannel::connect called outside a Tokio runtime; ignoring");
            return;
        }

        let mut changes = Vec::new();
        {
            let mut link = self.inner.link.lock();
            if link.state.is_active() {
                tracing::debug!(state = %link.state, "connect ignored: attempt already live");
                return;
            }
            if let Some(timer) = link.pending_reconnect.take() {
                timer.abort();
            }
            if link.state == ConnectionState::Failed {
                link.backoff.reset();
            }
            self.inner.open_transport(&mut link, &mut changes);
        }
        self.inner.publish_changes(changes);
    }

    /// Registers `handler` for every later event of type `E`.
    ///
    /// The same handler may be registered more than once and then runs once
    /// per registration.
    pub fn subscribe<E: ChannelEvent>(&self, handler: Arc<dyn EventHandler<E>>) {
        self.inner.registry.lock().add(handler);
        tracing::trace!(event_type = E::TYPE, "handler subscribed");
    }

    /// Removes one registration of exactly this handler allocation.
    ///
    /// No-op if it was never registered.
    pub fn unsubscribe<E: ChannelEvent>(&self, handler: &Arc<dyn EventHandler<E>>) {
        if !self.inner.registry.lock().remove(handler) {
            tracing::trace!(event_type = E::TYPE, "unsubscribe ignored: handler not registered");
        }
    }

    /// Sends a typed event if the channel is open.
    ///
    /// While not open the event is dropped, logged, and
    /// [`ChannelError::NotConnected`] is returned.
    pub fn send<E: ChannelEvent>(&self, event: &E) -> Result<(), ChannelError> {
        let frame = Frame::from_event(event).map_err(|source| ChannelError::Serialization {
            event_type: E::TYPE.to_string(),
            source,
        })?;
        self.send_frame(&frame)
    }

    /// Sends one of the known marketplace events.
    pub fn send_event(&self, event: &RealtimeEvent) -> Result<(), ChannelError> {
        let frame = serde_json::to_value(event)
            .and_then(serde_json::from_value::<Frame>)
            .map_err(|source| ChannelError::Serialization {
                event_type: event.event_type().to_string(),
                source,
            })?;
        self.send_frame(&frame)
    }

    /// Sends a raw envelope, for tags without a Rust type.
    pub fn send_frame(&self, frame: &Frame) -> Result<(), ChannelError> {
        if frame.event_type == ConnectionStateChanged::TYPE {
            return Err(ChannelError::ReservedType(frame.event_type.clone()));
        }

        let link = self.inner.link.lock();
        let connection = match (&link.state, &link.connection) {
            (ConnectionState::Open, Some(connection)) => connection,
            _ => {
                tracing::error!(
                    event_type = %frame.event_type,
                    state = %link.state,
                    "dropping outbound event: channel is not open"
                );
                return Err(ChannelError::NotConnected {
                    event_type: frame.event_type.clone(),
                });
            }
        };

        let text = frame.to_json().map_err(|source| ChannelError::Serialization {
            event_type: frame.event_type.clone(),
            source,
        })?;
        connection.send(text).map_err(|err| {
            tracing::error!(
                event_type = %frame.event_type,
                connection_id = ?link.connection_id,
                error = %err,
                "transport rejected outbound event"
            );
            ChannelError::from(err)
        })
    }

    /// Tears the channel down.
    ///
    /// Closes the transport, cancels any pending retry so it cannot revive
    /// the connection, clears every subscription and returns to `Idle`.
    /// Handlers registered afterwards apply to the next `connect()`.
    pub fn disconnect(&self) {
        let mut changes = Vec::new();
        {
            let mut link = self.inner.link.lock();
            link.generation += 1;
            link.cancel_tasks();
            if let Some(connection) = link.connection.take() {
                connection.close();
            }
            if let Some(connection_id) = link.connection_id.take() {
                tracing::info!(%connection_id, "event channel disconnected");
            }
            link.backoff.reset();
            if link.state != ConnectionState::Idle {
                self.inner
                    .transition(&mut link, ConnectionState::Idle, &mut changes);
            }
        }
        self.inner.registry.lock().clear();
        self.inner.publish_changes(changes);
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.inner.link.lock().state
    }

    /// Receiver that observes every state change, including after `disconnect`.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    /// Number of registrations for `event_type`.
    pub fn subscriber_count(&self, event_type: &str) -> usize {
        self.inner.registry.lock().count(event_type)
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let link = self.inner.link.lock();
        f.debug_struct("EventChannel")
            .field("url", &self.inner.config.url)
            .field("state", &link.state)
            .field("attempt", &link.backoff.attempt())
            .finish_non_exhaustive()
    }
}

impl Inner {
    /// Opens a new transport attempt. Caller holds the link lock.
    fn open_transport(
        self: &Arc<Self>,
        link: &mut Link,
        changes: &mut Vec<ConnectionStateChanged>,
    ) {
        link.generation += 1;
        let generation = link.generation;
        let connection_id = ConnectionId::new();

        if !self.transition(link, ConnectionState::Connecting, changes) {
            return;
        }
        tracing::info!(
            %connection_id,
            url = %self.config.url,
            attempt = link.backoff.attempt(),
            "connecting event channel"
        );

        match self.transport.open(&self.config.url) {
            Ok(opened) => {
                link.connection = Some(opened.connection);
                link.connection_id = Some(connection_id);
                link.pump = Some(tokio::spawn(pump(
                    Arc::downgrade(self),
                    generation,
                    opened.events,
                )));
            }
            Err(err) => {
                tracing::warn!(%connection_id, error = %err, "transport construction failed");
                self.handle_closed(link, changes);
            }
        }
    }

    /// Handles one transport event. Returns false once the pump should stop.
    fn on_transport_event(self: &Arc<Self>, generation: u64, event: TransportEvent) -> bool {
        match event {
            TransportEvent::Message(text) => {
                if self.link.lock().generation != generation {
                    return false;
                }
                self.dispatch_text(&text);
                true
            }
            TransportEvent::Opened => {
                let mut changes = Vec::new();
                {
                    let mut link = self.link.lock();
                    if link.generation != generation {
                        return false;
                    }
                    if self.transition(&mut link, ConnectionState::Open, &mut changes) {
                        link.backoff.reset();
                        if let Some(watchdog) = link.error_watchdog.take() {
                            watchdog.abort();
                        }
                        tracing::info!(connection_id = ?link.connection_id, "event channel open");
                    }
                }
                self.publish_changes(changes);
                true
            }
            TransportEvent::Error(message) => {
                let mut link = self.link.lock();
                if link.generation != generation {
                    return false;
                }
                tracing::warn!(
                    connection_id = ?link.connection_id,
                    error = %message,
                    "transport error"
                );
                if link.error_watchdog.is_none() {
                    let grace = self.config.error_close_grace();
                    let channel = Arc::downgrade(self);
                    link.error_watchdog = Some(tokio::spawn(async move {
                        tokio::time::sleep(grace).await;
                        if let Some(inner) = channel.upgrade() {
                            inner.on_error_unanswered(generation);
                        }
                    }));
                }
                true
            }
            TransportEvent::Closed { reason } => {
                let mut changes = Vec::new();
                {
                    let mut link = self.link.lock();
                    if link.generation != generation {
                        return false;
                    }
                    tracing::info!(
                        connection_id = ?link.connection_id,
                        reason = reason.as_deref().unwrap_or(""),
                        "transport closed"
                    );
                    // The pump calling us is the task behind this handle.
                    drop(link.pump.take());
                    self.drop_connection(&mut link);
                    self.handle_closed(&mut link, &mut changes);
                }
                self.publish_changes(changes);
                false
            }
        }
    }

    /// An error was not followed by a close within the grace period.
    fn on_error_unanswered(self: &Arc<Self>, generation: u64) {
        let mut changes = Vec::new();
        {
            let mut link = self.link.lock();
            if link.generation != generation || !link.state.is_active() {
                return;
            }
            tracing::warn!(
                connection_id = ?link.connection_id,
                grace_ms = self.config.error_close_grace_ms,
                "no close followed transport error; treating connection as closed"
            );
            link.error_watchdog = None;
            if let Some(pump) = link.pump.take() {
                pump.abort();
            }
            // Late events from the abandoned transport must not count.
            link.generation += 1;
            self.drop_connection(&mut link);
            self.handle_closed(&mut link, &mut changes);
        }
        self.publish_changes(changes);
    }

    /// Releases the transport handle and the watchdog of a finished attempt.
    fn drop_connection(&self, link: &mut Link) {
        if let Some(watchdog) = link.error_watchdog.take() {
            watchdog.abort();
        }
        if let Some(connection) = link.connection.take() {
            connection.close();
        }
        link.connection_id = None;
    }

    /// Moves to `Closed` and runs the reconnection check.
    fn handle_closed(self: &Arc<Self>, link: &mut Link, changes: &mut Vec<ConnectionStateChanged>) {
        if !self.transition(link, ConnectionState::Closed, changes) {
            return;
        }

        let Some(delay) = link.backoff.next_delay() else {
            self.transition(link, ConnectionState::Failed, changes);
            tracing::error!(
                attempts = link.backoff.attempt(),
                url = %self.config.url,
                "reconnection attempts exhausted; waiting for an explicit connect"
            );
            return;
        };

        let attempt = link.backoff.attempt();
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.transition(link, ConnectionState::Reconnecting { attempt, delay_ms }, changes);
        tracing::warn!(attempt, delay_ms, "scheduling reconnection attempt");

        let generation = link.generation;
        let channel = Arc::downgrade(self);
        link.pending_reconnect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = channel.upgrade() {
                inner.fire_reconnect(generation);
            }
        }));
    }

    /// Retry timer elapsed.
    fn fire_reconnect(self: &Arc<Self>, generation: u64) {
        let mut changes = Vec::new();
        {
            let mut link = self.link.lock();
            let reconnecting = matches!(link.state, ConnectionState::Reconnecting { .. });
            if link.generation != generation || !reconnecting {
                tracing::debug!("stale reconnect timer ignored");
                return;
            }
            // This task owns the handle; dropping it just detaches.
            drop(link.pending_reconnect.take());
            self.open_transport(&mut link, &mut changes);
        }
        self.publish_changes(changes);
    }

    /// Applies a checked state transition and records it for publishing.
    fn transition(
        &self,
        link: &mut Link,
        next: ConnectionState,
        changes: &mut Vec<ConnectionStateChanged>,
    ) -> bool {
        match link.state.transition_to(next) {
            Ok(current) => {
                let previous = std::mem::replace(&mut link.state, current);
                self.state_tx.send_replace(current);
                tracing::debug!(from = %previous, to = %current, "connection state changed");
                changes.push(ConnectionStateChanged { previous, current });
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "refusing connection state transition");
                false
            }
        }
    }

    /// Delivers state changes to `connection_state` subscribers. No lock held.
    fn publish_changes(&self, changes: Vec<ConnectionStateChanged>) {
        for change in changes {
            self.dispatch(ConnectionStateChanged::TYPE, |registration| {
                registration.invoke(Payload::Local(&change as &(dyn Any + Send + Sync)))
            });
        }
    }

    fn dispatch_text(&self, text: &str) {
        let frame = match Frame::parse(text) {
            Ok(frame) => frame,
            Err(err) => {
                let err = ChannelError::MalformedFrame(err);
                tracing::warn!(error = %err, "dropping inbound frame");
                return;
            }
        };
        if frame.event_type == ConnectionStateChanged::TYPE {
            tracing::warn!(
                event_type = %frame.event_type,
                "dropping inbound frame with reserved event type"
            );
            return;
        }
        self.dispatch(&frame.event_type, |registration| {
            registration.invoke(Payload::Wire(&frame.data))
        });
    }

    /// Runs every handler for `event_type` in order, isolating failures.
    fn dispatch<F>(&self, event_type: &str, invoke: F)
    where
        F: Fn(&Registration) -> Result<(), DomainError>,
    {
        let registrations = self.registry.lock().snapshot(event_type);
        if registrations.is_empty() {
            tracing::trace!(event_type, "no subscribers for event");
            return;
        }

        for registration in &registrations {
            let Err(err) = invoke_isolated(|| invoke(registration)) else {
                continue;
            };
            if err.code == ErrorCode::HandlerPanicked {
                tracing::error!(
                    event_type,
                    handler = registration.name(),
                    error = %err,
                    "event handler panicked"
                );
            } else {
                tracing::warn!(
                    event_type,
                    handler = registration.name(),
                    error = %err,
                    "event handler failed"
                );
            }
        }
    }
}

/// Runs one handler, turning a panic into a `HandlerPanicked` error.
fn invoke_isolated<F>(invoke: F) -> Result<(), DomainError>
where
    F: FnOnce() -> Result<(), DomainError>,
{
    catch_unwind(AssertUnwindSafe(invoke)).unwrap_or_else(|panic| {
        Err(DomainError::new(
            ErrorCode::HandlerPanicked,
            panic_message(panic.as_ref()),
        ))
    })
}

/// Forwards transport events into the channel until the attempt ends.
async fn pump(
    channel: Weak<Inner>,
    generation: u64,
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
) {
    while let Some(event) = events.recv().await {
        let Some(inner) = channel.upgrade() else {
            return;
        };
        if !inner.on_transport_event(generation, event) {
            return;
        }
    }

    // Event stream ended without a close; that is a close.
    if let Some(inner) = channel.upgrade() {
        inner.on_transport_event(generation, TransportEvent::Closed { reason: None });
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTransport;
    use crate::domain::foundation::{OrderId, Timestamp};
    use crate::domain::realtime::{OrderStatus, OrderUpdate};

    fn channel() -> (EventChannel, InMemoryTransport) {
        let transport = InMemoryTransport::new();
        let channel = EventChannel::new(RealtimeConfig::default(), Arc::new(transport.clone()));
        (channel, transport)
    }

    fn order_update() -> OrderUpdate {
        OrderUpdate {
            order_id: OrderId::new("ORD-1").unwrap(),
            status: OrderStatus::Preparing,
            timestamp: Timestamp::now(),
        }
    }

    #[test]
    fn new_channel_is_idle() {
        let (channel, transport) = channel();
        assert_eq!(channel.state(), ConnectionState::Idle);
        assert_eq!(transport.open_count(), 0);
    }

    #[test]
    fn connect_outside_runtime_is_ignored() {
        let (channel, transport) = channel();
        channel.connect();
        assert_eq!(channel.state(), ConnectionState::Idle);
        assert_eq!(transport.open_count(), 0);
    }

    #[test]
    fn send_while_idle_reports_not_connected() {
        let (channel, _) = channel();
        let err = channel.send(&order_update()).unwrap_err();
        assert!(matches!(
            err,
            ChannelError::NotConnected { ref event_type } if event_type == "order_update"
        ));
    }

    #[test]
    fn reserved_type_cannot_be_sent() {
        let (channel, _) = channel();
        let frame = Frame::new(ConnectionStateChanged::TYPE, serde_json::Value::Null);
        assert!(matches!(
            channel.send_frame(&frame),
            Err(ChannelError::ReservedType(_))
        ));
    }

    #[test]
    fn disconnect_while_idle_keeps_idle_and_clears_handlers() {
        let (channel, _) = channel();
        channel.subscribe(crate::ports::handler(|_: &OrderUpdate| Ok(())));
        assert_eq!(channel.subscriber_count("order_update"), 1);

        channel.disconnect();

        assert_eq!(channel.state(), ConnectionState::Idle);
        assert_eq!(channel.subscriber_count("order_update"), 0);
    }

    #[tokio::test]
    async fn connect_is_ignored_while_connecting() {
        let (channel, transport) = channel();
        channel.connect();
        channel.connect();

        assert_eq!(channel.state(), ConnectionState::Connecting);
        assert_eq!(transport.open_count(), 1);
    }

    #[tokio::test]
    async fn send_while_open_reaches_transport() {
        let (channel, transport) = channel();
        channel.connect();
        let session = transport.latest_session().unwrap();
        session.open();
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert_eq!(channel.state(), ConnectionState::Open);

        channel.send(&order_update()).unwrap();

        let sent = session.sent();
        assert_eq!(sent.len(), 1);
        let frame = Frame::parse(&sent[0]).unwrap();
        assert_eq!(frame.event_type, "order_update");
        assert_eq!(frame.data["status"], "preparing");
    }

    #[test]
    fn panic_message_reads_common_payloads() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }

    #[test]
    fn handler_panic_becomes_handler_panicked_error() {
        let err = invoke_isolated(|| panic!("bad coordinates")).unwrap_err();
        assert_eq!(err.code, ErrorCode::HandlerPanicked);
        assert_eq!(err.message, "bad coordinates");

        let err =
            invoke_isolated(|| Err(DomainError::handler_failed("store offline"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::HandlerFailed);
        assert!(invoke_isolated(|| Ok(())).is_ok());
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn send_while_not_open_is_logged_at_error_level() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();
        let (channel, _) = channel();

        let result =
            tracing::subscriber::with_default(subscriber, || channel.send(&order_update()));

        assert!(matches!(result, Err(ChannelError::NotConnected { .. })));
        let output = logs.contents();
        assert!(output.contains("ERROR"), "log output: {output}");
        assert!(output.contains("dropping outbound event: channel is not open"));
        assert!(output.contains("order_update"));
    }
}
