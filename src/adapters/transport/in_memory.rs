//! In-memory transport for tests and offline development.
//!
//! Every `open` creates an [`InMemorySession`] that the test drives by hand:
//! open the handshake, push inbound frames, raise errors, close from the
//! "server" side, and inspect what the channel sent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::ports::{Transport, TransportConnection, TransportError, TransportEvent, TransportLink};

/// Scriptable [`Transport`].
///
/// Clones share state, so a test keeps one clone and hands another to the
/// channel.
///
/// # Example
///
/// ```ignore
/// let transport = InMemoryTransport::new();
/// let channel = EventChannel::new(config, Arc::new(transport.clone()));
///
/// channel.connect();
/// let session = transport.latest_session().unwrap();
/// session.open();
/// session.deliver(r#"{"type":"order_update","data":{...}}"#);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    state: Arc<Mutex<TransportState>>,
}

#[derive(Default)]
struct TransportState {
    sessions: Vec<InMemorySession>,
    open_calls: usize,
    auto_open: bool,
    refuse_connections: bool,
    failing_opens: usize,
}

impl InMemoryTransport {
    /// Creates a transport whose sessions wait for [`InMemorySession::open`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport whose sessions complete the handshake at once.
    pub fn auto_open() -> Self {
        let transport = Self::default();
        transport.state.lock().auto_open = true;
        transport
    }

    /// While set, every new session closes before it opens.
    pub fn refuse_connections(&self, refuse: bool) {
        self.state.lock().refuse_connections = refuse;
    }

    /// Makes the next `count` calls to `open` fail synchronously.
    pub fn fail_next_opens(&self, count: usize) {
        self.state.lock().failing_opens = count;
    }

    // === Test Helpers ===

    /// Number of `open` calls, including failed ones.
    pub fn open_count(&self) -> usize {
        self.state.lock().open_calls
    }

    /// Every session created so far, oldest first.
    pub fn sessions(&self) -> Vec<InMemorySession> {
        self.state.lock().sessions.clone()
    }

    /// Session created by the `index`-th successful `open`.
    pub fn session(&self, index: usize) -> Option<InMemorySession> {
        self.state.lock().sessions.get(index).cloned()
    }

    /// Most recently created session.
    pub fn latest_session(&self) -> Option<InMemorySession> {
        self.state.lock().sessions.last().cloned()
    }
}

impl Transport for InMemoryTransport {
    fn open(&self, url: &str) -> Result<TransportLink, TransportError> {
        let mut state = self.state.lock();
        state.open_calls += 1;

        if state.failing_opens > 0 {
            state.failing_opens -= 1;
            return Err(TransportError::Connect("scripted open failure".to_string()));
        }
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(TransportError::InvalidUrl {
                url: url.to_string(),
                reason: "expected ws:// or wss://".to_string(),
            });
        }

        let (events_tx, events) = mpsc::unbounded_channel();
        let session = InMemorySession {
            shared: Arc::new(SessionShared {
                url: url.to_string(),
                events_tx,
                sent: Mutex::new(Vec::new()),
                closed_by_client: AtomicBool::new(false),
            }),
        };

        if state.refuse_connections {
            session.close_with("connection refused");
        } else if state.auto_open {
            session.open();
        }
        state.sessions.push(session.clone());

        Ok(TransportLink {
            connection: Box::new(InMemoryConnection {
                shared: session.shared.clone(),
            }),
            events,
        })
    }
}

struct SessionShared {
    url: String,
    events_tx: mpsc::UnboundedSender<TransportEvent>,
    sent: Mutex<Vec<String>>,
    closed_by_client: AtomicBool,
}

/// Server side of one in-memory connection.
#[derive(Clone)]
pub struct InMemorySession {
    shared: Arc<SessionShared>,
}

impl InMemorySession {
    /// URL the channel opened.
    pub fn url(&self) -> &str {
        &self.shared.url
    }

    /// Completes the handshake.
    pub fn open(&self) {
        self.emit(TransportEvent::Opened);
    }

    /// Pushes one inbound text frame.
    pub fn deliver(&self, text: impl Into<String>) {
        self.emit(TransportEvent::Message(text.into()));
    }

    /// Raises a transport error without closing.
    pub fn error(&self, message: impl Into<String>) {
        self.emit(TransportEvent::Error(message.into()));
    }

    /// Closes from the server side.
    pub fn close(&self) {
        self.emit(TransportEvent::Closed { reason: None });
    }

    /// Closes from the server side with a reason.
    pub fn close_with(&self, reason: impl Into<String>) {
        self.emit(TransportEvent::Closed {
            reason: Some(reason.into()),
        });
    }

    /// Frames the channel sent on this session, in order.
    pub fn sent(&self) -> Vec<String> {
        self.shared.sent.lock().clone()
    }

    /// True once the channel closed its end.
    pub fn is_closed_by_client(&self) -> bool {
        self.shared.closed_by_client.load(Ordering::SeqCst)
    }

    fn emit(&self, event: TransportEvent) {
        // The channel may have dropped its receiver already.
        let _ = self.shared.events_tx.send(event);
    }
}

struct InMemoryConnection {
    shared: Arc<SessionShared>,
}

impl TransportConnection for InMemoryConnection {
    fn send(&self, text: String) -> Result<(), TransportError> {
        if self.shared.closed_by_client.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        self.shared.sent.lock().push(text);
        Ok(())
    }

    fn close(&self) {
        self.shared.closed_by_client.store(true, Ordering::SeqCst);
    }
}
