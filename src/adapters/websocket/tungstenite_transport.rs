//! WebSocket transport on top of `tokio-tungstenite`.
//!
//! `open` returns immediately. A background task performs the handshake,
//! then multiplexes socket reads and outbound frames until either side
//! closes:
//!
//! ```text
//!   TungsteniteConnection ──Outbound──► run_socket ──write──► server
//!   EventChannel pump ◄──TransportEvent── run_socket ◄──read── server
//! ```

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::Message;

use crate::ports::{Transport, TransportConnection, TransportError, TransportEvent, TransportLink};

/// Commands from the connection handle to the socket task.
#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

/// Real WebSocket client transport.
#[derive(Debug, Clone, Default)]
pub struct TungsteniteTransport;

impl TungsteniteTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for TungsteniteTransport {
    fn open(&self, url: &str) -> Result<TransportLink, TransportError> {
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(TransportError::InvalidUrl {
                url: url.to_string(),
                reason: "expected ws:// or wss://".to_string(),
            });
        }
        let request = url
            .into_client_request()
            .map_err(|e| TransportError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let (events_tx, events) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        runtime.spawn(run_socket(request, outbound_rx, events_tx));

        Ok(TransportLink {
            connection: Box::new(TungsteniteConnection {
                outbound: outbound_tx,
            }),
            events,
        })
    }
}

/// Outbound handle; frames are written by the socket task in send order.
struct TungsteniteConnection {
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl TransportConnection for TungsteniteConnection {
    fn send(&self, text: String) -> Result<(), TransportError> {
        self.outbound
            .send(Outbound::Text(text))
            .map_err(|_| TransportError::Closed)
    }

    fn close(&self) {
        // Socket task may already be gone.
        let _ = self.outbound.send(Outbound::Close);
    }
}

async fn run_socket(
    request: Request,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    let url = request.uri().to_string();
    let emit = |event: TransportEvent| {
        let _ = events.send(event);
    };

    let stream = match tokio_tungstenite::connect_async(request).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "WebSocket handshake failed");
            emit(TransportEvent::Error(e.to_string()));
            emit(TransportEvent::Closed {
                reason: Some(e.to_string()),
            });
            return;
        }
    };
    tracing::debug!(url = %url, "WebSocket handshake complete");
    emit(TransportEvent::Opened);

    let (mut write, mut read) = stream.split();

    let reason = loop {
        tokio::select! {
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => emit(TransportEvent::Message(text)),
                Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
                    Ok(text) => emit(TransportEvent::Message(text)),
                    Err(_) => tracing::warn!(url = %url, "dropping non-UTF-8 binary frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(url = %url, "server sent Close frame");
                    break frame.map(|f| f.reason.into_owned());
                }
                // tungstenite queues the pong for pings itself.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    emit(TransportEvent::Error(e.to_string()));
                    break Some(e.to_string());
                }
                None => break None,
            },
            command = outbound.recv() => match command {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        emit(TransportEvent::Error(e.to_string()));
                        break Some(e.to_string());
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = write.send(Message::Close(None)).await;
                    tracing::debug!(url = %url, "WebSocket closed by client");
                    return;
                }
            },
        }
    };

    emit(TransportEvent::Closed { reason });
}
