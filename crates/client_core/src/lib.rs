use std::{
    fmt::Display,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{Context, Result};
use futures::{Sink, SinkExt, Stream, StreamExt};
use shared::{
    domain::ModeId,
    protocol::{ClientRequest, ServerEvent},
};
use tokio::{
    net::TcpStream,
    sync::{broadcast, mpsc, Mutex},
    task::{AbortHandle, JoinHandle},
};
use tokio_tungstenite::{
    connect_async, tungstenite, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};

pub mod endpoint;
pub mod error;
pub mod notification;
pub mod state;

pub use endpoint::{resolve_ws_url, DEFAULT_ENDPOINT};
pub use error::{SessionError, SessionErrorKind};
pub use notification::{Notification, NotificationLevel, NotificationTray};
pub use state::{SessionState, Transition, NO_GESTURE_LABEL};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const EVENT_CHANNEL_CAPACITY: usize = 256;
const CLOSE_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected,
    Disconnected,
    GestureDetected(String),
    ModeChanged(ModeId),
    RecordingChanged(bool),
    Notification(Notification),
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Re-send a non-default local mode as soon as the connection opens.
    pub resync_mode_on_connect: bool,
}

/// One UI session's link to the gesture service.
///
/// Owns at most one websocket. Dropping the session (or calling
/// [`GestureSession::teardown`]) releases it.
pub struct GestureSession {
    options: SessionOptions,
    shared: Arc<SessionShared>,
    link: Mutex<Option<Link>>,
    attempts: AtomicU64,
}

struct SessionShared {
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

enum Link {
    Connecting(PendingConnect),
    Open(Connection),
}

/// Handshake in flight; aborted when dropped.
struct PendingConnect {
    attempt: u64,
    handshake: AbortHandle,
}

impl Drop for PendingConnect {
    fn drop(&mut self) {
        self.handshake.abort();
    }
}

struct Connection {
    outbound: mpsc::UnboundedSender<Message>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl SessionShared {
    async fn apply(&self, transition: Transition) -> SessionState {
        let (snapshot, emitted) = {
            let mut guard = self.state.lock().await;
            let emitted = guard.apply(transition);
            (guard.clone(), emitted)
        };
        for event in emitted {
            let _ = self.events.send(event);
        }
        snapshot
    }

    fn notify(&self, notification: Notification) {
        let _ = self.events.send(SessionEvent::Notification(notification));
    }

    async fn handle_frame(&self, text: &str) {
        match decode_server_event(text) {
            Ok(ServerEvent::GestureDetected { gesture }) => {
                debug!(%gesture, "gesture detected");
                self.apply(Transition::GestureDetected(gesture)).await;
            }
            Err(err) => {
                warn!(%err, "ignoring gesture service frame");
                self.notify(err.notification());
            }
        }
    }
}

impl Connection {
    async fn close(mut self) {
        self.reader.abort();
        let _ = self.outbound.send(Message::Close(None));
        if tokio::time::timeout(CLOSE_GRACE, &mut self.writer)
            .await
            .is_err()
        {
            debug!("gesture service socket did not close within grace period");
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

impl GestureSession {
    pub fn new(options: SessionOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            options,
            shared: Arc::new(SessionShared {
                state: Mutex::new(SessionState::default()),
                events,
            }),
            link: Mutex::new(None),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionState {
        self.shared.state.lock().await.clone()
    }

    /// Makes a single connection attempt. Failures are surfaced as a
    /// notification and leave the session disconnected.
    ///
    /// The handshake runs in its own task, so `teardown` never waits on it.
    pub async fn connect(&self, endpoint: &str) {
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed);
        let handshake = {
            let mut slot = self.link.lock().await;
            if slot.is_some() {
                warn!(endpoint, "gesture session already connected; ignoring connect");
                return;
            }
            let handshake = tokio::spawn(open_socket(endpoint.to_string()));
            *slot = Some(Link::Connecting(PendingConnect {
                attempt,
                handshake: handshake.abort_handle(),
            }));
            handshake
        };
        let outcome = handshake.await;

        let mut slot = self.link.lock().await;
        let pending = matches!(
            slot.as_ref(),
            Some(Link::Connecting(pending)) if pending.attempt == attempt
        );
        if !pending {
            debug!(endpoint, "session torn down during connect; discarding socket");
            return;
        }

        let ws_stream = match outcome {
            Ok(Ok(ws_stream)) => ws_stream,
            Ok(Err(err)) => {
                *slot = None;
                warn!(endpoint, %err, "failed to connect to gesture service");
                self.shared.notify(err.notification());
                return;
            }
            Err(err) => {
                *slot = None;
                warn!(endpoint, %err, "gesture service handshake task failed");
                return;
            }
        };
        info!(endpoint, "connected to gesture service");

        let (sink, stream) = ws_stream.split();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(run_writer(sink, outbound_rx));

        let snapshot = self.shared.apply(Transition::ConnectionEstablished).await;
        if self.options.resync_mode_on_connect && snapshot.mode != ModeId::default() {
            match encode_request(&ClientRequest::ChangeMode {
                mode: snapshot.mode,
            }) {
                Ok(frame) => {
                    debug!(mode = %snapshot.mode, "resyncing mode after connect");
                    let _ = outbound.send(frame);
                }
                Err(err) => warn!(%err, "failed to encode mode resync"),
            }
        }

        let reader = tokio::spawn(run_reader(Arc::clone(&self.shared), stream));
        *slot = Some(Link::Open(Connection {
            outbound,
            reader,
            writer,
        }));
    }

    /// Records `mode` locally and forwards it to the service when connected.
    ///
    /// Returns whether the request was handed to a live connection; requests
    /// made while disconnected are dropped.
    pub async fn request_mode_change(&self, mode: ModeId) -> bool {
        let snapshot = self.shared.apply(Transition::ModeRequested(mode)).await;
        if !snapshot.connected {
            debug!(%mode, "not connected; mode change kept local only");
            return false;
        }

        let frame = match encode_request(&ClientRequest::ChangeMode { mode }) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, %mode, "failed to encode mode change");
                return false;
            }
        };

        let guard = self.link.lock().await;
        match guard.as_ref() {
            Some(Link::Open(connection)) => {
                let sent = connection.outbound.send(frame).is_ok();
                debug!(%mode, sent, "queued change_mode");
                sent
            }
            _ => false,
        }
    }

    pub async fn toggle_recording(&self) -> bool {
        self.shared.apply(Transition::RecordingToggled).await.recording
    }

    /// Closes the connection, or abandons a pending handshake. Safe to call
    /// repeatedly.
    pub async fn teardown(&self) {
        let link = self.link.lock().await.take();
        match link {
            None => {}
            Some(Link::Connecting(pending)) => {
                drop(pending);
                info!("gesture session torn down during handshake");
            }
            Some(Link::Open(connection)) => {
                connection.close().await;
                self.shared.apply(Transition::Closed).await;
                info!("gesture session torn down");
            }
        }
    }
}

async fn open_socket(endpoint: String) -> std::result::Result<WsStream, SessionError> {
    let ws_url = resolve_ws_url(&endpoint)?;
    let (ws_stream, _) =
        connect_async(ws_url.as_str())
            .await
            .map_err(|source| SessionError::Connect {
                url: ws_url.to_string(),
                source: Box::new(source),
            })?;
    Ok(ws_stream)
}

async fn run_writer<S>(mut sink: S, mut outbound: mpsc::UnboundedReceiver<Message>)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(frame) = outbound.recv().await {
        let closing = matches!(frame, Message::Close(_));
        if let Err(err) = sink.send(frame).await {
            debug!(%err, "gesture service socket rejected write");
            break;
        }
        if closing {
            break;
        }
    }
    let _ = sink.close().await;
}

async fn run_reader<S>(shared: Arc<SessionShared>, mut stream: S)
where
    S: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => shared.handle_frame(&text).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(%err, "gesture service receive failed");
                break;
            }
        }
    }
    info!("gesture service connection lost");
    shared.apply(Transition::ConnectionLost).await;
}

fn decode_server_event(text: &str) -> std::result::Result<ServerEvent, SessionError> {
    serde_json::from_str(text).map_err(|err| SessionError::UnexpectedPayload {
        reason: err.to_string(),
    })
}

fn encode_request(request: &ClientRequest) -> Result<Message> {
    let text = serde_json::to_string(request).context("failed to encode client request")?;
    Ok(Message::Text(text))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
