//! Session manager: owns the active messaging sessions, one per username.
//!
//! Init tears down any prior session for the username before starting the
//! replacement, and registers the new session before asynchronous startup
//! completes so a concurrent init observes (and destroys) the in-flight one
//! instead of racing two live sessions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::gateway::{Notifier, ServerEvent};
use crate::relay::AiRelay;
use crate::store::{MessageLedger, ReplyLog, UserStore};

use super::client::{
    ChatClient, ChatClientFactory, IncomingMessage, SessionEvent, SessionState,
};

struct ActiveSession {
    client: Arc<dyn ChatClient>,
    state: Arc<Mutex<SessionState>>,
    pump: JoinHandle<()>,
}

/// Process-wide registry of live messaging sessions.
pub struct SessionManager {
    sessions: Mutex<HashMap<String, ActiveSession>>,
    sessions_dir: PathBuf,
    factory: Arc<dyn ChatClientFactory>,
    users: Arc<UserStore>,
    /// Serializes ledger read-modify-write cycles: two near-simultaneous
    /// messages to the same snapshot file queue up instead of losing an
    /// update.
    ledger: Mutex<MessageLedger>,
    replies: Mutex<ReplyLog>,
    relay: AiRelay,
    events: broadcast::Sender<ServerEvent>,
}

impl SessionManager {
    pub fn new(
        factory: Arc<dyn ChatClientFactory>,
        users: Arc<UserStore>,
        ledger: MessageLedger,
        replies: ReplyLog,
        relay: AiRelay,
        events: broadcast::Sender<ServerEvent>,
        sessions_dir: PathBuf,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            sessions_dir,
            factory,
            users,
            ledger: Mutex::new(ledger),
            replies: Mutex::new(replies),
            relay,
            events,
        }
    }

    /// Start a session for `username`, replacing any existing one.
    ///
    /// With `force_new`, persisted session state is purged first so the
    /// client runs a fresh pairing flow instead of restoring credentials.
    pub async fn init(
        self: &Arc<Self>,
        username: &str,
        notifier: Notifier,
        force_new: bool,
    ) -> Result<()> {
        if self.destroy(username, false).await {
            tracing::info!("Destroyed previous session for {}", username);
        }

        if force_new {
            self.purge_session_dir(username);
        }

        let session_dir = self.sessions_dir.join(username);
        let client = self.factory.create(username, &session_dir);
        let state = Arc::new(Mutex::new(SessionState::Unauthenticated));
        let (tx, rx) = mpsc::unbounded_channel();

        let pump = tokio::spawn(run_event_pump(
            Arc::clone(self),
            username.to_string(),
            Arc::clone(&client),
            Arc::clone(&state),
            notifier,
            rx,
        ));

        // Register before startup completes.
        self.sessions.lock().await.insert(
            username.to_string(),
            ActiveSession {
                client: Arc::clone(&client),
                state,
                pump,
            },
        );

        if let Err(e) = client.start(tx).await {
            tracing::error!("Session startup failed for {}: {}", username, e);
            self.destroy(username, false).await;
            return Err(Error::Session(e.to_string()));
        }

        tracing::info!("Initialized session for {}", username);
        Ok(())
    }

    /// Tear down the session for `username`. Returns whether one existed.
    ///
    /// With `purge` (explicit logout), persisted session state is deleted so
    /// the next init starts a clean pairing flow.
    pub async fn destroy(&self, username: &str, purge: bool) -> bool {
        let Some(active) = self.sessions.lock().await.remove(username) else {
            return false;
        };

        if let Err(e) = active.client.shutdown().await {
            tracing::warn!("Error destroying session for {}: {}", username, e);
        }
        active.pump.abort();
        *active.state.lock().await = SessionState::Destroyed;

        if purge {
            self.purge_session_dir(username);
        }

        tracing::info!("Destroyed session for {}", username);
        true
    }

    /// Current lifecycle state of a session, if one is registered.
    pub async fn state_of(&self, username: &str) -> Option<SessionState> {
        let sessions = self.sessions.lock().await;
        let active = sessions.get(username)?;
        let state = *active.state.lock().await;
        Some(state)
    }

    /// Number of registered sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Append an AI-reply outcome line and fan it out to every connected UI.
    pub async fn publish_reply(&self, text: String) {
        {
            let replies = self.replies.lock().await;
            if let Err(e) = replies.append(&text) {
                tracing::error!("Failed to persist reply log: {}", e);
            }
        }
        // No receivers just means no UI is connected.
        let _ = self.events.send(ServerEvent::AiReply { text });
    }

    /// Full reply log, oldest first.
    pub async fn load_replies(&self) -> Vec<String> {
        let replies = self.replies.lock().await;
        replies.load().unwrap_or_else(|e| {
            tracing::error!("Failed to load reply log: {}", e);
            Vec::new()
        })
    }

    /// Handle one inbound message: dedup, toggle gate, relay, reply.
    async fn handle_incoming(&self, username: &str, client: &dyn ChatClient, msg: &IncomingMessage) {
        if msg.body.trim().is_empty() {
            return;
        }

        // Dedup before anything slow: mark-seen persists before the AI call
        // so a slow completion cannot cause a duplicate reply.
        let fresh = {
            let ledger = self.ledger.lock().await;
            ledger.record_if_unseen(username, &msg.sender, &msg.id)
        };
        match fresh {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                tracing::error!("Ledger update failed for {}: {}", username, e);
                return;
            }
        }

        let record = match self.users.get(username) {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!("Inbound message for unknown user {}", username);
                return;
            }
            Err(e) => {
                tracing::error!("User lookup failed for {}: {}", username, e);
                return;
            }
        };

        if !record.toggles.current {
            tracing::debug!("Replies disabled for {}, message recorded only", username);
            return;
        }

        let reply = self
            .relay
            .generate_reply(&msg.body, &record.instructions)
            .await;

        match client.send_text(&msg.sender, &reply).await {
            Ok(()) => {
                self.publish_reply(format!("Reply sent to {}: {}", msg.sender, reply))
                    .await;
            }
            Err(e) => {
                tracing::error!("Failed to send reply for {}: {}", username, e);
                self.publish_reply(format!("Failed to reply to {}", msg.sender))
                    .await;
            }
        }
    }

    fn purge_session_dir(&self, username: &str) {
        let dir = self.sessions_dir.join(username);
        if dir.exists() {
            match std::fs::remove_dir_all(&dir) {
                Ok(()) => tracing::info!("Deleted session state for {}", username),
                Err(e) => tracing::warn!("Failed to delete session state for {}: {}", username, e),
            }
        }
    }
}

/// Forward client events to the notifier and the message handler, advancing
/// the session state machine as they arrive.
async fn run_event_pump(
    manager: Arc<SessionManager>,
    username: String,
    client: Arc<dyn ChatClient>,
    state: Arc<Mutex<SessionState>>,
    notifier: Notifier,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
) {
    while let Some(event) = events.recv().await {
        {
            let mut state = state.lock().await;
            if let Some(next) = state.on_event(&event) {
                tracing::debug!("Session {}: {:?} -> {:?}", username, *state, next);
                *state = next;
            }
        }

        match event {
            SessionEvent::PairingCode { code } => match qr_data_url(&code) {
                Ok(qr) => {
                    let _ = notifier.send(ServerEvent::Qr {
                        qr,
                        user: username.clone(),
                    });
                }
                Err(e) => tracing::error!("QR render failed for {}: {}", username, e),
            },
            SessionEvent::Authenticated => {
                tracing::info!("{} authenticated", username);
                let _ = notifier.send(ServerEvent::Authenticated);
            }
            SessionEvent::Ready { display_name } => {
                tracing::info!("{} session ready", username);
                let _ = notifier.send(ServerEvent::Ready {
                    user: username.clone(),
                });
                let _ = notifier.send(ServerEvent::LoginSuccessful {
                    name: display_name.unwrap_or_else(|| username.clone()),
                });
            }
            SessionEvent::Message(msg) => {
                manager.handle_incoming(&username, client.as_ref(), &msg).await;
            }
            SessionEvent::Closed { reason } => {
                tracing::info!("Session {} closed: {}", username, reason);
            }
        }
    }
}

/// Render a pairing code as a scannable image data URL.
fn qr_data_url(code: &str) -> Result<String> {
    let qr = qrcode::QrCode::new(code.as_bytes())
        .map_err(|e| Error::Session(format!("QR encode failed: {}", e)))?;
    let svg = qr
        .render::<qrcode::render::svg::Color>()
        .min_dimensions(240, 240)
        .build();
    Ok(format!(
        "data:image/svg+xml;base64,{}",
        BASE64_STANDARD.encode(svg)
    ))
}
