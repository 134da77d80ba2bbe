//! Chat client seam.
//!
//! The automated messaging client sits behind this trait so the session
//! manager can be exercised against a scripted client in tests while
//! production wires in the WhatsApp automation crate.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Startup failed: {0}")]
    Startup(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Shutdown failed: {0}")]
    Shutdown(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// An inbound chat message forwarded from the client's event handler.
#[derive(Clone, Debug)]
pub struct IncomingMessage {
    /// Transport-assigned message identifier, used for reply dedup.
    pub id: String,
    /// Contact the message came from (reply target).
    pub sender: String,
    pub body: String,
}

/// Lifecycle and message events surfaced by a chat client.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// A pairing code the end user must scan to authorize the session.
    PairingCode { code: String },
    /// The account accepted the pairing.
    Authenticated,
    /// The session is connected and able to send/receive.
    Ready { display_name: Option<String> },
    /// An inbound message arrived.
    Message(IncomingMessage),
    /// The connection ended.
    Closed { reason: String },
}

/// Session lifecycle states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    PairingRequested,
    Authenticated,
    Ready,
    Destroyed,
}

impl SessionState {
    /// Transition for a client event; `None` means the state is unchanged.
    pub fn on_event(self, event: &SessionEvent) -> Option<SessionState> {
        match (self, event) {
            (SessionState::Destroyed, _) => None,
            (SessionState::Unauthenticated, SessionEvent::PairingCode { .. }) => {
                Some(SessionState::PairingRequested)
            }
            (
                SessionState::Unauthenticated | SessionState::PairingRequested,
                SessionEvent::Authenticated,
            ) => Some(SessionState::Authenticated),
            (_, SessionEvent::Ready { .. }) => Some(SessionState::Ready),
            (_, SessionEvent::Closed { .. }) => Some(SessionState::Destroyed),
            _ => None,
        }
    }
}

/// One automated connection to a user's messaging account.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Connect and forward lifecycle events into `events`. Returns once the
    /// client is wired up; startup continues asynchronously.
    async fn start(&self, events: mpsc::UnboundedSender<SessionEvent>) -> Result<()>;

    /// Send a text message back to a contact.
    async fn send_text(&self, recipient: &str, body: &str) -> Result<()>;

    /// Tear the connection down. Best-effort; idempotent.
    async fn shutdown(&self) -> Result<()>;
}

/// Creates clients bound to a username and its on-disk session state.
pub trait ChatClientFactory: Send + Sync {
    fn create(&self, username: &str, session_dir: &Path) -> Arc<dyn ChatClient>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairing_flow_transitions() {
        let state = SessionState::Unauthenticated;
        let state = state
            .on_event(&SessionEvent::PairingCode {
                code: "code".to_string(),
            })
            .unwrap();
        assert_eq!(state, SessionState::PairingRequested);

        let state = state.on_event(&SessionEvent::Authenticated).unwrap();
        assert_eq!(state, SessionState::Authenticated);

        let state = state
            .on_event(&SessionEvent::Ready { display_name: None })
            .unwrap();
        assert_eq!(state, SessionState::Ready);
    }

    #[test]
    fn restored_sessions_skip_pairing() {
        // A client with saved credentials goes straight to ready.
        let state = SessionState::Unauthenticated;
        assert_eq!(
            state.on_event(&SessionEvent::Ready { display_name: None }),
            Some(SessionState::Ready)
        );
    }

    #[test]
    fn messages_do_not_change_state() {
        let event = SessionEvent::Message(IncomingMessage {
            id: "m1".to_string(),
            sender: "c1".to_string(),
            body: "hi".to_string(),
        });
        assert_eq!(SessionState::Ready.on_event(&event), None);
    }

    #[test]
    fn destroyed_is_terminal() {
        let state = SessionState::Ready
            .on_event(&SessionEvent::Closed {
                reason: "logout".to_string(),
            })
            .unwrap();
        assert_eq!(state, SessionState::Destroyed);
        assert_eq!(
            state.on_event(&SessionEvent::Ready { display_name: None }),
            None
        );
    }
}
