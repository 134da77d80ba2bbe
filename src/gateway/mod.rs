//! Notification gateway: the push channel between browser UIs and the
//! session manager.
//!
//! One WebSocket per UI connection. Pairing prompts and readiness events go
//! to the connection that initiated the session; AI-reply log lines fan out
//! to every connection through a process-wide broadcast channel.

pub mod ws;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub use ws::ws_handler;

/// Events a UI connection may send.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Start (or restart) the messaging session for a user.
    InitClient { username: String },
    /// Client-submitted log line, appended to the reply log and rebroadcast.
    AiReply { text: String },
}

/// Events pushed to UI connections.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Pairing QR for the given user, as an image data URL.
    Qr { qr: String, user: String },
    Ready { user: String },
    Authenticated,
    LoginSuccessful { name: String },
    /// AI-relay outcome line, broadcast to all connections.
    AiReply { text: String },
    /// Full reply log replay, sent to the initiating connection after init.
    LoadAiReplies { replies: Vec<String> },
}

/// Per-connection outbound channel handed to the session manager.
pub type Notifier = mpsc::UnboundedSender<ServerEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_events_use_wire_names() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"init-client","data":{"username":"alice"}}"#)
                .unwrap();
        assert!(matches!(event, ClientEvent::InitClient { username } if username == "alice"));

        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"ai-reply","data":{"text":"line"}}"#).unwrap();
        assert!(matches!(event, ClientEvent::AiReply { text } if text == "line"));
    }

    #[test]
    fn server_events_use_wire_names() {
        let json = serde_json::to_string(&ServerEvent::LoginSuccessful {
            name: "alice".to_string(),
        })
        .unwrap();
        assert!(json.contains(r#""event":"login-successful""#));

        let json = serde_json::to_string(&ServerEvent::Authenticated).unwrap();
        assert!(json.contains(r#""event":"authenticated""#));

        let json = serde_json::to_string(&ServerEvent::LoadAiReplies {
            replies: vec!["a".to_string()],
        })
        .unwrap();
        assert!(json.contains(r#""event":"load-ai-replies""#));
    }
}
