//! WhatsApp-backed chat client using the whatsapp-rust crate.
//!
//! Event-driven: the bot connects over WebSocket and forwards pairing and
//! message events into the session manager's channel. Session credentials
//! live in a per-user SQLite database under the sessions directory, so a
//! restart restores the login without a new pairing flow.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use wacore::types::events::Event;
use wacore_binary::jid::Jid;
use waproto::whatsapp as wa;
use whatsapp_rust::bot::Bot;
use whatsapp_rust::Client;

use super::client::{ChatClient, ChatClientFactory, ClientError, IncomingMessage, Result, SessionEvent};

/// WhatsApp messages are capped well below this; long AI replies are split.
const MAX_MESSAGE_CHARS: usize = 4096;

struct Running {
    client: Arc<Client>,
    run_task: JoinHandle<()>,
}

/// One WhatsApp connection, owned by the session manager.
pub struct WhatsAppClient {
    username: String,
    session_dir: PathBuf,
    running: Mutex<Option<Running>>,
}

impl WhatsAppClient {
    pub fn new(username: &str, session_dir: &Path) -> Self {
        Self {
            username: username.to_string(),
            session_dir: session_dir.to_path_buf(),
            running: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ChatClient for WhatsAppClient {
    async fn start(&self, events: mpsc::UnboundedSender<SessionEvent>) -> Result<()> {
        std::fs::create_dir_all(&self.session_dir)
            .map_err(|e| ClientError::Startup(format!("session dir create failed: {}", e)))?;

        let db_path = self.session_dir.join("session.db");
        let db_path_str = db_path
            .to_str()
            .ok_or_else(|| ClientError::Startup("session path is not valid utf-8".to_string()))?;
        let backend = Arc::new(
            whatsapp_rust::store::SqliteStore::new(db_path_str)
                .await
                .map_err(|e| ClientError::Startup(format!("sqlite store failed: {}", e)))?,
        );

        let username = self.username.clone();
        let mut bot = Bot::builder()
            .with_backend(backend)
            .with_transport_factory(whatsapp_rust::transport::TokioWebSocketTransportFactory::new())
            .with_http_client(whatsapp_rust::transport::UreqHttpClient::new())
            .on_event(move |event, _client| {
                let events = events.clone();
                let username = username.clone();
                async move {
                    match event {
                        Event::PairingQrCode { code, .. } => {
                            let _ = events.send(SessionEvent::PairingCode { code });
                        }
                        Event::PairSuccess(ref pair_success) => {
                            tracing::info!(
                                "{} paired with {} ({})",
                                username,
                                pair_success.id,
                                pair_success.platform
                            );
                            let _ = events.send(SessionEvent::Authenticated);
                        }
                        Event::PairError(ref error) => {
                            tracing::error!("{} pairing failed: {}", username, error.error);
                            let _ = events.send(SessionEvent::Closed {
                                reason: format!("pairing failed: {}", error.error),
                            });
                        }
                        Event::Connected(_) => {
                            let _ = events.send(SessionEvent::Ready { display_name: None });
                        }
                        Event::Message(ref msg, ref info) => {
                            if let Some(body) = extract_text_from_message(msg) {
                                let _ = events.send(SessionEvent::Message(IncomingMessage {
                                    id: info.id.clone(),
                                    sender: info.source.sender.to_string(),
                                    body,
                                }));
                            }
                        }
                        _ => {}
                    }
                }
            })
            .build()
            .await
            .map_err(|e| ClientError::Startup(format!("bot build failed: {}", e)))?;

        let client = bot.client();

        let username = self.username.clone();
        let run_task = tokio::spawn(async move {
            match bot.run().await {
                Ok(handle) => {
                    if let Err(e) = handle.await {
                        tracing::error!("WhatsApp run handle for {} failed: {}", username, e);
                    }
                }
                Err(e) => {
                    tracing::error!("WhatsApp bot for {} failed: {}", username, e);
                }
            }
        });

        *self.running.lock().await = Some(Running { client, run_task });
        Ok(())
    }

    async fn send_text(&self, recipient: &str, body: &str) -> Result<()> {
        let running = self.running.lock().await;
        let running = running
            .as_ref()
            .ok_or_else(|| ClientError::Send("session not started".to_string()))?;

        let jid: Jid = recipient
            .parse()
            .map_err(|e| ClientError::Send(format!("jid parse failed: {}", e)))?;

        for chunk in split_chunks(body, MAX_MESSAGE_CHARS) {
            let message = wa::Message {
                conversation: Some(chunk),
                ..Default::default()
            };
            running
                .client
                .send_message(jid.clone(), message)
                .await
                .map_err(|e| ClientError::Send(format!("send failed: {}", e)))?;
        }
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        if let Some(running) = self.running.lock().await.take() {
            running.run_task.abort();
            tracing::debug!("Stopped WhatsApp client for {}", self.username);
        }
        Ok(())
    }
}

/// Creates WhatsApp clients rooted in the sessions directory.
pub struct WhatsAppClientFactory;

impl ChatClientFactory for WhatsAppClientFactory {
    fn create(&self, username: &str, session_dir: &Path) -> Arc<dyn ChatClient> {
        Arc::new(WhatsAppClient::new(username, session_dir))
    }
}

/// Extract text content from a WhatsApp message.
fn extract_text_from_message(msg: &wa::Message) -> Option<String> {
    if let Some(ref text) = msg.conversation {
        return Some(text.clone());
    }
    if let Some(ref ext) = msg.extended_text_message {
        if let Some(ref text) = ext.text {
            return Some(text.clone());
        }
    }
    None
}

/// Split a long reply into sendable chunks.
fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let mut chunks = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if current.len() + c.len_utf8() > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_message_conversation_text() {
        let msg = wa::Message {
            conversation: Some("hello".to_string()),
            ..Default::default()
        };
        assert_eq!(extract_text_from_message(&msg), Some("hello".to_string()));
    }

    #[test]
    fn parse_message_extended_text() {
        let msg = wa::Message {
            extended_text_message: Some(Box::new(wa::message::ExtendedTextMessage {
                text: Some("hello ext".to_string()),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(
            extract_text_from_message(&msg),
            Some("hello ext".to_string())
        );
    }

    #[test]
    fn parse_message_missing_text() {
        let msg = wa::Message::default();
        assert_eq!(extract_text_from_message(&msg), None);
    }

    #[test]
    fn split_chunks_large_text() {
        let text = "x".repeat(9000);
        let chunks = split_chunks(&text, 4096);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 4096);
        assert_eq!(chunks[2].len(), 808);
    }

    #[test]
    fn split_chunks_short_text() {
        assert_eq!(split_chunks("hi", 4096), vec!["hi".to_string()]);
    }
}
