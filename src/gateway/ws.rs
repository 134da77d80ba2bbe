//! WebSocket handling for the notification gateway.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

use super::{ClientEvent, Notifier, ServerEvent};

/// WebSocket upgrade handler for the `/ws` route.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-connection loop: forward outbound events to the socket, fan the
/// global ai-reply broadcast in, and dispatch inbound client events.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    info!("New gateway connection");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerEvent>();

    let send_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_tx.send(Message::Text(json)).await.is_err() {
                        debug!("Gateway send failed, client disconnected");
                        break;
                    }
                }
                Err(e) => error!("Failed to serialize gateway event: {}", e),
            }
        }
    });

    let mut broadcast_rx = state.events.subscribe();
    let broadcast_out = outbound_tx.clone();
    let broadcast_task = tokio::spawn(async move {
        while let Ok(event) = broadcast_rx.recv().await {
            if broadcast_out.send(event).is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        let text = match result {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                debug!("Gateway client sent close frame");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                warn!("Gateway socket error: {}", e);
                break;
            }
        };

        let event: ClientEvent = match serde_json::from_str(&text) {
            Ok(event) => event,
            Err(e) => {
                warn!("Unparseable gateway event: {} - {}", e, text);
                continue;
            }
        };

        handle_client_event(&state, &outbound_tx, event).await;
    }

    broadcast_task.abort();
    send_task.abort();
    info!("Gateway connection closed");
}

async fn handle_client_event(state: &Arc<AppState>, notifier: &Notifier, event: ClientEvent) {
    match event {
        ClientEvent::InitClient { username } => {
            if let Err(e) = state.sessions.init(&username, notifier.clone(), false).await {
                error!("Session init failed for {}: {}", username, e);
            }
            let replies = state.sessions.load_replies().await;
            let _ = notifier.send(ServerEvent::LoadAiReplies { replies });
        }
        ClientEvent::AiReply { text } => {
            state.sessions.publish_reply(text).await;
        }
    }
}
