//! Shared application state.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::Settings;
use crate::error::Result;
use crate::gateway::ServerEvent;
use crate::providers;
use crate::relay::AiRelay;
use crate::session::{ChatClientFactory, SessionManager};
use crate::store::{MessageLedger, ReplyLog, UserStore};

/// State shared by the web layer and the gateway.
pub struct AppState {
    pub settings: Settings,
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionManager>,
    pub events: broadcast::Sender<ServerEvent>,
}

impl AppState {
    /// Wire up stores, relay, and session manager from settings.
    pub fn new(settings: Settings, factory: Arc<dyn ChatClientFactory>) -> Result<Self> {
        let users = Arc::new(UserStore::new(
            settings.users_path()?,
            settings.registration.resolve_secret(),
        ));
        let ledger = MessageLedger::new(settings.ledger_path()?);
        let replies = ReplyLog::new(settings.replies_path()?);
        let relay = AiRelay::new(providers::get_current_provider(&settings));
        let (events, _) = broadcast::channel(256);

        let sessions = Arc::new(SessionManager::new(
            factory,
            Arc::clone(&users),
            ledger,
            replies,
            relay,
            events.clone(),
            settings.sessions_dir()?,
        ));

        Ok(Self {
            settings,
            users,
            sessions,
            events,
        })
    }

    /// Assemble state from prebuilt components.
    pub fn from_parts(
        settings: Settings,
        users: Arc<UserStore>,
        sessions: Arc<SessionManager>,
        events: broadcast::Sender<ServerEvent>,
    ) -> Self {
        Self {
            settings,
            users,
            sessions,
            events,
        }
    }
}
