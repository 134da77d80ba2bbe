//! whatsrelay library root.

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod providers;
pub mod relay;
pub mod session;
pub mod state;
pub mod store;
pub mod web;

pub use cli::Commands;
pub use config::{load_settings, Settings};
pub use error::{Error, Result};
pub use providers::Provider;
pub use relay::AiRelay;
pub use session::SessionManager;
pub use state::AppState;
pub use store::{MessageLedger, ReplyLog, UserStore};
pub use web::run_web_server;
