//! Messaging session management.

pub mod client;
pub mod manager;
pub mod whatsapp;

pub use client::{ChatClient, ChatClientFactory, IncomingMessage, SessionEvent, SessionState};
pub use manager::SessionManager;
pub use whatsapp::WhatsAppClientFactory;
