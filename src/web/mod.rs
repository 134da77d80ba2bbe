//! Web layer: HTTP boundary over the stores and session manager.

pub mod api;
pub mod router;
pub mod server;

pub use server::run_web_server;
