//! Flat snapshot-file stores.
//!
//! All three stores follow the same discipline: one JSON file per store,
//! read fresh on access and rewritten wholesale on every mutation.

pub mod ledger;
pub mod replies;
pub mod users;

pub use ledger::MessageLedger;
pub use replies::ReplyLog;
pub use users::{Toggles, UserRecord, UserStore};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid secret code")]
    InvalidSecret,

    #[error("User exists")]
    UserExists,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hash error: {0}")]
    Hash(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
