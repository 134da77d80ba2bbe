//! Credential store: username -> {password hash, instructions, toggles}.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::{Result, StoreError};

/// Per-user auto-reply toggles. `current` gates replies to new
/// conversations; `previous` is kept for the UI but not consumed by the
/// relay logic.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Toggles {
    #[serde(default = "default_true")]
    pub current: bool,
    #[serde(default = "default_true")]
    pub previous: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            current: true,
            previous: true,
        }
    }
}

/// A registered operator account.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserRecord {
    /// bcrypt hash of the account password.
    pub password: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub toggles: Toggles,
}

/// Credential store backed by a single JSON snapshot file.
///
/// Usernames are immutable once created: there is no rename or delete path.
pub struct UserStore {
    path: PathBuf,
    register_secret: Option<String>,
}

impl UserStore {
    pub fn new(path: PathBuf, register_secret: Option<String>) -> Self {
        Self {
            path,
            register_secret,
        }
    }

    fn read(&self) -> Result<HashMap<String, UserRecord>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, users: &HashMap<String, UserRecord>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(users)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Register a new account.
    ///
    /// Fails with `InvalidSecret` unless `secret` matches the provisioning
    /// value (registration is disabled entirely when no value is
    /// configured), and with `UserExists` for duplicate usernames.
    pub fn register(&self, username: &str, password: &str, secret: &str) -> Result<()> {
        match self.register_secret.as_deref() {
            Some(expected) if expected == secret => {}
            _ => return Err(StoreError::InvalidSecret),
        }

        let mut users = self.read()?;
        if users.contains_key(username) {
            return Err(StoreError::UserExists);
        }

        let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| StoreError::Hash(e.to_string()))?;
        users.insert(
            username.to_string(),
            UserRecord {
                password: hash,
                instructions: String::new(),
                toggles: Toggles::default(),
            },
        );
        self.write(&users)?;

        tracing::info!("Registered user {}", username);
        Ok(())
    }

    /// Verify a password against the stored hash. Unknown users fail.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let users = self.read()?;
        let Some(record) = users.get(username) else {
            return Ok(false);
        };
        bcrypt::verify(password, &record.password).map_err(|e| StoreError::Hash(e.to_string()))
    }

    /// Fetch a user record.
    pub fn get(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self.read()?.remove(username))
    }

    /// Replace the stored instructions. Returns false for unknown users.
    pub fn set_instructions(&self, username: &str, instructions: &str) -> Result<bool> {
        let mut users = self.read()?;
        let Some(record) = users.get_mut(username) else {
            return Ok(false);
        };
        record.instructions = instructions.to_string();
        self.write(&users)?;
        Ok(true)
    }

    /// Replace the stored toggles. Returns false for unknown users.
    pub fn set_toggles(&self, username: &str, toggles: Toggles) -> Result<bool> {
        let mut users = self.read()?;
        let Some(record) = users.get_mut(username) else {
            return Ok(false);
        };
        record.toggles = toggles;
        self.write(&users)?;
        Ok(true)
    }
}
