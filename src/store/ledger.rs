//! Message ledger: seen message identifiers per (username, contact).
//!
//! Used purely for at-most-once reply dedup. The snapshot is read fresh on
//! every inbound message and rewritten wholesale when a new identifier is
//! recorded; callers serialize read-modify-write cycles (the session
//! manager holds the ledger behind a mutex).

use std::collections::HashMap;
use std::path::PathBuf;

use super::Result;

type LedgerMap = HashMap<String, HashMap<String, Vec<String>>>;

/// Dedup ledger backed by a single JSON snapshot file.
pub struct MessageLedger {
    path: PathBuf,
}

impl MessageLedger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<LedgerMap> {
        if !self.path.exists() {
            return Ok(LedgerMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, ledger: &LedgerMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(ledger)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Whether `message_id` was already recorded for (username, contact).
    pub fn has_seen(&self, username: &str, contact: &str, message_id: &str) -> Result<bool> {
        let ledger = self.read()?;
        Ok(ledger
            .get(username)
            .and_then(|contacts| contacts.get(contact))
            .map(|seen| seen.iter().any(|id| id == message_id))
            .unwrap_or(false))
    }

    /// Append `message_id` to the seen sequence and persist the snapshot.
    pub fn mark_seen(&self, username: &str, contact: &str, message_id: &str) -> Result<()> {
        let mut ledger = self.read()?;
        ledger
            .entry(username.to_string())
            .or_default()
            .entry(contact.to_string())
            .or_default()
            .push(message_id.to_string());
        self.write(&ledger)
    }

    /// Record `message_id` unless already seen, in one read-modify-write
    /// cycle. Returns true when the identifier was newly recorded.
    pub fn record_if_unseen(
        &self,
        username: &str,
        contact: &str,
        message_id: &str,
    ) -> Result<bool> {
        let mut ledger = self.read()?;
        let seen = ledger
            .entry(username.to_string())
            .or_default()
            .entry(contact.to_string())
            .or_default();
        if seen.iter().any(|id| id == message_id) {
            return Ok(false);
        }
        seen.push(message_id.to_string());
        self.write(&ledger)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(dir: &tempfile::TempDir) -> MessageLedger {
        MessageLedger::new(dir.path().join("messages.json"))
    }

    #[test]
    fn mark_then_has_seen() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(&dir);

        assert!(!ledger.has_seen("alice", "c1", "m1").unwrap());
        ledger.mark_seen("alice", "c1", "m1").unwrap();
        assert!(ledger.has_seen("alice", "c1", "m1").unwrap());
    }

    #[test]
    fn seen_sets_are_scoped_per_user_and_contact() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(&dir);

        ledger.mark_seen("alice", "c1", "m1").unwrap();
        assert!(!ledger.has_seen("alice", "c2", "m1").unwrap());
        assert!(!ledger.has_seen("bob", "c1", "m1").unwrap());
    }

    #[test]
    fn record_if_unseen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(&dir);

        assert!(ledger.record_if_unseen("alice", "c1", "m1").unwrap());
        assert!(!ledger.record_if_unseen("alice", "c1", "m1").unwrap());
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");

        MessageLedger::new(path.clone())
            .mark_seen("alice", "c1", "m1")
            .unwrap();
        assert!(MessageLedger::new(path)
            .has_seen("alice", "c1", "m1")
            .unwrap());
    }
}
