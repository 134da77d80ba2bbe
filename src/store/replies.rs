//! Global ordered log of AI-reply outcome lines.
//!
//! Entries are opaque strings, not scoped per user; every connected UI
//! receives the full log on connect and each new line as it lands.

use std::path::PathBuf;

use super::Result;

/// Reply log backed by a single JSON array snapshot file.
pub struct ReplyLog {
    path: PathBuf,
}

impl ReplyLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the full log, oldest first.
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Append one entry and persist the snapshot.
    pub fn append(&self, entry: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.push(entry.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ReplyLog::new(dir.path().join("ai-replies.json"));

        assert!(log.load().unwrap().is_empty());
        log.append("first").unwrap();
        log.append("second").unwrap();
        assert_eq!(log.load().unwrap(), vec!["first", "second"]);
    }
}
