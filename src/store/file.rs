use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::TokenStore;

/// Store file name inside the data directory
const STORE_FILE: &str = "tokens.json";

/// Token store backed by a JSON file.
///
/// The whole file is read and rewritten on each access; at one token per
/// session that is the simplest thing that works. The file is created on
/// first `set`, with owner-only permissions on Unix.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store rooted at `dir`. The directory does not need to
    /// exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORE_FILE),
        }
    }

    fn read_entries(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = fs::read_to_string(&self.path).context("Failed to read token store")?;
        serde_json::from_str(&contents).context("Failed to parse token store")
    }

    fn write_entries(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create token store directory")?;
        }
        let contents = serde_json::to_string_pretty(entries)?;

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600) // Owner read/write only
                .open(&self.path)
                .context("Failed to open token store")?;
            file.write_all(contents.as_bytes())
                .context("Failed to write token store")?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents).context("Failed to write token store")?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_on_fresh_store_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.set("token", "tok-1").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("tok-1"));

        store.set("token", "tok-2").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("tok-2"));
    }

    #[test]
    fn values_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileTokenStore::new(dir.path()).set("token", "tok-1").unwrap();

        let reopened = FileTokenStore::new(dir.path());
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("tok-1"));
    }

    #[test]
    fn remove_deletes_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.set("token", "tok-1").unwrap();
        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn remove_of_missing_key_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.remove("token").unwrap();
    }
}
