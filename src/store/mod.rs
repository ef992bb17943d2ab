//! Token persistence backends.
//!
//! A `TokenStore` is a durable key-value store surviving process restarts.
//! Three backends are provided:
//! - `FileTokenStore`: JSON file in an application directory
//! - `KeyringTokenStore`: OS keychain via the system credential manager
//! - `MemoryTokenStore`: in-process map for tests and ephemeral sessions

pub mod file;
pub mod keychain;
pub mod memory;

pub use file::FileTokenStore;
pub use keychain::KeyringTokenStore;
pub use memory::MemoryTokenStore;

use anyhow::Result;

/// Durable key-value persistence for tokens.
///
/// Implementations must tolerate absence: `get` on a key that was never
/// set returns `Ok(None)`, and `remove` of a missing key is not an error.
pub trait TokenStore: Send + Sync {
    /// Returns the stored value, or `None` if the key has never been set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores or replaces the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the key. Absence is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
