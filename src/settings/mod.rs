//! Persisted settings: store seam, key layout, one-shot loader.
//!
//! Settings live in a host-provided key-value store shared with the
//! settings UI. The mixer reads them once per document lifetime
//! ([`SettingsLoader`]); the UI writes them on user action; the host
//! deletes per-tab keys when the tab closes.
//!
//! # Key Layout
//!
//! | Key | Value | Scope |
//! |-----|-------|-------|
//! | `volume_<tabId>` | integer percent 0–100 | per tab |
//! | `muted_<tabId>` | bool | per tab |
//! | `masterVolume` | integer percent 0–100 | global |

// ============================================================================
// Submodules
// ============================================================================

/// One-shot settings loader.
pub mod loader;

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::Result;
use crate::identifiers::TabId;

// ============================================================================
// Re-exports
// ============================================================================

pub use loader::{LoadedSettings, SettingsLoader};

// ============================================================================
// Keys
// ============================================================================

/// Persisted-store key formats.
pub mod keys {
    use crate::identifiers::TabId;

    /// Global master-volume key (integer percent).
    pub const MASTER_VOLUME: &str = "masterVolume";

    /// Per-tab volume key (integer percent).
    #[must_use]
    pub fn volume(tab_id: TabId) -> String {
        format!("volume_{tab_id}")
    }

    /// Per-tab mute key (bool).
    #[must_use]
    pub fn muted(tab_id: TabId) -> String {
        format!("muted_{tab_id}")
    }
}

// ============================================================================
// SettingsStore
// ============================================================================

/// Host-provided persisted key-value store.
///
/// Values are raw JSON: the loader validates types and ranges itself, since
/// the store is shared with contexts the mixer does not control.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Reads a key, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Writes a key.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Removes a key, no-op if absent.
    async fn remove(&self, key: &str) -> Result<()>;
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory [`SettingsStore`] for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<FxHashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the per-tab and master keys in one call.
    pub fn seed(&self, tab_id: TabId, volume_percent: Value, muted: Value, master_percent: Value) {
        let mut entries = self.entries.lock();
        entries.insert(keys::volume(tab_id), volume_percent);
        entries.insert(keys::muted(tab_id), muted);
        entries.insert(keys::MASTER_VOLUME.to_string(), master_percent);
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
