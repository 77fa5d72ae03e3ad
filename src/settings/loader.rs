//! One-shot settings loader.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::identifiers::TabId;
use crate::mixer::MixerState;
use crate::relay::Relay;

use super::{SettingsStore, keys};

// ============================================================================
// LoadedSettings
// ============================================================================

/// Outcome of one settings load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadedSettings {
    /// Tab identity, when the relay answered.
    pub tab_id: Option<TabId>,
    /// Seed state for the mixer (defaults where persisted values were
    /// absent, invalid, or unreadable).
    pub state: MixerState,
}

impl Default for LoadedSettings {
    fn default() -> Self {
        Self {
            tab_id: None,
            state: MixerState::default(),
        }
    }
}

// ============================================================================
// SettingsLoader
// ============================================================================

/// Fetches persisted per-tab and master settings once per document lifetime.
///
/// Every failure path degrades to defaults (full volume, unmuted): a tab
/// without loadable settings still gets working volume control, it just
/// starts from scratch.
pub struct SettingsLoader;

impl SettingsLoader {
    /// Loads persisted settings through the relay and store.
    ///
    /// Never fails; relay or store errors are logged and yield
    /// [`LoadedSettings::default`].
    pub async fn load(relay: &dyn Relay, store: &dyn SettingsStore) -> LoadedSettings {
        match Self::try_load(relay, store).await {
            Ok(loaded) => loaded,
            Err(error) => {
                warn!(%error, "Failed to load volume settings, using defaults");
                LoadedSettings::default()
            }
        }
    }

    async fn try_load(relay: &dyn Relay, store: &dyn SettingsStore) -> Result<LoadedSettings> {
        let tab_id = relay
            .tab_id()
            .await
            .map_err(|e| Error::settings_load(format!("tab identity lookup: {e}")))?;

        let mut loaded = LoadedSettings {
            tab_id: Some(tab_id),
            ..LoadedSettings::default()
        };

        if let Some(gain) = percent_gain(store.get(&keys::volume(tab_id)).await?.as_ref()) {
            loaded.state.tab_volume = gain;
        }

        loaded.state.muted = store
            .get(&keys::muted(tab_id))
            .await?
            .as_ref()
            .is_some_and(stored_truthy);

        if let Some(gain) = percent_gain(store.get(keys::MASTER_VOLUME).await?.as_ref()) {
            loaded.state.master_volume = gain;
        }

        debug!(
            %tab_id,
            tab_volume = loaded.state.tab_volume,
            master_volume = loaded.state.master_volume,
            muted = loaded.state.muted,
            "Loaded persisted settings"
        );
        Ok(loaded)
    }
}

/// Validates a persisted percent value and converts it to a `[0,1]` gain.
///
/// Anything that is not a number in `[0, 100]` is ignored (the default
/// is retained), since the store is writable by other contexts.
fn percent_gain(value: Option<&Value>) -> Option<f64> {
    let percent = value?.as_f64()?;
    if (0.0..=100.0).contains(&percent) {
        Some(percent / 100.0)
    } else {
        None
    }
}

/// Boolean coercion for the persisted mute flag.
fn stored_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Tests
// ============================================================================
