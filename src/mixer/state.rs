//! Mixer gain state.

// ============================================================================
// Imports
// ============================================================================

use super::resolver::resolve;

// ============================================================================
// MixerState
// ============================================================================

/// The three scalars feeding the volume resolver.
///
/// One instance per document context. Mutated only by the command handler
/// (and seeded once by the settings loader); read by full-set applications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerState {
    /// Per-tab gain in `[0.0, 1.0]`.
    pub tab_volume: f64,
    /// Master gain in `[0.0, 1.0]`, shared across tabs via persisted settings.
    pub master_volume: f64,
    /// Mute flag; wins over both gains.
    pub muted: bool,
}

impl Default for MixerState {
    fn default() -> Self {
        Self {
            tab_volume: 1.0,
            master_volume: 1.0,
            muted: false,
        }
    }
}

impl MixerState {
    /// Resolves the effective volume for an element's captured original volume.
    #[inline]
    #[must_use]
    pub fn effective(&self, original_volume: f64) -> f64 {
        resolve(
            original_volume,
            self.tab_volume,
            self.master_volume,
            self.muted,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
