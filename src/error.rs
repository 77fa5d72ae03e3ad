//! Error types for the tab mixer.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use tab_mixer::{Result, Error};
//!
//! fn example(mixer: &Mixer) -> Result<()> {
//!     mixer.set_tab_volume(0.5)?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Command | [`Error::InvalidVolume`], [`Error::UnknownCommand`] |
//! | Relay | [`Error::RelayUnavailable`] |
//! | Settings | [`Error::SettingsLoad`], [`Error::Store`] |
//! | Lifecycle | [`Error::TornDown`] |
//! | External | [`Error::Json`] |
//!
//! No variant is fatal: command errors are reported back over the wire as
//! structured failures, relay and settings errors are logged and swallowed
//! at their call sites, and the mixer keeps running with whatever state it
//! has. Validation always precedes any state mutation, so a rejected command
//! leaves the mixer unchanged.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Command Errors
    // ========================================================================
    /// Volume value rejected at the command boundary.
    ///
    /// Returned when a volume is non-finite or outside `[0.0, 1.0]`.
    /// State is left unchanged.
    #[error("Invalid volume: {value}")]
    InvalidVolume {
        /// The rejected value.
        value: f64,
    },

    /// Unrecognized command type.
    ///
    /// Returned when the message relay delivers a request type the
    /// command handler does not know.
    #[error("Unknown message type: {command}")]
    UnknownCommand {
        /// The unrecognized request type.
        command: String,
    },

    // ========================================================================
    // Relay Errors
    // ========================================================================
    /// Cross-context relay has no listener.
    ///
    /// Expected transient condition (target context not yet initialized).
    /// Callers log and treat the operation as a no-op.
    #[error("Relay unavailable: {message}")]
    RelayUnavailable {
        /// Description of the relay failure.
        message: String,
    },

    // ========================================================================
    // Settings Errors
    // ========================================================================
    /// Persisted-settings load failed.
    ///
    /// Returned when tab-identity lookup or a store read fails during
    /// initialization. The loader proceeds with default state.
    #[error("Settings load failed: {message}")]
    SettingsLoad {
        /// Description of the load failure.
        message: String,
    },

    /// Persisted store backend failure.
    #[error("Store error: {message}")]
    Store {
        /// Description of the store failure.
        message: String,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// Mixer has been torn down.
    ///
    /// Returned when a mutating command arrives after [`teardown`] ran
    /// on page unload.
    ///
    /// [`teardown`]: crate::Mixer::teardown
    #[error("Mixer torn down")]
    TornDown,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid volume error.
    #[inline]
    pub fn invalid_volume(value: f64) -> Self {
        Self::InvalidVolume { value }
    }

    /// Creates an unknown command error.
    #[inline]
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            command: command.into(),
        }
    }

    /// Creates a relay unavailable error.
    #[inline]
    pub fn relay_unavailable(message: impl Into<String>) -> Self {
        Self::RelayUnavailable {
            message: message.into(),
        }
    }

    /// Creates a settings load error.
    #[inline]
    pub fn settings_load(message: impl Into<String>) -> Self {
        Self::SettingsLoad {
            message: message.into(),
        }
    }

    /// Creates a store error.
    #[inline]
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error was caused by invalid caller input.
    ///
    /// Input errors are reported back over the wire as structured
    /// failures, never logged as mixer faults.
    #[inline]
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidVolume { .. } | Self::UnknownCommand { .. }
        )
    }

    /// Returns `true` if this is an expected transient condition.
    ///
    /// Transient errors are swallowed at their call sites; the worst-case
    /// outcome is volume control temporarily unavailable for one tab.
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RelayUnavailable { .. } | Self::SettingsLoad { .. } | Self::Store { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_volume(1.5);
        assert_eq!(err.to_string(), "Invalid volume: 1.5");
    }

    #[test]
    fn test_unknown_command_display() {
        let err = Error::unknown_command("SET_BASS_BOOST");
        assert_eq!(err.to_string(), "Unknown message type: SET_BASS_BOOST");
    }

    #[test]
    fn test_is_invalid_input() {
        assert!(Error::invalid_volume(f64::NAN).is_invalid_input());
        assert!(Error::unknown_command("X").is_invalid_input());
        assert!(!Error::relay_unavailable("no listener").is_invalid_input());
    }

    #[test]
    fn test_is_transient() {
        assert!(Error::relay_unavailable("no listener").is_transient());
        assert!(Error::settings_load("store read failed").is_transient());
        assert!(Error::store("backend gone").is_transient());
        assert!(!Error::invalid_volume(2.0).is_transient());
        assert!(!Error::TornDown.is_transient());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
