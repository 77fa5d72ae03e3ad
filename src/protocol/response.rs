//! Reply types.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::Error;
use crate::identifiers::TabId;

// ============================================================================
// Wire Error Strings
// ============================================================================

/// Wire error string for a rejected volume.
pub const INVALID_VOLUME: &str = "Invalid volume";

/// Wire error string for an unrecognized request type.
pub const UNKNOWN_MESSAGE_TYPE: &str = "Unknown message type";

// ============================================================================
// MediaState
// ============================================================================

/// Snapshot answering a `CHECK_MEDIA` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaState {
    /// Whether any media element is known (tracked or visible to a live scan).
    #[serde(rename = "hasMedia")]
    pub has_media: bool,

    /// Whether any tracked element is currently playing.
    #[serde(rename = "isPlaying")]
    pub is_playing: bool,

    /// Number of tracked elements.
    #[serde(rename = "mediaCount")]
    pub media_count: usize,
}

// ============================================================================
// Reply
// ============================================================================

/// A reply sent back through the relay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Integer tab identity (`GET_TAB_ID`).
    TabId(TabId),

    /// Media presence snapshot (`CHECK_MEDIA`).
    Media(MediaState),

    /// Generic acknowledgement for mutating commands.
    Ack {
        /// Whether the command was applied.
        success: bool,
        /// Wire error string when `success` is false.
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Reply {
    /// Successful acknowledgement.
    #[inline]
    #[must_use]
    pub fn ok() -> Self {
        Self::Ack {
            success: true,
            error: None,
        }
    }

    /// Failed acknowledgement with a wire error string.
    #[inline]
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Ack {
            success: false,
            error: Some(error.into()),
        }
    }

    /// Maps a command-handler error to its wire reply.
    ///
    /// Invalid volumes and unknown commands use the fixed contract strings;
    /// anything else carries its display form.
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::InvalidVolume { .. } => Self::failure(INVALID_VOLUME),
            Error::UnknownCommand { .. } => Self::failure(UNKNOWN_MESSAGE_TYPE),
            other => Self::failure(other.to_string()),
        }
    }

    /// Serializes the reply for the relay.
    #[must_use]
    pub fn into_value(self) -> Value {
        serde_json::to_value(&self)
            .unwrap_or_else(|_| json!({ "success": false, "error": "Reply serialization failed" }))
    }
}

// ============================================================================
// Tests
// ============================================================================
