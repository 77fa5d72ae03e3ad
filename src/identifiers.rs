//! Type-safe identifiers for mixer entities.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time:
//!
//! | Type | Identifies |
//! |------|-----------|
//! | [`TabId`] | Browser tab (assigned by the host, reported by the relay) |
//! | [`ElementId`] | Tracked media element (process-local handle identity) |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// ============================================================================
// TabId
// ============================================================================

/// Identity of a browser tab.
///
/// Assigned by the host environment and obtained through the relay's
/// `GET_TAB_ID` request. Used to derive per-tab persisted-settings keys.
/// Serialization is transparent: a `GET_TAB_ID` reply is the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(u32);

impl TabId {
    /// Creates a tab ID from a raw host value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw host value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ElementId
// ============================================================================

/// Process-local counter backing [`ElementId::generate`].
static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a tracked media element.
///
/// Generated once per discovered element and used as the tracked-set key.
/// IDs are never reused within a process, so a detached-then-reattached
/// element (re-discovered through a new handle) is a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Generates a fresh, process-unique element ID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates an element ID from a raw value.
    ///
    /// Intended for tests and custom document bindings.
    #[inline]
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element-{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
