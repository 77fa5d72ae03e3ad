//! Cross-context message relay seam.
//!
//! The relay is an external collaborator: it delivers incoming commands to
//! [`Mixer::handle_message`] and answers the mixer's one outgoing request,
//! the tab-identity lookup used by the settings loader. A missing remote
//! endpoint is an expected transient condition, so relay failures are
//! logged and swallowed by callers, never propagated as fatal.
//!
//! [`Mixer::handle_message`]: crate::Mixer::handle_message

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::identifiers::TabId;

// ============================================================================
// Relay
// ============================================================================

/// Tab-identity provider backed by the host's cross-context channel.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Requests this document's tab identity.
    ///
    /// # Errors
    ///
    /// [`Error::RelayUnavailable`] when the remote endpoint has no listener.
    async fn tab_id(&self) -> Result<TabId>;
}

// ============================================================================
// StaticRelay
// ============================================================================

/// Relay answering with a fixed tab identity.
///
/// For tests and single-tab embeddings.
#[derive(Debug, Clone, Copy)]
pub struct StaticRelay {
    tab_id: TabId,
}

impl StaticRelay {
    /// Creates a relay that always reports `tab_id`.
    #[inline]
    #[must_use]
    pub const fn new(tab_id: TabId) -> Self {
        Self { tab_id }
    }
}

#[async_trait]
impl Relay for StaticRelay {
    async fn tab_id(&self) -> Result<TabId> {
        Ok(self.tab_id)
    }
}

// ============================================================================
// UnavailableRelay
// ============================================================================

/// Relay whose remote endpoint never answers.
///
/// Models a tab where the other context has not initialized yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRelay;

#[async_trait]
impl Relay for UnavailableRelay {
    async fn tab_id(&self) -> Result<TabId> {
        Err(Error::relay_unavailable("no receiving end"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_relay() {
        let relay = StaticRelay::new(TabId::new(7));
        assert_eq!(relay.tab_id().await.expect("tab id"), TabId::new(7));
    }

    #[tokio::test]
    async fn test_unavailable_relay() {
        let err = UnavailableRelay.tab_id().await.unwrap_err();
        assert!(err.is_transient());
    }
}
