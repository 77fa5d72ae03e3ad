//! Document seam: traits abstracting the host page.
//!
//! The mixer never talks to a real DOM directly. It consumes two traits
//! that a host binding implements:
//!
//! | Trait | Responsibility |
//! |-------|----------------|
//! | [`Document`] | Full-subtree media scans + subtree-insertion watch |
//! | [`MediaElement`] | Per-element volume read/write, playback and attachment state |
//!
//! Mutation batches arrive as [`DomEvent`]s over a channel returned by
//! [`Document::observe`]. The binding is expected to scope its watch to the
//! document body (insertions only) and to report, per batch, the playable
//! media elements found among the inserted nodes or their subtrees. The
//! mixer owns the incremental index built from those diffs; the binding
//! owns the tree.

// ============================================================================
// Submodules
// ============================================================================

/// In-memory document for tests and benchmarks.
pub mod sim;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::identifiers::ElementId;

// ============================================================================
// MediaElement
// ============================================================================

/// One playable-media element in the document.
///
/// Implementations are handles: cloning the `Arc` never clones the element,
/// and a handle may outlive the element's attachment to the document
/// ([`is_connected`] then reports `false` and the tracker evicts it).
///
/// [`is_connected`]: MediaElement::is_connected
pub trait MediaElement: Send + Sync {
    /// Stable identity of this handle.
    fn id(&self) -> ElementId;

    /// Current volume of the element, in `[0.0, 1.0]`.
    fn volume(&self) -> f64;

    /// Writes the element's volume.
    ///
    /// The binding clamps to whatever the host accepts; the mixer only
    /// ever writes values already clamped to `[0.0, 1.0]`.
    fn set_volume(&self, volume: f64);

    /// Returns `true` if the element is not currently playing.
    fn is_paused(&self) -> bool;

    /// Returns `true` if the element is still attached to the document.
    fn is_connected(&self) -> bool;
}

// ============================================================================
// DomEvent
// ============================================================================

/// Asynchronous document notification delivered to the mixer.
#[derive(Clone)]
pub enum DomEvent {
    /// Playable media elements found in one batch of subtree insertions.
    ///
    /// The binding reports an inserted node itself if it is playable media,
    /// or the playable media found by scanning the inserted subtree.
    /// Unrelated DOM churn produces no event at all.
    MediaInserted(Vec<Arc<dyn MediaElement>>),

    /// A media element began playback.
    ///
    /// Emitted from a capture-phase play listener so that media which starts
    /// playing is tracked even when its insertion was never observed
    /// (e.g. elements present before the watch was installed).
    PlaybackStarted(Arc<dyn MediaElement>),
}

impl std::fmt::Debug for DomEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MediaInserted(elements) => f
                .debug_tuple("MediaInserted")
                .field(&elements.len())
                .finish(),
            Self::PlaybackStarted(element) => f
                .debug_tuple("PlaybackStarted")
                .field(&element.id())
                .finish(),
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// The host document, as far as the mixer is concerned.
pub trait Document: Send + Sync {
    /// Scans the full subtree for playable-media elements.
    ///
    /// Used for the initial discovery pass and for live media-presence
    /// queries; steady-state discovery goes through [`observe`] instead.
    ///
    /// [`observe`]: Document::observe
    fn media_elements(&self) -> Vec<Arc<dyn MediaElement>>;

    /// Installs a subtree-insertion watch and returns its event stream.
    ///
    /// Dropping the receiver disconnects the watch; the binding must not
    /// block on a full receiver (the channel is unbounded).
    fn observe(&self) -> mpsc::UnboundedReceiver<DomEvent>;
}
