//! Live set of known media elements.
//!
//! The tracker is an incremental index over the document: seeded by one
//! full scan, updated from mutation-batch diffs, and reconciled by a
//! periodic sweep plus lazy eviction during full-set applications.
//! Membership is re-validated lazily rather than on every DOM change, so
//! unrelated churn never costs a synchronous attachment check.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::dom::{Document, MediaElement};
use crate::identifiers::ElementId;

use super::state::MixerState;

// ============================================================================
// MediaHandle
// ============================================================================

/// One tracked media element plus its captured original volume.
///
/// `original_volume` is the element's own volume setting before the mixer
/// first touched it, captured exactly once when the element enters the
/// tracked set. It is what the gains scale, so unmuting restores the
/// element without re-reading its (mixer-written) live volume.
#[derive(Clone)]
pub struct MediaHandle {
    element: Arc<dyn MediaElement>,
    original_volume: f64,
}

impl MediaHandle {
    /// The underlying element.
    #[inline]
    #[must_use]
    pub fn element(&self) -> &Arc<dyn MediaElement> {
        &self.element
    }

    /// The volume the element had before tracking.
    #[inline]
    #[must_use]
    pub fn original_volume(&self) -> f64 {
        self.original_volume
    }
}

// ============================================================================
// ElementTracker
// ============================================================================

/// The set of currently known media elements for one document.
#[derive(Default)]
pub struct ElementTracker {
    tracked: Mutex<FxHashMap<ElementId, MediaHandle>>,
}

impl ElementTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks an element, applying the currently-effective volume to it.
    ///
    /// Idempotent: an already-tracked element is left untouched, so the
    /// original volume captured at first sight survives repeated discovery
    /// through scans, mutation batches, and play events. Returns `true`
    /// if the element was newly tracked.
    pub fn track(&self, element: Arc<dyn MediaElement>, state: &MixerState) -> bool {
        let id = element.id();
        let mut tracked = self.tracked.lock();
        if tracked.contains_key(&id) {
            return false;
        }

        let original_volume = element.volume();
        element.set_volume(state.effective(original_volume));
        debug!(%id, original_volume, "Tracking media element");

        tracked.insert(
            id,
            MediaHandle {
                element,
                original_volume,
            },
        );
        true
    }

    /// Full-subtree scan: tracks every media element the document reports.
    ///
    /// Returns the number of newly tracked elements. Concurrent mutations
    /// during the scan are not specially ordered; the last full scan wins.
    pub fn discover(&self, document: &dyn Document, state: &MixerState) -> usize {
        let found = document.media_elements();
        let new = found
            .into_iter()
            .filter(|element| self.track(Arc::clone(element), state))
            .count();

        if new > 0 {
            debug!(new, total = self.len(), "Discovery scan tracked new media");
        }
        new
    }

    /// Evicts handles whose element is no longer attached to the document.
    ///
    /// Returns the number of evicted handles.
    pub fn sweep(&self) -> usize {
        let mut tracked = self.tracked.lock();
        let before = tracked.len();
        tracked.retain(|_, handle| handle.element.is_connected());
        let evicted = before - tracked.len();

        if evicted > 0 {
            debug!(evicted, remaining = tracked.len(), "Swept stale media");
        }
        evicted
    }

    /// Removes one handle by ID (lazy eviction during an apply-walk).
    pub fn evict(&self, id: ElementId) {
        if self.tracked.lock().remove(&id).is_some() {
            debug!(%id, "Evicted detached media element");
        }
    }

    /// Stable snapshot of the tracked set, safe to iterate while the
    /// set itself is mutated.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MediaHandle> {
        self.tracked.lock().values().cloned().collect()
    }

    /// Number of tracked elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.lock().len()
    }

    /// Returns `true` if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.lock().is_empty()
    }

    /// Returns `true` if any tracked element is currently playing.
    #[must_use]
    pub fn any_playing(&self) -> bool {
        self.tracked
            .lock()
            .values()
            .any(|handle| !handle.element.is_paused())
    }

    /// Drops every handle (teardown).
    pub fn clear(&self) {
        self.tracked.lock().clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dom::sim::{SimDocument, SimMediaElement};

    fn as_media(element: &Arc<SimMediaElement>) -> Arc<dyn MediaElement> {
        Arc::clone(element) as Arc<dyn MediaElement>
    }

    #[test]
    fn test_track_applies_effective_volume() {
        let tracker = ElementTracker::new();
        let element = SimMediaElement::new(0.8);
        let state = MixerState {
            tab_volume: 0.5,
            master_volume: 1.0,
            muted: false,
        };

        assert!(tracker.track(as_media(&element), &state));
        assert_eq!(element.volume(), 0.4);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_track_is_idempotent() {
        let tracker = ElementTracker::new();
        let element = SimMediaElement::new(0.8);
        let state = MixerState::default();

        assert!(tracker.track(as_media(&element), &state));

        // Change the live volume between discoveries; the captured
        // original must survive the second track().
        element.set_volume(0.1);
        assert!(!tracker.track(as_media(&element), &state));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].original_volume(), 0.8);
        assert_eq!(element.volume(), 0.1);
    }

    #[test]
    fn test_discover_counts_only_new() {
        let document = SimDocument::new();
        document.insert_media(1.0);
        let second = document.insert_media(0.5);

        let tracker = ElementTracker::new();
        let state = MixerState::default();
        tracker.track(as_media(&second), &state);

        assert_eq!(tracker.discover(document.as_ref(), &state), 1);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.discover(document.as_ref(), &state), 0);
    }

    #[test]
    fn test_sweep_evicts_detached() {
        let document = SimDocument::new();
        let element = document.insert_media(1.0);

        let tracker = ElementTracker::new();
        tracker.track(as_media(&element), &MixerState::default());
        assert_eq!(tracker.sweep(), 0);

        document.detach(&element);
        assert_eq!(tracker.sweep(), 1);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_reattached_element_is_new() {
        let document = SimDocument::new();
        let element = document.insert_media(1.0);

        let tracker = ElementTracker::new();
        let state = MixerState::default();
        tracker.track(as_media(&element), &state);

        document.detach(&element);
        tracker.sweep();

        // Reattachment arrives as a fresh handle with a fresh ID.
        let reattached = document.insert_media(0.6);
        assert!(tracker.track(as_media(&reattached), &state));
        assert_eq!(tracker.snapshot()[0].original_volume(), 0.6);
    }

    #[test]
    fn test_any_playing() {
        let document = SimDocument::new();
        let element = document.insert_media(1.0);

        let tracker = ElementTracker::new();
        tracker.track(as_media(&element), &MixerState::default());
        assert!(!tracker.any_playing());

        document.start_playback(&element);
        assert!(tracker.any_playing());
    }
}
