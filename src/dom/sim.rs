//! In-memory document for tests and benchmarks.
//!
//! [`SimDocument`] implements [`Document`] over a flat element list and
//! replays the notifications a real document-body mutation watch would
//! deliver: inserting media emits [`DomEvent::MediaInserted`], starting
//! playback emits [`DomEvent::PlaybackStarted`], detaching an element
//! flips its connected flag so sweeps and apply-walks can evict it.
//!
//! [`SimMediaElement`] additionally counts volume writes, which the
//! scheduler tests use to assert debounce coalescing.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::identifiers::ElementId;

use super::{Document, DomEvent, MediaElement};

// ============================================================================
// SimMediaElement
// ============================================================================

/// Simulated playable-media element.
pub struct SimMediaElement {
    id: ElementId,
    volume: Mutex<f64>,
    paused: AtomicBool,
    connected: AtomicBool,
    writes: AtomicUsize,
}

impl SimMediaElement {
    /// Creates a detached element with the given initial volume.
    #[must_use]
    pub fn new(volume: f64) -> Arc<Self> {
        Arc::new(Self {
            id: ElementId::generate(),
            volume: Mutex::new(volume),
            paused: AtomicBool::new(true),
            connected: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        })
    }

    /// Number of `set_volume` calls this element has received.
    #[inline]
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }
}

impl MediaElement for SimMediaElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn volume(&self) -> f64 {
        *self.volume.lock()
    }

    fn set_volume(&self, volume: f64) {
        *self.volume.lock() = volume;
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

// ============================================================================
// SimDocument
// ============================================================================

/// Simulated host document.
///
/// # Example
///
/// ```
/// use tab_mixer::dom::{Document, sim::SimDocument};
///
/// let document = SimDocument::new();
/// let video = document.insert_media(0.8);
/// assert_eq!(document.media_elements().len(), 1);
///
/// document.detach(&video);
/// assert!(document.media_elements().is_empty());
/// ```
#[derive(Default)]
pub struct SimDocument {
    elements: Mutex<Vec<Arc<SimMediaElement>>>,
    observers: Mutex<Vec<mpsc::UnboundedSender<DomEvent>>>,
}

impl SimDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Inserts a media element with the given volume and notifies observers.
    pub fn insert_media(&self, volume: f64) -> Arc<SimMediaElement> {
        let element = SimMediaElement::new(volume);
        element.set_connected(true);
        self.elements.lock().push(Arc::clone(&element));
        self.emit(DomEvent::MediaInserted(vec![
            Arc::clone(&element) as Arc<dyn MediaElement>
        ]));
        element
    }

    /// Inserts a media element without notifying observers.
    ///
    /// Models media present before the mutation watch was installed; only
    /// a full scan or a play event will reveal it.
    pub fn insert_media_silently(&self, volume: f64) -> Arc<SimMediaElement> {
        let element = SimMediaElement::new(volume);
        element.set_connected(true);
        self.elements.lock().push(Arc::clone(&element));
        element
    }

    /// Detaches an element from the document.
    ///
    /// Real documents report removals only through staleness, so no event
    /// is emitted; the mixer notices via sweeps and apply-walks.
    pub fn detach(&self, element: &Arc<SimMediaElement>) {
        element.set_connected(false);
        self.elements.lock().retain(|e| e.id() != element.id());
    }

    /// Starts playback on an element and notifies observers.
    pub fn start_playback(&self, element: &Arc<SimMediaElement>) {
        element.set_paused(false);
        self.emit(DomEvent::PlaybackStarted(
            Arc::clone(element) as Arc<dyn MediaElement>
        ));
    }

    fn emit(&self, event: DomEvent) {
        self.observers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Document for SimDocument {
    fn media_elements(&self) -> Vec<Arc<dyn MediaElement>> {
        self.elements
            .lock()
            .iter()
            .map(|e| Arc::clone(e) as Arc<dyn MediaElement>)
            .collect()
    }

    fn observe(&self) -> mpsc::UnboundedReceiver<DomEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.lock().push(tx);
        rx
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_scan() {
        let document = SimDocument::new();
        document.insert_media(0.5);
        document.insert_media(1.0);
        assert_eq!(document.media_elements().len(), 2);
    }

    #[test]
    fn test_detach_disconnects() {
        let document = SimDocument::new();
        let element = document.insert_media(1.0);
        assert!(element.is_connected());

        document.detach(&element);
        assert!(!element.is_connected());
        assert!(document.media_elements().is_empty());
    }

    #[tokio::test]
    async fn test_observer_sees_insertions() {
        let document = SimDocument::new();
        let mut rx = document.observe();

        document.insert_media(0.7);

        match rx.recv().await {
            Some(DomEvent::MediaInserted(elements)) => assert_eq!(elements.len(), 1),
            other => panic!("expected MediaInserted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_silent_insert_emits_nothing() {
        let document = SimDocument::new();
        let mut rx = document.observe();

        let element = document.insert_media_silently(0.7);
        assert!(rx.try_recv().is_err());

        // A play event still reveals it.
        document.start_playback(&element);
        match rx.recv().await {
            Some(DomEvent::PlaybackStarted(e)) => assert_eq!(e.id(), element.id()),
            other => panic!("expected PlaybackStarted, got {other:?}"),
        }
    }

    #[test]
    fn test_write_count() {
        let element = SimMediaElement::new(1.0);
        element.set_volume(0.5);
        element.set_volume(0.25);
        assert_eq!(element.write_count(), 2);
        assert_eq!(element.volume(), 0.25);
    }
}
