//! The in-page media-volume controller.
//!
//! | Component | Responsibility |
//! |-----------|----------------|
//! | [`ElementTracker`] | Live set of known media elements |
//! | [`resolve`] | Pure effective-volume computation |
//! | [`UpdateScheduler`] | Throttled + debounced application |
//! | [`Mixer`] | Command handling, lifecycle, full-set application |
//!
//! Data flow: the settings loader seeds [`MixerState`], the tracker
//! discovers elements (initial scan + mutation watch), and every state or
//! tracker change asks the scheduler to run; the scheduler invokes the
//! resolver per tracked element and writes the result. The command handler
//! is the single external entry point that mutates state at runtime.
//!
//! # Example
//!
//! ```
//! use tab_mixer::dom::sim::SimDocument;
//! use tab_mixer::{MediaElement, Mixer};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tab_mixer::Result<()> {
//! let document = SimDocument::new();
//! let video = document.insert_media(0.8);
//!
//! let mixer = Mixer::attach(document);
//! mixer.set_tab_volume(0.5)?;
//! mixer.apply_now();
//! assert_eq!(video.volume(), 0.4);
//!
//! mixer.teardown();
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Effective-volume resolution.
pub mod resolver;

/// Rate limiting for volume application.
pub mod scheduler;

/// Mixer gain state.
pub mod state;

/// Live set of known media elements.
pub mod tracker;

// ============================================================================
// Re-exports
// ============================================================================

pub use resolver::{clamp_volume, resolve};
pub use scheduler::UpdateScheduler;
pub use state::MixerState;
pub use tracker::{ElementTracker, MediaHandle};

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::dom::{Document, DomEvent};
use crate::error::{Error, Result};
use crate::identifiers::TabId;
use crate::protocol::{Command, MediaState, Reply};
use crate::relay::Relay;
use crate::settings::{SettingsLoader, SettingsStore};

// ============================================================================
// MixerConfig
// ============================================================================

/// Tunable intervals for one mixer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixerConfig {
    /// Trailing-debounce delay for full-set applications (~one frame).
    pub debounce: Duration,
    /// Leading-throttle minimum interval between applications.
    pub min_apply_interval: Duration,
    /// Period of the stale-handle sweep.
    pub sweep_interval: Duration,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(16),
            min_apply_interval: Duration::from_millis(50),
            sweep_interval: Duration::from_secs(5),
        }
    }
}

// ============================================================================
// Mixer
// ============================================================================

/// Per-document volume mixer handle.
///
/// Cloning shares the same underlying mixer. Construction installs the
/// mutation watch and the periodic sweep; [`teardown`] must run on page
/// unload to stop both (dropping the last handle does not).
///
/// [`teardown`]: Mixer::teardown
#[derive(Clone)]
pub struct Mixer {
    inner: Arc<MixerInner>,
}

struct MixerInner {
    document: Arc<dyn Document>,
    state: Mutex<MixerState>,
    tab_id: Mutex<Option<TabId>>,
    tracker: ElementTracker,
    scheduler: UpdateScheduler,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    torn_down: AtomicBool,
}

impl Mixer {
    /// Attaches a mixer to a document with default intervals.
    ///
    /// Performs the initial discovery scan and spawns the mutation-observer
    /// and sweep tasks.
    #[must_use]
    pub fn attach(document: Arc<dyn Document>) -> Self {
        Self::attach_with_config(document, MixerConfig::default())
    }

    /// Attaches a mixer with custom intervals.
    #[must_use]
    pub fn attach_with_config(document: Arc<dyn Document>, config: MixerConfig) -> Self {
        let events = document.observe();

        let inner = Arc::new(MixerInner {
            document,
            state: Mutex::new(MixerState::default()),
            tab_id: Mutex::new(None),
            tracker: ElementTracker::new(),
            scheduler: UpdateScheduler::new(config.debounce, config.min_apply_interval),
            tasks: Mutex::new(Vec::new()),
            torn_down: AtomicBool::new(false),
        });

        // Initial scan runs before the observer task so media already in the
        // document gets its volume applied without waiting for an event.
        {
            let state = *inner.state.lock();
            inner.tracker.discover(inner.document.as_ref(), &state);
        }

        let observer = tokio::spawn(MixerInner::run_observer(Arc::clone(&inner), events));
        let sweeper = tokio::spawn(MixerInner::run_sweeper(
            Arc::clone(&inner),
            config.sweep_interval,
        ));
        inner.tasks.lock().extend([observer, sweeper]);

        Self { inner }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Sets the per-tab gain and requests a debounced full-set update.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidVolume`] for non-finite values or values outside
    /// `[0.0, 1.0]`; state is left unchanged. [`Error::TornDown`] after
    /// teardown.
    pub fn set_tab_volume(&self, volume: f64) -> Result<()> {
        self.ensure_live()?;
        validate_volume(volume)?;

        self.inner.state.lock().tab_volume = volume;
        self.schedule_update();
        Ok(())
    }

    /// Sets the master gain and requests a debounced full-set update.
    ///
    /// # Errors
    ///
    /// Same contract as [`set_tab_volume`](Mixer::set_tab_volume).
    pub fn set_master_volume(&self, volume: f64) -> Result<()> {
        self.ensure_live()?;
        validate_volume(volume)?;

        self.inner.state.lock().master_volume = volume;
        self.schedule_update();
        Ok(())
    }

    /// Sets the mute flag and requests a debounced full-set update.
    ///
    /// # Errors
    ///
    /// Only [`Error::TornDown`]; any boolean is valid.
    pub fn set_mute(&self, muted: bool) -> Result<()> {
        self.ensure_live()?;

        self.inner.state.lock().muted = muted;
        self.schedule_update();
        Ok(())
    }

    /// Reports media presence. Read-only, never rate-limited.
    ///
    /// `has_media` also consults a live document scan so media present but
    /// not yet tracked (inserted before the watch, never played) reports
    /// `true`.
    #[must_use]
    pub fn query_media_state(&self) -> MediaState {
        if self.inner.torn_down.load(Ordering::SeqCst) {
            return MediaState {
                has_media: false,
                is_playing: false,
                media_count: 0,
            };
        }

        let media_count = self.inner.tracker.len();
        MediaState {
            has_media: media_count > 0 || !self.inner.document.media_elements().is_empty(),
            is_playing: self.inner.tracker.any_playing(),
            media_count,
        }
    }

    /// Current gain state snapshot.
    #[must_use]
    pub fn state(&self) -> MixerState {
        *self.inner.state.lock()
    }

    /// Tab identity, once the settings loader has obtained it.
    #[must_use]
    pub fn tab_id(&self) -> Option<TabId> {
        *self.inner.tab_id.lock()
    }

    // ========================================================================
    // Wire Entry Point
    // ========================================================================

    /// Handles one raw relay message and returns the reply to send back.
    ///
    /// This is the command entry point the message relay invokes. It never
    /// fails: malformed or unknown requests become structured failure
    /// replies per the wire contract.
    pub fn handle_message(&self, message: &Value) -> Value {
        let command = match Command::from_value(message) {
            Ok(command) => command,
            Err(error) => return Reply::from_error(&error).into_value(),
        };

        let reply = match command {
            Command::GetTabId => match self.tab_id() {
                Some(tab_id) => Reply::TabId(tab_id),
                None => Reply::failure("Tab identity unavailable"),
            },
            Command::SetVolume { volume } => ack(self.set_tab_volume(volume)),
            Command::SetMasterVolume { volume } => ack(self.set_master_volume(volume)),
            Command::SetMute { muted } => ack(self.set_mute(muted)),
            Command::CheckMedia => Reply::Media(self.query_media_state()),
        };

        reply.into_value()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Seeds state from persisted settings and applies it immediately.
    ///
    /// One-shot, intended to run concurrently with initial discovery; the
    /// scheduler's coalescing makes either completion order converge within
    /// one debounce window. Failures inside the loader degrade to defaults.
    pub async fn load_settings(&self, relay: &dyn Relay, store: &dyn SettingsStore) {
        let loaded = SettingsLoader::load(relay, store).await;

        if self.inner.torn_down.load(Ordering::SeqCst) {
            return;
        }

        *self.inner.tab_id.lock() = loaded.tab_id;
        *self.inner.state.lock() = loaded.state;
        self.apply_now();
    }

    /// Requests an immediate full-set application (throttled; degrades to
    /// the debounced path when the gate is closed).
    pub fn apply_now(&self) {
        let inner = Arc::clone(&self.inner);
        self.inner
            .scheduler
            .apply_now_or_schedule(move || MixerInner::apply_all(&inner));
    }

    /// Stops the mutation watch, the sweep, and any pending application,
    /// and clears the tracked set. Invoked on page unload.
    pub fn teardown(&self) {
        if self.inner.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }

        for task in self.inner.tasks.lock().drain(..) {
            task.abort();
        }
        self.inner.scheduler.teardown();
        self.inner.tracker.clear();
        debug!("Mixer torn down");
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn ensure_live(&self) -> Result<()> {
        if self.inner.torn_down.load(Ordering::SeqCst) {
            return Err(Error::TornDown);
        }
        Ok(())
    }

    fn schedule_update(&self) {
        let inner = Arc::clone(&self.inner);
        self.inner
            .scheduler
            .schedule(move || MixerInner::apply_all(&inner));
    }
}

impl MixerInner {
    /// Writes the resolved volume to every tracked element.
    ///
    /// Walks a stable snapshot and lazily evicts handles found detached
    /// during the walk.
    fn apply_all(inner: &Arc<MixerInner>) {
        if inner.torn_down.load(Ordering::SeqCst) {
            return;
        }

        let state = *inner.state.lock();
        for handle in inner.tracker.snapshot() {
            let element = handle.element();
            if !element.is_connected() {
                inner.tracker.evict(element.id());
                continue;
            }
            element.set_volume(state.effective(handle.original_volume()));
        }
    }

    /// Consumes document events until teardown aborts the task or the
    /// watch disconnects.
    async fn run_observer(
        inner: Arc<MixerInner>,
        mut events: tokio::sync::mpsc::UnboundedReceiver<DomEvent>,
    ) {
        while let Some(event) = events.recv().await {
            match event {
                DomEvent::MediaInserted(elements) => {
                    let state = *inner.state.lock();
                    let new = elements
                        .into_iter()
                        .filter(|element| inner.tracker.track(Arc::clone(element), &state))
                        .count();

                    // Unrelated churn batches carry no media at all; batches
                    // of already-tracked media need no further work either.
                    if new > 0 {
                        debug!(new, "Mutation batch added media");
                        let apply_target = Arc::clone(&inner);
                        inner
                            .scheduler
                            .apply_now_or_schedule(move || MixerInner::apply_all(&apply_target));
                    }
                }

                DomEvent::PlaybackStarted(element) => {
                    let state = *inner.state.lock();
                    inner.tracker.track(element, &state);

                    let apply_target = Arc::clone(&inner);
                    inner
                        .scheduler
                        .schedule(move || MixerInner::apply_all(&apply_target));
                }
            }
        }

        warn!("Document mutation watch disconnected");
    }

    /// Periodic staleness sweep over the tracked set.
    async fn run_sweeper(inner: Arc<MixerInner>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // immediate first tick

        loop {
            ticker.tick().await;
            inner.tracker.sweep();
        }
    }
}

/// Validates a command-boundary volume.
fn validate_volume(volume: f64) -> Result<()> {
    if volume.is_finite() && (0.0..=1.0).contains(&volume) {
        Ok(())
    } else {
        Err(Error::invalid_volume(volume))
    }
}

/// Maps a command result to its acknowledgement reply.
fn ack(result: Result<()>) -> Reply {
    match result {
        Ok(()) => Reply::ok(),
        Err(error) => Reply::from_error(&error),
    }
}

// ============================================================================
// Tests
// ============================================================================
