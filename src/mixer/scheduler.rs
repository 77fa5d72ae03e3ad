//! Rate limiting for effective-volume application.
//!
//! Two distinct triggers want two distinct policies:
//!
//! | Trigger | Policy | Default |
//! |---------|--------|---------|
//! | Newly discovered media, settings load | Leading throttle | 50 ms minimum interval |
//! | State changes, mutation bursts | Trailing debounce | 16 ms (~one frame) |
//!
//! The debounce keeps a single nullable pending slot: scheduling while a
//! task is pending is a no-op, and the slot is cleared only when the task
//! actually runs, so N triggers within one window collapse into exactly one
//! application that reads the latest state at fire time. The throttle gates
//! the immediate path; when the gate is closed the request degrades to the
//! debounced path instead of being dropped, so the most recent state always
//! reaches the elements.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::trace;

// ============================================================================
// UpdateScheduler
// ============================================================================

/// Coalesces full-set volume applications.
///
/// The closure passed to [`schedule`] or [`apply_now_or_schedule`] performs
/// the actual walk over the tracked set; the scheduler only decides when
/// (and whether) it runs.
///
/// [`schedule`]: UpdateScheduler::schedule
/// [`apply_now_or_schedule`]: UpdateScheduler::apply_now_or_schedule
pub struct UpdateScheduler {
    debounce: Duration,
    min_interval: Duration,
    pending: Arc<AtomicBool>,
    pending_task: Mutex<Option<JoinHandle<()>>>,
    last_apply: Arc<Mutex<Option<Instant>>>,
}

impl UpdateScheduler {
    /// Creates a scheduler with the given debounce delay and minimum
    /// inter-application interval.
    #[must_use]
    pub fn new(debounce: Duration, min_interval: Duration) -> Self {
        Self {
            debounce,
            min_interval,
            pending: Arc::new(AtomicBool::new(false)),
            pending_task: Mutex::new(None),
            last_apply: Arc::new(Mutex::new(None)),
        }
    }

    /// Requests a debounced application.
    ///
    /// No-op if one is already pending; the pending task will see the
    /// latest state when it fires.
    pub fn schedule<F>(&self, apply: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.pending.swap(true, Ordering::SeqCst) {
            trace!("Update already scheduled");
            return;
        }

        let pending = Arc::clone(&self.pending);
        let last_apply = Arc::clone(&self.last_apply);
        let debounce = self.debounce;

        let task = tokio::spawn(async move {
            sleep(debounce).await;
            // Clear the slot before applying so a trigger arriving during
            // the walk schedules a fresh window instead of being lost.
            pending.store(false, Ordering::SeqCst);
            apply();
            *last_apply.lock() = Some(Instant::now());
        });

        *self.pending_task.lock() = Some(task);
    }

    /// Applies immediately if the throttle gate is open, otherwise falls
    /// back to [`schedule`].
    ///
    /// Used where near-immediate reflection matters (a just-tracked element,
    /// the settings loader's seed). A closed gate never drops the request.
    ///
    /// [`schedule`]: UpdateScheduler::schedule
    pub fn apply_now_or_schedule<F>(&self, apply: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut last_apply = self.last_apply.lock();
            let gate_open = match *last_apply {
                Some(at) => at.elapsed() >= self.min_interval,
                None => true,
            };

            if gate_open {
                *last_apply = Some(Instant::now());
                drop(last_apply);
                apply();
                return;
            }
        }

        trace!("Throttle gate closed, degrading to debounced update");
        self.schedule(apply);
    }

    /// Returns `true` if a debounced application is pending.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Cancels any pending application.
    ///
    /// Only called on teardown; superseding during normal operation is
    /// implicit (new triggers no-op while the slot is occupied).
    pub fn teardown(&self) {
        if let Some(task) = self.pending_task.lock().take() {
            task.abort();
        }
        self.pending.store(false, Ordering::SeqCst);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;

    const DEBOUNCE: Duration = Duration::from_millis(16);
    const MIN_INTERVAL: Duration = Duration::from_millis(50);

    fn counting_apply(counter: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_coalesces_burst() {
        let scheduler = UpdateScheduler::new(DEBOUNCE, MIN_INTERVAL);
        let applied = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            scheduler.schedule(counting_apply(&applied));
        }
        assert!(scheduler.is_pending());

        sleep(DEBOUNCE * 2).await;
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_window_after_fire() {
        let scheduler = UpdateScheduler::new(DEBOUNCE, MIN_INTERVAL);
        let applied = Arc::new(AtomicUsize::new(0));

        scheduler.schedule(counting_apply(&applied));
        sleep(DEBOUNCE * 2).await;

        scheduler.schedule(counting_apply(&applied));
        sleep(DEBOUNCE * 2).await;

        assert_eq!(applied.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_gate_open_applies_inline() {
        let scheduler = UpdateScheduler::new(DEBOUNCE, MIN_INTERVAL);
        let applied = Arc::new(AtomicUsize::new(0));

        scheduler.apply_now_or_schedule(counting_apply(&applied));
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_gate_closed_degrades_to_debounce() {
        let scheduler = UpdateScheduler::new(DEBOUNCE, MIN_INTERVAL);
        let applied = Arc::new(AtomicUsize::new(0));

        scheduler.apply_now_or_schedule(counting_apply(&applied));
        scheduler.apply_now_or_schedule(counting_apply(&applied));
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert!(scheduler.is_pending());

        // The degraded request still lands.
        sleep(DEBOUNCE * 2).await;
        assert_eq!(applied.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_gate_reopens() {
        let scheduler = UpdateScheduler::new(DEBOUNCE, MIN_INTERVAL);
        let applied = Arc::new(AtomicUsize::new(0));

        scheduler.apply_now_or_schedule(counting_apply(&applied));
        sleep(MIN_INTERVAL * 2).await;
        scheduler.apply_now_or_schedule(counting_apply(&applied));

        assert_eq!(applied.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending() {
        let scheduler = UpdateScheduler::new(DEBOUNCE, MIN_INTERVAL);
        let applied = Arc::new(AtomicUsize::new(0));

        scheduler.schedule(counting_apply(&applied));
        scheduler.teardown();

        sleep(DEBOUNCE * 2).await;
        assert_eq!(applied.load(Ordering::SeqCst), 0);
        assert!(!scheduler.is_pending());
    }
}
