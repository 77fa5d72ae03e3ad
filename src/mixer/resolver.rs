//! Effective-volume resolution.
//!
//! A pure function kept separate from the rest of the mixer so the
//! clamping policy lives in exactly one place and can be tested without
//! a document or a runtime. Output is always clamped to `[0.0, 1.0]`
//! regardless of upstream validation, so a future caller that skips the
//! command-boundary checks still cannot write an out-of-range volume.

// ============================================================================
// Resolver
// ============================================================================

/// Computes the effective volume for one media element.
///
/// `muted` wins unconditionally; otherwise the element's captured original
/// volume is scaled by the per-tab gain and the master gain, clamped to
/// `[0.0, 1.0]`. A non-finite product clamps to `0.0`.
///
/// # Example
///
/// ```
/// use tab_mixer::mixer::resolve;
///
/// assert_eq!(resolve(1.0, 0.5, 0.8, false), 0.4);
/// assert_eq!(resolve(1.0, 0.5, 0.8, true), 0.0);
/// ```
#[inline]
#[must_use]
pub fn resolve(original_volume: f64, tab_volume: f64, master_volume: f64, muted: bool) -> f64 {
    if muted {
        return 0.0;
    }
    clamp_volume(original_volume * tab_volume * master_volume)
}

/// Clamps a volume to `[0.0, 1.0]`, mapping NaN to `0.0`.
#[inline]
#[must_use]
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}

// ============================================================================
// Tests
// ============================================================================
