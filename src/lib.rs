//! Tab Mixer - per-tab media volume control core.
//!
//! This library implements the in-page half of a tab volume mixer: it
//! discovers audio/video elements in a live, mutating document, tracks
//! them without re-scanning the whole page, computes an effective volume
//! from the per-tab gain, the master gain, and a mute flag, and applies
//! it with bounded latency under high-frequency change events.
//!
//! # Architecture
//!
//! The mixer sits between three host-provided collaborators, each behind
//! a trait:
//!
//! - **Document** ([`dom::Document`]): full-subtree media scans plus a
//!   subtree-insertion watch delivering mutation batches
//! - **Store** ([`settings::SettingsStore`]): persisted per-tab and master
//!   settings, shared with the settings UI
//! - **Relay** ([`relay::Relay`]): cross-context channel providing tab
//!   identity and delivering commands to [`Mixer::handle_message`]
//!
//! Key design principles:
//!
//! - Incremental index with periodic reconciliation: mutation-batch diffs
//!   update the tracked set; a 5 s sweep plus lazy eviction during
//!   apply-walks bound staleness
//! - Two-tier rate limiting: a leading throttle for near-immediate
//!   feedback, a trailing one-frame debounce that collapses bursts into a
//!   single full-set write reflecting the latest state
//! - Nothing is fatal: invalid input becomes a structured failure reply,
//!   relay/store failures degrade to defaults
//!
//! # Quick Start
//!
//! ```
//! use tab_mixer::dom::sim::SimDocument;
//! use tab_mixer::{MediaElement, Mixer, Result};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     // A real embedding passes its document binding here.
//!     let document = SimDocument::new();
//!     let video = document.insert_media(0.8);
//!
//!     let mixer = Mixer::attach(document);
//!     mixer.set_tab_volume(0.5)?;
//!     mixer.apply_now();
//!     assert_eq!(video.volume(), 0.4);
//!
//!     mixer.teardown();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dom`] | Document and media-element seams |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`mixer`] | Tracker, resolver, scheduler, [`Mixer`] |
//! | [`protocol`] | Relay message contract |
//! | [`relay`] | Cross-context relay seam |
//! | [`settings`] | Persisted store seam and loader |

// ============================================================================
// Modules
// ============================================================================

/// Document seam: traits abstracting the host page.
pub mod dom;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for mixer entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// The in-page media-volume controller.
pub mod mixer;

/// Cross-context message contract.
pub mod protocol;

/// Cross-context message relay seam.
pub mod relay;

/// Persisted settings store and loader.
pub mod settings;

// ============================================================================
// Re-exports
// ============================================================================

// Core types
pub use mixer::{Mixer, MixerConfig, MixerState, resolve};

// Document seam
pub use dom::{Document, DomEvent, MediaElement};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ElementId, TabId};

// Wire contract
pub use protocol::{Command, MediaState, Reply};

// Collaborator seams
pub use relay::Relay;
pub use settings::{SettingsLoader, SettingsStore};
