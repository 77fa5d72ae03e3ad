//! Cross-context message contract.
//!
//! This module defines the request/response types delivered through the
//! external message relay (settings popup, background context).
//!
//! # Contract
//!
//! | Request type | Payload | Response |
//! |--------------|---------|----------|
//! | `GET_TAB_ID` | none | integer tab identity |
//! | `SET_VOLUME` | `volume`: number in `[0,1]` | `{success}` |
//! | `SET_MASTER_VOLUME` | `volume`: number in `[0,1]` | `{success}` |
//! | `SET_MUTE` | `muted`: any (coerced to bool) | `{success:true}` |
//! | `CHECK_MEDIA` | none | `{hasMedia, isPlaying, mediaCount}` |
//! | unrecognized | — | `{success:false, error:"Unknown message type"}` |
//!
//! Requests are parsed leniently ([`Command::from_value`]) because the
//! relay delivers raw JSON from contexts the mixer does not control:
//! a known type with a malformed payload is a validation failure, not an
//! unknown command.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Request parsing and types |
//! | `response` | Reply types and wire error strings |

// ============================================================================
// Submodules
// ============================================================================

/// Request parsing and types.
pub mod command;

/// Reply types.
pub mod response;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::Command;
pub use response::{MediaState, Reply};
