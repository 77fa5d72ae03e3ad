//! Request parsing and types.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// Command
// ============================================================================

/// A request delivered through the message relay.
///
/// Serializes to the wire format (`{"type": "SET_VOLUME", "volume": 0.5}`);
/// parsing goes through [`Command::from_value`] for coercion semantics the
/// derive cannot express.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Query the sender's tab identity.
    #[serde(rename = "GET_TAB_ID")]
    GetTabId,

    /// Set the per-tab gain.
    #[serde(rename = "SET_VOLUME")]
    SetVolume {
        /// Gain in `[0.0, 1.0]`.
        volume: f64,
    },

    /// Set the master gain.
    #[serde(rename = "SET_MASTER_VOLUME")]
    SetMasterVolume {
        /// Gain in `[0.0, 1.0]`.
        volume: f64,
    },

    /// Set the mute flag.
    #[serde(rename = "SET_MUTE")]
    SetMute {
        /// Coerced from any payload value.
        muted: bool,
    },

    /// Query media presence in the tab.
    #[serde(rename = "CHECK_MEDIA")]
    CheckMedia,
}

impl Command {
    /// Parses a raw relay message.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownCommand`] if the `type` field is missing or names
    ///   no known request.
    /// - [`Error::InvalidVolume`] if a volume-carrying request has a
    ///   missing or non-numeric `volume` field. Range validation happens
    ///   later at the command-handler boundary; parsing only requires a
    ///   number.
    ///
    /// `SET_MUTE` never fails: its payload is coerced to a boolean with
    /// JavaScript truthiness (missing, `null`, `false`, `0`, and `""` are
    /// false; everything else is true).
    pub fn from_value(message: &Value) -> Result<Self> {
        let kind = message
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::unknown_command("<missing type>"))?;

        match kind {
            "GET_TAB_ID" => Ok(Self::GetTabId),
            "SET_VOLUME" => Ok(Self::SetVolume {
                volume: volume_field(message)?,
            }),
            "SET_MASTER_VOLUME" => Ok(Self::SetMasterVolume {
                volume: volume_field(message)?,
            }),
            "SET_MUTE" => Ok(Self::SetMute {
                muted: message.get("muted").is_some_and(js_truthy),
            }),
            "CHECK_MEDIA" => Ok(Self::CheckMedia),
            other => Err(Error::unknown_command(other)),
        }
    }
}

/// Extracts a numeric `volume` field, rejecting anything else.
fn volume_field(message: &Value) -> Result<f64> {
    message
        .get("volume")
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::invalid_volume(f64::NAN))
}

/// JavaScript `Boolean()` coercion for the `muted` payload.
fn js_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_parse_set_volume() {
        let command = Command::from_value(&json!({"type": "SET_VOLUME", "volume": 0.5}))
            .expect("parse");
        assert_eq!(command, Command::SetVolume { volume: 0.5 });
    }

    #[test]
    fn test_parse_non_numeric_volume_is_invalid() {
        let err = Command::from_value(&json!({"type": "SET_VOLUME", "volume": "loud"}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidVolume { .. }));

        let err = Command::from_value(&json!({"type": "SET_MASTER_VOLUME"})).unwrap_err();
        assert!(matches!(err, Error::InvalidVolume { .. }));
    }

    #[test]
    fn test_parse_unknown_type() {
        let err = Command::from_value(&json!({"type": "SET_BASS"})).unwrap_err();
        assert!(matches!(err, Error::UnknownCommand { .. }));

        let err = Command::from_value(&json!({"volume": 0.5})).unwrap_err();
        assert!(matches!(err, Error::UnknownCommand { .. }));
    }

    #[test]
    fn test_mute_coercion() {
        let truthy = [json!(true), json!(1), json!("yes"), json!({}), json!([0])];
        for payload in truthy {
            let command = Command::from_value(&json!({"type": "SET_MUTE", "muted": payload}))
                .expect("parse");
            assert_eq!(command, Command::SetMute { muted: true });
        }

        let falsy = [json!(false), json!(0), json!(""), json!(null)];
        for payload in falsy {
            let command = Command::from_value(&json!({"type": "SET_MUTE", "muted": payload}))
                .expect("parse");
            assert_eq!(command, Command::SetMute { muted: false });
        }

        // Missing payload coerces to false.
        let command = Command::from_value(&json!({"type": "SET_MUTE"})).expect("parse");
        assert_eq!(command, Command::SetMute { muted: false });
    }

    #[test]
    fn test_serialize_wire_format() {
        let json = serde_json::to_value(Command::SetVolume { volume: 0.25 }).expect("serialize");
        assert_eq!(json, json!({"type": "SET_VOLUME", "volume": 0.25}));

        let json = serde_json::to_value(Command::CheckMedia).expect("serialize");
        assert_eq!(json, json!({"type": "CHECK_MEDIA"}));
    }
}
