//! Structured error types for the Platen pipeline.
//!
//! Measurement and layout never fail: malformed geometry degrades to safe
//! values. The two real error sources are JSON input and strict-mode
//! ordering violations during command emission.

use thiserror::Error;

/// The unified error type returned by all public Platen API functions.
#[derive(Debug, Error)]
pub enum PlatenError {
    /// JSON input failed to parse as a valid Platen document.
    #[error("Failed to parse document: {source}{}", hint_suffix(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A render item asked the print head to move up the page while
    /// strict mode was enabled.
    #[error("Backward paper movement from y={from} to y={to} (strict mode)")]
    BackwardMovement { from: f64, to: f64 },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for PlatenError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the Platen document schema. Check node types and field names.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        PlatenError::ParseError { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_carry_a_hint() {
        let err: PlatenError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse document"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn backward_movement_message_names_both_positions() {
        let err = PlatenError::BackwardMovement {
            from: 120.0,
            to: 60.0,
        };
        assert_eq!(
            err.to_string(),
            "Backward paper movement from y=120 to y=60 (strict mode)"
        );
    }
}
