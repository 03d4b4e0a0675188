//! Structured configuration errors.

use serde::Serialize;
use std::fmt;

use super::error_code::ErrorCode;

/// One configuration problem, located by a JSON pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigError {
    pub code: ErrorCode,
    /// JSON pointer to the offending field (e.g. `/mcl/inflation`).
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ConfigError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a suggestion for fixing the problem.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_hint() {
        let err = ConfigError::new(ErrorCode::OutOfRange, "/graph/window", "window must be at least 1")
            .with_hint("Use 3 for the classic setting");
        assert_eq!(
            err.to_string(),
            "[out_of_range] /graph/window: window must be at least 1 (hint: Use 3 for the classic setting)"
        );
    }

    #[test]
    fn test_serialize_skips_missing_hint() {
        let err = ConfigError::new(ErrorCode::UnknownField, "/bogus", "unrecognized field \"bogus\"");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "unknown_field");
        assert!(json.get("hint").is_none());
    }
}
