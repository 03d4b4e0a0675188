//! Stable error codes for configuration diagnostics.

use serde::Serialize;
use std::fmt;

/// Machine-readable category of a configuration diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A numeric value lies outside its allowed range.
    OutOfRange,
    /// Two fields contradict each other (e.g. `min_n > max_n`).
    InvalidCombo,
    /// A field the schema does not know.
    UnknownField,
}

impl ErrorCode {
    /// Returns the snake_case name used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfRange => "out_of_range",
            Self::InvalidCombo => "invalid_combo",
            Self::UnknownField => "unknown_field",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
