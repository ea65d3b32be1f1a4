//! Grouping of error codes by area

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Area an error code belongs to, taken from its thousands digit.
/// Unassigned ranges count as `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Student,
    Import,
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            1 => Self::Auth,
            2 => Self::Student,
            3 => Self::Import,
            _ => Self::System,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Student => "student",
            Self::Import => "import",
            Self::System => "system",
        }
    }

    /// Whether retrying the same action could succeed without user changes
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
