//! Dashboard error codes
//!
//! Each failure the client can report has one stable number. The thousands
//! digit names the area (see [`ErrorCategory`](super::ErrorCategory)).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    /// Payload rejected by form or server validation
    ValidationFailed = 1,

    NotAuthenticated = 1001,
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,

    StudentNotFound = 2001,
    DuplicateIdentity = 2002,
    /// Another mutation or import holds the target
    OperationInFlight = 2003,

    MissingColumns = 3001,
    MalformedCsv = 3002,
    InvalidFileExtension = 3003,
    EmptyFile = 3004,

    /// Any non-2xx status outside the mapped ones
    InternalError = 9001,
    InvalidResponse = 9002,
    NetworkError = 9003,
    TimeoutError = 9004,
    ConfigError = 9005,
    StorageError = 9006,
}

impl ErrorCode {
    /// Every code, in numeric order
    pub const ALL: [ErrorCode; 19] = [
        Self::Success,
        Self::ValidationFailed,
        Self::NotAuthenticated,
        Self::InvalidCredentials,
        Self::TokenExpired,
        Self::TokenInvalid,
        Self::StudentNotFound,
        Self::DuplicateIdentity,
        Self::OperationInFlight,
        Self::MissingColumns,
        Self::MalformedCsv,
        Self::InvalidFileExtension,
        Self::EmptyFile,
        Self::InternalError,
        Self::InvalidResponse,
        Self::NetworkError,
        Self::TimeoutError,
        Self::ConfigError,
        Self::StorageError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Text shown to the user
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Done",
            Self::ValidationFailed => "Please check the highlighted fields",
            Self::NotAuthenticated => "Please log in again",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Session has expired",
            Self::TokenInvalid => "Session token is invalid",
            Self::StudentNotFound => "Record no longer exists",
            Self::DuplicateIdentity => "A student with this Aadhar No already exists",
            Self::OperationInFlight => "Another operation is already in progress",
            Self::MissingColumns => "CSV file is missing required columns",
            Self::MalformedCsv => "CSV file could not be read",
            Self::InvalidFileExtension => "Please upload a .csv file",
            Self::EmptyFile => "CSV file is empty",
            Self::InternalError => "The server reported an error",
            Self::InvalidResponse => "Unexpected response from server",
            Self::NetworkError => "Could not reach the server",
            Self::TimeoutError => "The server took too long to respond",
            Self::ConfigError => "Client is misconfigured",
            Self::StorageError => "Could not access local storage",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number that is not an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown error code {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
