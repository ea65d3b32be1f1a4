//! Client error types

use shared::error::ErrorCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never reached the server
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Server rejected the payload shape/content
    #[error("Validation error: {0}")]
    Validation(String),

    /// Add rejected because the identity already exists
    #[error("Student {id} already exists")]
    DuplicateIdentity { id: String },

    /// Update/delete target does not exist
    #[error("Student {id} not found")]
    NotFound { id: String },

    /// CSV header lacks required columns
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Upload rejected before parsing (wrong extension)
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    /// Upload has no content
    #[error("CSV file is empty")]
    EmptyFile,

    /// CSV content could not be parsed
    #[error("CSV error: {0}")]
    Csv(String),

    /// Persisted token could not be decoded
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Persisted token is past its expiry
    #[error("Token expired")]
    ExpiredToken,

    /// Authentication required or credentials rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Another operation on the same target is still in flight
    #[error("Operation already in progress for {0}")]
    Busy(String),

    /// Non-2xx response outside the mapped statuses
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local storage error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Catalogue code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network(_) => ErrorCode::NetworkError,
            Self::Timeout => ErrorCode::TimeoutError,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::DuplicateIdentity { .. } => ErrorCode::DuplicateIdentity,
            Self::NotFound { .. } => ErrorCode::StudentNotFound,
            Self::MissingColumns(_) => ErrorCode::MissingColumns,
            Self::InvalidFile(_) => ErrorCode::InvalidFileExtension,
            Self::EmptyFile => ErrorCode::EmptyFile,
            Self::Csv(_) => ErrorCode::MalformedCsv,
            Self::InvalidToken(_) => ErrorCode::TokenInvalid,
            Self::ExpiredToken => ErrorCode::TokenExpired,
            Self::Unauthorized(_) => ErrorCode::NotAuthenticated,
            Self::Busy(_) => ErrorCode::OperationInFlight,
            Self::Server { .. } => ErrorCode::InternalError,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidResponse,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::StorageError,
        }
    }

    /// Text to show the person at the keyboard
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(message) | Self::Validation(message) | Self::Csv(message) => {
                message.clone()
            }
            Self::Server { message, .. } if !message.is_empty() => message.clone(),
            Self::MissingColumns(columns) => {
                format!("{}: {}", self.code().message(), columns.join(", "))
            }
            _ => self.code().message().to_string(),
        }
    }

    /// Failures that mean the caller's view of the list is stale
    pub fn requires_refresh(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::DuplicateIdentity { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<csv::Error> for ClientError {
    fn from(err: csv::Error) -> Self {
        ClientError::Csv(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
