//! Client-related types shared between the API and its consumers
//!
//! Request/response bodies of the remote dashboard API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::StudentRecord;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// User information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl UserInfo {
    /// Identity built from a bare subject claim (the admin email)
    pub fn from_subject(subject: &str) -> Self {
        Self {
            id: subject.to_string(),
            username: subject.split('@').next().unwrap_or(subject).to_string(),
            email: subject.to_string(),
            role: "admin".to_string(),
        }
    }
}

/// Decoded session token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch
    pub exp: Option<i64>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub user: Option<UserInfo>,
}

impl TokenClaims {
    /// Identity carried by the token, if any
    pub fn user_info(&self) -> Option<UserInfo> {
        self.user
            .clone()
            .or_else(|| self.sub.as_deref().map(UserInfo::from_subject))
    }
}

// =============================================================================
// Student API DTOs
// =============================================================================

/// Error body returned with every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Plain acknowledgement (`{ "message": ... }`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// Body of a create/update response.
///
/// Some deployments echo the stored record, others only acknowledge.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MutationResponse {
    Record(StudentRecord),
    Ack(MessageResponse),
}

impl MutationResponse {
    pub fn into_record(self) -> Option<StudentRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Ack(_) => None,
        }
    }
}

/// CSV upload result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Missing when every row was a duplicate
    #[serde(default)]
    pub inserted_records: u64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    /// Query-string value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    /// File name the server suggests for downloads
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Csv => "students_data.csv",
            Self::Pdf => "students_data.pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
