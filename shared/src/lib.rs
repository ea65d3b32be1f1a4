//! Shared types for the migration dashboard
//!
//! Wire types of the remote dashboard API, derived statistics types and
//! the error code catalogue used by every consumer.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{ExportFormat, LoginRequest, LoginResponse, TokenClaims, UploadResponse, UserInfo};
pub use error::{ErrorCategory, ErrorCode};
pub use models::{
    ApplicationStatus, DashboardStats, EducationLevel, StudentCreate, StudentRecord, StudentUpdate,
};
