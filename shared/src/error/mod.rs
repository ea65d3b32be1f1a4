//! Unified error catalogue for the dashboard
//!
//! - [`ErrorCode`]: Standardized numeric codes for every failure the client surfaces
//! - [`ErrorCategory`]: Classification of codes by domain
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Student record errors
//! - 3xxx: Import errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{ErrorCategory, ErrorCode};
//!
//! let code = ErrorCode::DuplicateIdentity;
//! assert_eq!(code.category(), ErrorCategory::Student);
//! assert_eq!(u16::from(code), 2002);
//! ```

mod category;
mod codes;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
