//! Data models
//!
//! Shared between the dashboard client and anything that renders its state.

pub mod stats;
pub mod student;

// Re-exports
pub use stats::*;
pub use student::*;
