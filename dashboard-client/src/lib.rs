//! Dashboard Client
//!
//! Client-side state layer for the student migration dashboard: session
//! handling, the student record store with derived statistics, CSV bulk
//! import and export downloads, all on top of the remote REST API.
//!
//! # 使用示例
//!
//! ```ignore
//! use dashboard_client::{ClientConfig, Dashboard};
//!
//! let dashboard = Dashboard::connect(ClientConfig::from_env()?)?;
//! if !dashboard.start().await {
//!     dashboard.session().login("admin@example.com", "secret").await?;
//!     dashboard.records().fetch_all().await?;
//! }
//! let stats = dashboard.records().stats().await;
//! println!("{} students", stats.total_students);
//! ```

pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod http;
pub mod import;
pub mod query;
pub mod session;
pub mod stats;
pub mod store;

pub use config::ClientConfig;
pub use dashboard::Dashboard;
pub use error::{ClientError, ClientResult};
pub use export::Exporter;
pub use http::{DashboardApi, NetworkHttpClient};
pub use import::{CsvImporter, ImportReport, ImportState, ParsedCsv};
pub use query::{FilterOptions, Page, SortField, SortOrder, StudentQuery};
pub use session::{FileTokenStorage, MemoryTokenStorage, SessionState, SessionStore, TokenStorage};
pub use stats::{aggregate, classify};
pub use store::{RecordState, RecordStore};

// Re-export shared types for convenience
pub use shared::{
    ApplicationStatus, DashboardStats, EducationLevel, ExportFormat, StudentCreate, StudentRecord,
    StudentUpdate, UserInfo,
};
