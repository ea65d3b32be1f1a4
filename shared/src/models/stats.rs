//! Dashboard statistics model
//!
//! Derived data only. Never persisted, never sent back to the server.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tri-state application classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Aggregate counts over the current record list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: u64,
    pub pending_applications: u64,
    pub approved_applications: u64,
    pub rejected_applications: u64,
    /// Students per origin state
    pub state_distribution: BTreeMap<String, u64>,
    /// Students per education level
    pub education_distribution: BTreeMap<String, u64>,
    /// Applications per calendar year
    pub yearly_applications: BTreeMap<i32, u64>,
}

impl DashboardStats {
    /// Count for one classification bucket
    pub fn count(&self, status: ApplicationStatus) -> u64 {
        match status {
            ApplicationStatus::Pending => self.pending_applications,
            ApplicationStatus::Approved => self.approved_applications,
            ApplicationStatus::Rejected => self.rejected_applications,
        }
    }
}
