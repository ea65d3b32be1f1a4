//! Statistics Aggregator
//!
//! Derived counts are rebuilt from the full record list every time; nothing
//! here is stored or updated incrementally.
//!
//! Records carry no status of their own, so it is inferred:
//! - duration of living below [`PENDING_DURATION_THRESHOLD`]: pending
//! - otherwise any education above the lowest tier: approved
//! - everything else: rejected
//!
//! A duration that is not a number never counts as pending.

use std::collections::BTreeMap;

use shared::{ApplicationStatus, DashboardStats, StudentRecord};

/// Years of residence below which an application is still pending
pub const PENDING_DURATION_THRESHOLD: f64 = 2.0;

/// Inferred status of one record
pub fn classify(record: &StudentRecord) -> ApplicationStatus {
    match record.duration_years() {
        Some(years) if years < PENDING_DURATION_THRESHOLD => ApplicationStatus::Pending,
        _ if record.education.is_lowest_tier() => ApplicationStatus::Rejected,
        _ => ApplicationStatus::Approved,
    }
}

/// Summary of `records`. Empty buckets are omitted from every map.
pub fn aggregate(records: &[StudentRecord]) -> DashboardStats {
    let mut stats = DashboardStats {
        total_students: records.len() as u64,
        ..DashboardStats::default()
    };

    for record in records {
        match classify(record) {
            ApplicationStatus::Pending => stats.pending_applications += 1,
            ApplicationStatus::Approved => stats.approved_applications += 1,
            ApplicationStatus::Rejected => stats.rejected_applications += 1,
        }

        bump(&mut stats.state_distribution, bucket_name(&record.state));
        bump(
            &mut stats.education_distribution,
            bucket_name(record.education.as_str()),
        );
        if let Some(year) = record.application_year() {
            *stats.yearly_applications.entry(year).or_insert(0) += 1;
        }
    }

    stats
}

fn bump(map: &mut BTreeMap<String, u64>, key: String) {
    *map.entry(key).or_insert(0) += 1;
}

fn bucket_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed.to_string()
    }
}
