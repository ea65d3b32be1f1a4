//! Student Model
//!
//! Field names on the wire follow the server documents exactly
//! (`"Aadhar No"`, `"Migration From City"`, ...). The identity field is
//! `"Aadhar No"`; it is immutable once a record exists.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::util::normalize_identity;

/// Education level (学历)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EducationLevel {
    UG,
    PG,
    PhD,
    Diploma,
    /// Any value the form does not offer, kept verbatim
    Other(String),
}

impl EducationLevel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::UG => "UG",
            Self::PG => "PG",
            Self::PhD => "PhD",
            Self::Diploma => "Diploma",
            Self::Other(value) => value,
        }
    }

    /// Lowest tier of the enumerated levels
    pub fn is_lowest_tier(&self) -> bool {
        matches!(self, Self::Diploma)
    }
}

impl From<String> for EducationLevel {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "ug" => Self::UG,
            "pg" => Self::PG,
            "phd" => Self::PhD,
            "diploma" => Self::Diploma,
            _ => Self::Other(value.trim().to_string()),
        }
    }
}

impl From<&str> for EducationLevel {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EducationLevel> for String {
    fn from(level: EducationLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Student migration record (学生迁移记录)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "Aadhar No", deserialize_with = "identity_from_any")]
    pub aadhar_no: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Gender", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "Migration From City")]
    pub migration_from_city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Education")]
    pub education: EducationLevel,
    #[serde(rename = "Duration of Living", deserialize_with = "string_from_any")]
    pub duration_of_living: String,
    #[serde(
        rename = "applicationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StudentRecord {
    /// Normalized identity value
    pub fn id(&self) -> &str {
        &self.aadhar_no
    }

    /// Duration of living as a number, if it parses
    pub fn duration_years(&self) -> Option<f64> {
        self.duration_of_living
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Calendar year of the application date.
    ///
    /// Accepts `YYYY-MM-DD` and RFC 3339 timestamps.
    pub fn application_year(&self) -> Option<i32> {
        let raw = self.application_date.as_deref()?.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date.year());
        }
        DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.year())
    }

    /// Apply a partial update. The identity is never touched.
    pub fn apply(&mut self, update: &StudentUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(gender) = &update.gender {
            self.gender = Some(gender.clone());
        }
        if let Some(city) = &update.migration_from_city {
            self.migration_from_city = city.clone();
        }
        if let Some(state) = &update.state {
            self.state = state.clone();
        }
        if let Some(education) = &update.education {
            self.education = education.clone();
        }
        if let Some(duration) = &update.duration_of_living {
            self.duration_of_living = duration.clone();
        }
        if let Some(date) = &update.application_date {
            self.application_date = Some(date.clone());
        }
        if let Some(notes) = &update.notes {
            self.notes = Some(notes.clone());
        }
    }

    /// Take every non-identity field from a server-confirmed copy
    pub fn merge_from(&mut self, confirmed: StudentRecord) {
        let id = std::mem::take(&mut self.aadhar_no);
        *self = StudentRecord {
            aadhar_no: id,
            ..confirmed
        };
    }
}

/// Create student payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCreate {
    #[serde(rename = "Aadhar No", deserialize_with = "identity_from_any")]
    pub aadhar_no: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Gender", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "Migration From City")]
    pub migration_from_city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Education")]
    pub education: EducationLevel,
    #[serde(rename = "Duration of Living", deserialize_with = "string_from_any")]
    pub duration_of_living: String,
    #[serde(
        rename = "applicationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StudentCreate {
    /// Basic required-field and format checks.
    ///
    /// Returns one message per failing field.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        let id = normalize_identity(&self.aadhar_no);
        if id.is_empty() {
            problems.push("Aadhar No is required".to_string());
        } else if id.len() != 12 || !id.chars().all(|c| c.is_ascii_digit()) {
            problems.push("Aadhar No must be a 12-digit number".to_string());
        }
        if self.name.trim().is_empty() {
            problems.push("Name is required".to_string());
        }
        if self.email.trim().is_empty() {
            problems.push("Email is required".to_string());
        } else if !is_valid_email(&self.email) {
            problems.push("Email is not a valid address".to_string());
        }
        if self.migration_from_city.trim().is_empty() {
            problems.push("Migration From City is required".to_string());
        }
        if self.state.trim().is_empty() {
            problems.push("State is required".to_string());
        }
        if self.education.as_str().is_empty() {
            problems.push("Education is required".to_string());
        }
        let duration = self.duration_of_living.trim();
        if duration.is_empty() {
            problems.push("Duration of Living is required".to_string());
        } else if !duration.parse::<f64>().is_ok_and(|v| v.is_finite() && v >= 0.0) {
            problems.push("Duration of Living must be a non-negative number".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    /// The record this payload becomes once the server accepts it
    pub fn into_record(self) -> StudentRecord {
        StudentRecord {
            aadhar_no: normalize_identity(&self.aadhar_no),
            name: self.name,
            email: self.email,
            gender: self.gender,
            migration_from_city: self.migration_from_city,
            state: self.state,
            education: self.education,
            duration_of_living: self.duration_of_living,
            application_date: self.application_date,
            notes: self.notes,
        }
    }
}

/// Update student payload
///
/// The identity is accepted for comparison only and never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentUpdate {
    #[serde(rename = "Aadhar No", default, skip_serializing)]
    pub aadhar_no: Option<String>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Gender", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(
        rename = "Migration From City",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub migration_from_city: Option<String>,
    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "Education", default, skip_serializing_if = "Option::is_none")]
    pub education: Option<EducationLevel>,
    #[serde(
        rename = "Duration of Living",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_of_living: Option<String>,
    #[serde(
        rename = "applicationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StudentUpdate {
    /// True when no mutable field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.gender.is_none()
            && self.migration_from_city.is_none()
            && self.state.is_none()
            && self.education.is_none()
            && self.duration_of_living.is_none()
            && self.application_date.is_none()
            && self.notes.is_none()
    }
}

/// Minimal `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            Self::String(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

fn string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
}

fn identity_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    string_from_any(deserializer).map(|s| normalize_identity(&s))
}
