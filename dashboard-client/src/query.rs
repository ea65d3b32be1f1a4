//! Client-side list querying: search, filter, sort and page slicing.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use shared::{EducationLevel, StudentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    City,
    State,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// List view parameters
#[derive(Debug, Clone, PartialEq)]
pub struct StudentQuery {
    /// Case-insensitive substring over name, email, city and state
    pub search: String,
    pub cities: Vec<String>,
    pub states: Vec<String>,
    pub education: Vec<EducationLevel>,
    pub sort_by: Option<SortField>,
    pub order: SortOrder,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for StudentQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            cities: Vec::new(),
            states: Vec::new(),
            education: Vec::new(),
            sort_by: None,
            order: SortOrder::Ascending,
            page: 1,
            page_size: 10,
        }
    }
}

/// One page of query results
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub rows: Vec<StudentRecord>,
    /// Matches across all pages
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Distinct values for filter pickers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub cities: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub education: BTreeSet<String>,
}

impl StudentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn in_cities<I: IntoIterator<Item = S>, S: Into<String>>(mut self, cities: I) -> Self {
        self.cities = cities.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_states<I: IntoIterator<Item = S>, S: Into<String>>(mut self, states: I) -> Self {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_education<I: IntoIterator<Item = EducationLevel>>(mut self, levels: I) -> Self {
        self.education = levels.into_iter().collect();
        self
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(field);
        self.order = order;
        self
    }

    pub fn page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn matches(&self, record: &StudentRecord) -> bool {
        let term = self.search.trim().to_lowercase();
        if !term.is_empty() {
            let hit = [
                &record.name,
                &record.email,
                &record.migration_from_city,
                &record.state,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        if !self.cities.is_empty() && !contains_ignore_case(&self.cities, &record.migration_from_city)
        {
            return false;
        }
        if !self.states.is_empty() && !contains_ignore_case(&self.states, &record.state) {
            return false;
        }
        if !self.education.is_empty() && !self.education.contains(&record.education) {
            return false;
        }
        true
    }

    /// Filter and sort `records` without paging
    pub fn filter(&self, records: &[StudentRecord]) -> Vec<StudentRecord> {
        let mut rows: Vec<StudentRecord> =
            records.iter().filter(|r| self.matches(r)).cloned().collect();
        if let Some(field) = self.sort_by {
            // stable sort: equal keys keep list order
            rows.sort_by(|a, b| compare(field, self.order, a, b));
        }
        rows
    }

    /// Filter, sort and slice. Out-of-range pages are clamped to the last page.
    pub fn apply(&self, records: &[StudentRecord]) -> Page {
        let rows = self.filter(records);
        let page_size = self.page_size.max(1);
        let total = rows.len();
        let total_pages = total.div_ceil(page_size);
        let page = self.page.clamp(1, total_pages.max(1));
        let start = (page - 1) * page_size;

        Page {
            rows: rows.into_iter().skip(start).take(page_size).collect(),
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

fn contains_ignore_case(values: &[String], needle: &str) -> bool {
    let needle = needle.trim();
    values.iter().any(|v| v.trim().eq_ignore_ascii_case(needle))
}

/// Unparseable durations sort last in either direction
fn compare(field: SortField, order: SortOrder, a: &StudentRecord, b: &StudentRecord) -> Ordering {
    let directed = |ord: Ordering| match order {
        SortOrder::Ascending => ord,
        SortOrder::Descending => ord.reverse(),
    };
    match field {
        SortField::Name => directed(cmp_text(&a.name, &b.name)),
        SortField::City => directed(cmp_text(&a.migration_from_city, &b.migration_from_city)),
        SortField::State => directed(cmp_text(&a.state, &b.state)),
        SortField::Duration => match (a.duration_years(), b.duration_years()) {
            (Some(x), Some(y)) => directed(x.total_cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Distinct, non-empty values present in `records`
pub fn filter_options(records: &[StudentRecord]) -> FilterOptions {
    let mut options = FilterOptions::default();
    for record in records {
        insert_trimmed(&mut options.cities, &record.migration_from_city);
        insert_trimmed(&mut options.states, &record.state);
        insert_trimmed(&mut options.education, record.education.as_str());
    }
    options
}

fn insert_trimmed(set: &mut BTreeSet<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}
