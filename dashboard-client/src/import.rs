//! CSV Import Pipeline
//!
//! `Idle -> Parsing -> Validated -> Uploading -> Idle`. Any failure goes
//! straight back to `Idle`. The raw file is uploaded as multipart once its
//! header has passed the required-column gate; nothing is sent otherwise.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use csv::{ReaderBuilder, Trim};

use crate::error::{ClientError, ClientResult};
use crate::http::DashboardApi;
use crate::store::RecordStore;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Importer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Idle,
    Parsing,
    Validated,
    Uploading,
}

/// One data row, header name to cell value
pub type CsvRow = BTreeMap<String, String>;

/// Parsed CSV file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCsv {
    /// Header names in file order (trimmed)
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

/// Outcome of a completed import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Data rows in the uploaded file
    pub rows: usize,
    /// Rows the server reported as new
    pub inserted: u64,
    /// Whether the record list was reloaded afterwards
    pub refreshed: bool,
    pub message: Option<String>,
}

/// Parse comma-delimited bytes with a header row.
///
/// Blank lines are skipped. A row whose field count differs from the
/// header fails the whole parse.
pub fn parse_csv(bytes: &[u8]) -> ClientResult<ParsedCsv> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(ClientError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ClientError::Csv("header row is empty".into()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if record.len() != headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(ClientError::Csv(format!(
                "line {line}: expected {} fields, found {}",
                headers.len(),
                record.len()
            )));
        }
        let row = headers
            .iter()
            .cloned()
            .zip(record.iter().map(|field| field.trim().to_string()))
            .collect();
        rows.push(row);
    }

    Ok(ParsedCsv { headers, rows })
}

/// Required columns absent from `headers`, compared case-insensitively.
///
/// Returned in the order they were required.
pub fn missing_columns<S: AsRef<str>>(headers: &[String], required: &[S]) -> Vec<String> {
    let present: BTreeSet<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    required
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| !present.contains(&c.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn check_file_name(file_name: &str) -> ClientResult<()> {
    let is_csv = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(ClientError::InvalidFile(format!(
            "{file_name} is not a .csv file"
        )))
    }
}

pub struct CsvImporter {
    api: Arc<dyn DashboardApi>,
    records: Arc<RecordStore>,
    required_columns: Vec<String>,
    state: Arc<Mutex<ImportState>>,
}

impl CsvImporter {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        records: Arc<RecordStore>,
        required_columns: Vec<String>,
    ) -> Self {
        Self {
            api,
            records,
            required_columns,
            state: Arc::new(Mutex::new(ImportState::Idle)),
        }
    }

    pub fn state(&self) -> ImportState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn required_columns(&self) -> &[String] {
        &self.required_columns
    }

    /// Read a file from disk and import it
    pub async fn import_file(&self, path: impl AsRef<Path>) -> ClientResult<ImportReport> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        check_file_name(&file_name)?;
        let bytes = tokio::fs::read(path).await?;
        self.import(&file_name, bytes).await
    }

    /// Validate and upload one CSV file, then reload the record list
    pub async fn import(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<ImportReport> {
        let run = ImportRun::start(Arc::clone(&self.state))?;

        let result = self.run(&run, file_name, bytes).await;
        if let Err(e) = &result {
            tracing::warn!(file = file_name, error = %e, "CSV import failed");
        }
        result
    }

    async fn run(
        &self,
        run: &ImportRun,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<ImportReport> {
        check_file_name(file_name)?;
        if bytes.is_empty() {
            return Err(ClientError::EmptyFile);
        }

        let parsed = parse_csv(&bytes)?;
        let missing = missing_columns(&parsed.headers, &self.required_columns);
        if !missing.is_empty() {
            return Err(ClientError::MissingColumns(missing));
        }
        run.advance(ImportState::Validated);
        tracing::debug!(file = file_name, rows = parsed.rows.len(), "CSV validated");

        run.advance(ImportState::Uploading);
        let response = self.api.upload_csv(file_name, bytes).await?;
        tracing::info!(
            file = file_name,
            rows = parsed.rows.len(),
            inserted = response.inserted_records,
            "CSV uploaded"
        );

        // 上传已提交，刷新失败只记录不回滚
        let refreshed = match self.records.fetch_all().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Record refresh after import failed");
                false
            }
        };

        Ok(ImportReport {
            rows: parsed.rows.len(),
            inserted: response.inserted_records,
            refreshed,
            message: response.message,
        })
    }
}

/// One import in progress. Puts the importer back to `Idle` on drop.
struct ImportRun {
    state: Arc<Mutex<ImportState>>,
}

impl ImportRun {
    fn start(state: Arc<Mutex<ImportState>>) -> ClientResult<Self> {
        {
            let mut current = state.lock().unwrap_or_else(|e| e.into_inner());
            if *current != ImportState::Idle {
                return Err(ClientError::Busy("csv import".into()));
            }
            *current = ImportState::Parsing;
        }
        tracing::debug!("CSV import started");
        Ok(Self { state })
    }

    fn advance(&self, next: ImportState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }
}

impl Drop for ImportRun {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = ImportState::Idle;
    }
}
