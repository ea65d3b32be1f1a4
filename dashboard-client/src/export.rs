//! Server-side export download

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::ExportFormat;

use crate::error::ClientResult;
use crate::http::DashboardApi;

pub struct Exporter {
    api: Arc<dyn DashboardApi>,
}

impl Exporter {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self { api }
    }

    /// Raw export bytes as produced by the server
    pub async fn fetch(&self, format: ExportFormat) -> ClientResult<Vec<u8>> {
        self.api.export(format).await
    }

    /// Download the export into `dir` as `students_data.<ext>`.
    ///
    /// Returns the written path. An existing file is replaced.
    pub async fn save_to(&self, format: ExportFormat, dir: impl AsRef<Path>) -> ClientResult<PathBuf> {
        let bytes = match self.fetch(format).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%format, error = %e, "Export failed");
                return Err(e);
            }
        };

        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format.file_name());
        tokio::fs::write(&path, &bytes).await?;

        tracing::info!(%format, path = %path.display(), bytes = bytes.len(), "Export saved");
        Ok(path)
    }
}
