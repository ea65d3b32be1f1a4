//! Dashboard - 统一的根上下文
//!
//! Owns the session store, record store, importer and exporter, all sharing
//! one API client. Views receive `&Dashboard` (or the individual `Arc`s)
//! instead of reaching into global state.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::export::Exporter;
use crate::http::{DashboardApi, NetworkHttpClient};
use crate::import::CsvImporter;
use crate::session::{FileTokenStorage, MemoryTokenStorage, SessionStore, TokenStorage};
use crate::store::RecordStore;

pub struct Dashboard {
    config: ClientConfig,
    api: Arc<dyn DashboardApi>,
    session: Arc<SessionStore>,
    records: Arc<RecordStore>,
    importer: CsvImporter,
    exporter: Exporter,
}

impl Dashboard {
    /// Connect to the configured server over HTTP
    pub fn connect(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let api: Arc<dyn DashboardApi> = Arc::new(NetworkHttpClient::new(&config)?);
        let storage: Arc<dyn TokenStorage> = match &config.token_path {
            Some(path) => Arc::new(FileTokenStorage::new(path)),
            None => Arc::new(MemoryTokenStorage::new()),
        };
        tracing::info!(base_url = %config.base_url, "Dashboard client created");
        Ok(Self::with_api(config, api, storage))
    }

    /// Assemble the stores around an existing API implementation
    pub fn with_api(
        config: ClientConfig,
        api: Arc<dyn DashboardApi>,
        storage: Arc<dyn TokenStorage>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(Arc::clone(&api), storage));
        let records = Arc::new(RecordStore::new(Arc::clone(&api)));
        let importer = CsvImporter::new(
            Arc::clone(&api),
            Arc::clone(&records),
            config.required_columns.clone(),
        );
        let exporter = Exporter::new(Arc::clone(&api));
        Self {
            config,
            api,
            session,
            records,
            importer,
            exporter,
        }
    }

    /// Restore the session and, if signed in, load the record list.
    ///
    /// A failed load is recorded on the record store, not returned.
    pub async fn start(&self) -> bool {
        self.session.restore().await;
        let authenticated = self.session.is_authenticated().await;
        if authenticated {
            if let Err(e) = self.records.fetch_all().await {
                tracing::warn!(error = %e, "Initial student load failed");
            }
        }
        authenticated
    }

    /// End the session and drop every record loaded under it.
    ///
    /// Records are cleared even when removing the persisted token fails.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.session.logout().await;
        self.records.reset().await;
        result
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<dyn DashboardApi> {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn records(&self) -> &Arc<RecordStore> {
        &self.records
    }

    pub fn importer(&self) -> &CsvImporter {
        &self.importer
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }
}
