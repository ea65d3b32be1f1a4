//! Record Store
//!
//! Sole owner of the in-memory student list. Every successful mutation
//! recomputes the derived statistics; every failure records the error
//! (last error wins) and hands it back to the caller.

use std::sync::Arc;

use shared::util::normalize_identity;
use shared::{DashboardStats, StudentCreate, StudentRecord, StudentUpdate};
use tokio::sync::RwLock;

use super::in_flight::{InFlight, Mutation};
use crate::error::{ClientError, ClientResult};
use crate::http::DashboardApi;
use crate::stats::aggregate;

/// Record list snapshot
#[derive(Debug, Clone, Default)]
pub struct RecordState {
    pub students: Vec<StudentRecord>,
    pub stats: DashboardStats,
    pub loading: bool,
    pub error: Option<String>,
}

impl RecordState {
    fn find(&self, id: &str) -> Option<usize> {
        self.students.iter().position(|s| s.id() == id)
    }

    fn recompute(&mut self) {
        self.stats = aggregate(&self.students);
    }
}

pub struct RecordStore {
    api: Arc<dyn DashboardApi>,
    state: RwLock<RecordState>,
    in_flight: InFlight,
}

impl RecordStore {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            state: RwLock::new(RecordState::default()),
            in_flight: InFlight::new(),
        }
    }

    /// Current state (cloned)
    pub async fn snapshot(&self) -> RecordState {
        self.state.read().await.clone()
    }

    pub async fn students(&self) -> Vec<StudentRecord> {
        self.state.read().await.students.clone()
    }

    pub async fn stats(&self) -> DashboardStats {
        self.state.read().await.stats.clone()
    }

    pub async fn get(&self, id: &str) -> Option<StudentRecord> {
        let id = normalize_identity(id);
        let state = self.state.read().await;
        state.find(&id).map(|i| state.students[i].clone())
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    /// Drop the list, stats and error (used when the session ends)
    pub async fn reset(&self) {
        *self.state.write().await = RecordState::default();
        tracing::debug!("Record state cleared");
    }

    /// True while a mutation on `id` is waiting for the server
    pub fn is_pending(&self, id: &str) -> bool {
        self.in_flight.is_pending(&normalize_identity(id))
    }

    /// Replace the list with the server's.
    ///
    /// On failure the previous list is kept.
    pub async fn fetch_all(&self) -> ClientResult<usize> {
        self.state.write().await.loading = true;

        let result = self.api.list_students().await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(students) => {
                state.students = dedup_by_identity(students);
                state.recompute();
                state.error = None;
                tracing::info!(count = state.students.len(), "Fetched students");
                Ok(state.students.len())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch students");
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Create a record.
    ///
    /// The identity is supplied by the caller and checked locally before
    /// the request goes out.
    pub async fn add(&self, student: StudentCreate) -> ClientResult<StudentRecord> {
        let id = normalize_identity(&student.aadhar_no);
        let student = StudentCreate {
            aadhar_no: id.clone(),
            ..student
        };

        if let Err(problems) = student.validate() {
            return Err(self.fail(ClientError::Validation(problems.join("; "))).await);
        }
        let _guard = match self.in_flight.acquire(&id, Mutation::Add) {
            Ok(guard) => guard,
            Err(e) => return Err(self.fail(e).await),
        };
        if self.state.read().await.find(&id).is_some() {
            return Err(self.fail(ClientError::DuplicateIdentity { id }).await);
        }

        let confirmed = match self.api.create_student(&student).await {
            Ok(confirmed) => confirmed,
            Err(e) => return Err(self.fail(e).await),
        };
        let record = match confirmed {
            Some(record) if record.id() == id => record,
            Some(record) => {
                tracing::warn!(
                    submitted = %id,
                    returned = %record.id(),
                    "Server echoed a different identity, keeping the submitted record"
                );
                student.into_record()
            }
            None => student.into_record(),
        };

        let mut state = self.state.write().await;
        // 同一 id 可能已由并发的 fetch_all 带回
        match state.find(&id) {
            Some(i) => state.students[i] = record.clone(),
            None => state.students.push(record.clone()),
        }
        state.recompute();
        state.error = None;
        tracing::info!(id = %id, "Student added");
        Ok(record)
    }

    /// Apply a partial update to the record with identity `id`.
    ///
    /// An identity inside `update` must match `id`; it is never sent.
    pub async fn update(&self, id: &str, update: StudentUpdate) -> ClientResult<StudentRecord> {
        let id = normalize_identity(id);

        if let Some(other) = update.aadhar_no.as_deref().map(normalize_identity) {
            if other != id {
                return Err(self
                    .fail(ClientError::Validation(format!(
                        "Aadhar No cannot be changed ({id} -> {other})"
                    )))
                    .await);
            }
        }
        if let Some(email) = update.email.as_deref() {
            if !shared::models::is_valid_email(email) {
                return Err(self
                    .fail(ClientError::Validation("Email is not a valid address".into()))
                    .await);
            }
        }
        let _guard = match self.in_flight.acquire(&id, Mutation::Update) {
            Ok(guard) => guard,
            Err(e) => return Err(self.fail(e).await),
        };

        let confirmed = match self.api.update_student(&id, &update).await {
            Ok(confirmed) => confirmed,
            Err(e) => return Err(self.fail(e).await),
        };

        let mut state = self.state.write().await;
        let record = match state.find(&id) {
            Some(i) => {
                let current = &mut state.students[i];
                match confirmed {
                    Some(server) => current.merge_from(server),
                    None => current.apply(&update),
                }
                current.clone()
            }
            None => {
                // 服务端已更新，但本地列表里没有该记录
                tracing::warn!(id = %id, "Updated student missing from local list");
                match confirmed {
                    Some(mut server) => {
                        server.aadhar_no = id.clone();
                        state.students.push(server.clone());
                        server
                    }
                    None => {
                        drop(state);
                        let e = ClientError::NotFound { id };
                        return Err(self.fail(e).await);
                    }
                }
            }
        };
        state.recompute();
        state.error = None;
        tracing::info!(id = %id, "Student updated");
        Ok(record)
    }

    /// Delete the record with identity `id`.
    ///
    /// Retrying a delete that already succeeded fails with `NotFound`.
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let id = normalize_identity(id);
        let _guard = match self.in_flight.acquire(&id, Mutation::Delete) {
            Ok(guard) => guard,
            Err(e) => return Err(self.fail(e).await),
        };

        if let Err(e) = self.api.delete_student(&id).await {
            if matches!(e, ClientError::NotFound { .. }) {
                // 服务端已没有该记录，本地也不应保留
                let mut state = self.state.write().await;
                if let Some(i) = state.find(&id) {
                    state.students.remove(i);
                    state.recompute();
                }
            }
            return Err(self.fail(e).await);
        }

        let mut state = self.state.write().await;
        state.students.retain(|s| s.id() != id);
        state.recompute();
        state.error = None;
        tracing::info!(id = %id, "Student deleted");
        Ok(())
    }

    async fn fail(&self, err: ClientError) -> ClientError {
        let code = err.code();
        tracing::warn!(
            %code,
            category = code.category().name(),
            transient = code.category().is_transient(),
            error = %err,
            "Student operation failed"
        );
        self.state.write().await.error = Some(err.user_message());
        err
    }
}

/// Collapse duplicate identities (last one wins, first position kept)
fn dedup_by_identity(students: Vec<StudentRecord>) -> Vec<StudentRecord> {
    let mut out: Vec<StudentRecord> = Vec::with_capacity(students.len());
    for student in students {
        match out.iter().position(|s| s.id() == student.id()) {
            Some(i) => {
                tracing::warn!(id = %student.id(), "Duplicate identity in server list");
                out[i] = student;
            }
            None => out.push(student),
        }
    }
    out
}
