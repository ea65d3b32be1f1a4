//! Per-identity in-flight tracking

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{ClientError, ClientResult};

/// What kind of mutation holds an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Add,
    Update,
    Delete,
}

/// Identities with a mutation currently on the wire
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    pending: Arc<DashMap<String, Mutation>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for the duration of the returned guard.
    ///
    /// Fails with `Busy` if another mutation already holds it.
    pub fn acquire(&self, id: &str, mutation: Mutation) -> ClientResult<InFlightGuard> {
        match self.pending.entry(id.to_string()) {
            Entry::Occupied(held) => {
                tracing::debug!(id, held = ?held.get(), requested = ?mutation, "Identity busy");
                Err(ClientError::Busy(id.to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(mutation);
                Ok(InFlightGuard {
                    pending: Arc::clone(&self.pending),
                    id: id.to_string(),
                })
            }
        }
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Releases the identity on drop
#[derive(Debug)]
pub struct InFlightGuard {
    pending: Arc<DashMap<String, Mutation>>,
    id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.pending.remove(&self.id);
    }
}
