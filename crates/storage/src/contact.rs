use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::domain::{ContactRecord, ContactUpdate};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::KeyValueStore;

/// Fixed key the whole application state is persisted under.
pub const STATE_KEY: &str = "state";

/// Document stored under [`STATE_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub contact: ContactRecord,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to load contact state: {0:#}")]
    Load(anyhow::Error),
    #[error("stored contact state is not valid: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to persist contact state: {0:#}")]
    Persist(anyhow::Error),
}

/// Owner of the single contact record.
///
/// Every read and update goes through the backend, so writes made by another
/// process (the operator CLI) are picked up. Absent state is seeded with the
/// defaults on first access. Concurrent writers race and the last persisted
/// write wins.
///
/// When a write-through fails the updated record is kept in memory and served
/// to this process until a later write succeeds.
#[derive(Clone)]
pub struct ContactStore {
    backend: Arc<dyn KeyValueStore>,
    unsaved: Arc<Mutex<Option<ContactRecord>>>,
}

impl ContactStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            unsaved: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn get(&self) -> Result<ContactRecord, StoreError> {
        let unsaved = self.unsaved.lock().await;
        if let Some(record) = unsaved.as_ref() {
            return Ok(record.clone());
        }

        match self.load().await? {
            Some(record) => Ok(record),
            None => {
                let seeded = ContactRecord::default();
                info!(key = STATE_KEY, "seeding default contact state");
                self.persist(&seeded).await?;
                Ok(seeded)
            }
        }
    }

    /// Applies `update` to the latest stored record and returns the result.
    ///
    /// If the write-through fails the in-memory record still carries the
    /// update and `StoreError::Persist` is returned.
    pub async fn update(&self, update: ContactUpdate) -> Result<ContactRecord, StoreError> {
        let mut unsaved = self.unsaved.lock().await;
        let mut record = match unsaved.take() {
            Some(record) => record,
            None => self.load().await?.unwrap_or_default(),
        };
        record.apply(update);

        if let Err(error) = self.persist(&record).await {
            warn!(%error, "contact update kept in memory only");
            *unsaved = Some(record);
            return Err(error);
        }
        debug!("contact state persisted");
        Ok(record)
    }

    async fn load(&self) -> Result<Option<ContactRecord>, StoreError> {
        let Some(raw) = self.backend.load(STATE_KEY).await.map_err(StoreError::Load)? else {
            return Ok(None);
        };
        let state: PersistedState = serde_json::from_str(&raw).map_err(StoreError::Corrupt)?;
        Ok(Some(state.contact))
    }

    async fn persist(&self, record: &ContactRecord) -> Result<(), StoreError> {
        let document = serde_json::to_string(&PersistedState {
            contact: record.clone(),
        })
        .map_err(|e| StoreError::Persist(e.into()))?;
        self.backend
            .store(STATE_KEY, &document)
            .await
            .map_err(StoreError::Persist)
    }
}

#[cfg(test)]
#[path = "tests/contact_tests.rs"]
mod tests;
