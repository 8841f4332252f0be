//! Versioned persistence of the application state.

use serde::{Deserialize, Serialize};
use storage::{Storage, StorageError};
use tracker_core::{AppState, FavoriteSet, IdSpaceExhausted, JobsState};

/// Schema version embedded in every persisted record.
pub const SCHEMA_VERSION: u32 = 1;

/// Default key the state is stored under.
pub const DEFAULT_PERSIST_KEY: &str = "persist/root.json";

#[derive(Serialize)]
struct PersistedRecordRef<'a> {
    version: u32,
    jobs: &'a JobsState,
    favorites: &'a FavoriteSet,
}

#[derive(Deserialize)]
struct PersistedRecord {
    jobs: JobsState,
    favorites: FavoriteSet,
}

/// State persistence for the store.
///
/// Writes the whole [`AppState`] as one JSON record under a single key.
#[derive(Debug, Clone)]
pub struct StatePersistence {
    storage: Storage,
    key: String,
}

impl StatePersistence {
    /// Create a new persistence instance.
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Save state under the configured key.
    pub async fn persist(&self, state: &AppState) -> Result<(), PersistenceError> {
        let record = PersistedRecordRef {
            version: SCHEMA_VERSION,
            jobs: &state.jobs,
            favorites: &state.favorites,
        };
        self.storage.put_json(&self.key, &record).await?;
        tracing::debug!("Saved state to {}", self.key);
        Ok(())
    }

    /// Load state, reporting why a present record could not be used.
    pub async fn load(&self) -> Result<Option<AppState>, PersistenceError> {
        let Some(bytes) = self.storage.try_get_bytes(&self.key).await? else {
            return Ok(None);
        };

        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        let found = value.get("version").and_then(serde_json::Value::as_u64);
        if found != Some(u64::from(SCHEMA_VERSION)) {
            return Err(PersistenceError::VersionMismatch {
                found,
                expected: SCHEMA_VERSION,
            });
        }

        let record: PersistedRecord = serde_json::from_value(value)?;
        tracing::debug!("Loaded state from {}", self.key);
        Ok(Some(AppState::new(record.jobs, record.favorites)?))
    }

    /// Load state for startup. Anything unusable yields the initial state.
    pub async fn rehydrate(&self) -> AppState {
        match self.load().await {
            Ok(Some(state)) => {
                tracing::info!(
                    "Rehydrated {} jobs and {} favorites",
                    state.jobs.len(),
                    state.favorites.len()
                );
                state
            }
            Ok(None) => {
                tracing::info!("No persisted state at {}, starting empty", self.key);
                AppState::default()
            }
            Err(e) => {
                tracing::warn!("Discarding persisted state at {}: {}", self.key, e);
                AppState::default()
            }
        }
    }

    /// Delete the persisted record.
    pub async fn clear(&self) -> Result<(), PersistenceError> {
        match self.storage.delete(&self.key).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema version {found:?} does not match {expected}")]
    VersionMismatch { found: Option<u64>, expected: u32 },

    #[error("unusable job ids: {0}")]
    Ids(#[from] IdSpaceExhausted),
}
