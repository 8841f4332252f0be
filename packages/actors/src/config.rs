//! Store configuration.

use std::time::Duration;

use storage::StorageConfig;

use crate::messages::StoreError;
use crate::persistence::DEFAULT_PERSIST_KEY;
use crate::simulator::SimulatedRemote;

/// Namespace applied to storage keys when `STORAGE_PREFIX` is not set.
pub const DEFAULT_NAMESPACE: &str = "job-tracker";

/// Configuration for a running store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub storage: StorageConfig,
    /// Key the state record is written under, inside the storage namespace.
    pub persist_key: String,
    /// Latency of the simulated remote.
    pub remote_delay: Duration,
}

impl StoreConfig {
    /// In-memory storage and the default remote latency.
    pub fn memory() -> Self {
        Self {
            storage: StorageConfig::memory().with_prefix(DEFAULT_NAMESPACE),
            persist_key: DEFAULT_PERSIST_KEY.to_string(),
            remote_delay: SimulatedRemote::DEFAULT_DELAY,
        }
    }

    pub fn with_remote_delay(mut self, delay: Duration) -> Self {
        self.remote_delay = delay;
        self
    }

    /// Build a config from environment variables.
    ///
    /// - Storage: see [`StorageConfig::from_env`]; the prefix defaults to `job-tracker`
    /// - `TRACKER_PERSIST_KEY` (default: `persist/root.json`)
    /// - `TRACKER_SIM_DELAY_MS` (default: `1000`)
    pub fn from_env() -> Result<Self, StoreError> {
        let mut storage = StorageConfig::from_env()?;
        if storage.prefix.is_none() {
            storage = storage.with_prefix(DEFAULT_NAMESPACE);
        }

        let persist_key = std::env::var("TRACKER_PERSIST_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| DEFAULT_PERSIST_KEY.to_string());

        let remote_delay = match std::env::var("TRACKER_SIM_DELAY_MS") {
            Ok(v) => v
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| {
                    StoreError::InvalidConfig(format!("invalid TRACKER_SIM_DELAY_MS={v}: {e}"))
                })?,
            Err(std::env::VarError::NotPresent) => SimulatedRemote::DEFAULT_DELAY,
            Err(e) => {
                return Err(StoreError::InvalidConfig(format!(
                    "failed reading TRACKER_SIM_DELAY_MS: {e}"
                )));
            }
        };

        Ok(Self {
            storage,
            persist_key,
            remote_delay,
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::memory()
    }
}
