#![allow(dead_code)]

use std::sync::Arc;

use actors::{
    JobsRemote, RemoteFuture, StatePersistence, StoreError, StoreHandle, DEFAULT_PERSIST_KEY,
    seed_jobs,
};
use futures_util::FutureExt;
use storage::{Storage, StorageConfig, StorageError};
use tokio::sync::{mpsc, watch};
use tracker_core::{Job, NewJob};

/// Remote whose loads answer immediately and whose posts wait on a gate.
pub struct FakeRemote {
    load: Result<Vec<Job>, String>,
    post: Option<String>,
    gate: watch::Receiver<bool>,
    started: mpsc::UnboundedSender<String>,
}

/// Test side of a [`FakeRemote`].
pub struct Gate {
    open: watch::Sender<bool>,
    started: mpsc::UnboundedReceiver<String>,
}

impl Gate {
    /// Let every pending and future post resolve.
    pub fn open(&self) {
        let _ = self.open.send(true);
    }

    /// Wait until `n` posts have reached the remote; returns their positions.
    pub async fn started(&mut self, n: usize) -> Vec<String> {
        let mut positions = Vec::with_capacity(n);
        while positions.len() < n {
            match self.started.recv().await {
                Some(position) => positions.push(position),
                None => break,
            }
        }
        positions
    }
}

impl FakeRemote {
    pub fn seeded() -> (Arc<dyn JobsRemote>, Gate) {
        Self::build(Ok(seed_jobs()), None)
    }

    pub fn failing(message: &str) -> (Arc<dyn JobsRemote>, Gate) {
        Self::build(Err(message.to_string()), None)
    }

    /// Loads the seed, but every post fails with `message`.
    pub fn rejecting_posts(message: &str) -> (Arc<dyn JobsRemote>, Gate) {
        Self::build(Ok(seed_jobs()), Some(message.to_string()))
    }

    fn build(load: Result<Vec<Job>, String>, post: Option<String>) -> (Arc<dyn JobsRemote>, Gate) {
        let (open, gate) = watch::channel(false);
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        let remote = FakeRemote {
            load,
            post,
            gate,
            started: started_tx,
        };
        (
            Arc::new(remote),
            Gate {
                open,
                started: started_rx,
            },
        )
    }
}

impl JobsRemote for FakeRemote {
    fn fetch_jobs(&self) -> RemoteFuture<Vec<Job>> {
        let load = self.load.clone();
        async move { load }.boxed()
    }

    fn post_job(&self, job: NewJob) -> RemoteFuture<NewJob> {
        let mut gate = self.gate.clone();
        let _ = self.started.send(job.position.clone());
        if let Some(message) = self.post.clone() {
            return async move { Err(message) }.boxed();
        }
        async move {
            gate.wait_for(|open| *open)
                .await
                .map_err(|_| "gate dropped".to_string())?;
            Ok(job)
        }
        .boxed()
    }
}

pub fn memory_storage() -> Result<Storage, StorageError> {
    Storage::new(StorageConfig::memory().with_prefix("job-tracker"))
}

pub fn persistence(storage: &Storage) -> StatePersistence {
    StatePersistence::new(storage.clone(), DEFAULT_PERSIST_KEY)
}

pub async fn start(
    storage: &Storage,
    remote: Arc<dyn JobsRemote>,
) -> Result<StoreHandle, StoreError> {
    StoreHandle::start_with(persistence(storage), remote).await
}
