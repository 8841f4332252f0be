//! Handles for starting, using and shutting down a store.

use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

use ractor::concurrency::JoinHandle;
use ractor::{Actor, ActorRef};
use storage::Storage;
use tracker_core::{Intent, Outcome, Snapshot};

use crate::config::StoreConfig;
use crate::messages::{PersistMessage, StoreError, StoreMessage, SubscriptionId};
use crate::persist_actor::PersistActor;
use crate::persistence::StatePersistence;
use crate::simulator::{JobsRemote, SimulatedRemote};
use crate::store_actor::{StoreActor, StoreArgs};

/// Cheap, cloneable access to a running store.
///
/// Screens hold one of these to dispatch intents and read snapshots.
#[derive(Clone)]
pub struct StoreClient {
    store: ActorRef<StoreMessage>,
}

impl StoreClient {
    /// Queue an intent without waiting for it to commit.
    pub fn send(&self, intent: Intent) -> Result<(), StoreError> {
        self.store
            .send_message(StoreMessage::Dispatch {
                intent,
                reply: None,
            })
            .map_err(|_| StoreError::Closed)
    }

    /// Dispatch an intent and wait for its commit.
    ///
    /// For `LoadJobs` and `CreateJob` this waits for the remote call too.
    pub async fn dispatch(&self, intent: Intent) -> Result<Outcome, StoreError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.store
            .send_message(StoreMessage::Dispatch {
                intent,
                reply: Some(tx.into()),
            })
            .map_err(|_| StoreError::Closed)?;
        rx.await.map_err(|_| StoreError::NoReply)
    }

    /// Current state, after every previously sent intent has been applied.
    pub async fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.store
            .send_message(StoreMessage::GetSnapshot { reply: tx.into() })
            .map_err(|_| StoreError::Closed)?;
        rx.await.map_err(|_| StoreError::NoReply)
    }

    /// Call `subscriber` after every committed transition.
    ///
    /// Callbacks run on the store's task, in subscription order, before the
    /// next intent is applied. Keep them short.
    pub async fn subscribe<F>(&self, subscriber: F) -> Result<SubscriptionId, StoreError>
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.store
            .send_message(StoreMessage::Subscribe {
                subscriber: Box::new(subscriber),
                reply: tx.into(),
            })
            .map_err(|_| StoreError::Closed)?;
        rx.await.map_err(|_| StoreError::NoReply)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<(), StoreError> {
        self.store
            .send_message(StoreMessage::Unsubscribe { id })
            .map_err(|_| StoreError::Closed)
    }
}

/// Owner of a running store and its persistence writer.
///
/// Call [`StoreHandle::shutdown`] (or use [`StoreHandle::scoped`]) before
/// exit so that queued writes reach storage.
pub struct StoreHandle {
    client: StoreClient,
    persister: ActorRef<PersistMessage>,
    tasks: Option<(JoinHandle<()>, JoinHandle<()>)>,
}

impl StoreHandle {
    /// Start a store backed by configured storage and the simulated remote.
    pub async fn start(config: StoreConfig) -> Result<Self, StoreError> {
        let storage = Storage::new(config.storage)?;
        tracing::info!("Using {} storage", storage.kind_str());
        let persistence = StatePersistence::new(storage, config.persist_key);
        let remote = Arc::new(SimulatedRemote::new(config.remote_delay));
        Self::start_with(persistence, remote).await
    }

    /// Start a store with explicit persistence and remote.
    ///
    /// State is rehydrated before the store accepts its first message.
    pub async fn start_with(
        persistence: StatePersistence,
        remote: Arc<dyn JobsRemote>,
    ) -> Result<Self, StoreError> {
        let initial = persistence.rehydrate().await;

        let (persister, persister_task) = Actor::spawn(None, PersistActor, persistence).await?;

        let args = StoreArgs {
            initial,
            remote,
            persister: Some(persister.clone()),
        };
        let (store, store_task) = match Actor::spawn(None, StoreActor, args).await {
            Ok(spawned) => spawned,
            Err(e) => {
                let _ = persister.send_message(PersistMessage::Stop);
                return Err(e.into());
            }
        };

        Ok(Self {
            client: StoreClient { store },
            persister,
            tasks: Some((store_task, persister_task)),
        })
    }

    pub fn client(&self) -> StoreClient {
        self.client.clone()
    }

    /// Wait until every committed transition so far is written.
    pub async fn flush(&self) -> Result<(), StoreError> {
        // The round-trip guarantees earlier commits have queued their saves.
        self.client.snapshot().await?;

        let (tx, rx) = ractor::concurrency::oneshot();
        self.persister
            .send_message(PersistMessage::Flush { reply: tx.into() })
            .map_err(|_| StoreError::Closed)?;
        rx.await.map_err(|_| StoreError::NoReply)
    }

    /// Let in-flight remote calls land, write everything, then stop.
    pub async fn shutdown(mut self) -> Result<(), StoreError> {
        let Some((store_task, persister_task)) = self.tasks.take() else {
            return Ok(());
        };

        if self.client.store.send_message(StoreMessage::Shutdown).is_err() {
            tracing::warn!("Store already stopped, draining pending writes");
            let _ = self.persister.send_message(PersistMessage::Stop);
            persister_task.await?;
            let _ = store_task.await;
            return Err(StoreError::Closed);
        }
        store_task.await?;
        persister_task.await?;
        tracing::info!("Store shut down, state flushed");
        Ok(())
    }

    /// Run `f` against the store, then shut it down whatever `f` returned.
    pub async fn scoped<F, Fut, T>(self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(StoreClient) -> Fut,
        Fut: Future<Output = T>,
    {
        let out = f(self.client()).await;
        self.shutdown().await?;
        Ok(out)
    }
}

impl Deref for StoreHandle {
    type Target = StoreClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl Drop for StoreHandle {
    fn drop(&mut self) {
        if self.tasks.is_some() {
            tracing::warn!("Store handle dropped without shutdown; draining in the background");
            let _ = self.client.store.send_message(StoreMessage::Shutdown);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use std::time::Duration;

    use storage::StorageConfig;
    use tracker_core::NewJob;

    use super::*;
    use crate::persistence::DEFAULT_PERSIST_KEY;

    #[tokio::test]
    async fn shutdown_after_store_died_still_drains_writes() {
        let storage = Storage::new(StorageConfig::memory()).unwrap();
        let persistence = StatePersistence::new(storage.clone(), DEFAULT_PERSIST_KEY);
        let remote = Arc::new(SimulatedRemote::new(Duration::ZERO));
        let handle = StoreHandle::start_with(persistence.clone(), remote)
            .await
            .unwrap();

        handle
            .dispatch(Intent::AddJob(NewJob::new("Engineer", "Acme")))
            .await
            .unwrap();
        // Killed actors skip post_stop, so the writer is never told to stop.
        handle.client.store.kill_and_wait(None).await.unwrap();

        assert!(matches!(handle.shutdown().await, Err(StoreError::Closed)));
        let persisted = persistence.load().await.unwrap().unwrap();
        assert_eq!(persisted.jobs.jobs_array[0].position, "Engineer");
    }
}
