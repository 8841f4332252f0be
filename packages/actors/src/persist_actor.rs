//! Persistence writer actor.
//!
//! Saves arrive in commit order through the mailbox, so the last write on
//! disk always matches the last committed snapshot.

use ractor::{Actor, ActorProcessingErr, ActorRef};

use crate::messages::PersistMessage;
use crate::persistence::StatePersistence;

/// State for the persist actor.
pub struct PersistActorState {
    persistence: StatePersistence,
    /// Snapshots written so far.
    pub writes: u64,
    /// Writes that failed and were skipped.
    pub failures: u64,
}

/// Actor that writes committed snapshots to storage, one at a time.
pub struct PersistActor;

impl Actor for PersistActor {
    type Msg = PersistMessage;
    type State = PersistActorState;
    type Arguments = StatePersistence;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        persistence: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting persistence writer for {}", persistence.key());
        Ok(PersistActorState {
            persistence,
            writes: 0,
            failures: 0,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            PersistMessage::Save(snapshot) => {
                // A failed write never rolls back the commit; the next save retries.
                match state.persistence.persist(&snapshot).await {
                    Ok(()) => state.writes += 1,
                    Err(e) => {
                        state.failures += 1;
                        tracing::warn!("Failed to persist state: {}", e);
                    }
                }
            }

            PersistMessage::Flush { reply } => {
                let _ = reply.send(());
            }

            PersistMessage::Stop => {
                tracing::info!(
                    "Stopping persistence writer ({} writes, {} failed)",
                    state.writes,
                    state.failures
                );
                myself.stop(None);
            }
        }

        Ok(())
    }
}
