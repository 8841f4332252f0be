//! Store actor: the single owner of the application state.
//!
//! Every intent and every remote resolution is a message in one mailbox, so
//! transitions never interleave. Remote calls run on spawned tasks and post
//! their result back; they commit in the order they resolve.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tracker_core::{Action, AppState, Intent, Outcome, Snapshot};

use crate::messages::{PersistMessage, StoreMessage, SubscriberFn, SubscriptionId};
use crate::simulator::JobsRemote;

/// Arguments for spawning a store actor.
pub struct StoreArgs {
    /// Rehydrated state to start from.
    pub initial: AppState,
    pub remote: Arc<dyn JobsRemote>,
    pub persister: Option<ActorRef<PersistMessage>>,
}

/// State for the store actor.
pub struct StoreActorState {
    state: Snapshot,
    remote: Arc<dyn JobsRemote>,
    persister: Option<ActorRef<PersistMessage>>,
    /// Callbacks in subscription order.
    subscribers: Vec<(SubscriptionId, SubscriberFn)>,
    next_subscription: u64,
    /// Remote calls dispatched but not yet applied.
    in_flight: usize,
    stopping: bool,
}

impl StoreActorState {
    pub fn new(args: StoreArgs) -> Self {
        Self {
            state: Arc::new(args.initial),
            remote: args.remote,
            persister: args.persister,
            subscribers: Vec::new(),
            next_subscription: 0,
            in_flight: 0,
            stopping: false,
        }
    }

    /// Apply one action, then persist and notify if the state changed.
    fn commit(&mut self, action: Action) -> Outcome {
        let description = action.description();
        let outcome = Arc::make_mut(&mut self.state).apply(action);

        match &outcome {
            Outcome::NotFound { id } => {
                tracing::warn!("{}: job {} not found, state unchanged", description, id);
                return outcome;
            }
            Outcome::IdsExhausted => {
                tracing::warn!("{}: no job ids left, state unchanged", description);
                return outcome;
            }
            _ => {}
        }

        tracing::debug!("Committed: {}", description);
        self.persist();
        self.notify();
        outcome
    }

    fn persist(&self) {
        if let Some(ref persister) = self.persister
            && persister
                .send_message(PersistMessage::Save(self.state.clone()))
                .is_err()
        {
            tracing::warn!("Persistence writer is gone, snapshot not saved");
        }
    }

    /// A panicking subscriber is logged and skipped for this commit only.
    fn notify(&self) {
        for (id, subscriber) in &self.subscribers {
            if catch_unwind(AssertUnwindSafe(|| subscriber(&self.state))).is_err() {
                tracing::warn!("Subscriber {:?} panicked while handling a snapshot", id);
            }
        }
    }

    fn subscribe(&mut self, subscriber: SubscriberFn) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.clone()
    }

    fn resolved(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn should_stop(&self) -> bool {
        self.stopping && self.in_flight == 0
    }
}

fn reply_with(reply: Option<RpcReplyPort<Outcome>>, outcome: Outcome) {
    if let Some(reply) = reply {
        let _ = reply.send(outcome);
    }
}

/// Store actor that applies intents and owns the state.
pub struct StoreActor;

impl Actor for StoreActor {
    type Msg = StoreMessage;
    type State = StoreActorState;
    type Arguments = StoreArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            "Starting job store with {} jobs and {} favorites",
            args.initial.jobs.len(),
            args.initial.favorites.len()
        );
        Ok(StoreActorState::new(args))
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            StoreMessage::Dispatch { intent, reply } => {
                tracing::debug!("Dispatch {}", intent.name());
                match intent {
                    Intent::LoadJobs => {
                        state.commit(Action::LoadStarted);
                        state.in_flight += 1;
                        let remote = state.remote.clone();
                        let store = myself.clone();
                        tokio::spawn(async move {
                            let result = remote.fetch_jobs().await;
                            if store
                                .send_message(StoreMessage::LoadResolved { result, reply })
                                .is_err()
                            {
                                tracing::warn!("Job store stopped before load resolved");
                            }
                        });
                    }

                    Intent::CreateJob(new) => {
                        state.in_flight += 1;
                        let remote = state.remote.clone();
                        let store = myself.clone();
                        tokio::spawn(async move {
                            let result = remote.post_job(new).await;
                            if store
                                .send_message(StoreMessage::CreateResolved { result, reply })
                                .is_err()
                            {
                                tracing::warn!("Job store stopped before create resolved");
                            }
                        });
                    }

                    Intent::AddJob(new) => {
                        reply_with(reply, state.commit(Action::JobAdded(new)));
                    }

                    Intent::SetStatus { id, status } => {
                        reply_with(reply, state.commit(Action::StatusSet { id, status }));
                    }

                    Intent::ReplaceJob(job) => {
                        reply_with(reply, state.commit(Action::JobReplaced(job)));
                    }

                    Intent::ToggleFavorite(id) => {
                        reply_with(reply, state.commit(Action::FavoriteToggled(id)));
                    }
                }
            }

            StoreMessage::LoadResolved { result, reply } => {
                state.resolved();
                let action = match result {
                    Ok(jobs) => Action::LoadSucceeded(jobs),
                    Err(message) => {
                        tracing::warn!("Failed to load jobs: {}", message);
                        Action::LoadFailed(message)
                    }
                };
                reply_with(reply, state.commit(action));
            }

            StoreMessage::CreateResolved { result, reply } => {
                state.resolved();
                let outcome = match result {
                    Ok(new) => state.commit(Action::JobCreated(new)),
                    Err(message) => {
                        tracing::warn!("Failed to create job: {}", message);
                        Outcome::CreateFailed { message }
                    }
                };
                reply_with(reply, outcome);
            }

            StoreMessage::Subscribe { subscriber, reply } => {
                let id = state.subscribe(subscriber);
                let _ = reply.send(id);
            }

            StoreMessage::Unsubscribe { id } => {
                state.unsubscribe(id);
            }

            StoreMessage::GetSnapshot { reply } => {
                let _ = reply.send(state.snapshot());
            }

            StoreMessage::Shutdown => {
                tracing::info!(
                    "Shutting down job store ({} remote calls in flight)",
                    state.in_flight
                );
                state.stopping = true;
            }
        }

        if state.should_stop() {
            myself.stop(None);
        }

        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        if let Some(ref persister) = state.persister {
            let _ = persister.send_message(PersistMessage::Stop);
        }
        tracing::info!("Job store stopped");
        Ok(())
    }
}
