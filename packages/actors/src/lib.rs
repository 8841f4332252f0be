//! Actor system for the job tracker state container.
//!
//! This crate provides the Ractor-based orchestration around the
//! `tracker_core` stores.
//!
//! # Architecture
//!
//! - `StoreActor` - Owns the `AppState`, applies intents one at a time and
//!   notifies subscribers
//! - `PersistActor` - Writes committed snapshots to storage in commit order
//! - `JobsRemote` - The remote the store loads from and posts to;
//!   `SimulatedRemote` stands in for a network
//!
//! # Usage
//!
//! ```ignore
//! use actors::{StoreConfig, StoreHandle};
//! use tracker_core::{Intent, JobId};
//!
//! let store = StoreHandle::start(StoreConfig::from_env()?).await?;
//! store.dispatch(Intent::LoadJobs).await?;
//! store.dispatch(Intent::ToggleFavorite(JobId(2))).await?;
//! store.shutdown().await?;
//! ```

mod config;
mod handle;
mod messages;
mod persist_actor;
mod persistence;
mod simulator;
mod store_actor;

pub use config::{DEFAULT_NAMESPACE, StoreConfig};
pub use handle::{StoreClient, StoreHandle};
pub use messages::{PersistMessage, StoreError, StoreMessage, SubscriberFn, SubscriptionId};
pub use persist_actor::PersistActor;
pub use persistence::{DEFAULT_PERSIST_KEY, PersistenceError, SCHEMA_VERSION, StatePersistence};
pub use simulator::{JobsRemote, RemoteFuture, RemoteResult, SimulatedRemote, seed_jobs};
pub use store_actor::{StoreActor, StoreArgs};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
