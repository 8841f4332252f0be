//! Message types for actor communication.

use ractor::RpcReplyPort;
use tracker_core::{Intent, Job, NewJob, Outcome, Snapshot};

use crate::simulator::RemoteResult;

/// Callback invoked with every committed snapshot.
pub type SubscriberFn = Box<dyn Fn(&Snapshot) + Send + Sync + 'static>;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Messages for the StoreActor.
pub enum StoreMessage {
    /// Apply an intent. Async intents reply once their remote call resolves.
    Dispatch {
        intent: Intent,
        reply: Option<RpcReplyPort<Outcome>>,
    },

    /// A remote fetch finished.
    LoadResolved {
        result: RemoteResult<Vec<Job>>,
        reply: Option<RpcReplyPort<Outcome>>,
    },

    /// A remote post finished.
    CreateResolved {
        result: RemoteResult<NewJob>,
        reply: Option<RpcReplyPort<Outcome>>,
    },

    /// Register a snapshot callback.
    Subscribe {
        subscriber: SubscriberFn,
        reply: RpcReplyPort<SubscriptionId>,
    },

    /// Drop a snapshot callback.
    Unsubscribe { id: SubscriptionId },

    /// Read the current snapshot.
    GetSnapshot { reply: RpcReplyPort<Snapshot> },

    /// Stop once every in-flight remote call has been applied.
    Shutdown,
}

/// Messages for the PersistActor.
#[derive(Debug)]
pub enum PersistMessage {
    /// Write a committed snapshot.
    Save(Snapshot),

    /// Reply once every earlier save has been written.
    Flush { reply: RpcReplyPort<()> },

    /// Stop after every earlier save has been written.
    Stop,
}

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("failed to spawn actor: {0}")]
    Spawn(#[from] ractor::SpawnErr),

    #[error("store is not running")]
    Closed,

    #[error("store dropped the reply")]
    NoReply,

    #[error("actor task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
