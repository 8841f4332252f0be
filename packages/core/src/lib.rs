//! Core domain types for the job application tracker.
//!
//! This crate contains the state shared by every screen:
//! - Job, JobStatus and NewJob for tracked applications
//! - JobsState and FavoriteSet, the two stores
//! - AppState, the combined value the orchestrator owns
//! - Intent and Action, the inbound requests and committed transitions
//! - Selectors for read-side queries over a snapshot

mod action;
mod favorites;
mod job;
mod jobs;
mod state;
pub mod selectors;

pub use action::{Action, Intent, Outcome};
pub use favorites::FavoriteSet;
pub use job::{
    DEFAULT_LOCATION, DEFAULT_SALARY, Interest, InterestOutOfRange, Job, JobId, JobStatus,
    NOT_APPLICABLE, NewJob, ValidationError,
};
pub use jobs::{IdSpaceExhausted, JobsState, Mutation};
pub use state::{AppState, Snapshot};
