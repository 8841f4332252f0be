//! Combined application state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::jobs::IdSpaceExhausted;
use crate::{Action, FavoriteSet, JobsState, Outcome};

/// Immutable view of the state handed to readers.
pub type Snapshot = Arc<AppState>;

/// The job store and the favorites store under one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub jobs: JobsState,
    pub favorites: FavoriteSet,
}

impl AppState {
    /// Assemble state from stored parts, reconciling the id counter.
    pub fn new(jobs: JobsState, favorites: FavoriteSet) -> Result<Self, IdSpaceExhausted> {
        let mut state = Self { jobs, favorites };
        state.jobs.normalize()?;
        Ok(state)
    }

    /// Apply one committed action and report what it did.
    pub fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::LoadStarted => {
                self.jobs.begin_load();
                Outcome::LoadStarted
            }
            Action::LoadSucceeded(jobs) => {
                let count = jobs.len();
                self.jobs.load_succeeded(jobs);
                Outcome::Loaded { count }
            }
            Action::LoadFailed(message) => {
                self.jobs.load_failed(message.clone());
                Outcome::LoadFailed { message }
            }
            Action::JobAdded(new) => match self.jobs.add(new) {
                Ok(job) => Outcome::Added { job: job.clone() },
                Err(_) => Outcome::IdsExhausted,
            },
            Action::JobCreated(new) => match self.jobs.add(new) {
                Ok(job) => Outcome::Created { job: job.clone() },
                Err(_) => Outcome::IdsExhausted,
            },
            Action::StatusSet { id, status } => {
                if self.jobs.set_status(id, status).is_applied() {
                    Outcome::Updated { id }
                } else {
                    Outcome::NotFound { id }
                }
            }
            Action::JobReplaced(job) => {
                let id = job.id;
                if self.jobs.replace(job).is_applied() {
                    Outcome::Updated { id }
                } else {
                    Outcome::NotFound { id }
                }
            }
            Action::FavoriteToggled(id) => Outcome::FavoriteToggled {
                id,
                favorite: self.favorites.toggle(id),
            },
        }
    }
}
