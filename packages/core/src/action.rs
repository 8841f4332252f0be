//! Intents dispatched by screens and the committed actions they turn into.

use serde::{Deserialize, Serialize};

use crate::{Job, JobId, JobStatus, NewJob};

/// A named request to change state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Fetch the job collection from the remote.
    LoadJobs,
    /// Append a job locally, id assigned on commit.
    AddJob(NewJob),
    /// Post a job to the remote; appended once the remote answers.
    CreateJob(NewJob),
    SetStatus { id: JobId, status: JobStatus },
    /// Replace a full record, matched by `job.id`.
    ReplaceJob(Job),
    ToggleFavorite(JobId),
}

impl Intent {
    /// Whether the intent goes through the remote before committing.
    pub fn is_async(&self) -> bool {
        matches!(self, Intent::LoadJobs | Intent::CreateJob(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intent::LoadJobs => "LOAD_JOBS",
            Intent::AddJob(_) => "ADD_JOB",
            Intent::CreateJob(_) => "CREATE_JOB",
            Intent::SetStatus { .. } => "SET_STATUS",
            Intent::ReplaceJob(_) => "REPLACE_JOB",
            Intent::ToggleFavorite(_) => "TOGGLE_FAVORITE",
        }
    }
}

/// One atomic state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadStarted,
    LoadSucceeded(Vec<Job>),
    LoadFailed(String),
    JobAdded(NewJob),
    /// A remote create resolved; the id is assigned now.
    JobCreated(NewJob),
    StatusSet { id: JobId, status: JobStatus },
    JobReplaced(Job),
    FavoriteToggled(JobId),
}

impl Action {
    /// Get a short description of this action for logging.
    pub fn description(&self) -> String {
        match self {
            Action::LoadStarted => "Load started".to_string(),
            Action::LoadSucceeded(jobs) => format!("Loaded {} jobs", jobs.len()),
            Action::LoadFailed(message) => format!("Load failed: {}", message),
            Action::JobAdded(new) => format!("Added '{}' at {}", new.position, new.company),
            Action::JobCreated(new) => format!("Created '{}' at {}", new.position, new.company),
            Action::StatusSet { id, status } => format!("Job {} -> {}", id, status),
            Action::JobReplaced(job) => format!("Job {} replaced", job.id),
            Action::FavoriteToggled(id) => format!("Favorite {} toggled", id),
        }
    }
}

/// What an intent did once committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The load was started and is in flight.
    LoadStarted,
    Loaded { count: usize },
    LoadFailed { message: String },
    Added { job: Job },
    Created { job: Job },
    CreateFailed { message: String },
    Updated { id: JobId },
    /// The target job was missing; state is unchanged.
    NotFound { id: JobId },
    /// No id is left to assign; state is unchanged.
    IdsExhausted,
    FavoriteToggled { id: JobId, favorite: bool },
}

impl Outcome {
    /// The job this outcome produced, if any.
    pub fn job(&self) -> Option<&Job> {
        match self {
            Outcome::Added { job } | Outcome::Created { job } => Some(job),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound { .. })
    }

    /// True when the intent was refused and the state did not change.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Outcome::NotFound { .. } | Outcome::IdsExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_use_screaming_tags() {
        let intent = Intent::SetStatus {
            id: JobId(2),
            status: JobStatus::Interviewing,
        };
        let value = serde_json::to_value(&intent).unwrap();
        assert_eq!(value["type"], "SET_STATUS");
        assert_eq!(value["payload"]["status"], "INTERVIEWING");
        assert_eq!(intent.name(), "SET_STATUS");
        assert!(!intent.is_async());
        assert!(Intent::LoadJobs.is_async());
    }
}
