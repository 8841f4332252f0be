//! Read-side queries over a state snapshot, as the screens need them.

use std::collections::BTreeMap;

use crate::{AppState, Job, JobId, JobStatus};

/// Number of jobs per status. Every status is present, zero included.
pub fn status_counts(state: &AppState) -> BTreeMap<JobStatus, usize> {
    let mut counts: BTreeMap<JobStatus, usize> =
        JobStatus::ALL.into_iter().map(|status| (status, 0)).collect();
    for job in &state.jobs.jobs_array {
        *counts.entry(job.status).or_default() += 1;
    }
    counts
}

pub fn jobs_with_status(state: &AppState, status: JobStatus) -> Vec<&Job> {
    state
        .jobs
        .jobs_array
        .iter()
        .filter(|job| job.status == status)
        .collect()
}

/// The `limit` most recently applied jobs, newest first.
///
/// Ties keep collection order.
pub fn recent_jobs(state: &AppState, limit: usize) -> Vec<&Job> {
    let mut jobs: Vec<&Job> = state.jobs.jobs_array.iter().collect();
    jobs.sort_by(|a, b| b.date_applied.cmp(&a.date_applied));
    jobs.truncate(limit);
    jobs
}

/// Jobs in interviews or negotiation, first `limit` in collection order.
pub fn active_pipeline(state: &AppState, limit: usize) -> Vec<&Job> {
    state
        .jobs
        .jobs_array
        .iter()
        .filter(|job| job.status.is_active_pipeline())
        .take(limit)
        .collect()
}

/// Favorited jobs that exist in the collection, in collection order.
///
/// Favorites pointing at unknown ids are skipped.
pub fn favorite_jobs(state: &AppState) -> Vec<&Job> {
    state
        .jobs
        .jobs_array
        .iter()
        .filter(|job| state.favorites.contains(job.id))
        .collect()
}

pub fn is_favorite(state: &AppState, id: JobId) -> bool {
    state.favorites.contains(id)
}

pub fn job(state: &AppState, id: JobId) -> Option<&Job> {
    state.jobs.get(id)
}
