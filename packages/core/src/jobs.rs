//! Job store: the ordered job collection plus its loading status.

use serde::{Deserialize, Serialize};

use crate::{Job, JobId, JobStatus, NewJob};

/// Result of a mutation that targets an existing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    Applied,
    NotFound,
}

/// The id counter cannot advance past `u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("job id space exhausted")]
pub struct IdSpaceExhausted;

impl Mutation {
    pub fn is_applied(self) -> bool {
        matches!(self, Mutation::Applied)
    }
}

/// Job collection in insertion (display) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsState {
    pub is_loading: bool,
    pub err_mess: Option<String>,
    pub jobs_array: Vec<Job>,
    /// Next id handed out by `add`/`create`. Never reused.
    #[serde(default)]
    next_id: u64,
}

impl Default for JobsState {
    fn default() -> Self {
        Self {
            is_loading: true,
            err_mess: None,
            jobs_array: Vec::new(),
            next_id: 0,
        }
    }
}

impl JobsState {
    pub fn len(&self) -> usize {
        self.jobs_array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs_array.is_empty()
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs_array.iter().find(|job| job.id == id)
    }

    /// Id the next appended job will receive.
    pub fn next_id(&self) -> JobId {
        JobId(self.next_id)
    }

    pub fn begin_load(&mut self) {
        self.is_loading = true;
    }

    pub fn load_succeeded(&mut self, jobs: Vec<Job>) {
        self.is_loading = false;
        self.err_mess = None;
        self.jobs_array = jobs;
        if self.reconcile_next_id().is_err() {
            self.next_id = u64::MAX;
        }
    }

    /// Record a failed load, keeping the previously loaded jobs.
    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.err_mess = Some(message.into());
    }

    /// Append a job and return it with its assigned id.
    ///
    /// Fails without touching the collection once every id is spent.
    pub fn add(&mut self, new: NewJob) -> Result<&Job, IdSpaceExhausted> {
        let id = self.allocate_id()?;
        self.jobs_array.push(Job::from_new(id, new));
        Ok(&self.jobs_array[self.jobs_array.len() - 1])
    }

    pub fn set_status(&mut self, id: JobId, status: JobStatus) -> Mutation {
        match self.jobs_array.iter_mut().find(|job| job.id == id) {
            Some(job) => {
                job.status = status;
                Mutation::Applied
            }
            None => Mutation::NotFound,
        }
    }

    /// Replace the whole record carrying `job.id`, keeping its position.
    pub fn replace(&mut self, job: Job) -> Mutation {
        match self.jobs_array.iter().position(|j| j.id == job.id) {
            Some(index) => {
                self.jobs_array[index] = job;
                Mutation::Applied
            }
            None => Mutation::NotFound,
        }
    }

    fn allocate_id(&mut self) -> Result<JobId, IdSpaceExhausted> {
        let next = self.next_id.checked_add(1).ok_or(IdSpaceExhausted)?;
        let id = JobId(self.next_id);
        self.next_id = next;
        Ok(id)
    }

    /// Keep the counter ahead of every id already in the collection.
    fn reconcile_next_id(&mut self) -> Result<(), IdSpaceExhausted> {
        let mut floor = self.next_id;
        for job in &self.jobs_array {
            floor = floor.max(job.id.0.checked_add(1).ok_or(IdSpaceExhausted)?);
        }
        self.next_id = floor;
        Ok(())
    }

    /// Restore counter consistency after deserializing stored data.
    ///
    /// Rejects data whose counter could never hand out another id.
    pub(crate) fn normalize(&mut self) -> Result<(), IdSpaceExhausted> {
        self.reconcile_next_id()?;
        if self.next_id == u64::MAX {
            return Err(IdSpaceExhausted);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: u64) -> JobsState {
        let mut store = JobsState::default();
        for i in 0..n {
            store.add(NewJob::new(format!("Role {i}"), "Acme")).unwrap();
        }
        store
    }

    #[test]
    fn add_assigns_current_length_as_id() {
        let mut store = store_with(3);
        let job = store.add(NewJob::new("Engineer", "Acme")).unwrap();
        assert_eq!(job.id, JobId(3));
        assert_eq!(store.len(), 4);
        assert_eq!(store.jobs_array.last().map(|j| j.position.as_str()), Some("Engineer"));
    }

    #[test]
    fn load_failure_keeps_stale_jobs() {
        let mut store = store_with(2);
        store.begin_load();
        assert!(store.is_loading);
        store.load_failed("network down");
        assert!(!store.is_loading);
        assert_eq!(store.err_mess.as_deref(), Some("network down"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn load_success_clears_error_and_moves_counter() {
        let mut store = JobsState::default();
        store.load_failed("boom");
        let loaded = store_with(5).jobs_array;
        store.load_succeeded(loaded);
        assert_eq!(store.err_mess, None);
        assert_eq!(store.next_id(), JobId(5));
    }

    #[test]
    fn set_status_on_missing_id_changes_nothing() {
        let mut store = store_with(3);
        let before = store.clone();
        assert_eq!(store.set_status(JobId(42), JobStatus::Declined), Mutation::NotFound);
        assert_eq!(store, before);
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = store_with(3);
        let mut job = store.get(JobId(1)).cloned().unwrap();
        job.notes = Some("Great team".to_string());
        job.status = JobStatus::Applied;
        assert!(store.replace(job.clone()).is_applied());
        assert_eq!(store.jobs_array[1], job);

        let mut ghost = job;
        ghost.id = JobId(99);
        let before = store.clone();
        assert_eq!(store.replace(ghost), Mutation::NotFound);
        assert_eq!(store, before);
    }

    #[test]
    fn counter_never_reuses_ids_after_a_smaller_load() {
        let mut store = store_with(4);
        store.load_succeeded(store_with(2).jobs_array);
        let job = store.add(NewJob::new("Engineer", "Acme")).unwrap();
        assert_eq!(job.id, JobId(4));
    }

    #[test]
    fn add_refuses_once_the_counter_is_spent() {
        let mut store = JobsState {
            next_id: u64::MAX - 1,
            ..JobsState::default()
        };
        let job = store.add(NewJob::new("Last", "Acme")).unwrap();
        assert_eq!(job.id, JobId(u64::MAX - 1));

        let before = store.clone();
        assert_eq!(store.add(NewJob::new("One more", "Acme")), Err(IdSpaceExhausted));
        assert_eq!(store, before);
    }

    #[test]
    fn load_with_maximal_id_spends_the_counter() {
        let mut store = store_with(1);
        let mut jobs = store.jobs_array.clone();
        jobs[0].id = JobId(u64::MAX);
        store.load_succeeded(jobs);
        assert_eq!(store.next_id(), JobId(u64::MAX));
        assert!(store.add(NewJob::new("Engineer", "Acme")).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn normalize_rejects_unusable_counters() {
        let mut maximal_id = store_with(1);
        maximal_id.jobs_array[0].id = JobId(u64::MAX);
        assert_eq!(maximal_id.normalize(), Err(IdSpaceExhausted));

        let mut spent = JobsState {
            next_id: u64::MAX,
            ..JobsState::default()
        };
        assert_eq!(spent.normalize(), Err(IdSpaceExhausted));

        let mut fine = store_with(2);
        assert_eq!(fine.normalize(), Ok(()));
        assert_eq!(fine.next_id(), JobId(2));
    }
}
