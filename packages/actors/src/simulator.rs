//! Remote job API trait and the latency simulator used in place of a network.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracker_core::{Interest, Job, JobId, JobStatus, NewJob, NOT_APPLICABLE};

/// Result type for remote calls. Errors carry a diagnostic message.
pub type RemoteResult<T> = Result<T, String>;

/// Future type for async remote calls.
pub type RemoteFuture<T> = BoxFuture<'static, RemoteResult<T>>;

/// Where the job collection is fetched from and new jobs are posted to.
///
/// The store awaits these futures off its mailbox and commits the result
/// when it arrives. Swap the implementation to control timing in tests.
pub trait JobsRemote: Send + Sync + 'static {
    /// Fetch the full job collection.
    fn fetch_jobs(&self) -> RemoteFuture<Vec<Job>>;

    /// Post a new job; resolves with the job as the remote recorded it.
    fn post_job(&self, job: NewJob) -> RemoteFuture<NewJob>;
}

/// Simulated remote that answers after a fixed delay.
///
/// Loads always return [`seed_jobs`]; posts echo the job back stamped with
/// a creation time. It never fails.
#[derive(Debug, Clone)]
pub struct SimulatedRemote {
    delay: Duration,
}

impl SimulatedRemote {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedRemote {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl JobsRemote for SimulatedRemote {
    fn fetch_jobs(&self) -> RemoteFuture<Vec<Job>> {
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            tracing::debug!("Simulated fetch resolved after {:?}", delay);
            Ok(seed_jobs())
        }
        .boxed()
    }

    fn post_job(&self, mut job: NewJob) -> RemoteFuture<NewJob> {
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            job.created_at = Some(Utc::now());
            tracing::debug!("Simulated post of '{}' resolved", job.position);
            Ok(job)
        }
        .boxed()
    }
}

/// The fixed collection the simulated remote serves. Ids 0 to 4.
pub fn seed_jobs() -> Vec<Job> {
    let entries = [
        (
            "Senior Product Manager",
            "Ace Corporation LLC",
            JobStatus::Accepted,
            (2025, 3, 22),
            1,
            "Good company culture, opportunity for growth",
        ),
        (
            "Product Owner",
            "Chase LLC",
            JobStatus::Negotiating,
            (2025, 4, 1),
            1,
            "Interesting role with good benefits",
        ),
        (
            "Product Manager",
            "Web Triangle LLC",
            JobStatus::Bookmarked,
            (2025, 3, 29),
            2,
            "Fast growing company",
        ),
        (
            "Senior Marketing Manager",
            "Pentagram",
            JobStatus::Applied,
            (2025, 4, 5),
            3,
            "Creative team and excellent design focus",
        ),
        (
            "Senior Product Manager",
            "SolarInformatics",
            JobStatus::Applying,
            (2025, 4, 10),
            2,
            "Sustainable tech company",
        ),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(
            |(i, (position, company, status, (y, m, d), interest, notes))| Job {
                id: JobId(i as u64),
                position: position.to_string(),
                company: company.to_string(),
                location: "Ashburn, Virginia, USA".to_string(),
                salary: "$50,000.00".to_string(),
                status,
                date_applied: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
                interview: NOT_APPLICABLE.to_string(),
                follow_up: NOT_APPLICABLE.to_string(),
                interest: Interest::new(interest).unwrap_or_default(),
                notes: Some(notes.to_string()),
                created_at: None,
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn seed_is_five_distinct_statuses_in_id_order() {
        let seed = seed_jobs();
        assert_eq!(seed.len(), 5);
        let ids: Vec<u64> = seed.iter().map(|job| job.id.0).collect();
        assert_eq!(ids, [0, 1, 2, 3, 4]);
        let statuses: HashSet<JobStatus> = seed.iter().map(|job| job.status).collect();
        assert_eq!(statuses.len(), 5);
        assert_eq!(seed[3].date_applied, NaiveDate::from_ymd_opt(2025, 4, 5).unwrap());
    }

    #[tokio::test]
    async fn simulated_fetch_is_stable_across_calls() {
        let remote = SimulatedRemote::new(Duration::ZERO);
        let first = remote.fetch_jobs().await;
        let second = remote.fetch_jobs().await;
        assert_eq!(first, second);
        assert_eq!(first.map(|jobs| jobs.len()), Ok(5));
    }

    #[tokio::test]
    async fn simulated_post_stamps_creation_time() {
        let remote = SimulatedRemote::new(Duration::ZERO);
        let posted = remote.post_job(NewJob::new("Engineer", "Acme")).await.unwrap();
        assert!(posted.created_at.is_some());
        assert_eq!(posted.position, "Engineer");
    }
}
