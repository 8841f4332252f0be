//! Headless driver for the job tracker store.
//!
//! Rehydrates persisted state, loads from the simulated remote on first run,
//! records one application and flushes on exit. Screens would sit where
//! `run` is.

use actors::{StoreClient, StoreConfig, StoreError, StoreHandle};
use tracker_core::{Intent, JobStatus, NewJob, Outcome, Snapshot, selectors};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StoreConfig::from_env()?;
    tracing::info!(
        "Starting job tracker (remote latency {:?})",
        config.remote_delay
    );

    let store = StoreHandle::start(config).await?;
    store.subscribe(log_pipeline).await?;
    store.scoped(run).await??;
    Ok(())
}

async fn run(client: StoreClient) -> Result<(), StoreError> {
    let snapshot = client.snapshot().await?;
    if needs_initial_load(&snapshot) {
        match client.dispatch(Intent::LoadJobs).await? {
            Outcome::LoadFailed { message } => tracing::warn!("Could not load jobs: {}", message),
            outcome => tracing::info!("Initial load: {:?}", outcome),
        }
    }

    let new = NewJob::new("Platform Engineer", "Northwind Traders")
        .with_location("")
        .with_notes("Found through a referral")
        .resolve_defaults();
    if let Err(e) = new.validate() {
        tracing::warn!("Skipping invalid job: {}", e);
        return Ok(());
    }

    if let Outcome::Created { job } = client.dispatch(Intent::CreateJob(new)).await? {
        tracing::info!("Created job {} at {}", job.id, job.location);
        client.send(Intent::ToggleFavorite(job.id))?;
        client.send(Intent::SetStatus {
            id: job.id,
            status: JobStatus::Applied,
        })?;
    }

    let snapshot = client.snapshot().await?;
    for job in selectors::recent_jobs(&snapshot, 3) {
        tracing::info!(
            "Recent: {} at {} ({}, applied {})",
            job.position,
            job.company,
            job.status,
            job.date_applied
        );
    }
    for job in selectors::favorite_jobs(&snapshot) {
        tracing::info!("Favorite: {} at {}", job.position, job.company);
    }
    Ok(())
}

/// A store that never finished a load, or has nothing to show, loads first.
fn needs_initial_load(snapshot: &Snapshot) -> bool {
    snapshot.jobs.is_loading || snapshot.jobs.is_empty()
}

fn log_pipeline(snapshot: &Snapshot) {
    if snapshot.jobs.is_loading {
        tracing::info!("Loading jobs...");
        return;
    }
    if let Some(ref message) = snapshot.jobs.err_mess {
        tracing::warn!("Jobs unavailable: {}", message);
    }
    let counts = selectors::status_counts(snapshot)
        .into_iter()
        .map(|(status, n)| format!("{}={}", status, n))
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!(
        "{} jobs, {} favorites [{}]",
        snapshot.jobs.len(),
        snapshot.favorites.len(),
        counts
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracker_core::{Action, AppState};

    use super::*;

    #[test]
    fn loads_when_an_earlier_run_never_finished_loading() {
        let mut state = AppState::default();
        state.apply(Action::JobAdded(NewJob::new("Engineer", "Acme")));
        assert!(!state.jobs.is_empty());
        assert!(needs_initial_load(&Arc::new(state.clone())));

        state.apply(Action::LoadFailed("offline".to_string()));
        state.apply(Action::JobAdded(NewJob::new("Designer", "Acme")));
        assert!(!needs_initial_load(&Arc::new(state)));
        assert!(needs_initial_load(&Arc::new(AppState::default())));
    }
}
