//! Timer-triggered runs.
//!
//! Registers one cron job that runs the pipeline through the same single-run
//! guard as `POST /api/v1/runs`.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::api::AppState;

/// Builds and starts the scheduler with the run job on `cron`.
///
/// The returned handle must be kept alive; dropping it stops the job.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// `cron` is not a valid expression, or the scheduler fails to start.
pub async fn build_scheduler(state: AppState, cron: &str) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_run_job(&scheduler, state, cron).await?;
    scheduler.start().await?;
    tracing::info!(cron, "scheduler: pipeline run job registered");
    Ok(scheduler)
}

async fn register_run_job(
    scheduler: &JobScheduler,
    state: AppState,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let state = state.clone();
        Box::pin(async move {
            run_job(&state).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

async fn run_job(state: &AppState) {
    tracing::info!("scheduler: starting pipeline run");
    match state.try_run().await {
        None => tracing::warn!("scheduler: previous run still in progress; skipping this tick"),
        Some(Ok(result)) => tracing::info!(
            total = result.summary.total,
            posted = result.summary.posted,
            failed = result.summary.failed,
            skipped = result.summary.skipped,
            "scheduler: pipeline run complete"
        ),
        Some(Err(e)) => tracing::error!(error = %e, "scheduler: pipeline run aborted"),
    }
}
