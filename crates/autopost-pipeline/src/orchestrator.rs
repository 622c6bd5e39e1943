//! The batch run.

use std::collections::HashSet;
use std::time::Duration;

use autopost_core::{RowOutcome, RunResult};
use chrono::{DateTime, Utc};

use crate::bounded::bounded;
use crate::draft::PostDraft;
use crate::due::is_due;
use crate::error::PipelineError;
use crate::ports::{ContentGenerator, ResultRecorder, RowSource, SocialPlatform};
use crate::publisher::RowPublisher;

/// Knobs for one run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Bound on the whole row fetch, retries included. Row-level calls use
    /// the publisher's own bound.
    pub fetch_timeout: Duration,
    /// Stop attempting rows once this many have been posted. `None` is no cap.
    pub max_posts_per_run: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            max_posts_per_run: None,
        }
    }
}

/// Run the pipeline once over a fresh snapshot from `source`.
///
/// Rows are attempted one at a time in snapshot order. Every due row ends
/// up in `results` as `Posted` or `Failed`; rows that are not due, repeat a
/// `rowIndex` already seen in this snapshot, or are held back by
/// `max_posts_per_run` are counted as skipped.
///
/// # Errors
///
/// Only when the snapshot cannot be read: [`PipelineError::Source`] for
/// transport failures and timeouts, [`PipelineError::SourceFormat`] for an
/// unexpected response. No row has been attempted in either case.
pub async fn run_pipeline<S, G, P, R>(
    source: &S,
    publisher: &RowPublisher<G, P, R>,
    options: RunOptions,
    now: DateTime<Utc>,
) -> Result<RunResult, PipelineError>
where
    S: RowSource,
    G: ContentGenerator,
    P: SocialPlatform,
    R: ResultRecorder,
{
    let rows = bounded(options.fetch_timeout, source.fetch_rows())
        .await
        .map_err(|e| {
            let err = PipelineError::from_fetch(e);
            tracing::error!(error = %err, "could not read rows; run aborted");
            err
        })?;

    let total = rows.len();
    let mut seen = HashSet::with_capacity(total);
    let mut results = Vec::new();
    let mut posted = 0usize;

    for row in &rows {
        if !is_due(row, now) {
            tracing::debug!(row_index = row.row_index, "row not due yet");
            continue;
        }
        if !seen.insert(row.row_index) {
            tracing::warn!(
                row_index = row.row_index,
                "rowIndex repeated in snapshot; skipping duplicate"
            );
            continue;
        }
        if options.max_posts_per_run.is_some_and(|cap| posted >= cap) {
            tracing::debug!(row_index = row.row_index, "post cap reached; leaving row for next run");
            continue;
        }

        let draft = PostDraft::from(row);
        match publisher.publish(&draft).await {
            Ok(post) => {
                posted += 1;
                results.push(RowOutcome::posted(row.row_index, post.post_id));
            }
            Err(e) => {
                tracing::warn!(row_index = row.row_index, error = %e, "row failed");
                results.push(RowOutcome::failed(row.row_index, e.to_string()));
            }
        }
    }

    let result = RunResult::from_outcomes(total, results);
    tracing::info!(
        total = result.summary.total,
        posted = result.summary.posted,
        failed = result.summary.failed,
        skipped = result.summary.skipped,
        "run finished"
    );
    Ok(result)
}
