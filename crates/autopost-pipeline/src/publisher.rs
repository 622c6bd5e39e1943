//! Compose, upload, publish, record: one row from start to finish.

use std::time::Duration;

use autopost_sheet::StatusUpdate;

use crate::bounded::bounded;
use crate::compose::compose;
use crate::draft::{PostDraft, PublishedPost};
use crate::error::RowError;
use crate::media::upload_all;
use crate::ports::{ContentGenerator, ResultRecorder, SocialPlatform};

/// Publishes single rows and records their outcome.
///
/// Shared by the batch run and the manual single-row operation.
#[derive(Debug, Clone)]
pub struct RowPublisher<G, P, R> {
    generator: G,
    platform: P,
    recorder: R,
    call_timeout: Duration,
}

impl<G, P, R> RowPublisher<G, P, R>
where
    G: ContentGenerator,
    P: SocialPlatform,
    R: ResultRecorder,
{
    #[must_use]
    pub fn new(generator: G, platform: P, recorder: R, call_timeout: Duration) -> Self {
        Self {
            generator,
            platform,
            recorder,
            call_timeout,
        }
    }

    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Take `draft` through every stage and record the outcome exactly once.
    ///
    /// A failed write-back is logged and does not change the returned result.
    ///
    /// # Errors
    ///
    /// The [`RowError`] of the first stage that failed. The store has already
    /// been told the row `Failed` (best effort) when this returns.
    pub async fn publish(&self, draft: &PostDraft) -> Result<PublishedPost, RowError> {
        let outcome = self.attempt(draft).await;

        let update = match &outcome {
            Ok(post) => {
                StatusUpdate::posted(draft.row_index, &post.post_id, &post.optimized_content)
            }
            Err(_) => StatusUpdate::failed(draft.row_index),
        };
        self.record(&update).await;

        outcome
    }

    async fn attempt(&self, draft: &PostDraft) -> Result<PublishedPost, RowError> {
        let limit = self.call_timeout;

        let text = compose(&self.generator, draft, limit).await?;
        let media = upload_all(&self.platform, &draft.images, limit).await?;
        let post_id = bounded(limit, self.platform.publish_post(&text, &media))
            .await
            .map_err(RowError::Publish)?;

        tracing::info!(
            row_index = draft.row_index,
            post_id = %post_id,
            media = media.len(),
            "published post"
        );
        Ok(PublishedPost {
            post_id,
            optimized_content: text,
        })
    }

    async fn record(&self, update: &StatusUpdate<'_>) {
        if let Err(e) = bounded(self.call_timeout, self.recorder.record(update)).await {
            tracing::warn!(
                row_index = update.row_index,
                status = %update.status,
                error = %e,
                "failed to write row status back to store"
            );
        }
    }
}
