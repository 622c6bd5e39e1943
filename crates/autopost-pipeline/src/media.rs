//! Uploading a row's images ahead of the post.

use std::time::Duration;

use autopost_core::MediaHandle;
use futures::{StreamExt as _, TryStreamExt as _};

use crate::bounded::bounded;
use crate::error::RowError;
use crate::ports::SocialPlatform;

/// Upper bound on in-flight uploads for one row.
const MAX_CONCURRENT_UPLOADS: usize = 4;

/// Upload every image as unpublished media and return the handles in the
/// same order as `image_urls`.
///
/// Uploads run concurrently. An empty list makes no platform calls.
///
/// # Errors
///
/// [`RowError::MediaUpload`] for the first upload that fails or exceeds
/// `limit`; no handles are returned, so the row is never posted with part of
/// its media.
pub async fn upload_all<P: SocialPlatform>(
    platform: &P,
    image_urls: &[String],
    limit: Duration,
) -> Result<Vec<MediaHandle>, RowError> {
    if image_urls.is_empty() {
        return Ok(Vec::new());
    }

    // Owned URLs keep the row future `Send`.
    futures::stream::iter(image_urls.iter().cloned())
        .map(|url| async move {
            bounded(limit, platform.upload_unpublished_photo(&url))
                .await
                .map_err(|source| RowError::MediaUpload { url, source })
        })
        .buffered(MAX_CONCURRENT_UPLOADS)
        .try_collect()
        .await
}
