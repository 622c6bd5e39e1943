//! The pipeline's view of its collaborators.
//!
//! Each trait is the narrow slice of an external service a run needs. The
//! live implementations live in [`crate::adapters`]; tests use in-memory fakes.

use std::future::Future;

use autopost_core::{MediaHandle, Row};
use autopost_graph::GraphError;
use autopost_llm::LlmError;
use autopost_sheet::{SheetError, StatusUpdate};

/// Where pending rows come from.
pub trait RowSource: Send + Sync {
    /// Read the current snapshot, already normalized into [`Row`]s.
    fn fetch_rows(&self) -> impl Future<Output = Result<Vec<Row>, SheetError>> + Send;
}

/// The generative-language service.
pub trait ContentGenerator: Send + Sync {
    /// Run one completion; `Ok(None)` when the service returned no text.
    fn generate(
        &self,
        system: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<Option<String>, LlmError>> + Send;
}

/// The social platform.
pub trait SocialPlatform: Send + Sync {
    /// Upload one image without showing it anywhere yet.
    fn upload_unpublished_photo(
        &self,
        image_url: &str,
    ) -> impl Future<Output = Result<MediaHandle, GraphError>> + Send;

    /// Publish a post and return the platform's id for it.
    fn publish_post(
        &self,
        message: &str,
        media: &[MediaHandle],
    ) -> impl Future<Output = Result<String, GraphError>> + Send;
}

/// Where per-row outcomes are written.
pub trait ResultRecorder: Send + Sync {
    fn record(&self, update: &StatusUpdate<'_>)
        -> impl Future<Output = Result<(), SheetError>> + Send;
}
