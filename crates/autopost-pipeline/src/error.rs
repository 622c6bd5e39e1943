use std::time::Duration;

use autopost_graph::GraphError;
use autopost_llm::LlmError;
use autopost_sheet::SheetError;
use thiserror::Error;

/// An external call that either failed or ran out of time.
#[derive(Debug, Error)]
pub enum Failure<E: std::error::Error + 'static> {
    #[error(transparent)]
    Call(E),

    #[error("timed out after {}s", .0.as_secs_f32())]
    TimedOut(Duration),
}

/// Errors that stop a run before any row is attempted.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Required configuration is missing or unusable, including an unset
    /// store address (the source is unavailable).
    #[error("configuration error: {0}")]
    Config(String),

    /// The row fetch failed in transport or timed out.
    #[error("row source request failed: {0}")]
    Source(#[source] Failure<SheetError>),

    /// The store answered, but not with a successful row envelope.
    #[error("row source returned an unexpected response: {0}")]
    SourceFormat(#[source] SheetError),
}

impl PipelineError {
    /// Classify a failed row fetch.
    #[must_use]
    pub fn from_fetch(failure: Failure<SheetError>) -> Self {
        match failure {
            Failure::Call(e @ (SheetError::Format(_) | SheetError::Deserialize { .. })) => {
                Self::SourceFormat(e)
            }
            Failure::Call(e @ SheetError::InvalidUrl { .. }) => Self::Config(e.to_string()),
            other => Self::Source(other),
        }
    }
}

/// Why a single row ended up `Failed`. Never escapes a run.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("row has no description to compose from")]
    MissingDescription,

    #[error("content generation failed: {0}")]
    Generation(#[source] Failure<LlmError>),

    #[error("media upload failed for {url}: {source}")]
    MediaUpload {
        url: String,
        #[source]
        source: Failure<GraphError>,
    },

    #[error("publish failed: {0}")]
    Publish(#[source] Failure<GraphError>),
}

/// Errors from the single-row publish operation.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("configuration error: {0}")]
    Config(String),

    /// The request itself is unusable; nothing was attempted or recorded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Row(#[from] RowError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_classify_as_source_format() {
        let err = PipelineError::from_fetch(Failure::Call(SheetError::Format(
            "expected success=true".to_owned(),
        )));
        assert!(matches!(err, PipelineError::SourceFormat(_)), "got: {err:?}");
    }

    #[test]
    fn timeouts_classify_as_source_failures() {
        let err = PipelineError::from_fetch(Failure::TimedOut(Duration::from_secs(30)));
        assert!(matches!(err, PipelineError::Source(_)), "got: {err:?}");
        assert!(err.to_string().contains("timed out after 30s"));
    }

    #[test]
    fn row_error_message_keeps_the_cause() {
        let err = RowError::Publish(Failure::Call(GraphError::Api {
            status: 400,
            code: Some(100),
            message: "Invalid parameter".to_owned(),
        }));
        let rendered = err.to_string();
        assert!(rendered.starts_with("publish failed: "));
        assert!(rendered.contains("Invalid parameter"));
    }
}
