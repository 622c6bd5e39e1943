//! Binding the HTTP clients to the pipeline's collaborator traits.

use std::time::Duration;

use autopost_core::{AppConfig, MediaHandle, Row, RunResult};
use autopost_graph::{GraphClient, GraphError};
use autopost_llm::{ChatClient, LlmError};
use autopost_sheet::{SheetClient, SheetError, StatusUpdate};
use chrono::{DateTime, FixedOffset, Utc};

use crate::bounded::bounded;
use crate::draft::{PostDraft, PublishedPost};
use crate::error::{PipelineError, PostError};
use crate::orchestrator::{run_pipeline, RunOptions};
use crate::ports::{ContentGenerator, ResultRecorder, RowSource, SocialPlatform};
use crate::publisher::RowPublisher;

/// Slack on top of the HTTP client timeout so reqwest reports its own,
/// more specific, timeout error first.
const CALL_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

impl ContentGenerator for ChatClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<Option<String>, LlmError> {
        ChatClient::complete(self, system, prompt).await
    }
}

impl SocialPlatform for GraphClient {
    async fn upload_unpublished_photo(&self, image_url: &str) -> Result<MediaHandle, GraphError> {
        GraphClient::upload_unpublished_photo(self, image_url).await
    }

    async fn publish_post(&self, message: &str, media: &[MediaHandle]) -> Result<String, GraphError> {
        GraphClient::publish_post(self, message, media).await
    }
}

impl ResultRecorder for SheetClient {
    async fn record(&self, update: &StatusUpdate<'_>) -> Result<(), SheetError> {
        self.write_status(update).await
    }
}

/// A [`SheetClient`] plus the offset its zone-less times are read in.
#[derive(Debug, Clone)]
pub struct SheetSource {
    pub client: SheetClient,
    pub offset: FixedOffset,
}

impl RowSource for SheetSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>, SheetError> {
        self.client.fetch_rows(self.offset).await
    }
}

/// The live collaborators, built once from configuration.
#[derive(Debug, Clone)]
pub struct Services {
    chat: ChatClient,
    graph: GraphClient,
    sheet: Option<SheetClient>,
    offset: FixedOffset,
    options: RunOptions,
    call_timeout: Duration,
    request_timeout_secs: u64,
    user_agent: String,
}

impl Services {
    /// Build every client from `config`.
    ///
    /// A missing store URL is allowed here; runs report it when they start.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Config`] if a client cannot be constructed, e.g. an
    /// unparsable base URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let timeout = config.request_timeout_secs;
        let ua = config.user_agent.as_str();

        let chat = ChatClient::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.openai_model,
            timeout,
            ua,
        )
        .map_err(|e| PipelineError::Config(format!("generation client: {e}")))?;

        let graph = GraphClient::new(
            &config.graph_api_base_url,
            &config.page_id,
            &config.page_access_token,
            timeout,
            ua,
        )
        .map_err(|e| PipelineError::Config(format!("graph client: {e}")))?;

        let sheet = config
            .sheet_api_url
            .as_deref()
            .map(|url| {
                SheetClient::new(url, timeout, ua).map(|c| {
                    c.with_retry(
                        config.source_max_retries,
                        config.source_retry_backoff_base_ms,
                    )
                })
            })
            .transpose()
            .map_err(|e| PipelineError::Config(format!("SHEET_API_URL: {e}")))?;

        let call_timeout = Duration::from_secs(timeout) + CALL_TIMEOUT_GRACE;
        let fetch_timeout = sheet
            .as_ref()
            .map_or(call_timeout, |s| s.fetch_budget() + CALL_TIMEOUT_GRACE);

        Ok(Self {
            chat,
            graph,
            sheet,
            offset: config.schedule_utc_offset,
            options: RunOptions {
                fetch_timeout,
                max_posts_per_run: config.max_posts_per_run,
            },
            call_timeout,
            request_timeout_secs: timeout,
            user_agent: config.user_agent.clone(),
        })
    }

    #[must_use]
    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Bound on each generation, upload, publish and status write.
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Override the configured per-run post cap.
    #[must_use]
    pub fn with_max_posts_per_run(mut self, cap: Option<usize>) -> Self {
        self.options.max_posts_per_run = cap;
        self
    }

    /// Run the pipeline once against the configured store.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Config`] when no store URL is configured, otherwise
    /// whatever [`run_pipeline`] returns.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunResult, PipelineError> {
        let sheet = self.require_sheet()?;
        let source = SheetSource {
            client: sheet.clone(),
            offset: self.offset,
        };
        let publisher = self.publisher(sheet.clone());
        run_pipeline(&source, &publisher, self.options, now).await
    }

    /// Read the current snapshot without attempting anything.
    ///
    /// # Errors
    ///
    /// Same as [`Services::run`] before the first row.
    pub async fn fetch_rows(&self) -> Result<Vec<Row>, PipelineError> {
        let client = self.require_sheet()?;
        bounded(self.options.fetch_timeout, client.fetch_rows(self.offset))
            .await
            .map_err(PipelineError::from_fetch)
    }

    /// Publish one row supplied by the caller and record its outcome at
    /// `source_url`, or at the configured store when that is `None`.
    ///
    /// # Errors
    ///
    /// - [`PostError::InvalidRequest`] for a blank description; nothing is
    ///   attempted or recorded.
    /// - [`PostError::Config`] when there is nowhere to record the outcome.
    /// - [`PostError::Row`] when a stage fails; the row is recorded `Failed`.
    pub async fn publish_manual(
        &self,
        draft: &PostDraft,
        source_url: Option<&str>,
    ) -> Result<PublishedPost, PostError> {
        if draft.description.trim().is_empty() {
            return Err(PostError::InvalidRequest(
                "description must not be empty".to_owned(),
            ));
        }

        let recorder = match source_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => SheetClient::new(url, self.request_timeout_secs, &self.user_agent)
                .map_err(|e| PostError::InvalidRequest(format!("sourceUrl: {e}")))?,
            None => self
                .sheet
                .clone()
                .ok_or_else(|| PostError::Config(missing_sheet_message().to_owned()))?,
        };

        let post = self.publisher(recorder).publish(draft).await?;
        Ok(post)
    }

    fn publisher(&self, recorder: SheetClient) -> RowPublisher<ChatClient, GraphClient, SheetClient> {
        RowPublisher::new(
            self.chat.clone(),
            self.graph.clone(),
            recorder,
            self.call_timeout,
        )
    }

    fn require_sheet(&self) -> Result<&SheetClient, PipelineError> {
        self.sheet
            .as_ref()
            .ok_or_else(|| PipelineError::Config(missing_sheet_message().to_owned()))
    }
}

fn missing_sheet_message() -> &'static str {
    "store URL is not set (SHEET_API_URL)"
}
