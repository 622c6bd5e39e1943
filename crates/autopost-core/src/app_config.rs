use std::net::SocketAddr;

use chrono::FixedOffset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Spreadsheet web-app URL used both to read rows and to write outcomes.
    /// Optional at load time so the server can start and report the gap per run.
    pub sheet_api_url: Option<String>,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub page_access_token: String,
    pub page_id: String,
    pub graph_api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Extra attempts for the row fetch on transient errors. Writes are never retried.
    pub source_max_retries: u32,
    pub source_retry_backoff_base_ms: u64,
    /// `None` posts every due row in a run.
    pub max_posts_per_run: Option<usize>,
    /// Offset applied to scheduled times that carry no zone.
    pub schedule_utc_offset: FixedOffset,
    /// Six-field cron expression for timer-triggered runs.
    pub cron: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("sheet_api_url", &self.sheet_api_url)
            .field("openai_api_key", &"[redacted]")
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("page_access_token", &"[redacted]")
            .field("page_id", &self.page_id)
            .field("graph_api_base_url", &self.graph_api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("source_max_retries", &self.source_max_retries)
            .field(
                "source_retry_backoff_base_ms",
                &self.source_retry_backoff_base_ms,
            )
            .field("max_posts_per_run", &self.max_posts_per_run)
            .field("schedule_utc_offset", &self.schedule_utc_offset)
            .field("cron", &self.cron)
            .finish()
    }
}
