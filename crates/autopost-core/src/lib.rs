//! Shared configuration and domain types for the autopost workspace.

pub mod app_config;
pub mod config;
pub mod media;
pub mod rows;
pub mod run;
pub mod schedule;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use media::MediaHandle;
pub use rows::{parse_image_list, Row};
pub use run::{RowOutcome, RowStatus, RunResult, RunSummary};
pub use schedule::Schedule;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
