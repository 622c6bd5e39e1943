use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for tests
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    use chrono::FixedOffset;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let bind_raw = or_default("AUTOPOST_BIND_ADDR", "0.0.0.0:3000");
    let bind_addr = bind_raw
        .parse::<SocketAddr>()
        .map_err(|e| invalid("AUTOPOST_BIND_ADDR", e.to_string()))?;

    let request_timeout_secs = or_default("AUTOPOST_REQUEST_TIMEOUT_SECS", "30")
        .parse::<u64>()
        .map_err(|e| invalid("AUTOPOST_REQUEST_TIMEOUT_SECS", e.to_string()))?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "AUTOPOST_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let source_max_retries = or_default("AUTOPOST_SOURCE_MAX_RETRIES", "2")
        .parse::<u32>()
        .map_err(|e| invalid("AUTOPOST_SOURCE_MAX_RETRIES", e.to_string()))?;
    let source_retry_backoff_base_ms = or_default("AUTOPOST_SOURCE_RETRY_BACKOFF_BASE_MS", "500")
        .parse::<u64>()
        .map_err(|e| invalid("AUTOPOST_SOURCE_RETRY_BACKOFF_BASE_MS", e.to_string()))?;

    let max_posts_per_run = match optional("AUTOPOST_MAX_POSTS_PER_RUN") {
        None => None,
        Some(raw) => {
            let n = raw
                .parse::<usize>()
                .map_err(|e| invalid("AUTOPOST_MAX_POSTS_PER_RUN", e.to_string()))?;
            if n == 0 {
                return Err(invalid(
                    "AUTOPOST_MAX_POSTS_PER_RUN",
                    "must be a positive integer; unset it to post every due row".to_string(),
                ));
            }
            Some(n)
        }
    };

    let offset_minutes = or_default("AUTOPOST_SCHEDULE_UTC_OFFSET_MINUTES", "0")
        .parse::<i32>()
        .map_err(|e| invalid("AUTOPOST_SCHEDULE_UTC_OFFSET_MINUTES", e.to_string()))?;
    let schedule_utc_offset = offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            invalid(
                "AUTOPOST_SCHEDULE_UTC_OFFSET_MINUTES",
                format!("{offset_minutes} minutes is outside the valid UTC offset range"),
            )
        })?;

    Ok(AppConfig {
        env: parse_environment(&or_default("AUTOPOST_ENV", "development")),
        bind_addr,
        log_level: or_default("AUTOPOST_LOG_LEVEL", "info"),
        sheet_api_url: optional("SHEET_API_URL"),
        openai_api_key: require("OPENAI_API_KEY")?,
        openai_base_url: or_default("OPENAI_BASE_URL", "https://api.openai.com/v1"),
        openai_model: or_default("OPENAI_MODEL", "gpt-3.5-turbo"),
        page_access_token: require("PAGE_ACCESS_TOKEN")?,
        page_id: require("PAGE_ID")?,
        graph_api_base_url: or_default("GRAPH_API_BASE_URL", "https://graph.facebook.com/v17.0"),
        request_timeout_secs,
        user_agent: or_default("AUTOPOST_USER_AGENT", "autopost/0.1 (social-publisher)"),
        source_max_retries,
        source_retry_backoff_base_ms,
        max_posts_per_run,
        schedule_utc_offset,
        cron: optional("AUTOPOST_CRON"),
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
