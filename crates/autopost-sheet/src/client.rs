//! HTTP client for the spreadsheet web app.
//!
//! Reads the pending-row snapshot with `GET` and writes per-row outcomes with
//! `POST`, both against the same URL. The row envelope's `success` flag is
//! checked before any row is looked at; a missing or false flag surfaces as
//! [`SheetError::Format`].

use std::time::Duration;

use autopost_core::Row;
use chrono::FixedOffset;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::SheetError;
use crate::normalize::normalize_row;
use crate::retry::RetryPolicy;
use crate::types::{RawRow, StatusUpdate};

/// Longest slice of an unexpected body quoted back in an error message.
const BODY_EXCERPT_CHARS: usize = 200;

/// Client for one spreadsheet store URL.
///
/// Use [`SheetClient::new`] with the configured URL, or point it at a
/// wiremock server in tests.
#[derive(Debug, Clone)]
pub struct SheetClient {
    client: Client,
    url: Url,
    timeout: Duration,
    retry: RetryPolicy,
}

impl SheetClient {
    /// Creates a client with the given timeout and `User-Agent`.
    ///
    /// Row reads are not retried until [`SheetClient::with_retry`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::InvalidUrl`] if `url` does not parse, or
    /// [`SheetError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SheetError> {
        let parsed = Url::parse(url.trim()).map_err(|e| SheetError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            url: parsed,
            timeout,
            retry: RetryPolicy::default(),
        })
    }

    /// Retry row reads up to `max_retries` extra times on transient errors.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.retry = RetryPolicy {
            max_retries,
            backoff_base_ms,
        };
        self
    }

    /// Upper bound on one [`SheetClient::fetch_rows`] call: every attempt
    /// timing out plus the longest back-off between them.
    #[must_use]
    pub fn fetch_budget(&self) -> Duration {
        self.retry.worst_case(self.timeout)
    }

    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Fetches the current row snapshot.
    ///
    /// A missing or `null` `data` field is an empty snapshot, not an error.
    /// Entries that are not objects or have no usable `rowIndex` are logged
    /// and dropped.
    ///
    /// # Errors
    ///
    /// - [`SheetError::Http`] on network failure, timeout, or non-2xx status
    ///   (after retries).
    /// - [`SheetError::Deserialize`] if the body is not JSON.
    /// - [`SheetError::Format`] if `success` is not `true` or `data` is not an array.
    pub async fn fetch_rows(&self, offset: FixedOffset) -> Result<Vec<Row>, SheetError> {
        let body = self.retry.run(|| self.request_json()).await?;

        let entries = Self::check_envelope(body)?;
        let total = entries.len();

        let rows: Vec<Row> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(position, value)| {
                let raw = match serde_json::from_value::<RawRow>(value) {
                    Ok(raw) => raw,
                    Err(e) => {
                        tracing::warn!(position, error = %e, "dropping malformed row from store");
                        return None;
                    }
                };
                let row = normalize_row(&raw, offset);
                if row.is_none() {
                    tracing::warn!(
                        position,
                        row_index = %raw.row_index,
                        "dropping row with unusable rowIndex"
                    );
                }
                row
            })
            .collect();

        tracing::debug!(received = total, kept = rows.len(), "fetched rows from store");
        Ok(rows)
    }

    /// Writes one row's outcome back to the store.
    ///
    /// Sent once; never retried.
    ///
    /// # Errors
    ///
    /// - [`SheetError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`SheetError::Format`] if the store answers with `success: false`.
    pub async fn write_status(&self, update: &StatusUpdate<'_>) -> Result<(), SheetError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(update)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        // Apps Script deployments often answer with HTML or nothing at all;
        // only an explicit JSON `success: false` counts as a rejection.
        if let Ok(value) = serde_json::from_str::<Value>(&body) {
            if value.get("success").and_then(Value::as_bool) == Some(false) {
                return Err(SheetError::Format(format!(
                    "store rejected status update for row {}: {}",
                    update.row_index,
                    excerpt(&body)
                )));
            }
        }
        Ok(())
    }

    async fn request_json(&self) -> Result<Value, SheetError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SheetError::Deserialize {
            context: self.url.to_string(),
            source: e,
        })
    }

    /// Checks `success` and pulls out the `data` array.
    fn check_envelope(body: Value) -> Result<Vec<Value>, SheetError> {
        if body.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(SheetError::Format(format!(
                "expected success=true, got: {}",
                excerpt(&body.to_string())
            )));
        }

        let Value::Object(mut map) = body else {
            return Err(SheetError::Format("envelope is not an object".to_owned()));
        };

        match map.remove("data") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(entries)) => Ok(entries),
            Some(other) => Err(SheetError::Format(format!(
                "expected data to be an array, got: {}",
                excerpt(&other.to_string())
            ))),
        }
    }
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_CHARS {
        body.to_owned()
    } else {
        let cut: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rejects_relative_url() {
        let err = SheetClient::new("not a url", 30, "test").unwrap_err();
        assert!(matches!(err, SheetError::InvalidUrl { .. }), "got: {err:?}");
    }

    #[test]
    fn fetch_budget_without_retries_is_the_request_timeout() {
        let client = SheetClient::new("https://sheet.example/exec", 30, "test").unwrap();
        assert_eq!(client.fetch_budget(), Duration::from_secs(30));
    }

    #[test]
    fn fetch_budget_covers_every_retry() {
        let client = SheetClient::new("https://sheet.example/exec", 30, "test")
            .unwrap()
            .with_retry(2, 500);
        assert_eq!(client.fetch_budget(), Duration::from_millis(91_875));
    }

    #[test]
    fn envelope_without_success_is_format_error() {
        let err = SheetClient::check_envelope(json!({ "data": [] })).unwrap_err();
        assert!(matches!(err, SheetError::Format(_)), "got: {err:?}");
    }

    #[test]
    fn envelope_with_success_false_is_format_error() {
        let err = SheetClient::check_envelope(json!({ "success": false })).unwrap_err();
        assert!(matches!(err, SheetError::Format(_)), "got: {err:?}");
    }

    #[test]
    fn envelope_with_null_data_is_empty() {
        let entries = SheetClient::check_envelope(json!({ "success": true, "data": null })).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn envelope_with_object_data_is_format_error() {
        let err =
            SheetClient::check_envelope(json!({ "success": true, "data": { "rowIndex": 1 } }))
                .unwrap_err();
        assert!(matches!(err, SheetError::Format(_)), "got: {err:?}");
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), BODY_EXCERPT_CHARS + 1);
        assert!(cut.ends_with('…'));
    }
}
