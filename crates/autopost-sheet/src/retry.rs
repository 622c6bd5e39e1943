//! Back-off policy for reading rows.
//!
//! Only the row fetch goes through [`RetryPolicy::run`]. Status writes are
//! not idempotent from the store's point of view and are sent once.

use std::future::Future;
use std::time::Duration;

use crate::error::SheetError;

/// Longest pause between two reads, before jitter.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 5xx.
///
/// **Not retriable:** 4xx responses, [`SheetError::Format`],
/// [`SheetError::Deserialize`], [`SheetError::InvalidUrl`]. Asking again
/// would get the same answer.
pub(crate) fn is_retriable(err: &SheetError) -> bool {
    match err {
        SheetError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        SheetError::InvalidUrl { .. } | SheetError::Format(_) | SheetError::Deserialize { .. } => {
            false
        }
    }
}

/// How many extra reads to make and how long to wait between them.
///
/// The n-th retry waits `backoff_base_ms × 2ⁿ⁻¹`, capped at 30 s, then
/// scaled by a random factor in `[0.75, 1.25)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    /// Un-jittered delay before retry number `retry` (1-based).
    fn base_delay_ms(self, retry: u32) -> u64 {
        let exponent = retry.saturating_sub(1).min(10);
        self.backoff_base_ms
            .saturating_mul(1u64 << exponent)
            .min(MAX_DELAY_MS)
    }

    fn jittered_delay(self, retry: u32) -> Duration {
        let base = self.base_delay_ms(retry);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let ms = (base as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
        Duration::from_millis(ms)
    }

    /// Longest a full read can take when every attempt runs into
    /// `attempt_timeout`: all attempts plus the largest possible pauses.
    pub(crate) fn worst_case(self, attempt_timeout: Duration) -> Duration {
        let pauses_ms: u64 = (1..=self.max_retries)
            .map(|retry| self.base_delay_ms(retry).saturating_mul(5) / 4)
            .fold(0, u64::saturating_add);
        attempt_timeout
            .saturating_mul(self.max_retries.saturating_add(1))
            .saturating_add(Duration::from_millis(pauses_ms))
    }

    /// Runs `read` until it succeeds, fails for good, or the retries run out.
    pub(crate) async fn run<T, F, Fut>(self, mut read: F) -> Result<T, SheetError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SheetError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match read().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !is_retriable(&err) || retry >= self.max_retries {
                return Err(err);
            }
            retry += 1;
            let delay = self.jittered_delay(retry);
            tracing::warn!(
                retry,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "store read failed, retrying after back-off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
