//! Outcome types for one pipeline run.

use serde::Serialize;

/// Terminal state of an attempted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowStatus {
    Posted,
    Failed,
}

impl RowStatus {
    /// The string the store expects in its status column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RowStatus::Posted => "Posted",
            RowStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one attempted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOutcome {
    pub row_index: u64,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RowOutcome {
    #[must_use]
    pub fn posted(row_index: u64, post_id: String) -> Self {
        Self {
            row_index,
            status: RowStatus::Posted,
            post_id: Some(post_id),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(row_index: u64, error: String) -> Self {
        Self {
            row_index,
            status: RowStatus::Failed,
            post_id: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub posted: usize,
    pub failed: usize,
    /// Rows not attempted: not yet due, or held back by a per-run post cap.
    pub skipped: usize,
}

/// What a run reports back: counts plus one entry per attempted row, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub summary: RunSummary,
    pub results: Vec<RowOutcome>,
}

impl RunResult {
    /// Derive the summary from the attempted outcomes.
    ///
    /// `skipped` is whatever `total` the outcomes do not account for, so
    /// `posted + failed + skipped == total` holds by construction.
    #[must_use]
    pub fn from_outcomes(total: usize, results: Vec<RowOutcome>) -> Self {
        let posted = results
            .iter()
            .filter(|r| r.status == RowStatus::Posted)
            .count();
        let failed = results.len() - posted;
        Self {
            summary: RunSummary {
                total,
                posted,
                failed,
                skipped: total.saturating_sub(posted + failed),
            },
            results,
        }
    }
}
