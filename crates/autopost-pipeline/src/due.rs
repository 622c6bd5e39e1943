use autopost_core::{Row, Schedule};
use chrono::{DateTime, Utc};

/// Whether `row` should be attempted at `now`.
///
/// Rows with no scheduled time, or a time at or before `now`, are due. A time
/// that could not be read is also due: the store only fills the column to
/// delay a post, so an unreadable value is not taken as a reason to hold it.
#[must_use]
pub fn is_due(row: &Row, now: DateTime<Utc>) -> bool {
    if let Schedule::Unparsable(raw) = &row.schedule {
        tracing::warn!(
            row_index = row.row_index,
            post_time = %raw,
            "unreadable post_time; treating row as due"
        );
    }
    row.schedule.is_due(now)
}
