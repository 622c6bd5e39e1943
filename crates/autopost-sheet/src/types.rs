//! Wire types for the store's JSON.

use autopost_core::RowStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the store's `data` array, before normalization.
///
/// Spreadsheet cells arrive as whatever JSON type the sheet produced (text,
/// number, bool, or null), so every field is kept as a raw [`Value`].
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "rowIndex")]
    pub row_index: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub image: Value,
    #[serde(default)]
    pub tags: Value,
    #[serde(default)]
    pub post_time: Value,
    #[serde(default)]
    pub prompt_template: Value,
    #[serde(default)]
    pub status: Value,
}

/// Body of the write-back `POST`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate<'a> {
    pub row_index: u64,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<&'a str>,
    /// Text that went out. Empty for failures.
    pub final_content: &'a str,
}

impl<'a> StatusUpdate<'a> {
    #[must_use]
    pub fn posted(row_index: u64, post_id: &'a str, final_content: &'a str) -> Self {
        Self {
            row_index,
            status: RowStatus::Posted,
            post_id: Some(post_id),
            final_content,
        }
    }

    #[must_use]
    pub fn failed(row_index: u64) -> Self {
        Self {
            row_index,
            status: RowStatus::Failed,
            post_id: None,
            final_content: "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_update_omits_post_id_and_clears_content() {
        let json = serde_json::to_value(StatusUpdate::failed(5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "rowIndex": 5, "status": "Failed", "finalContent": "" })
        );
    }

    #[test]
    fn posted_update_carries_post_id_and_text() {
        let json = serde_json::to_value(StatusUpdate::posted(3, "999", "hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rowIndex": 3,
                "status": "Posted",
                "postId": "999",
                "finalContent": "hello"
            })
        );
    }
}
