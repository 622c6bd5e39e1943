//! Normalization of raw store rows into [`Row`] values.

use autopost_core::{parse_image_list, Row, Schedule};
use chrono::FixedOffset;
use serde_json::Value;

use crate::types::RawRow;

/// Reads a spreadsheet cell as trimmed text.
///
/// Numbers and booleans are rendered as text; null, blank strings, arrays and
/// objects become `None`.
#[must_use]
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads a `rowIndex` cell as a non-negative integer.
///
/// Accepts JSON integers, integral floats (`3.0`), and numeric strings.
#[must_use]
pub fn parse_row_index(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= 9_007_199_254_740_992.0)
                .map(|f| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let idx = f as u64;
                    idx
                })
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Reads the `image` cell: a comma-joined string or an array of URL strings.
#[must_use]
pub fn parse_images(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => parse_image_list(s),
        Value::Array(items) => items
            .iter()
            .filter_map(cell_text)
            .flat_map(|s| parse_image_list(&s))
            .collect(),
        _ => Vec::new(),
    }
}

/// Converts a [`RawRow`] into a [`Row`].
///
/// Returns `None` when the row has no usable `rowIndex`, since an outcome
/// could never be written back for it.
#[must_use]
pub fn normalize_row(raw: &RawRow, offset: FixedOffset) -> Option<Row> {
    let row_index = parse_row_index(&raw.row_index)?;
    let post_time = cell_text(&raw.post_time);

    Some(Row {
        row_index,
        description: cell_text(&raw.description).unwrap_or_default(),
        tags: cell_text(&raw.tags),
        images: parse_images(&raw.image),
        schedule: Schedule::parse(post_time.as_deref(), offset),
        prompt_template: cell_text(&raw.prompt_template),
        status: cell_text(&raw.status),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn raw(value: Value) -> RawRow {
        serde_json::from_value(value).expect("raw row should deserialize")
    }

    #[test]
    fn row_index_accepts_integer_float_and_string() {
        assert_eq!(parse_row_index(&json!(3)), Some(3));
        assert_eq!(parse_row_index(&json!(3.0)), Some(3));
        assert_eq!(parse_row_index(&json!(" 12 ")), Some(12));
    }

    #[test]
    fn row_index_rejects_fractions_negatives_and_text() {
        assert_eq!(parse_row_index(&json!(2.5)), None);
        assert_eq!(parse_row_index(&json!(-1)), None);
        assert_eq!(parse_row_index(&json!("third")), None);
        assert_eq!(parse_row_index(&Value::Null), None);
    }

    #[test]
    fn blank_cells_become_none() {
        assert_eq!(cell_text(&json!("   ")), None);
        assert_eq!(cell_text(&Value::Null), None);
        assert_eq!(cell_text(&json!(42)), Some("42".to_string()));
    }

    #[test]
    fn normalizes_full_row() {
        let row = normalize_row(
            &raw(json!({
                "rowIndex": 3,
                "description": "Sale 50%",
                "image": "https://cdn.example.com/a.jpg, https://cdn.example.com/b.jpg",
                "tags": "#sale",
                "post_time": "",
                "prompt_template": "  ",
                "status": "Pending"
            })),
            utc(),
        )
        .expect("row should normalize");

        assert_eq!(row.row_index, 3);
        assert_eq!(row.description, "Sale 50%");
        assert_eq!(row.tags.as_deref(), Some("#sale"));
        assert_eq!(row.images.len(), 2);
        assert_eq!(row.schedule, Schedule::Immediate);
        assert!(row.prompt_template.is_none());
        assert_eq!(row.status.as_deref(), Some("Pending"));
    }

    #[test]
    fn image_array_is_accepted() {
        let images = parse_images(&json!(["https://a.example/1.png", "", "https://a.example/2.png"]));
        assert_eq!(images, vec!["https://a.example/1.png", "https://a.example/2.png"]);
    }

    #[test]
    fn row_without_index_is_dropped() {
        let row = normalize_row(&raw(json!({ "rowIndex": null, "description": "x" })), utc());
        assert!(row.is_none());
    }
}
