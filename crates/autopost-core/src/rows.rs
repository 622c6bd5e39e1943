use crate::schedule::Schedule;

/// One candidate content item read from the spreadsheet store.
///
/// Built by the sheet adapter from the store's loosely-typed JSON; every field
/// here has already been trimmed and normalized, so empty optional strings are
/// `None` and `images` holds only non-empty URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Positional key into the store. Stable for the life of the row.
    pub row_index: u64,
    /// Source text handed to the composer. May be empty; the composer rejects it.
    pub description: String,
    /// Hashtags to append, kept as the store wrote them (e.g. `"#sale #summer"`).
    pub tags: Option<String>,
    /// Image URLs in store order.
    pub images: Vec<String>,
    pub schedule: Schedule,
    /// Replaces the default generation prompt verbatim when set.
    pub prompt_template: Option<String>,
    /// Last status written by the recorder (`"Pending"`, `"Posted"`, `"Failed"`).
    /// Informational only; the pipeline does not filter on it.
    pub status: Option<String>,
}

/// Split a comma-joined image field into trimmed, non-empty URLs, keeping order.
#[must_use]
pub fn parse_image_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
