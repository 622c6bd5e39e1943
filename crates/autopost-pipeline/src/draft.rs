use autopost_core::{parse_image_list, Row};

/// Everything needed to publish one row, independent of where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub row_index: u64,
    pub description: String,
    pub images: Vec<String>,
    pub tags: Option<String>,
    pub prompt_template: Option<String>,
}

impl PostDraft {
    /// Build a draft from loosely-filled manual input.
    ///
    /// `image_field` is the comma-joined list the store uses. Blank optional
    /// strings become `None`.
    #[must_use]
    pub fn manual(
        row_index: u64,
        description: &str,
        image_field: Option<&str>,
        tags: Option<&str>,
        prompt_template: Option<&str>,
    ) -> Self {
        let non_blank = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
        };
        Self {
            row_index,
            description: description.trim().to_owned(),
            images: image_field.map(parse_image_list).unwrap_or_default(),
            tags: non_blank(tags),
            prompt_template: non_blank(prompt_template),
        }
    }
}

impl From<&Row> for PostDraft {
    fn from(row: &Row) -> Self {
        Self {
            row_index: row.row_index,
            description: row.description.clone(),
            images: row.images.clone(),
            tags: row.tags.clone(),
            prompt_template: row.prompt_template.clone(),
        }
    }
}

/// A row that made it onto the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub post_id: String,
    /// The generated text that was posted.
    pub optimized_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_draft_normalizes_blank_fields() {
        let draft = PostDraft::manual(
            4,
            "  Sale 50%  ",
            Some("https://a.example/1.jpg, "),
            Some(" "),
            Some(""),
        );
        assert_eq!(draft.description, "Sale 50%");
        assert_eq!(draft.images, vec!["https://a.example/1.jpg"]);
        assert!(draft.tags.is_none());
        assert!(draft.prompt_template.is_none());
    }

    #[test]
    fn manual_draft_without_images_has_none() {
        let draft = PostDraft::manual(4, "x", None, Some("#a"), None);
        assert!(draft.images.is_empty());
        assert_eq!(draft.tags.as_deref(), Some("#a"));
    }
}
