//! `autopost post`: publish one row on demand.

use autopost_pipeline::{PostDraft, Services};

#[derive(Debug)]
pub(crate) struct PostArgs {
    pub row_index: u64,
    pub description: String,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub prompt_template: Option<String>,
    pub source_url: Option<String>,
}

impl PostArgs {
    fn draft(&self) -> PostDraft {
        PostDraft::manual(
            self.row_index,
            &self.description,
            self.image_url.as_deref(),
            self.tags.as_deref(),
            self.prompt_template.as_deref(),
        )
    }
}

/// Publish the row described by `args` and print `{success, postId, optimizedContent}`.
///
/// # Errors
///
/// Returns an error if the request is invalid, no store URL is available,
/// or any stage of publishing fails. A failed stage is still recorded.
pub(crate) async fn post_row(services: &Services, args: &PostArgs) -> anyhow::Result<()> {
    let draft = args.draft();
    let post = services
        .publish_manual(&draft, args.source_url.as_deref())
        .await?;

    let body = serde_json::json!({
        "success": true,
        "postId": post.post_id,
        "optimizedContent": post.optimized_content,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_splits_image_list() {
        let args = PostArgs {
            row_index: 2,
            description: "New hoodies".to_owned(),
            image_url: Some("https://img.example/a.jpg, https://img.example/b.jpg,".to_owned()),
            tags: None,
            prompt_template: None,
            source_url: None,
        };
        let draft = args.draft();
        assert_eq!(draft.row_index, 2);
        assert_eq!(
            draft.images,
            vec!["https://img.example/a.jpg", "https://img.example/b.jpg"]
        );
    }
}
