//! Turning a row's description into the text that gets posted.

use std::time::Duration;

use crate::bounded::bounded;
use crate::draft::PostDraft;
use crate::error::RowError;
use crate::ports::ContentGenerator;

/// Text posted when the generator answers with nothing usable.
pub const EMPTY_COMPLETION_PLACEHOLDER: &str = "...";

/// Fixed system message sent with every generation request.
pub const SYSTEM_PERSONA: &str = "\
Write a Facebook sales post in a playful, joking Gen Z voice. Use fitting emoji, \
casual witty phrasing and light wordplay. Keep it easy to understand:
- Make people laugh
- But keep it obvious what the product is
- Break lines to make key points stand out, and end with a call to action \
(buy now, tap the link). Only show a link if one is actually provided; never \
write placeholder text such as \"Product link: [product link]\".
Output: only the Facebook post text.";

/// The prompt used when a row carries no template of its own.
#[must_use]
pub fn default_prompt(description: &str, tags: Option<&str>) -> String {
    let mut prompt = format!(
        "Rewrite the following into an engaging Facebook post that is short and \
         easy to read. Add suitable emoji. Keep all the important information:\n\n\
         {description}\n\n"
    );
    if let Some(tags) = tags {
        prompt.push_str("Make sure these hashtags appear at the end of the post: ");
        prompt.push_str(tags);
    }
    prompt.trim_end().to_owned()
}

/// A row's own template wins, verbatim; otherwise the default prompt.
#[must_use]
pub fn generation_prompt(draft: &PostDraft) -> String {
    match draft.prompt_template.as_deref() {
        Some(template) => template.to_owned(),
        None => default_prompt(&draft.description, draft.tags.as_deref()),
    }
}

/// Generate the post text for `draft`.
///
/// The first completion is trimmed; an empty or missing completion becomes
/// [`EMPTY_COMPLETION_PLACEHOLDER`] instead of failing the row.
///
/// # Errors
///
/// - [`RowError::MissingDescription`] if the description is blank. The
///   generator is not called.
/// - [`RowError::Generation`] if the call fails or exceeds `limit`.
pub async fn compose<G: ContentGenerator>(
    generator: &G,
    draft: &PostDraft,
    limit: Duration,
) -> Result<String, RowError> {
    if draft.description.trim().is_empty() {
        return Err(RowError::MissingDescription);
    }

    let prompt = generation_prompt(draft);
    let completion = bounded(limit, generator.generate(SYSTEM_PERSONA, &prompt))
        .await
        .map_err(RowError::Generation)?;

    let text = completion
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    match text {
        Some(text) => Ok(text.to_owned()),
        None => {
            tracing::warn!(
                row_index = draft.row_index,
                "generator returned no text; posting placeholder"
            );
            Ok(EMPTY_COMPLETION_PLACEHOLDER.to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use autopost_llm::LlmError;

    use super::*;

    struct ScriptedGenerator {
        reply: Option<String>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedGenerator {
        fn new(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(ToOwned::to_owned),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl ContentGenerator for ScriptedGenerator {
        async fn generate(&self, system: &str, prompt: &str) -> Result<Option<String>, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_owned(), prompt.to_owned()));
            Ok(self.reply.clone())
        }
    }

    fn draft(description: &str, tags: Option<&str>, template: Option<&str>) -> PostDraft {
        PostDraft::manual(3, description, None, tags, template)
    }

    const LIMIT: Duration = Duration::from_secs(5);

    #[test]
    fn default_prompt_embeds_description_and_tags() {
        let prompt = default_prompt("Sale 50%", Some("#sale"));
        assert!(prompt.contains("Sale 50%"));
        assert!(prompt.ends_with("Make sure these hashtags appear at the end of the post: #sale"));
    }

    #[test]
    fn default_prompt_without_tags_has_no_hashtag_instruction() {
        let prompt = default_prompt("Sale 50%", None);
        assert!(prompt.ends_with("Sale 50%"));
        assert!(!prompt.contains("hashtags"));
    }

    #[test]
    fn template_is_used_verbatim() {
        let d = draft("Sale 50%", Some("#sale"), Some("Say hi in five words"));
        assert_eq!(generation_prompt(&d), "Say hi in five words");
    }

    #[tokio::test]
    async fn completion_is_trimmed() {
        let generator = ScriptedGenerator::new(Some("  Big sale! 🎉\n"));
        let text = compose(&generator, &draft("Sale", None, None), LIMIT)
            .await
            .unwrap();
        assert_eq!(text, "Big sale! 🎉");

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, SYSTEM_PERSONA);
    }

    #[tokio::test]
    async fn blank_completion_becomes_placeholder() {
        for reply in [None, Some("   ")] {
            let generator = ScriptedGenerator::new(reply);
            let text = compose(&generator, &draft("Sale", None, None), LIMIT)
                .await
                .unwrap();
            assert_eq!(text, EMPTY_COMPLETION_PLACEHOLDER);
        }
    }

    #[tokio::test]
    async fn blank_description_fails_without_calling_generator() {
        let generator = ScriptedGenerator::new(Some("never"));
        let err = compose(&generator, &draft("  ", None, None), LIMIT)
            .await
            .unwrap_err();
        assert!(matches!(err, RowError::MissingDescription), "got: {err:?}");
        assert!(generator.prompts.lock().unwrap().is_empty());
    }
}
