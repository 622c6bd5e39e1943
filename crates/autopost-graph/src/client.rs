//! HTTP client for a single Facebook page.

use std::time::Duration;

use autopost_core::MediaHandle;
use reqwest::{Client, Url};

use crate::error::GraphError;
use crate::types::{AttachedMedia, ErrorEnvelope, FeedPost, IdResponse};

/// Client bound to one page and its access token.
#[derive(Clone)]
pub struct GraphClient {
    client: Client,
    base_url: Url,
    page_id: String,
    access_token: String,
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("base_url", &self.base_url.as_str())
            .field("page_id", &self.page_id)
            .field("access_token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl GraphClient {
    /// Creates a client for `page_id` against `base_url`
    /// (e.g. `https://graph.facebook.com/v17.0`).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidUrl`] if `base_url` does not parse, or
    /// [`GraphError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        page_id: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GraphError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends to the version segment
        // instead of replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GraphError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            page_id: page_id.to_owned(),
            access_token: access_token.to_owned(),
        })
    }

    /// Uploads `image_url` as an unpublished page photo and returns its handle.
    ///
    /// Graph fetches the image itself; nothing is downloaded locally.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Http`] on network failure or timeout.
    /// - [`GraphError::Api`] if Graph rejects the upload.
    /// - [`GraphError::MissingId`] / [`GraphError::Deserialize`] on an
    ///   unexpected success body.
    pub async fn upload_unpublished_photo(
        &self,
        image_url: &str,
    ) -> Result<MediaHandle, GraphError> {
        let url = self.build_url("photos", &[("url", image_url), ("published", "false")])?;
        let request = self.client.post(url);
        let id = Self::send_for_id(request, "photo upload").await?;
        tracing::debug!(media_fbid = %id, "uploaded unpublished photo");
        Ok(MediaHandle(id))
    }

    /// Publishes a feed post with `message` and any previously uploaded photos.
    ///
    /// Returns the id Graph assigns to the post.
    ///
    /// # Errors
    ///
    /// Same as [`GraphClient::upload_unpublished_photo`].
    pub async fn publish_post(
        &self,
        message: &str,
        media: &[MediaHandle],
    ) -> Result<String, GraphError> {
        let url = self.build_url("feed", &[("published", "true")])?;
        let body = FeedPost {
            message,
            attached_media: media
                .iter()
                .map(|h| AttachedMedia {
                    media_fbid: h.as_str(),
                })
                .collect(),
        };
        let request = self.client.post(url).json(&body);
        Self::send_for_id(request, "feed publish").await
    }

    /// Builds `{base}/{page_id}/{edge}` with the access token and `extra`
    /// query parameters percent-encoded.
    fn build_url(&self, edge: &str, extra: &[(&str, &str)]) -> Result<Url, GraphError> {
        let mut url = self
            .base_url
            .join(&format!("{}/{edge}", self.page_id))
            .map_err(|e| GraphError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("access_token", &self.access_token);
        }
        Ok(url)
    }

    /// Sends `request`, maps Graph error envelopes, and extracts `id`.
    async fn send_for_id(
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<String, GraphError> {
        let response = request.send().await.map_err(|e| e.without_url())?;
        let status = response.status();
        let body = response.text().await.map_err(|e| e.without_url())?;

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            return Err(GraphError::Api {
                status: status.as_u16(),
                code: envelope.error.code,
                message: envelope.error.message,
            });
        }

        if !status.is_success() {
            return Err(GraphError::Api {
                status: status.as_u16(),
                code: None,
                message: body.trim().chars().take(200).collect(),
            });
        }

        let parsed: IdResponse =
            serde_json::from_str(&body).map_err(|e| GraphError::Deserialize {
                context: context.to_owned(),
                source: e,
            })?;

        parsed.id().ok_or_else(|| GraphError::MissingId {
            context: context.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GraphClient {
        GraphClient::new(base_url, "42", "secret-token", 5, "autopost-test")
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_keeps_version_segment() {
        let client = test_client("https://graph.facebook.com/v17.0");
        let url = client.build_url("feed", &[("published", "true")]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.facebook.com/v17.0/42/feed?published=true&access_token=secret-token"
        );
    }

    #[test]
    fn build_url_encodes_image_url() {
        let client = test_client("https://graph.facebook.com/v17.0/");
        let url = client
            .build_url(
                "photos",
                &[("url", "https://cdn.example.com/a b.jpg?x=1&y=2"), ("published", "false")],
            )
            .unwrap();
        assert!(
            url.as_str()
                .starts_with("https://graph.facebook.com/v17.0/42/photos?url=https%3A%2F%2F"),
            "image URL should be percent-encoded: {url}"
        );
        assert!(url.as_str().contains("published=false"));
    }

    #[test]
    fn debug_redacts_access_token() {
        let rendered = format!("{:?}", test_client("https://graph.facebook.com/v17.0"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[redacted]"));
    }
}
