use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /{page_id}/feed`.
#[derive(Debug, Serialize)]
pub(crate) struct FeedPost<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attached_media: Vec<AttachedMedia<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttachedMedia<'a> {
    pub media_fbid: &'a str,
}

/// `{"id": "..."}`. Ids are strings in practice; numbers are tolerated.
#[derive(Debug, Deserialize)]
pub(crate) struct IdResponse {
    #[serde(default)]
    pub id: Option<Value>,
}

impl IdResponse {
    pub(crate) fn id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// `{"error": {"message", "type", "code"}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}
