use thiserror::Error;

/// Errors returned by the Graph API client.
///
/// Transport errors have their URL stripped before they are stored here, so
/// the page access token in the query string never reaches logs.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Graph answered with an error envelope or a non-2xx status.
    #[error("Graph API error (status {status}, code {code:?}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// A 2xx answer that carries no object id.
    #[error("Graph API response for {context} has no id")]
    MissingId { context: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Graph API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
