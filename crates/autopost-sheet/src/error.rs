use thiserror::Error;

/// Errors returned by the spreadsheet store client.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Network or TLS failure, timeout, or non-2xx status from the store.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured store URL is not a valid absolute URL.
    #[error("invalid store URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The store answered, but not with `success: true` or not with a row array.
    #[error("unexpected response from store: {0}")]
    Format(String),

    /// The response body is not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
