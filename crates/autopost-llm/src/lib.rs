//! Chat-completions client for an OpenAI-compatible endpoint.

pub mod client;
pub mod error;
mod types;

pub use client::ChatClient;
pub use error::LlmError;
