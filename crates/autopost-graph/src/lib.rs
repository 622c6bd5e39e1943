//! Facebook Graph API client for page posts.
//!
//! Two calls: upload an image as an unpublished page photo, then publish a
//! feed post that attaches the uploaded photos by id.

pub mod client;
pub mod error;

mod types;

pub use client::GraphClient;
pub use error::GraphError;
