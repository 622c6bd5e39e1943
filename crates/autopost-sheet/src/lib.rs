//! Client for the spreadsheet web app that holds pending posts.
//!
//! The store exposes one URL: `GET` returns `{success, data: [row, ...]}` and
//! `POST` accepts a status update for a single row.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

mod retry;

pub use client::SheetClient;
pub use error::SheetError;
pub use types::StatusUpdate;
