//! The posting pipeline.
//!
//! One run reads a snapshot of rows, keeps the ones that are due, and for each
//! of them, one after another: composes the text, uploads the images, publishes
//! the post, and writes the outcome back to the store. A failing row is recorded
//! as `Failed` and the run moves on; only a missing store address or a failed
//! row fetch stops a run before any row is attempted.

pub mod adapters;
pub mod compose;
pub mod draft;
pub mod due;
pub mod error;
pub mod media;
pub mod orchestrator;
pub mod ports;
pub mod publisher;

mod bounded;

pub use adapters::{SheetSource, Services};
pub use draft::{PostDraft, PublishedPost};
pub use due::is_due;
pub use error::{Failure, PipelineError, PostError, RowError};
pub use orchestrator::{run_pipeline, RunOptions};
pub use ports::{ContentGenerator, ResultRecorder, RowSource, SocialPlatform};
pub use publisher::RowPublisher;
