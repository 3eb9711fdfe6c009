//! Story repository and submission workflow.
//!
//! `StoryMap` is the single owner of the merged collection. A front-end holds
//! it and calls `all`, `add_local`, `build_review_request` or `submit`.

pub mod app;
pub mod clock;
pub mod exporter;
pub mod ingest;
pub mod repository;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use app::{StoryMap, SubmissionOutcome};
pub use clock::{Clock, SystemClock};
pub use exporter::{decode_structured_block, ReviewRequest, ReviewRequestBuilder};
pub use ingest::ingest_submission;
pub use repository::{next_id, StoryRepository};
