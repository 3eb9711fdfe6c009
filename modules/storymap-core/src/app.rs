use std::sync::Arc;

use baseline_client::BaselineSource;
use storymap_common::{Result, Story, StoryDraft, SubmissionMode};
use storymap_store::LocalStories;

use crate::clock::Clock;
use crate::exporter::{ReviewRequest, ReviewRequestBuilder};
use crate::repository::StoryRepository;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Stored in this device's local additions.
    Added(Story),
    /// Nothing stored; the visitor should open the link.
    ReviewRequested(ReviewRequest),
}

/// Everything a front-end needs: the story collection plus the review path.
pub struct StoryMap {
    repository: StoryRepository,
    exporter: ReviewRequestBuilder,
}

impl StoryMap {
    pub async fn initialize(
        baseline: &dyn BaselineSource,
        store: LocalStories,
        exporter: ReviewRequestBuilder,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let repository = StoryRepository::initialize(baseline, store, clock).await;
        Self::new(repository, exporter)
    }

    pub fn new(repository: StoryRepository, exporter: ReviewRequestBuilder) -> Self {
        Self {
            repository,
            exporter,
        }
    }

    pub fn all(&self) -> Vec<Story> {
        self.repository.all()
    }

    pub fn add_local(&mut self, draft: &StoryDraft) -> Result<Story> {
        self.repository.add_local(draft)
    }

    pub fn build_review_request(&self, draft: &StoryDraft) -> Result<ReviewRequest> {
        self.exporter.build(draft, self.repository.clock().today())
    }

    pub fn submit(&mut self, mode: SubmissionMode, draft: &StoryDraft) -> Result<SubmissionOutcome> {
        tracing::debug!(%mode, "Handling submission");
        match mode {
            SubmissionMode::LocalPreview => self.add_local(draft).map(SubmissionOutcome::Added),
            SubmissionMode::ExternalReview => self
                .build_review_request(draft)
                .map(SubmissionOutcome::ReviewRequested),
        }
    }

    pub fn repository(&self) -> &StoryRepository {
        &self.repository
    }
}
