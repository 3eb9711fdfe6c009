// Test helpers for the story workflow.
//
// - FixedClock (Clock) — always the same day
// - StaticBaseline (BaselineSource) — canned stories or a canned failure
// - story() / draft() — minimal fixtures

use std::sync::Arc;

use async_trait::async_trait;
use baseline_client::{BaselineError, BaselineSource};
use chrono::NaiveDate;
use storymap_common::{Story, StoryDraft, StoryId};

use crate::clock::Clock;

/// Duluth, MN coordinates.
pub const DULUTH: (f64, f64) = (46.7867, -92.1005);

// ---------------------------------------------------------------------------
// FixedClock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self(NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN))
    }

    pub fn shared(self) -> Arc<dyn Clock> {
        Arc::new(self)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// ---------------------------------------------------------------------------
// StaticBaseline
// ---------------------------------------------------------------------------

pub enum StaticBaseline {
    Stories(Vec<Story>),
    Unavailable,
}

#[async_trait]
impl BaselineSource for StaticBaseline {
    async fn fetch(&self) -> baseline_client::Result<Vec<Story>> {
        match self {
            StaticBaseline::Stories(stories) => Ok(stories.clone()),
            StaticBaseline::Unavailable => Err(BaselineError::Network(
                "connection refused".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn story(id: i64, date: Option<&str>) -> Story {
    Story {
        id: StoryId::Numeric(id),
        title: Some(format!("Story {id}")),
        location: Some("Duluth".to_string()),
        latitude: DULUTH.0,
        longitude: DULUTH.1,
        content: Some("A story.".to_string()),
        tags: Vec::new(),
        author: None,
        date: date.map(String::from),
    }
}

pub fn draft() -> StoryDraft {
    StoryDraft {
        title: "Harbor lights".to_string(),
        location: "Duluth".to_string(),
        latitude: DULUTH.0,
        longitude: DULUTH.1,
        content: "The lift bridge went up at dusk.".to_string(),
        tags: "lake, night".to_string(),
        author: "Ada".to_string(),
        email: None,
    }
}
