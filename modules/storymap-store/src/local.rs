use std::sync::Arc;

use storymap_common::Story;
use tracing::{debug, warn};

use crate::error::Result;
use crate::kv::KeyValueStore;

/// The one key holding every local addition as a single JSON array.
pub const LOCAL_STORIES_KEY: &str = "localStories";

/// The visitor's own stories, persisted as a whole under one key.
#[derive(Clone)]
pub struct LocalStories {
    kv: Arc<dyn KeyValueStore>,
}

impl LocalStories {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load local additions. Never fails: an absent key is an empty list,
    /// and a value that is not a JSON array is erased so it cannot come back.
    /// Elements of the array that are not stories are skipped.
    pub fn read(&self) -> Vec<Story> {
        let raw = match self.kv.get(LOCAL_STORIES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, key = LOCAL_STORIES_KEY, "Could not read local stories");
                return Vec::new();
            }
        };

        match parse_local(&raw) {
            Some(stories) => {
                debug!(count = stories.len(), "Loaded local stories");
                stories
            }
            None => {
                warn!(key = LOCAL_STORIES_KEY, "Local stories are corrupt, clearing");
                if let Err(e) = self.kv.remove(LOCAL_STORIES_KEY) {
                    warn!(error = %e, key = LOCAL_STORIES_KEY, "Failed to clear corrupt local stories");
                }
                Vec::new()
            }
        }
    }

    /// Replace the stored value with the full list.
    pub fn write(&self, stories: &[Story]) -> Result<()> {
        let serialized = serde_json::to_string(stories)?;
        self.kv.set(LOCAL_STORIES_KEY, &serialized)?;
        debug!(count = stories.len(), "Persisted local stories");
        Ok(())
    }
}

/// `None` when the value is not a JSON array at all.
fn parse_local(raw: &str) -> Option<Vec<Story>> {
    let items = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => return None,
        Err(e) => {
            warn!(error = %e, "Local stories are not valid JSON");
            return None;
        }
    };

    let mut stories = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Story>(item) {
            Ok(story) => stories.push(story),
            Err(e) => warn!(index, error = %e, "Skipping malformed local story"),
        }
    }
    Some(stories)
}
