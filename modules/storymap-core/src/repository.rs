use std::sync::Arc;

use baseline_client::BaselineSource;
use storymap_common::{
    newest_first, validate_draft, Result, Story, StoryDraft, StoryId, StoryMapError,
};
use storymap_store::LocalStories;
use tracing::info;

use crate::clock::Clock;

/// One more than the largest integer id, or 1 when there is none. `None`
/// when the largest id is already `i64::MAX`.
/// Ids that are not integers are ignored here but still occupy the collection.
pub fn next_id<'a>(stories: impl IntoIterator<Item = &'a Story>) -> Option<i64> {
    match stories.into_iter().filter_map(|s| s.id.as_numeric()).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Baseline stories followed by local additions.
///
/// `local` and the local tail of `merged` always hold the same stories in the
/// same order, and both match what was last persisted.
pub struct StoryRepository {
    baseline: Vec<Story>,
    local: Vec<Story>,
    merged: Vec<Story>,
    store: LocalStories,
    clock: Arc<dyn Clock>,
}

impl StoryRepository {
    /// Load both sources and build the merged collection. Never fails: a
    /// missing baseline or corrupt local state leaves that part empty.
    pub async fn initialize(
        baseline: &dyn BaselineSource,
        store: LocalStories,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let baseline = baseline.load().await;
        let local = store.read();
        Self::from_parts(baseline, local, store, clock)
    }

    pub fn from_parts(
        baseline: Vec<Story>,
        local: Vec<Story>,
        store: LocalStories,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let merged = baseline.iter().chain(local.iter()).cloned().collect();
        info!(
            baseline = baseline.len(),
            local = local.len(),
            "Story repository ready"
        );
        Self {
            baseline,
            local,
            merged,
            store,
            clock,
        }
    }

    pub fn next_id(&self) -> Option<i64> {
        next_id(&self.merged)
    }

    /// Validate a draft, stamp it with a fresh id and today's date, append it
    /// and persist the local additions. Nothing changes if validation or the
    /// write fails.
    pub fn add_local(&mut self, draft: &StoryDraft) -> Result<Story> {
        let valid = validate_draft(draft)?;
        let id = self.next_id().ok_or(StoryMapError::IdsExhausted(i64::MAX))?;

        let story = Story {
            id: StoryId::Numeric(id),
            title: Some(valid.title),
            location: Some(valid.location),
            latitude: valid.latitude,
            longitude: valid.longitude,
            content: Some(valid.content),
            tags: valid.tags,
            author: Some(valid.author),
            date: Some(self.clock.today().format("%Y-%m-%d").to_string()),
        };

        self.local.push(story.clone());
        if let Err(e) = self.store.write(&self.local) {
            self.local.pop();
            return Err(e.into());
        }
        self.merged.push(story.clone());

        info!(id = %story.id, title = story.display_title(), "Added local story");
        Ok(story)
    }

    /// Every story, newest first. Undated stories come last.
    pub fn all(&self) -> Vec<Story> {
        let mut sorted = self.merged.clone();
        sorted.sort_by(newest_first);
        sorted
    }

    pub fn find(&self, id: &StoryId) -> Option<&Story> {
        self.merged.iter().find(|s| &s.id == id)
    }

    pub fn baseline(&self) -> &[Story] {
        &self.baseline
    }

    pub fn local(&self) -> &[Story] {
        &self.local
    }

    /// Merge order: baseline first, then local additions.
    pub fn merged(&self) -> &[Story] {
        &self.merged
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{draft, story, FixedClock};
    use serde_json::json;
    use storymap_store::MemoryKeyValueStore;

    fn repo(baseline: Vec<Story>) -> StoryRepository {
        StoryRepository::from_parts(
            baseline,
            Vec::new(),
            LocalStories::new(Arc::new(MemoryKeyValueStore::new())),
            Arc::new(FixedClock::ymd(2025, 3, 14)),
        )
    }

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(repo(vec![]).next_id(), Some(1));
    }

    #[test]
    fn next_id_ignores_non_numeric_ids() {
        let mut odd = story(0, None);
        odd.id = StoryId::Other(json!("seven"));
        let r = repo(vec![story(4, None), odd, story(2, None)]);
        assert_eq!(r.next_id(), Some(5));
        assert_eq!(r.merged().len(), 3);
    }

    #[test]
    fn next_id_after_n_additions() {
        let mut r = repo(vec![]);
        for n in 1..=5 {
            let added = r.add_local(&draft()).unwrap();
            assert_eq!(added.id, StoryId::Numeric(n));
        }
        assert_eq!(r.next_id(), Some(6));
    }

    #[test]
    fn add_is_rejected_when_ids_are_exhausted() {
        let mut r = repo(vec![story(i64::MAX, None)]);
        assert_eq!(r.next_id(), None);

        let err = r.add_local(&draft()).unwrap_err();
        assert!(matches!(err, StoryMapError::IdsExhausted(_)));
        assert!(r.local().is_empty());
        assert_eq!(r.merged().len(), 1);
    }

    #[test]
    fn negative_ids_still_count_up() {
        assert_eq!(repo(vec![story(-5, None)]).next_id(), Some(-4));
    }

    #[test]
    fn merged_is_baseline_then_local() {
        let mut r = repo(vec![story(10, Some("2030-01-01")), story(11, None)]);
        r.add_local(&draft()).unwrap();
        let ids: Vec<String> = r.merged().iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["10", "11", "12"]);
        assert_eq!(r.local().len(), 1);
        assert_eq!(r.baseline().len(), 2);
    }

    #[test]
    fn new_story_is_stamped_with_today() {
        let mut r = repo(vec![]);
        let added = r.add_local(&draft()).unwrap();
        assert_eq!(added.date.as_deref(), Some("2025-03-14"));
    }

    #[test]
    fn all_sorts_newest_first_and_keeps_undated_last() {
        let r = repo(vec![
            story(1, None),
            story(2, Some("2023-05-01")),
            story(3, Some("garbage")),
            story(4, Some("2024-01-01")),
        ]);
        let ids: Vec<String> = r.all().iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["4", "2", "1", "3"]);
    }

    #[test]
    fn find_by_id() {
        let r = repo(vec![story(3, None)]);
        assert!(r.find(&StoryId::Numeric(3)).is_some());
        assert!(r.find(&StoryId::Numeric(4)).is_none());
    }
}
