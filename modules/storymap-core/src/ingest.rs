use storymap_common::{validate_coordinates, Result, Story, StoryMapError, SubmissionRecord};

use crate::repository::next_id;

/// Append an approved submission to a baseline collection with the next free id.
///
/// Records come from issue text that anyone can edit, so the coordinates
/// and required fields are checked again.
pub fn ingest_submission(baseline: &mut Vec<Story>, record: SubmissionRecord) -> Result<Story> {
    validate_coordinates(record.latitude, record.longitude)?;
    for (field, value) in [
        ("title", &record.title),
        ("location", &record.location),
        ("content", &record.content),
    ] {
        if value.trim().is_empty() {
            return Err(StoryMapError::Ingest(format!("{field} is empty")));
        }
    }

    let id = next_id(baseline.iter()).ok_or(StoryMapError::IdsExhausted(i64::MAX))?;
    let story = record.into_story(id);
    tracing::info!(id = %story.id, title = story.display_title(), "Ingested submission");
    baseline.push(story.clone());
    Ok(story)
}
