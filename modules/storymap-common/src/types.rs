use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

// --- Story ---

/// Identifier of a story. Baseline data is curated by hand, so ids that are
/// not integers are carried through untouched rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoryId {
    Numeric(i64),
    Other(serde_json::Value),
}

impl StoryId {
    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            StoryId::Numeric(n) => Some(*n),
            StoryId::Other(_) => None,
        }
    }
}

impl Default for StoryId {
    fn default() -> Self {
        StoryId::Other(serde_json::Value::Null)
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoryId::Numeric(n) => write!(f, "{n}"),
            StoryId::Other(serde_json::Value::String(s)) => write!(f, "{s}"),
            StoryId::Other(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub id: StoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_LOCATION: &str = "Unknown location";
pub const DEFAULT_AUTHOR: &str = "Anonymous";
pub const DEFAULT_CONTENT: &str = "No content available";

/// Characters shown on a list card before truncation.
pub const CARD_EXCERPT_CHARS: usize = 150;

impl Story {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn display_location(&self) -> &str {
        self.location.as_deref().unwrap_or(DEFAULT_LOCATION)
    }

    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or(DEFAULT_AUTHOR)
    }

    pub fn display_content(&self) -> &str {
        self.content.as_deref().unwrap_or(DEFAULT_CONTENT)
    }

    /// First `max_chars` characters of the content, with "..." appended
    /// when anything was cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let content = self.content.as_deref().unwrap_or("");
        let mut chars = content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    /// Calendar date used for ordering. Missing or unparseable dates sort
    /// as the oldest possible.
    pub fn sort_date(&self) -> NaiveDate {
        self.date
            .as_deref()
            .and_then(parse_story_date)
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Accepts a bare ISO date (`2024-01-01`) or a full RFC 3339 timestamp.
pub fn parse_story_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Newest first. Ties keep their relative order when used with a stable sort.
pub fn newest_first(a: &Story, b: &Story) -> Ordering {
    b.sort_date().cmp(&a.sort_date())
}

// --- Submission ---

/// Raw form input for a new story. Used by both the local path and the
/// review path; never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryDraft {
    pub title: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub content: String,
    /// Comma separated, as typed.
    pub tags: String,
    pub author: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionMode {
    /// Store in this device's local additions only.
    LocalPreview,
    /// Build a pre-filled issue for maintainers to review.
    ExternalReview,
}

impl std::fmt::Display for SubmissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionMode::LocalPreview => write!(f, "local_preview"),
            SubmissionMode::ExternalReview => write!(f, "external_review"),
        }
    }
}

/// The fixed schema embedded in review requests and read back by ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub title: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub author: String,
    pub tags: Vec<String>,
    pub content: String,
    pub date: String,
}

impl SubmissionRecord {
    pub fn into_story(self, id: i64) -> Story {
        Story {
            id: StoryId::Numeric(id),
            title: Some(self.title),
            location: Some(self.location),
            latitude: self.latitude,
            longitude: self.longitude,
            content: Some(self.content),
            tags: self.tags,
            author: Some(self.author),
            date: Some(self.date),
        }
    }
}
