//! Review requests: a pre-filled "new issue" link maintainers can act on.
//!
//! The issue body carries the story twice, once for people and once as a
//! fenced JSON block that the ingest step reads back verbatim.

use chrono::NaiveDate;
use storymap_common::{
    validate_draft, Result, StoryDraft, StoryMapError, SubmissionRecord, ValidDraft,
};
use url::Url;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Issue links longer than this are truncated by some hosts.
const MAX_URL_LEN: usize = 8192;

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRequest {
    pub url: Url,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct ReviewRequestBuilder {
    new_issue_url: Url,
    label: Option<String>,
}

impl ReviewRequestBuilder {
    /// `repo` is the repository's web URL, e.g. `https://github.com/owner/stories`.
    pub fn new(repo: &Url, label: Option<&str>) -> Result<Self> {
        let mut new_issue_url = repo.clone();
        new_issue_url.set_query(None);
        new_issue_url.set_fragment(None);
        new_issue_url
            .path_segments_mut()
            .map_err(|_| StoryMapError::Config(format!("{repo} cannot hold an issue path")))?
            .pop_if_empty()
            .extend(["issues", "new"]);

        Ok(Self {
            new_issue_url,
            label: label.map(str::trim).filter(|l| !l.is_empty()).map(String::from),
        })
    }

    /// Validate the draft and format it as a review request dated `date`.
    /// Pure: nothing is stored.
    pub fn build(&self, draft: &StoryDraft, date: NaiveDate) -> Result<ReviewRequest> {
        let valid = validate_draft(draft)?;
        let title = format!("New story: {}", valid.title);
        let body = render_body(&valid, date)?;

        let mut url = self.new_issue_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("title", &title);
            query.append_pair("body", &body);
            if let Some(label) = &self.label {
                query.append_pair("labels", label);
            }
        }

        if url.as_str().len() > MAX_URL_LEN {
            tracing::warn!(
                len = url.as_str().len(),
                "Review request link is unusually long and may be truncated"
            );
        }
        tracing::info!(title = %title, "Built review request");

        Ok(ReviewRequest { url, title, body })
    }
}

fn render_body(valid: &ValidDraft, date: NaiveDate) -> Result<String> {
    let record = SubmissionRecord {
        title: valid.title.clone(),
        location: valid.location.clone(),
        latitude: valid.latitude,
        longitude: valid.longitude,
        author: valid.author.clone(),
        tags: valid.tags.clone(),
        content: valid.content.clone(),
        date: date.format("%Y-%m-%d").to_string(),
    };

    let tags = if valid.tags.is_empty() {
        "none".to_string()
    } else {
        valid.tags.join(", ")
    };

    let mut body = String::new();
    body.push_str("## New story submission\n\n");
    body.push_str(&format!("**Title:** {}\n", valid.title));
    body.push_str(&format!("**Location:** {}\n", valid.location));
    body.push_str(&format!(
        "**Coordinates:** {}, {}\n",
        valid.latitude, valid.longitude
    ));
    body.push_str(&format!("**Author:** {}\n", valid.author));
    if let Some(email) = &valid.email {
        body.push_str(&format!("**Email:** {email}\n"));
    }
    body.push_str(&format!("**Tags:** {tags}\n\n"));
    body.push_str("### Story\n\n");
    body.push_str(&valid.content);
    body.push_str("\n\n### Structured data\n\n");
    body.push_str("<!-- Read by the ingest step after approval. Do not edit. -->\n");
    body.push_str(FENCE_OPEN);
    body.push('\n');
    body.push_str(&encode_record(&record)?);
    body.push('\n');
    body.push_str(FENCE_CLOSE);
    body.push('\n');
    Ok(body)
}

/// Pretty JSON with every backtick escaped as `\u0060`, so no value can close the fence.
fn encode_record(record: &SubmissionRecord) -> Result<String> {
    let json = serde_json::to_string_pretty(record)?;
    Ok(json.replace('`', "\\u0060"))
}

/// Read the structured block back out of a review request body.
///
/// The block is always last, so the final opening fence is the one that
/// counts even if the story text itself contains fences.
pub fn decode_structured_block(body: &str) -> Result<SubmissionRecord> {
    let start = body
        .rfind(FENCE_OPEN)
        .ok_or_else(|| StoryMapError::Ingest("no structured data block found".to_string()))?
        + FENCE_OPEN.len();
    let rest = &body[start..];
    let end = rest
        .find(FENCE_CLOSE)
        .ok_or_else(|| StoryMapError::Ingest("structured data block is not closed".to_string()))?;

    serde_json::from_str(rest[..end].trim())
        .map_err(|e| StoryMapError::Ingest(format!("structured data block is invalid: {e}")))
}
