pub mod error;

pub use error::{BaselineError, Result};

use std::path::PathBuf;

use async_trait::async_trait;
use storymap_common::config::BaselineLocation;
use storymap_common::Story;
use url::Url;

/// A read-only source of curated stories, fetched once at startup.
#[async_trait]
pub trait BaselineSource: Send + Sync {
    /// Fetch and parse the dataset, reporting any failure.
    async fn fetch(&self) -> Result<Vec<Story>>;

    /// Fetch the dataset, treating every failure as an empty dataset.
    async fn load(&self) -> Vec<Story> {
        match self.fetch().await {
            Ok(stories) => {
                tracing::info!(count = stories.len(), "Loaded baseline stories");
                stories
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not load baseline stories, continuing without them");
                Vec::new()
            }
        }
    }
}

/// Pick the source matching a configured location.
pub fn source_for(location: &BaselineLocation) -> Box<dyn BaselineSource> {
    match location {
        BaselineLocation::Http(url) => Box::new(HttpBaseline::new(url.clone())),
        BaselineLocation::File(path) => Box::new(FileBaseline::new(path.clone())),
    }
}

/// Parse a baseline payload. The payload must be a JSON array; elements that
/// are not story-shaped are skipped.
pub fn parse_baseline(body: &str) -> Result<Vec<Story>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let serde_json::Value::Array(items) = value else {
        return Err(BaselineError::Parse("expected a JSON array of stories".to_string()));
    };

    let mut stories = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Story>(item) {
            Ok(story) => stories.push(story),
            Err(e) => tracing::warn!(index, error = %e, "Skipping malformed baseline record"),
        }
    }
    Ok(stories)
}

// ---------------------------------------------------------------------------
// HttpBaseline
// ---------------------------------------------------------------------------

pub struct HttpBaseline {
    client: reqwest::Client,
    url: Url,
}

impl HttpBaseline {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl BaselineSource for HttpBaseline {
    async fn fetch(&self) -> Result<Vec<Story>> {
        tracing::debug!(url = %self.url, "Fetching baseline stories");
        let resp = self.client.get(self.url.clone()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BaselineError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        parse_baseline(&body)
    }
}

// ---------------------------------------------------------------------------
// FileBaseline
// ---------------------------------------------------------------------------

/// The dataset shipped next to the application, read from disk.
pub struct FileBaseline {
    path: PathBuf,
}

impl FileBaseline {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BaselineSource for FileBaseline {
    async fn fetch(&self) -> Result<Vec<Story>> {
        tracing::debug!(path = %self.path.display(), "Reading baseline stories");
        let body = tokio::fs::read_to_string(&self.path).await?;
        parse_baseline(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_payload_is_rejected() {
        assert!(matches!(
            parse_baseline(r#"{"stories": []}"#),
            Err(BaselineError::Parse(_))
        ));
    }

    #[test]
    fn malformed_records_are_skipped() {
        let body = r#"[
            {"id": 1, "latitude": 10.0, "longitude": 20.0},
            {"id": 2, "latitude": "north"},
            {"id": "x", "latitude": -5, "longitude": 7}
        ]"#;
        let stories = parse_baseline(body).unwrap();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[1].id.to_string(), "x");
    }
}
