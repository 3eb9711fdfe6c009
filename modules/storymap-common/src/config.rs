use std::env;
use std::path::PathBuf;

use url::Url;

use crate::error::{Result, StoryMapError};

/// Where the curated baseline dataset lives.
#[derive(Debug, Clone, PartialEq)]
pub enum BaselineLocation {
    Http(Url),
    File(PathBuf),
}

impl BaselineLocation {
    /// `http(s)://` locations are fetched, anything else is read from disk.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw)
                .map_err(|e| StoryMapError::Config(format!("invalid baseline URL {raw:?}: {e}")))?;
            Ok(Self::Http(url))
        } else {
            Ok(Self::File(PathBuf::from(raw)))
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub baseline: BaselineLocation,

    /// Directory scoping the visitor's persistent key-value store.
    pub data_dir: PathBuf,

    // Review requests
    pub review_repo: Url,
    pub review_label: String,
}

pub const DEFAULT_BASELINE: &str = "stories.json";
pub const DEFAULT_DATA_DIR: &str = ".storymap";
pub const DEFAULT_REVIEW_REPO: &str = "https://github.com/storymap/stories";
pub const DEFAULT_REVIEW_LABEL: &str = "story-submission";

impl Config {
    /// Load configuration from environment variables. Every variable has a default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let baseline = BaselineLocation::parse(&var("STORYMAP_BASELINE", DEFAULT_BASELINE))?;
        let raw_repo = var("STORYMAP_REVIEW_REPO", DEFAULT_REVIEW_REPO);
        let review_repo = Url::parse(&raw_repo).map_err(|e| {
            StoryMapError::Config(format!("STORYMAP_REVIEW_REPO {raw_repo:?} is not a URL: {e}"))
        })?;

        Ok(Self {
            baseline,
            data_dir: PathBuf::from(var("STORYMAP_DATA_DIR", DEFAULT_DATA_DIR)),
            review_repo,
            review_label: var("STORYMAP_REVIEW_LABEL", DEFAULT_REVIEW_LABEL),
        })
    }

    pub fn log(&self) {
        tracing::info!(
            baseline = ?self.baseline,
            data_dir = %self.data_dir.display(),
            review_repo = %self.review_repo,
            "Loaded configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.baseline, BaselineLocation::File("stories.json".into()));
        assert_eq!(config.data_dir, PathBuf::from(".storymap"));
        assert_eq!(config.review_label, "story-submission");
    }

    #[test]
    fn http_baseline_is_detected() {
        let config =
            Config::from_lookup(lookup(&[("STORYMAP_BASELINE", "https://example.org/stories.json")]))
                .unwrap();
        assert!(matches!(config.baseline, BaselineLocation::Http(_)));
    }

    #[test]
    fn bad_review_repo_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[("STORYMAP_REVIEW_REPO", "not a url")])).unwrap_err();
        assert!(matches!(err, StoryMapError::Config(_)));
    }
}
