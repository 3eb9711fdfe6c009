use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use storymap_common::{
    parse_coordinate, Config, Story, StoryDraft, StoryId, SubmissionMode, CARD_EXCERPT_CHARS,
};
use storymap_core::{
    decode_structured_block, ingest_submission, ReviewRequestBuilder, StoryMap, SubmissionOutcome,
    SystemClock,
};
use storymap_store::{FileKeyValueStore, LocalStories};

#[derive(Parser)]
#[command(name = "storymap", about = "Browse and contribute geotagged stories")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every story, newest first.
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one story in full.
    Show { id: String },
    /// Add a story locally, or prepare it for review.
    Add {
        #[command(flatten)]
        form: StoryForm,
        #[arg(long, value_enum, default_value_t = Mode::Local)]
        mode: Mode,
    },
    /// Append an approved review request to a baseline file.
    Ingest {
        /// Baseline JSON file to rewrite.
        #[arg(long)]
        baseline: PathBuf,
        /// File holding the issue body; reads stdin when omitted.
        #[arg(long)]
        issue: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct StoryForm {
    #[arg(long)]
    title: String,
    #[arg(long)]
    location: String,
    #[arg(long, allow_hyphen_values = true)]
    latitude: String,
    #[arg(long, allow_hyphen_values = true)]
    longitude: String,
    #[arg(long)]
    content: String,
    /// Comma separated.
    #[arg(long, default_value = "")]
    tags: String,
    #[arg(long, default_value = "")]
    author: String,
    #[arg(long)]
    email: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Local,
    Review,
}

impl From<Mode> for SubmissionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Local => SubmissionMode::LocalPreview,
            Mode::Review => SubmissionMode::ExternalReview,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("storymap=info".parse()?)
                .add_directive("baseline_client=info".parse()?),
        )
        .init();

    match Cli::parse().command {
        Command::List { limit } => {
            let map = open_map().await?;
            for story in map.all().iter().take(limit.unwrap_or(usize::MAX)) {
                print_card(story);
            }
        }
        Command::Show { id } => {
            let map = open_map().await?;
            let id = match id.parse::<i64>() {
                Ok(n) => StoryId::Numeric(n),
                Err(_) => StoryId::Other(serde_json::Value::String(id)),
            };
            match map.repository().find(&id) {
                Some(story) => print_detail(story),
                None => bail!("no story with id {id}"),
            }
        }
        Command::Add { form, mode } => {
            let draft = form.into_draft()?;
            let mut map = open_map().await?;
            match map.submit(mode.into(), &draft)? {
                SubmissionOutcome::Added(story) => {
                    println!("Story added to this device.");
                    println!();
                    println!("To make it visible to everyone, add this to the baseline dataset:");
                    println!("{}", serde_json::to_string_pretty(&story)?);
                }
                SubmissionOutcome::ReviewRequested(request) => {
                    println!("Open this link to submit your story for review:");
                    println!("{}", request.url);
                }
            }
        }
        Command::Ingest { baseline, issue } => ingest(&baseline, issue.as_deref())?,
    }

    Ok(())
}

/// Load configuration, the baseline and this device's additions.
async fn open_map() -> Result<StoryMap> {
    let config = Config::from_env()?;
    config.log();

    let source = baseline_client::source_for(&config.baseline);
    let store = LocalStories::new(Arc::new(FileKeyValueStore::new(&config.data_dir)));
    let exporter =
        ReviewRequestBuilder::new(&config.review_repo, Some(config.review_label.as_str()))?;

    Ok(StoryMap::initialize(source.as_ref(), store, exporter, Arc::new(SystemClock)).await)
}

impl StoryForm {
    fn into_draft(self) -> Result<StoryDraft> {
        Ok(StoryDraft {
            latitude: parse_coordinate("latitude", &self.latitude)?,
            longitude: parse_coordinate("longitude", &self.longitude)?,
            title: self.title,
            location: self.location,
            content: self.content,
            tags: self.tags,
            author: self.author,
            email: self.email,
        })
    }
}

fn print_card(story: &Story) {
    println!("[{}] {}", story.id, story.display_title());
    println!("    {}", story.display_location());
    println!("    {}", story.excerpt(CARD_EXCERPT_CHARS));
    if !story.tags.is_empty() {
        println!("    #{}", story.tags.join(" #"));
    }
    println!(
        "    By {} on {}",
        story.display_author(),
        story.date.as_deref().unwrap_or("")
    );
    println!();
}

fn print_detail(story: &Story) {
    println!("{}", story.display_title());
    println!("{} ({}, {})", story.display_location(), story.latitude, story.longitude);
    if !story.tags.is_empty() {
        println!("#{}", story.tags.join(" #"));
    }
    println!();
    println!("{}", story.display_content());
    println!();
    println!(
        "Written by {} on {}",
        story.display_author(),
        story.date.as_deref().unwrap_or("")
    );
}

fn ingest(baseline_path: &Path, issue: Option<&Path>) -> Result<()> {
    let body = match issue {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            body
        }
    };
    let record = decode_structured_block(&body)?;

    // Strict parse: a record we cannot read must not be dropped on rewrite.
    let mut stories: Vec<Story> = match std::fs::read_to_string(baseline_path) {
        Ok(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", baseline_path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e).with_context(|| format!("reading {}", baseline_path.display())),
    };

    let story = ingest_submission(&mut stories, record)?;

    let dir = match baseline_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, &stories)?;
    tmp.persist(baseline_path)?;

    info!(id = %story.id, path = %baseline_path.display(), "Baseline updated");
    println!("Added story {} to {}", story.id, baseline_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_parses_negative_coordinates_and_review_mode() {
        let cli = Cli::try_parse_from([
            "storymap", "add", "--title", "T", "--location", "L", "--latitude", "-33.9",
            "--longitude", "-70.6", "--content", "C", "--tags", "a, b", "--mode", "review",
        ])
        .unwrap();
        let Command::Add { form, mode } = cli.command else {
            panic!("expected add");
        };
        assert_eq!(SubmissionMode::from(mode), SubmissionMode::ExternalReview);

        let draft = form.into_draft().unwrap();
        assert_eq!(draft.latitude, -33.9);
        assert_eq!(draft.longitude, -70.6);
        assert_eq!(draft.tags, "a, b");
    }

    #[test]
    fn unparseable_latitude_is_rejected() {
        let cli = Cli::try_parse_from([
            "storymap", "add", "--title", "T", "--location", "L", "--latitude", "north",
            "--longitude", "1", "--content", "C",
        ])
        .unwrap();
        let Command::Add { form, .. } = cli.command else {
            panic!("expected add");
        };
        assert!(form.into_draft().is_err());
    }
}
