use chrono::Utc;
use relative_path::RelativePathBuf;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ContentEnvelope, StoreError, TopicStore, topic_path};

const ENVELOPE_EXT: &str = "json";
const RAW_HTML_EXT: &str = "html";

/// One JSON envelope per topic under a root directory; `rust/ownership` lives
/// at `<root>/rust/ownership.json`.
///
/// A bare `<topic>.html` file is read as the topic's markup when no envelope
/// exists. Saving always writes the envelope.
#[derive(Debug, Clone)]
pub struct FsTopicStore {
    root: PathBuf,
}

impl FsTopicStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::InvalidContentDir(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, slug: &RelativePathBuf, ext: &str) -> PathBuf {
        RelativePathBuf::from(format!("{slug}.{ext}")).to_path(&self.root)
    }
}

impl TopicStore for FsTopicStore {
    fn load(&self, topic: &str) -> Result<String, StoreError> {
        let slug = topic_path(topic)?;

        let envelope_path = self.file_for(&slug, ENVELOPE_EXT);
        if envelope_path.is_file() {
            log::debug!("loading topic {topic} from {}", envelope_path.display());
            let raw = fs::read_to_string(&envelope_path)?;
            let envelope: ContentEnvelope =
                serde_json::from_str(&raw).map_err(|source| StoreError::Envelope {
                    topic: topic.to_string(),
                    source,
                })?;
            return envelope.into_markup(topic);
        }

        let html_path = self.file_for(&slug, RAW_HTML_EXT);
        if html_path.is_file() {
            log::debug!("loading topic {topic} from bare {}", html_path.display());
            return Ok(fs::read_to_string(&html_path)?);
        }

        Err(StoreError::NotFound(topic.to_string()))
    }

    fn save(&mut self, topic: &str, markup: &str) -> Result<(), StoreError> {
        let slug = topic_path(topic)?;
        let path = self.file_for(&slug, ENVELOPE_EXT);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let envelope = ContentEnvelope::html(markup, Utc::now());
        let json = serde_json::to_string_pretty(&envelope).map_err(|source| {
            StoreError::Envelope {
                topic: topic.to_string(),
                source,
            }
        })?;
        fs::write(&path, json)?;
        log::debug!("saved topic {topic} to {}", path.display());
        Ok(())
    }

    fn topics(&self) -> Result<Vec<String>, StoreError> {
        let mut topics = Vec::new();
        scan_directory_recursive(&self.root, &self.root, &mut topics)?;
        topics.sort();
        topics.dedup();
        Ok(topics)
    }
}

fn scan_directory_recursive(
    root: &Path,
    dir: &Path,
    topics: &mut Vec<String>,
) -> Result<(), StoreError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(root, &path, topics)?;
            continue;
        }
        let stem = path.with_extension("");
        if let Some(ext) = path.extension()
            && (ext == ENVELOPE_EXT || ext == RAW_HTML_EXT)
            && let Ok(relative) = stem.strip_prefix(root)
            && let Ok(slug) = RelativePathBuf::from_path(relative)
        {
            topics.push(slug.into_string());
        }
    }
    Ok(())
}
