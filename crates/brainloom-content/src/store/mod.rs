//! Topic content persistence.
//!
//! Stored markup travels in a small JSON envelope,
//! `{"type": "html", "content": "...", "updated_at": "..."}`. Topics are
//! addressed by slash-separated slugs such as `rust/ownership`.

mod fs;
mod memory;

pub use fs::FsTopicStore;
pub use memory::MemoryTopicStore;

use chrono::{DateTime, Utc};
use relative_path::{Component, RelativePath, RelativePathBuf};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::blocks::Document;
use crate::markup::{MarkupHazard, find_hazards, parse, serialize};

pub const HTML_CONTENT_TYPE: &str = "html";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Topic not found: {0}")]
    NotFound(String),
    #[error("Invalid topic slug: {0:?}")]
    InvalidTopic(String),
    #[error("Unsupported content type {content_type:?} for topic {topic}")]
    UnsupportedType { topic: String, content_type: String },
    #[error("Invalid content envelope for topic {topic}: {source}")]
    Envelope {
        topic: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Refusing to save topic {topic}: {} unescaped attribute value(s)", hazards.len())]
    Hazardous {
        topic: String,
        hazards: Vec<MarkupHazard>,
    },
    #[error("Invalid content directory: {0}")]
    InvalidContentDir(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEnvelope {
    #[serde(rename = "type")]
    pub content_type: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl ContentEnvelope {
    pub fn html(content: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            content_type: HTML_CONTENT_TYPE.to_string(),
            content: content.into(),
            updated_at,
        }
    }

    /// The markup, provided the envelope holds HTML.
    pub fn into_markup(self, topic: &str) -> Result<String, StoreError> {
        if self.content_type == HTML_CONTENT_TYPE {
            Ok(self.content)
        } else {
            Err(StoreError::UnsupportedType {
                topic: topic.to_string(),
                content_type: self.content_type,
            })
        }
    }
}

pub trait TopicStore {
    /// Stored markup of `topic`.
    fn load(&self, topic: &str) -> Result<String, StoreError>;

    fn save(&mut self, topic: &str, markup: &str) -> Result<(), StoreError>;

    /// All topic slugs, sorted.
    fn topics(&self) -> Result<Vec<String>, StoreError>;

    fn load_document(&self, topic: &str) -> Result<Document, StoreError> {
        Ok(parse(&self.load(topic)?))
    }

    /// Serialize and save `document`, unless a value would corrupt the markup.
    fn save_document(&mut self, topic: &str, document: &Document) -> Result<(), StoreError> {
        let hazards = find_hazards(document);
        if !hazards.is_empty() {
            return Err(StoreError::Hazardous {
                topic: topic.to_string(),
                hazards,
            });
        }
        self.save(topic, &serialize(document))
    }
}

/// Check that `topic` is a plain relative slug: non-empty, no `.` or `..`
/// segments, no leading slash or backslashes.
pub fn topic_path(topic: &str) -> Result<RelativePathBuf, StoreError> {
    let invalid = || StoreError::InvalidTopic(topic.to_string());
    if topic.is_empty() || topic.starts_with('/') || topic.contains('\\') {
        return Err(invalid());
    }
    let path = RelativePath::new(topic);
    let mut segments = 0;
    for component in path.components() {
        match component {
            Component::Normal(segment) if !segment.is_empty() => segments += 1,
            _ => return Err(invalid()),
        }
    }
    if segments == 0 {
        return Err(invalid());
    }
    Ok(path.to_relative_path_buf())
}
