use chrono::Utc;
use std::collections::BTreeMap;

use super::{ContentEnvelope, StoreError, TopicStore, topic_path};

/// Topic store held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryTopicStore {
    topics: BTreeMap<String, ContentEnvelope>,
}

impl MemoryTopicStore {
    pub fn envelope(&self, topic: &str) -> Option<&ContentEnvelope> {
        self.topics.get(topic)
    }

    pub fn insert(&mut self, topic: &str, envelope: ContentEnvelope) -> Result<(), StoreError> {
        topic_path(topic)?;
        self.topics.insert(topic.to_string(), envelope);
        Ok(())
    }
}

impl TopicStore for MemoryTopicStore {
    fn load(&self, topic: &str) -> Result<String, StoreError> {
        self.topics
            .get(topic)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(topic.to_string()))?
            .into_markup(topic)
    }

    fn save(&mut self, topic: &str, markup: &str) -> Result<(), StoreError> {
        self.insert(topic, ContentEnvelope::html(markup, Utc::now()))
    }

    fn topics(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.topics.keys().cloned().collect())
    }
}
