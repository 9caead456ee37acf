use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors surfaced by topic store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopicError {
    /// Publish or subscribe against a topic that was never created.
    #[error("topic '{0}' not found")]
    TopicNotFound(String),
}

/// One named topic: an ordered message log and its subscriber set.
#[derive(Debug, Default, Clone)]
pub struct Topic {
    pub messages: Vec<String>,
    pub subscribers: HashSet<String>,
}

/// The node-local topic table.
///
/// Backed by a `DashMap` so that concurrent connection workers serialize per
/// topic name without a global lock. Cross-component effects (replication)
/// are triggered by the dispatcher after the store operation returns, never
/// from inside the store.
pub struct TopicStore {
    topics: DashMap<String, Topic>,
}

impl TopicStore {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
        }
    }

    /// Creates `name` with an empty log and subscriber set.
    ///
    /// Idempotent and infallible: returns `true` only if the topic was newly
    /// created, so the caller can trigger replica assignment exactly once.
    pub fn create_topic(&self, name: &str) -> bool {
        match self.topics.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(Topic::default());
                true
            }
        }
    }

    /// Appends `message` to the topic's log and notifies local subscribers.
    ///
    /// Notification is a local side effect (logged), not wire delivery.
    /// Returns the number of subscribers notified.
    pub fn publish(&self, name: &str, message: &str) -> Result<usize, TopicError> {
        let mut topic = self
            .topics
            .get_mut(name)
            .ok_or_else(|| TopicError::TopicNotFound(name.to_string()))?;

        topic.messages.push(message.to_string());

        for subscriber in &topic.subscribers {
            tracing::info!(
                "Notified subscriber {} of new message on topic '{}'",
                subscriber,
                name
            );
        }

        Ok(topic.subscribers.len())
    }

    /// Applies a message received from the primary holding this topic.
    ///
    /// Replicas may lag behind topic creation, so a missing topic is created
    /// on the spot rather than dropping the message.
    pub fn apply_replica_message(&self, name: &str, message: &str) {
        self.topics
            .entry(name.to_string())
            .or_default()
            .messages
            .push(message.to_string());
    }

    /// Full ordered log for `name`; empty (not an error) if the topic does
    /// not exist.
    pub fn fetch_messages(&self, name: &str) -> Vec<String> {
        self.topics
            .get(name)
            .map(|topic| topic.messages.clone())
            .unwrap_or_default()
    }

    /// Idempotent add of `subscriber_id` to the topic's subscriber set.
    pub fn subscribe(&self, name: &str, subscriber_id: &str) -> Result<(), TopicError> {
        let mut topic = self
            .topics
            .get_mut(name)
            .ok_or_else(|| TopicError::TopicNotFound(name.to_string()))?;

        if topic.subscribers.insert(subscriber_id.to_string()) {
            tracing::debug!("Subscriber {} added to topic '{}'", subscriber_id, name);
        }

        Ok(())
    }

    /// Names of all topics on this node.
    pub fn topic_names(&self) -> Vec<String> {
        self.topics.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Snapshot of the whole table as topic name -> message log.
    ///
    /// Backs the `fetch_topics` directory listing.
    pub fn dump(&self) -> HashMap<String, Vec<String>> {
        self.topics
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().messages.clone()))
            .collect()
    }

    pub fn subscriber_count(&self, name: &str) -> Option<usize> {
        self.topics.get(name).map(|topic| topic.subscribers.len())
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

impl Default for TopicStore {
    fn default() -> Self {
        Self::new()
    }
}
