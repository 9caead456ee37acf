//! Pub/Sub Network Protocol
//!
//! Defines the request and response objects exchanged between clients, peers,
//! and the node. These structures are serialized as JSON, one object per
//! connection.
//!
//! `Heartbeat` is fire-and-forget: the server records it and closes without
//! writing a response. `ReplicateTopic` and `SyncMessage` are internal
//! peer-to-peer actions used by the replication strategy; external clients
//! only ever send the first five actions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single client or peer request, discriminated by the `action` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    CreateTopic {
        topic_name: String,
    },
    Publish {
        topic_name: String,
        message: String,
    },
    FetchMessages {
        topic_name: String,
    },
    Subscribe {
        topic_name: String,
        subscriber_id: String,
    },
    FetchTopics,
    /// Liveness announcement from a peer. No response is written.
    Heartbeat {
        node_id: u64,
    },
    /// Primary -> replica: create a topic chosen for replication here.
    ReplicateTopic {
        topic_name: String,
    },
    /// Primary -> replica: apply one published message.
    SyncMessage {
        topic_name: String,
        message: String,
    },
}

/// A single response, discriminated by the `status` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    TopicCreated {
        topic: String,
    },
    MessagePublished,
    Subscribed {
        topic: String,
    },
    TopicNotFound,
    Messages {
        messages: Vec<String>,
    },
    Topics {
        topics: HashMap<String, Vec<String>>,
    },
    /// Acknowledgment from a replica for `ReplicateTopic`/`SyncMessage`.
    ReplicaApplied,
    /// Strong consistency only: a replica could not be brought up to date.
    /// The message was still applied locally.
    ReplicationFailed {
        reason: String,
    },
    UnknownAction,
    /// Synthesized on the caller's side when the connection attempt itself
    /// fails; never sent by a server.
    ConnectionFailed {
        reason: String,
    },
}
