use crate::config::ConsistencyMode;
use crate::membership::types::{Peer, PeerId};
use crate::server::client;
use crate::server::protocol::{Request, Response};
use dashmap::DashMap;
use rand::seq::SliceRandom;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced to a publisher under strong consistency.
///
/// Eventual consistency never produces these; its delivery failures are
/// logged and dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplicationError {
    /// A replica could not be reached within the network timeout.
    #[error("replica {peer} unreachable: {reason}")]
    ReplicaUnreachable { peer: PeerId, reason: String },

    /// A replica answered but did not acknowledge the update.
    #[error("replica {peer} rejected the update")]
    ReplicaRejected { peer: PeerId },
}

/// Owns the topic -> replica-set table and the synchronization policy.
///
/// The consistency mode is a node-level setting, not per topic.
pub struct ReplicationManager {
    replication_factor: usize,
    mode: ConsistencyMode,
    /// Candidate replicas: all configured peers except this node.
    peers: Vec<Peer>,
    /// Fixed at topic creation, never rebalanced.
    assignments: DashMap<String, Vec<Peer>>,
    net_timeout: Duration,
}

impl ReplicationManager {
    pub fn new(
        peers: Vec<Peer>,
        replication_factor: usize,
        mode: ConsistencyMode,
        net_timeout: Duration,
    ) -> Self {
        Self {
            replication_factor,
            mode,
            peers,
            assignments: DashMap::new(),
            net_timeout,
        }
    }

    /// Assigns a replica set for a newly created topic and announces the
    /// topic to each chosen replica in the background.
    ///
    /// Idempotent: an existing assignment is never reselected. Announcement
    /// failures are logged only — `create_topic` has no error case, and a
    /// replica that missed the announcement will create the topic on its
    /// first synchronized message.
    pub fn on_topic_created(&self, topic: &str) {
        if self.assignments.contains_key(topic) {
            return;
        }

        let replicas = self.select_replicas();
        tracing::info!(
            "Assigned topic '{}' to replicas {:?}",
            topic,
            replicas.iter().map(|peer| peer.id).collect::<Vec<_>>()
        );
        self.assignments.insert(topic.to_string(), replicas.clone());

        for replica in replicas {
            let request = Request::ReplicateTopic {
                topic_name: topic.to_string(),
            };
            let net_timeout = self.net_timeout;
            tokio::spawn(async move {
                if let Err(e) = client::send_request(replica.addr, &request, net_timeout).await {
                    tracing::warn!(
                        "Failed to announce topic to replica {}: {}",
                        replica.id,
                        e
                    );
                }
            });
        }
    }

    /// Pushes one published message to the topic's replica set.
    ///
    /// Strong mode contacts every replica and fails on the first one that
    /// cannot be brought up to date; eventual mode spawns a best-effort send
    /// per replica and returns immediately. A topic with no assignment (for
    /// example, created before any peers were configured) synchronizes
    /// trivially.
    pub async fn synchronize(&self, topic: &str, message: &str) -> Result<(), ReplicationError> {
        let replicas = self
            .assignments
            .get(topic)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        match self.mode {
            ConsistencyMode::Strong => {
                for replica in replicas {
                    self.sync_one(&replica, topic, message).await?;
                    tracing::debug!(
                        "Strong sync: replica {} applied message on '{}'",
                        replica.id,
                        topic
                    );
                }
                Ok(())
            }
            ConsistencyMode::Eventual => {
                for replica in replicas {
                    let request = Request::SyncMessage {
                        topic_name: topic.to_string(),
                        message: message.to_string(),
                    };
                    let net_timeout = self.net_timeout;
                    let topic = topic.to_string();
                    tokio::spawn(async move {
                        match client::send_request(replica.addr, &request, net_timeout).await {
                            Ok(Response::ReplicaApplied) => {
                                tracing::debug!(
                                    "Eventual sync: replica {} applied message on '{}'",
                                    replica.id,
                                    topic
                                );
                            }
                            Ok(other) => {
                                tracing::warn!(
                                    "Eventual sync: replica {} answered {:?} for '{}'",
                                    replica.id,
                                    other,
                                    topic
                                );
                            }
                            Err(e) => {
                                tracing::warn!(
                                    "Eventual sync: replica {} unreachable for '{}': {}",
                                    replica.id,
                                    topic,
                                    e
                                );
                            }
                        }
                    });
                }
                Ok(())
            }
        }
    }

    async fn sync_one(
        &self,
        replica: &Peer,
        topic: &str,
        message: &str,
    ) -> Result<(), ReplicationError> {
        let request = Request::SyncMessage {
            topic_name: topic.to_string(),
            message: message.to_string(),
        };

        match client::send_request(replica.addr, &request, self.net_timeout).await {
            Ok(Response::ReplicaApplied) => Ok(()),
            Ok(_) => Err(ReplicationError::ReplicaRejected { peer: replica.id }),
            Err(e) => Err(ReplicationError::ReplicaUnreachable {
                peer: replica.id,
                reason: e.to_string(),
            }),
        }
    }

    /// Random ranking over the peer list, truncated to the replication
    /// factor. Stands in for a latency-aware "nearest peers" policy.
    fn select_replicas(&self) -> Vec<Peer> {
        let mut ranked = self.peers.clone();
        ranked.shuffle(&mut rand::thread_rng());
        ranked.truncate(self.replication_factor);
        ranked
    }

    /// The fixed replica set for `topic`, if one was assigned.
    pub fn replicas_of(&self, topic: &str) -> Option<Vec<Peer>> {
        self.assignments
            .get(topic)
            .map(|entry| entry.value().clone())
    }
}
