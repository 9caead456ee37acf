//! Node Configuration
//!
//! All knobs a node needs at startup: identity, listen address, the static
//! peer list, replication settings, the connection admission limit, and the
//! timing constants used by the failure detector and heartbeat sender.
//!
//! Configuration is immutable once the node starts; peers are never
//! discovered or rebalanced at runtime.

use crate::membership::types::{Peer, PeerId};
use anyhow::anyhow;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Consistency mode for replica synchronization, selected per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyMode {
    /// Publish acknowledges only after every assigned replica applied the
    /// message; an unreachable replica fails the publish.
    Strong,
    /// Publish returns after local apply; replicas are updated in the
    /// background and may lag arbitrarily.
    Eventual,
}

impl FromStr for ConsistencyMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strong" => Ok(ConsistencyMode::Strong),
            "eventual" => Ok(ConsistencyMode::Eventual),
            other => Err(anyhow!("unknown consistency mode '{}'", other)),
        }
    }
}

/// Timing constants for the background loops and peer RPC.
///
/// Defaults mirror the reference deployment: seconds-scale intervals. Tests
/// override these with millisecond values to run deterministically fast.
#[derive(Debug, Clone, Copy)]
pub struct TimingConfig {
    /// A peer with no heartbeat for longer than this is marked offline.
    pub liveness_timeout: Duration,
    /// Period of the failure detector's scan over the peer table.
    pub monitor_interval: Duration,
    /// Period between liveness announcements to all peers.
    pub heartbeat_interval: Duration,
    /// Bound on connect/read when talking to a peer; an unreachable peer
    /// costs at most this long per attempt, never retried within a call.
    pub connect_timeout: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            liveness_timeout: Duration::from_secs(5),
            monitor_interval: Duration::from_secs(1),
            heartbeat_interval: Duration::from_secs(3),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

/// Complete startup configuration for one pub/sub node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub node_id: PeerId,
    pub bind_addr: SocketAddr,
    /// All other known nodes. Fixed for the life of the process.
    pub peers: Vec<Peer>,
    /// Upper bound on replicas assigned per topic.
    pub replication_factor: usize,
    pub consistency: ConsistencyMode,
    /// Cap on concurrently served connections; further accepts wait.
    pub max_connections: usize,
    pub timing: TimingConfig,
}

impl NodeConfig {
    pub fn new(node_id: PeerId, bind_addr: SocketAddr, peers: Vec<Peer>) -> Self {
        Self {
            node_id,
            bind_addr,
            peers,
            replication_factor: 2,
            consistency: ConsistencyMode::Strong,
            max_connections: 64,
            timing: TimingConfig::default(),
        }
    }
}
