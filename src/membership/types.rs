use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Instant;

/// Numeric identity of a peer node within the cluster.
///
/// Peer ids are fixed configuration assigned by the operator; they are never
/// generated or discovered at runtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PeerId(pub u64);

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// A single entry in the static peer list: identity plus network address.
///
/// The peer list is fixed at node startup and never changes for the life of
/// the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub id: PeerId,
    pub addr: SocketAddr,
}

impl FromStr for Peer {
    type Err = anyhow::Error;

    /// Parses the CLI form `<id>@<host>:<port>`, e.g. `2@127.0.0.1:5002`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, addr) = s
            .split_once('@')
            .ok_or_else(|| anyhow!("expected <id>@<host>:<port>, got '{}'", s))?;
        Ok(Peer {
            id: PeerId(id.parse()?),
            addr: addr.parse()?,
        })
    }
}

/// Liveness state of a peer as seen by the failure detector.
///
/// A peer with no heartbeat history is `Unknown` rather than online or
/// offline; the monitor loop leaves such peers alone until they announce
/// themselves for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Unknown,
    Online,
    Offline,
}

/// Per-peer liveness record owned by the failure detector.
#[derive(Debug, Clone)]
pub struct PeerHealth {
    /// When the last heartbeat arrived. `None` until the first one.
    /// Monotonically non-decreasing: always overwritten with `Instant::now()`.
    pub last_seen: Option<Instant>,
    pub state: PeerState,
}

impl PeerHealth {
    pub fn unknown() -> Self {
        Self {
            last_seen: None,
            state: PeerState::Unknown,
        }
    }
}
