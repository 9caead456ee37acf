use crate::membership::types::{Peer, PeerHealth, PeerId, PeerState};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// The failure detector: exclusive owner of the peer-status table.
///
/// Heartbeat receipt and the monitor loop are the only writers; the
/// connection dispatcher reads heartbeats in but never touches the table
/// directly.
pub struct NodeManager {
    peers: DashMap<PeerId, PeerHealth>,
    liveness_timeout: Duration,
}

impl NodeManager {
    pub fn new(peer_list: &[Peer], liveness_timeout: Duration) -> Self {
        let peers = DashMap::new();
        for peer in peer_list {
            peers.insert(peer.id, PeerHealth::unknown());
        }
        Self {
            peers,
            liveness_timeout,
        }
    }

    /// Records a heartbeat from `peer` and eagerly marks it online.
    ///
    /// `Instant::now()` is monotonic, so last-seen timestamps never move
    /// backwards. A heartbeat from a peer missing from the table (not in the
    /// configured list) is still tracked rather than dropped.
    pub fn receive_heartbeat(&self, peer: PeerId) {
        let mut health = self.peers.entry(peer).or_insert_with(PeerHealth::unknown);
        health.last_seen = Some(Instant::now());
        if health.state != PeerState::Online {
            tracing::info!("Peer {} is online (heartbeat received)", peer);
            health.state = PeerState::Online;
        }
    }

    /// One monitor pass: marks every peer silent past the liveness timeout
    /// as offline. Never promotes; peers with no heartbeat history stay
    /// unknown.
    pub fn detect_failures(&self) {
        let now = Instant::now();

        for mut entry in self.peers.iter_mut() {
            let peer = *entry.key();
            let health = entry.value_mut();

            if let Some(last_seen) = health.last_seen
                && health.state == PeerState::Online
                && now.duration_since(last_seen) > self.liveness_timeout
            {
                tracing::warn!(
                    "Peer {} marked offline (no heartbeat for {:?})",
                    peer,
                    now.duration_since(last_seen)
                );
                health.state = PeerState::Offline;
            }
        }
    }

    /// Operator-driven recovery: transitions `peer` back to online
    /// regardless of heartbeat freshness.
    ///
    /// Also refreshes the last-seen timestamp, otherwise the next monitor
    /// pass would immediately demote the peer again.
    pub fn recover_node(&self, peer: PeerId) {
        let mut health = self.peers.entry(peer).or_insert_with(PeerHealth::unknown);
        health.state = PeerState::Online;
        health.last_seen = Some(Instant::now());
        tracing::info!("Peer {} rejoined and is online", peer);
    }

    pub fn status_of(&self, peer: PeerId) -> Option<PeerState> {
        self.peers.get(&peer).map(|health| health.state)
    }

    pub fn online_peers(&self) -> Vec<PeerId> {
        self.peers
            .iter()
            .filter(|entry| entry.value().state == PeerState::Online)
            .map(|entry| *entry.key())
            .collect()
    }

    /// The monitor loop. Runs until the shutdown signal flips.
    pub async fn run(
        self: Arc<Self>,
        monitor_interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut interval = tokio::time::interval(monitor_interval);
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::debug!("Failure detector stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.detect_failures();
                }
            }
        }
    }
}
