use crate::membership::types::{Peer, PeerId};
use crate::server::client;
use crate::server::protocol::Request;
use std::time::Duration;
use tokio::sync::watch;

/// Periodically announces this node's liveness to every configured peer.
///
/// Best effort and fire-and-forget: each peer gets its own spawned send, a
/// failed attempt is dropped without retry until the next tick, and one
/// unreachable peer never delays announcements to the others.
pub struct HeartbeatSender {
    node_id: PeerId,
    peers: Vec<Peer>,
    heartbeat_interval: Duration,
    net_timeout: Duration,
}

impl HeartbeatSender {
    pub fn new(
        node_id: PeerId,
        peers: Vec<Peer>,
        heartbeat_interval: Duration,
        net_timeout: Duration,
    ) -> Self {
        Self {
            node_id,
            peers,
            heartbeat_interval,
            net_timeout,
        }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.heartbeat_interval);
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::debug!("Heartbeat sender stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.announce_to_all();
                }
            }
        }
    }

    fn announce_to_all(&self) {
        for peer in &self.peers {
            let request = Request::Heartbeat {
                node_id: self.node_id.0,
            };
            let addr = peer.addr;
            let peer_id = peer.id;
            let net_timeout = self.net_timeout;
            tokio::spawn(async move {
                if let Err(e) = client::send_oneway(addr, &request, net_timeout).await {
                    tracing::debug!("Heartbeat to {} failed: {}", peer_id, e);
                }
            });
        }
    }
}
