use crate::config::NodeConfig;
use crate::membership::detector::NodeManager;
use crate::membership::heartbeat::HeartbeatSender;
use crate::membership::types::PeerId;
use crate::replication::manager::ReplicationManager;
use crate::server::protocol::{Request, Response};
use crate::topics::store::{TopicError, TopicStore};
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Semaphore, watch};
use tokio::time::timeout;

/// One running pub/sub peer: topic store, replication strategy, failure
/// detector, heartbeat sender, and the TCP dispatcher in front of them.
///
/// Each accepted connection carries exactly one request and runs to
/// completion in its own task (decode -> dispatch -> encode -> close).
/// All background loops are tied to the node's shutdown signal so tests can
/// start and stop nodes deterministically.
pub struct PeerNode {
    config: NodeConfig,
    store: TopicStore,
    replication: ReplicationManager,
    node_manager: Arc<NodeManager>,
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
}

impl PeerNode {
    /// Binds the listener and starts the accept loop, failure detector, and
    /// heartbeat sender.
    pub async fn start(config: NodeConfig) -> Result<Arc<Self>> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let replication = ReplicationManager::new(
            config.peers.clone(),
            config.replication_factor,
            config.consistency,
            config.timing.connect_timeout,
        );
        let node_manager = Arc::new(NodeManager::new(
            &config.peers,
            config.timing.liveness_timeout,
        ));
        let heartbeats = HeartbeatSender::new(
            config.node_id,
            config.peers.clone(),
            config.timing.heartbeat_interval,
            config.timing.connect_timeout,
        );

        tracing::info!(
            "Node {} is online on {} ({} peers, {:?} consistency)",
            config.node_id,
            local_addr,
            config.peers.len(),
            config.consistency
        );

        let node = Arc::new(Self {
            config,
            store: TopicStore::new(),
            replication,
            node_manager,
            local_addr,
            shutdown: shutdown_tx,
        });

        tokio::spawn(node.clone().accept_loop(listener, shutdown_rx.clone()));
        tokio::spawn(
            node.node_manager
                .clone()
                .run(node.config.timing.monitor_interval, shutdown_rx.clone()),
        );
        tokio::spawn(heartbeats.run(shutdown_rx));

        Ok(node)
    }

    /// Stops the accept loop and both background loops. In-flight
    /// connections run to completion.
    pub fn shutdown(&self) {
        tracing::info!("Node {} shutting down", self.config.node_id);
        let _ = self.shutdown.send(true);
    }

    /// Actual bound address (useful when configured with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn store(&self) -> &TopicStore {
        &self.store
    }

    pub fn replication(&self) -> &ReplicationManager {
        &self.replication
    }

    pub fn node_manager(&self) -> &NodeManager {
        &self.node_manager
    }

    async fn accept_loop(
        self: Arc<Self>,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) {
        // Admission control: further accepts wait until a worker slot frees.
        let limiter = Arc::new(Semaphore::new(self.config.max_connections));

        loop {
            // Claim a worker slot before accepting so a saturated node
            // neither accepts work it cannot serve nor ignores shutdown.
            let permit = tokio::select! {
                _ = shutdown.changed() => {
                    tracing::debug!("Dispatcher stopping");
                    break;
                }
                permit = limiter.clone().acquire_owned() => {
                    let Ok(permit) = permit else { break };
                    permit
                }
            };

            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::debug!("Dispatcher stopping");
                    break;
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer_addr)) => {
                            let node = self.clone();
                            tokio::spawn(async move {
                                node.handle_connection(stream, peer_addr).await;
                                drop(permit);
                            });
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                            tokio::time::sleep(Duration::from_millis(100)).await;
                        }
                    }
                }
            }
        }
    }

    /// Serves one connection: read the request until the client half-closes,
    /// dispatch, write the response, close. Nothing here is fatal to the
    /// node.
    async fn handle_connection(self: Arc<Self>, mut stream: TcpStream, peer_addr: SocketAddr) {
        let mut buf = Vec::new();
        match timeout(
            self.config.timing.connect_timeout,
            stream.read_to_end(&mut buf),
        )
        .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::warn!("Failed to read request from {}: {}", peer_addr, e);
                return;
            }
            Err(_) => {
                tracing::warn!("Request from {} timed out", peer_addr);
                return;
            }
        }

        let response = match serde_json::from_slice::<Request>(&buf) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                tracing::warn!("Unrecognized request from {}: {}", peer_addr, e);
                Some(Response::UnknownAction)
            }
        };

        // Heartbeats get no reply; everything else gets exactly one.
        if let Some(response) = response {
            match serde_json::to_vec(&response) {
                Ok(payload) => {
                    match timeout(
                        self.config.timing.connect_timeout,
                        stream.write_all(&payload),
                    )
                    .await
                    {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => {
                            tracing::debug!("Failed to write response to {}: {}", peer_addr, e);
                        }
                        Err(_) => {
                            tracing::debug!("Response write to {} timed out", peer_addr);
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize response: {}", e);
                }
            }
        }
    }

    async fn dispatch(&self, request: Request) -> Option<Response> {
        match request {
            Request::CreateTopic { topic_name } => {
                if self.store.create_topic(&topic_name) {
                    self.replication.on_topic_created(&topic_name);
                }
                Some(Response::TopicCreated { topic: topic_name })
            }

            Request::Publish {
                topic_name,
                message,
            } => match self.store.publish(&topic_name, &message) {
                // Local apply succeeded unconditionally; only now do the
                // replicas weigh in.
                Ok(_) => match self.replication.synchronize(&topic_name, &message).await {
                    Ok(()) => Some(Response::MessagePublished),
                    Err(e) => {
                        tracing::warn!("Replication failed for '{}': {}", topic_name, e);
                        Some(Response::ReplicationFailed {
                            reason: e.to_string(),
                        })
                    }
                },
                Err(TopicError::TopicNotFound(_)) => Some(Response::TopicNotFound),
            },

            Request::FetchMessages { topic_name } => Some(Response::Messages {
                messages: self.store.fetch_messages(&topic_name),
            }),

            Request::Subscribe {
                topic_name,
                subscriber_id,
            } => match self.store.subscribe(&topic_name, &subscriber_id) {
                Ok(()) => Some(Response::Subscribed { topic: topic_name }),
                Err(TopicError::TopicNotFound(_)) => Some(Response::TopicNotFound),
            },

            Request::FetchTopics => Some(Response::Topics {
                topics: self.store.dump(),
            }),

            Request::Heartbeat { node_id } => {
                self.node_manager.receive_heartbeat(PeerId(node_id));
                None
            }

            // Replica side: apply without re-triggering placement, so a
            // replicated topic never fans out again from here.
            Request::ReplicateTopic { topic_name } => {
                self.store.create_topic(&topic_name);
                Some(Response::ReplicaApplied)
            }

            Request::SyncMessage {
                topic_name,
                message,
            } => {
                self.store.apply_replica_message(&topic_name, &message);
                Some(Response::ReplicaApplied)
            }
        }
    }
}
