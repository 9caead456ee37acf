use pubsub_node::config::{ConsistencyMode, NodeConfig};
use pubsub_node::membership::types::{Peer, PeerId};
use pubsub_node::server::dispatcher::PeerNode;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 5 {
        eprintln!(
            "Usage: {} --id <n> --bind <addr:port> [--peer <n>@<addr:port> ...] \
             [--consistency strong|eventual] [--replication-factor <n>] [--max-connections <n>]",
            args[0]
        );
        eprintln!("Example: {} --id 1 --bind 127.0.0.1:5001", args[0]);
        eprintln!(
            "Example: {} --id 2 --bind 127.0.0.1:5002 --peer 1@127.0.0.1:5001 --consistency eventual",
            args[0]
        );
        std::process::exit(1);
    }

    let mut node_id: Option<PeerId> = None;
    let mut bind_addr: Option<SocketAddr> = None;
    let mut peers: Vec<Peer> = vec![];
    let mut consistency = ConsistencyMode::Strong;
    let mut replication_factor = 2usize;
    let mut max_connections = 64usize;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--id" => {
                node_id = Some(PeerId(args[i + 1].parse()?));
                i += 2;
            }
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--peer" => {
                peers.push(args[i + 1].parse()?);
                i += 2;
            }
            "--consistency" => {
                consistency = args[i + 1].parse()?;
                i += 2;
            }
            "--replication-factor" => {
                replication_factor = args[i + 1].parse()?;
                i += 2;
            }
            "--max-connections" => {
                max_connections = args[i + 1].parse()?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let node_id = node_id.expect("--id is required");
    let bind_addr = bind_addr.expect("--bind is required");

    tracing::info!("Starting node {} on {}", node_id, bind_addr);
    if peers.is_empty() {
        tracing::info!("No peers configured; running standalone");
    } else {
        tracing::info!("Peer list: {:?}", peers);
    }

    let mut config = NodeConfig::new(node_id, bind_addr, peers);
    config.consistency = consistency;
    config.replication_factor = replication_factor;
    config.max_connections = max_connections;

    let node = PeerNode::start(config).await?;

    tracing::info!("Press Ctrl+C to shutdown");
    tokio::signal::ctrl_c().await?;
    node.shutdown();

    Ok(())
}
