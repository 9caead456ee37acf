//! Peer-to-Peer Pub/Sub Node Library
//!
//! This library crate defines the core modules that make up a single pub/sub
//! peer. It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The node is composed of four loosely coupled subsystems:
//!
//! - **`topics`**: The topic store. An in-memory table of named topics, each
//!   holding an append-only message log and a subscriber set. Single owner of
//!   all topic state on this node.
//! - **`replication`**: The replica placement and synchronization strategy.
//!   Picks a fixed replica set per topic at creation time and pushes published
//!   messages to it under a strong or eventual consistency mode.
//! - **`membership`**: Peer liveness tracking. A heartbeat sender announces
//!   this node to every configured peer, and a fixed-timeout failure detector
//!   flips peers between online and offline based on heartbeat recency.
//! - **`server`**: The wire protocol and connection dispatcher. One JSON
//!   request per TCP connection, routed by action to the subsystems above.

pub mod config;
pub mod membership;
pub mod replication;
pub mod server;
pub mod topics;
