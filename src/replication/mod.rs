//! Replication Module
//!
//! Decides which peers hold a secondary copy of each topic and keeps those
//! copies informed of new messages.
//!
//! ## Core Mechanisms
//! - **Placement**: at topic-creation time the configured peer list is ranked
//!   randomly (emulating proximity without real topology data) and the top
//!   `replication_factor` peers become the topic's replica set. The set is
//!   fixed for the topic's lifetime, even if a replica later goes offline.
//! - **Synchronization**: every published message is transmitted to the
//!   replica set over the wire. Under strong consistency the publish only
//!   succeeds once every replica acknowledged; under eventual consistency
//!   delivery is fire-and-forget and failures are only logged.

pub mod manager;

#[cfg(test)]
mod tests;
