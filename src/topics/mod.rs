//! Topic Store Module
//!
//! In-memory table of named topics: the ground truth for a single node.
//! Each topic is an append-only message log plus a set of subscriber ids.
//!
//! ## Core Guarantees
//! - **Single writer**: the table is owned by `TopicStore` and only mutated
//!   through its operations; the raw map is never exposed.
//! - **Per-topic linearizability**: operations on the same topic name are
//!   observed in a single total order (shard-level entry locking); operations
//!   on different names may interleave freely.
//! - **Append-only**: topics are never deleted and message logs are never
//!   reordered or truncated.

pub mod store;

#[cfg(test)]
mod tests;
