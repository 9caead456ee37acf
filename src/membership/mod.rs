//! Membership Module
//!
//! Tracks which configured peers are reachable. Two independent background
//! loops feed it:
//!
//! - **Heartbeat Sender**: periodically announces this node's liveness to
//!   every peer in the static peer list, best effort and fire-and-forget.
//! - **Failure Detector** (`NodeManager`): records incoming heartbeats and
//!   runs a fixed-timeout monitor loop that marks silent peers offline.
//!
//! ## State Machine (per peer)
//! `Unknown` (no heartbeat history) -> `Online` (first heartbeat) ->
//! `Offline` (silent past the liveness timeout) -> `Online` (fresh heartbeat
//! or explicit operator recovery). The monitor loop only ever demotes;
//! promotion back to online is always an explicit event.
//!
//! This is a fixed-timeout detector, not a phi-accrual one: it trades
//! detection accuracy for simplicity, which suits a small low-churn peer set.

pub mod detector;
pub mod heartbeat;
pub mod types;
