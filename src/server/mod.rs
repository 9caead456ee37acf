//! Server Module
//!
//! The node's request surface: wire protocol types, the outbound peer RPC
//! client, and the connection dispatcher that ties the subsystems together.
//!
//! ## Wire Protocol
//! One request per TCP connection: the caller connects, writes a single JSON
//! request object, half-closes, and reads a single JSON response until the
//! server closes. No persistent connections, no framing across requests.
//!
//! Requests and responses are closed tagged enums (`action` / `status`
//! discriminators), so an unrecognized action is a single well-defined decode
//! failure answered with `unknown_action` — never arbitrary object
//! reconstruction from untrusted bytes.

pub mod client;
pub mod dispatcher;
pub mod protocol;
