//! Outbound peer RPC.
//!
//! Implements the caller's half of the one-request-per-connection protocol:
//! connect, write one JSON request, half-close, read the response until EOF.
//! Every network step is bounded by the configured connect timeout so an
//! unreachable peer can never block a worker indefinitely; nothing here
//! retries.

use crate::server::protocol::{Request, Response};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Sends `request` to `addr` and waits for the single response.
pub async fn send_request(
    addr: SocketAddr,
    request: &Request,
    net_timeout: Duration,
) -> Result<Response> {
    let mut stream = timeout(net_timeout, TcpStream::connect(addr))
        .await
        .with_context(|| format!("connect to {} timed out", addr))?
        .with_context(|| format!("connect to {} failed", addr))?;

    let payload = serde_json::to_vec(request)?;
    timeout(net_timeout, async {
        stream.write_all(&payload).await?;
        // Half-close so the server sees EOF and knows the request is complete.
        stream.shutdown().await
    })
    .await
    .with_context(|| format!("write to {} timed out", addr))??;

    let mut buf = Vec::new();
    timeout(net_timeout, stream.read_to_end(&mut buf))
        .await
        .with_context(|| format!("read from {} timed out", addr))??;

    let response =
        serde_json::from_slice(&buf).with_context(|| format!("invalid response from {}", addr))?;
    Ok(response)
}

/// Sends `request` without waiting for any response. Used for heartbeats.
pub async fn send_oneway(addr: SocketAddr, request: &Request, net_timeout: Duration) -> Result<()> {
    let mut stream = timeout(net_timeout, TcpStream::connect(addr))
        .await
        .with_context(|| format!("connect to {} timed out", addr))?
        .with_context(|| format!("connect to {} failed", addr))?;

    let payload = serde_json::to_vec(request)?;
    timeout(net_timeout, async {
        stream.write_all(&payload).await?;
        stream.shutdown().await
    })
    .await
    .with_context(|| format!("write to {} timed out", addr))??;
    Ok(())
}

/// Client-front-end variant of [`send_request`]: a transport failure becomes
/// a local `connection_failed` status instead of an error, matching what
/// interactive callers expect. Never retries.
pub async fn send_request_or_status(
    addr: SocketAddr,
    request: &Request,
    net_timeout: Duration,
) -> Response {
    match send_request(addr, request, net_timeout).await {
        Ok(response) => response,
        Err(e) => Response::ConnectionFailed {
            reason: e.to_string(),
        },
    }
}
