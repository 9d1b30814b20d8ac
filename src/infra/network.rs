//! Network infrastructure — implements `ReachabilityProbe` using
//! `spawn_blocking` around a plain connect-with-timeout.

use anyhow::Result;

use crate::application::ports::ReachabilityProbe;

/// Per-attempt connect timeout. Keeps a single hung probe from wedging the
/// reachability poll loop.
const CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(3);

/// Production implementation that performs a real TCP connect.
pub struct TcpReachabilityProbe;

impl ReachabilityProbe for TcpReachabilityProbe {
    async fn probe_tcp(&self, host: &str, port: u16) -> Result<bool> {
        let addr = format!("{host}:{port}");
        let reachable = tokio::task::spawn_blocking(move || {
            use std::net::{TcpStream, ToSocketAddrs};
            // Resolution failure counts as "not reachable yet" — freshly
            // assigned public DNS names take a moment to propagate.
            let Ok(mut addrs) = addr.to_socket_addrs() else {
                return false;
            };
            addrs
                .next()
                .is_some_and(|a| TcpStream::connect_timeout(&a, CONNECT_TIMEOUT).is_ok())
        })
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?;
        Ok(reachable)
    }
}
