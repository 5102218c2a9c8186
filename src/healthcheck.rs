//! `hello-worker --healthcheck`: probe the running server's `/health`.
//!
//! The target is derived from the same config the server binds with, so a
//! container HEALTHCHECK follows a non-default `[server]` section without
//! extra wiring. `HELLO_WORKER_PORT` overrides the port when set.

use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};

use anyhow::Context;

use crate::config::Config;

pub const PORT_OVERRIDE_ENV: &str = "HELLO_WORKER_PORT";

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Resolve the probe target from config and environment, then probe it.
pub async fn run() -> anyhow::Result<bool> {
    let (_, config) = Config::from_env()?;
    let port_override = std::env::var(PORT_OVERRIDE_ENV)
        .ok()
        .and_then(|v| v.parse::<u16>().ok());

    let addr = target(config.socket_addr()?, port_override);
    is_healthy(addr).await
}

/// Map the bind address to something connectable.
///
/// A wildcard bind (`0.0.0.0` / `::`) is reached through loopback of the same
/// family.
pub fn target(bind: SocketAddr, port_override: Option<u16>) -> SocketAddr {
    let ip = match bind.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, port_override.unwrap_or(bind.port()))
}

/// `true` when `GET /health` on `addr` answers 2xx within the timeout.
///
/// Connection failures count as unhealthy, not as errors.
pub async fn is_healthy(addr: SocketAddr) -> anyhow::Result<bool> {
    let client = reqwest::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()
        .context("building healthcheck client")?;

    let url = format!("http://{addr}/health");
    match client.get(&url).send().await {
        Ok(resp) => Ok(resp.status().is_success()),
        Err(e) => {
            tracing::debug!(%url, error = %e, "healthcheck request failed");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Target resolution
    // -----------------------------------------------------------------------

    #[test]
    fn wildcard_v4_maps_to_loopback() {
        let addr = target("0.0.0.0:9000".parse().unwrap(), None);
        assert_eq!(addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn wildcard_v6_maps_to_v6_loopback() {
        let addr = target("[::]:9000".parse().unwrap(), None);
        assert_eq!(addr, "[::1]:9000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn specific_host_is_kept() {
        let addr = target("[::1]:8123".parse().unwrap(), None);
        assert_eq!(addr, "[::1]:8123".parse::<SocketAddr>().unwrap());

        let addr = target("10.1.2.3:8000".parse().unwrap(), None);
        assert_eq!(addr, "10.1.2.3:8000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn port_override_wins_over_config() {
        let addr = target("0.0.0.0:9000".parse().unwrap(), Some(8500));
        assert_eq!(addr, "127.0.0.1:8500".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn configured_port_is_probed_when_no_override() {
        let config: Config = toml::from_str("[server]\nport = 9000\n").unwrap();
        let addr = target(config.socket_addr().unwrap(), None);
        assert_eq!(addr.port(), 9000);
        assert!(addr.ip().is_loopback());
    }

    // -----------------------------------------------------------------------
    // Live probe
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn healthy_server_reports_true() {
        let (addr, tx, handle) = crate::server::tests::spawn_server().await;

        assert!(is_healthy(addr).await.unwrap());

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn wildcard_bound_server_is_reached_through_loopback() {
        let (addr, tx, handle) = crate::server::tests::spawn_server().await;
        let bind = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), addr.port());

        assert!(is_healthy(target(bind, None)).await.unwrap());

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn closed_port_reports_false() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(!is_healthy(addr).await.unwrap());
    }
}
