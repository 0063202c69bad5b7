//! # CLI Module
//!
//! Command implementations behind the `statboard` binary:
//!
//! - [`serve`] - runs the HTTP server until it fails or the process is stopped
//! - [`login`] - opens the server's login endpoint in the default browser so
//!   the Spotify account can be connected
//!
//! Both commands receive a fully loaded [`Config`]. Fatal problems are
//! reported through the crate's `error!` macro, which exits the process.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::{config::Config, error, info, server, warning};

pub async fn serve(mut config: Config, addr: Option<String>) {
    if let Some(addr) = addr {
        config.server.addr = addr;
    }

    info!(
        "Serving Spotify account `{}` (refresh policy: {:?})",
        config.spotify.account_id, config.spotify.refresh_policy
    );

    if let Err(e) = server::start_api_server(&config).await {
        error!("Server stopped. Err: {}", e);
    }
}

/// The server has to be running for the consent redirect to come back.
pub async fn login(config: Config) {
    let url = login_url(&config.server.addr);

    info!("Opening {}", url);
    if webbrowser::open(&url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        )
    }
}

/// Login endpoint as reachable from this machine. A wildcard bind address
/// (`0.0.0.0`, `[::]`) is swapped for the matching loopback address.
pub fn login_url(server_addr: &str) -> String {
    let host = match server_addr.parse::<SocketAddr>() {
        Ok(mut addr) if addr.ip().is_unspecified() => {
            let loopback = match addr.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            };
            addr.set_ip(loopback);
            addr.to_string()
        }
        _ => server_addr.to_string(),
    };
    format!("http://{host}/api/v1/auth/login")
}
