use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    /// `FYYUR_HOST` (default `0.0.0.0`) and `PORT` (default `5000`).
    pub fn from_env() -> Self {
        Self::from_vars(env::var("FYYUR_HOST").ok(), env::var("PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Self {
        let ip = host
            .and_then(|h| h.parse().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = port.and_then(|p| p.parse().ok()).unwrap_or(5000);
        Self {
            addr: SocketAddr::new(ip, port),
        }
    }
}
