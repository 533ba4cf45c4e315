use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use common::constants::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    /// Reads `CHAIN_SERVER_HOST` and `CHAIN_SERVER_PORT`, after loading `.env`
    /// if one exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("CHAIN_SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());
        let host: IpAddr = host
            .parse()
            .with_context(|| format!("CHAIN_SERVER_HOST must be an IP address, got {:?}", host))?;

        let port = match lookup("CHAIN_SERVER_PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("CHAIN_SERVER_PORT must be a port number, got {:?}", port))?,
            None => DEFAULT_SERVER_PORT,
        };

        Ok(Self { addr: SocketAddr::new(host, port) })
    }
}
