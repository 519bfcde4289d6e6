// src/dhcp/server.rs
use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// A backend DHCP server the dispatcher can forward to.
///
/// Descriptors are built by whoever owns the pool lists and shared as
/// `Arc<DhcpServer>`; selectors only hand them back out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct DhcpServer {
    pub hostname: String,
    pub address: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    67
}

impl DhcpServer {
    pub fn new(hostname: impl Into<String>, address: IpAddr, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            address,
            port,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl fmt::Display for DhcpServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.hostname, self.socket_addr())
    }
}
