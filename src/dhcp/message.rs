// src/dhcp/message.rs
use std::net::Ipv4Addr;

/// The part of an inbound DHCP message that selection looks at.
///
/// Parsing happens upstream; only the relay agent address (giaddr) is kept,
/// as raw bytes so tokens of any length hash the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpMessage {
    giaddr: Vec<u8>,
}

impl DhcpMessage {
    pub fn new(giaddr: impl Into<Vec<u8>>) -> Self {
        Self {
            giaddr: giaddr.into(),
        }
    }

    pub fn from_giaddr(addr: Ipv4Addr) -> Self {
        Self::new(addr.octets().to_vec())
    }

    pub fn giaddr(&self) -> &[u8] {
        &self.giaddr
    }
}
