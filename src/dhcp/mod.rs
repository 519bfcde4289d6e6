// src/dhcp/mod.rs
mod message;
mod server;

pub use message::DhcpMessage;
pub use server::DhcpServer;
