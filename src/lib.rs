// src/lib.rs
pub mod config;
pub mod dhcp;
pub mod metrics;
pub mod selector;
