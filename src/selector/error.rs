// src/selector/error.rs
use super::PoolKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("{0} server list is empty")]
    EmptyPool(PoolKind),

    #[error("Server list is empty")]
    EmptyServerList,

    #[error("Canary ratio {0} is outside 0..=100")]
    InvalidRatio(u32),
}
