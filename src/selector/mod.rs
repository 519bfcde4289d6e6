// src/selector/mod.rs
mod algorithm;
mod error;
mod giaddr;
pub mod hash;
mod pools;

pub use algorithm::ServerSelector; // trait
pub use error::SelectorError;
pub use giaddr::GiaddrModulo;
pub use pools::{CanaryRatio, PoolKind, PoolLists, ServerList, ServerPools};
pub use crate::config::SelectionStrategy;

use std::sync::Arc;

pub fn create_selector(strategy: SelectionStrategy) -> Arc<dyn ServerSelector> {
    match strategy {
        SelectionStrategy::Giaddr => Arc::new(GiaddrModulo::new()),
    }
}
