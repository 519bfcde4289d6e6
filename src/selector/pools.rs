// src/selector/pools.rs
use super::SelectorError;
use crate::dhcp::DhcpServer;
use parking_lot::{RwLock, RwLockReadGuard};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// An immutable, shareable server list. Replacing a pool swaps the `Arc`.
pub type ServerList = Arc<[Arc<DhcpServer>]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Stable,
    Canary,
}

impl PoolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolKind::Stable => "stable",
            PoolKind::Canary => "canary",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage of the hash space routed to the canary pool, checked to be
/// within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct CanaryRatio(u32);

impl CanaryRatio {
    pub const MAX: u32 = 100;

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for CanaryRatio {
    type Error = SelectorError;

    fn try_from(ratio: u32) -> Result<Self, Self::Error> {
        if ratio > Self::MAX {
            return Err(SelectorError::InvalidRatio(ratio));
        }
        Ok(Self(ratio))
    }
}

#[derive(Debug, Clone)]
pub struct PoolLists {
    pub stable: ServerList,
    pub canary: ServerList,
}

impl PoolLists {
    pub fn get(&self, kind: PoolKind) -> &ServerList {
        match kind {
            PoolKind::Stable => &self.stable,
            PoolKind::Canary => &self.canary,
        }
    }

    fn get_mut(&mut self, kind: PoolKind) -> &mut ServerList {
        match kind {
            PoolKind::Stable => &mut self.stable,
            PoolKind::Canary => &mut self.canary,
        }
    }
}

impl Default for PoolLists {
    fn default() -> Self {
        Self {
            stable: Arc::from(Vec::new()),
            canary: Arc::from(Vec::new()),
        }
    }
}

/// Mutable selection state: two server lists behind one reader/writer lock
/// and a canary ratio that never touches that lock.
#[derive(Debug, Default)]
pub struct ServerPools {
    lists: RwLock<PoolLists>,
    canary_ratio: AtomicU32,
}

impl ServerPools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared access for selections. Hold it only for the lookup.
    pub fn read(&self) -> RwLockReadGuard<'_, PoolLists> {
        self.lists.read()
    }

    /// Cloned handles to both current lists.
    pub fn snapshot(&self) -> PoolLists {
        self.lists.read().clone()
    }

    /// Publishes `servers` as the new `kind` list and returns it.
    ///
    /// The slice is built before the write lock is taken, and the previous
    /// list is dropped after it is released, so the critical section is a
    /// pointer swap.
    pub fn replace(&self, kind: PoolKind, servers: Vec<Arc<DhcpServer>>) -> ServerList {
        let list: ServerList = Arc::from(servers);
        let previous = {
            let mut lists = self.lists.write();
            std::mem::replace(lists.get_mut(kind), list.clone())
        };
        drop(previous);
        list
    }

    pub fn canary_ratio(&self) -> u32 {
        self.canary_ratio.load(Ordering::Acquire)
    }

    pub fn set_canary_ratio(&self, ratio: u32) {
        self.canary_ratio.store(ratio, Ordering::Release);
    }
}
