// src/selector/algorithm.rs
use super::{PoolKind, SelectorError};
use crate::dhcp::{DhcpMessage, DhcpServer};
use std::sync::Arc;

/// A backend selection strategy the dispatcher can swap without caring how
/// the choice is made.
///
/// Implementations own their pool state and must be safe to call from many
/// worker threads while an updater replaces pools or the canary ratio.
pub trait ServerSelector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Picks a server and reports which pool it came from.
    fn route(&self, message: &DhcpMessage) -> Result<(PoolKind, Arc<DhcpServer>), SelectorError>;

    fn select_server(&self, message: &DhcpMessage) -> Result<Arc<DhcpServer>, SelectorError> {
        self.route(message).map(|(_, server)| server)
    }

    /// Applies the strategy's index rule to a caller-supplied list.
    fn select_from_list(
        &self,
        servers: &[Arc<DhcpServer>],
        message: &DhcpMessage,
    ) -> Result<Arc<DhcpServer>, SelectorError>;

    fn update_stable_servers(&self, servers: Vec<Arc<DhcpServer>>);

    fn update_canary_servers(&self, servers: Vec<Arc<DhcpServer>>);

    /// Stores a new canary percentage. Values above 100 are not rejected and
    /// send every message to the canary pool.
    fn set_canary_ratio(&self, ratio: u32);

    fn canary_ratio(&self) -> u32;
}
