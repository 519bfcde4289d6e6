// src/config/models.rs
use crate::dhcp::DhcpServer;
use crate::selector::{CanaryRatio, ServerSelector};
use anyhow::{bail, Result};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub strategy: SelectionStrategy,

    #[serde(default)]
    pub canary_ratio: u32,

    #[serde(default)]
    pub stable_servers: Vec<DhcpServer>,

    #[serde(default)]
    pub canary_servers: Vec<DhcpServer>,

    #[serde(default = "default_reload_interval")]
    pub reload_interval_secs: u64,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// Print the gathered prometheus text when the binary finishes.
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    #[default]
    Giaddr,
}

fn default_reload_interval() -> u64 {
    30
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        CanaryRatio::try_from(self.canary_ratio)?;

        if self.reload_interval_secs == 0 {
            bail!("reload_interval_secs must be greater than zero");
        }

        for warning in self.warnings() {
            tracing::warn!("{}", warning);
        }

        Ok(())
    }

    /// Valid but lossy setups: a pool the ratio can route to has no servers.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.stable_servers.is_empty() && self.canary_ratio < CanaryRatio::MAX {
            warnings.push(
                "No stable servers configured; stable selections will fail until one is added"
                    .to_string(),
            );
        }

        if self.canary_servers.is_empty() && self.canary_ratio > 0 {
            warnings.push(format!(
                "canary_ratio is {}% but no canary servers are configured; those selections will fail",
                self.canary_ratio
            ));
        }

        warnings
    }

    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_secs)
    }

    /// Pushes both server lists and the canary ratio into `selector`.
    ///
    /// A lowered ratio is published before the lists and a raised one after,
    /// so traffic is never steered toward a canary list that is not there yet.
    pub fn apply(&self, selector: &dyn ServerSelector) {
        let lowering = self.canary_ratio < selector.canary_ratio();
        if lowering {
            selector.set_canary_ratio(self.canary_ratio);
        }

        selector.update_stable_servers(shared(&self.stable_servers));
        selector.update_canary_servers(shared(&self.canary_servers));

        if !lowering && self.canary_ratio != selector.canary_ratio() {
            selector.set_canary_ratio(self.canary_ratio);
        }
    }
}

fn shared(servers: &[DhcpServer]) -> Vec<Arc<DhcpServer>> {
    servers.iter().cloned().map(Arc::new).collect()
}
