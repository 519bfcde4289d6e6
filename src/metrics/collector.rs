// src/metrics/collector.rs
use crate::config::Config;
use crate::dhcp::DhcpServer;
use crate::selector::{PoolKind, SelectorError};
use anyhow::Result;
use prometheus::{Encoder, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    pub selections_total: IntCounterVec,
    pub selection_errors_total: IntCounterVec,
    pub pool_servers: IntGaugeVec,
    pub canary_ratio: IntGauge,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let selections_total = IntCounterVec::new(
            Opts::new("dhcplb_selections_total", "Successful server selections"),
            &["pool"],
        )?;
        registry.register(Box::new(selections_total.clone()))?;

        let selection_errors_total = IntCounterVec::new(
            Opts::new("dhcplb_selection_errors_total", "Failed server selections"),
            &["pool"],
        )?;
        registry.register(Box::new(selection_errors_total.clone()))?;

        let pool_servers = IntGaugeVec::new(
            Opts::new("dhcplb_pool_servers", "Servers in each pool"),
            &["pool"],
        )?;
        registry.register(Box::new(pool_servers.clone()))?;

        let canary_ratio = IntGauge::new(
            "dhcplb_canary_ratio",
            "Percentage of hash space routed to the canary pool",
        )?;
        registry.register(Box::new(canary_ratio.clone()))?;

        Ok(Self {
            selections_total,
            selection_errors_total,
            pool_servers,
            canary_ratio,
        })
    }

    pub fn record_selection(&self, pool: PoolKind) {
        self.selections_total
            .with_label_values(&[pool.as_str()])
            .inc();
    }

    pub fn record_selection_error(&self, error: &SelectorError) {
        let pool = match error {
            SelectorError::EmptyPool(pool) => pool.as_str(),
            _ => "none",
        };
        self.selection_errors_total
            .with_label_values(&[pool])
            .inc();
    }

    /// Counts the outcome of one `ServerSelector::route` call.
    pub fn record_route(
        &self,
        result: &std::result::Result<(PoolKind, Arc<DhcpServer>), SelectorError>,
    ) {
        match result {
            Ok((pool, _)) => self.record_selection(*pool),
            Err(e) => self.record_selection_error(e),
        }
    }

    pub fn record_config(&self, config: &Config) {
        self.pool_servers
            .with_label_values(&[PoolKind::Stable.as_str()])
            .set(config.stable_servers.len() as i64);
        self.pool_servers
            .with_label_values(&[PoolKind::Canary.as_str()])
            .set(config.canary_servers.len() as i64);
        self.canary_ratio.set(i64::from(config.canary_ratio));
    }
}
