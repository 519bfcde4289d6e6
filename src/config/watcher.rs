// src/config/watcher.rs
use super::{load_config, Config};
use crate::metrics::MetricsCollector;
use crate::selector::ServerSelector;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Periodically re-reads the config file and republishes pools and ratio.
///
/// A reload that fails to read, parse or validate leaves the selector on
/// its previous state.
pub struct ConfigWatcher {
    path: PathBuf,
    period: Duration,
    selector: Arc<dyn ServerSelector>,
    metrics: Option<Arc<MetricsCollector>>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl ConfigWatcher {
    pub fn new(
        path: impl Into<PathBuf>,
        period: Duration,
        selector: Arc<dyn ServerSelector>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        Self {
            path: path.into(),
            period,
            selector,
            metrics,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub async fn start(self: Arc<Self>) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown_rx = self.shutdown_rx.clone();

        info!(
            "Watching {} for pool changes every {:?}",
            self.path.display(),
            self.period
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.reload().await {
                        warn!("Config reload failed, keeping current pools: {:#}", e);
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Config watcher shutting down");
                        break;
                    }
                }
            }
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Loads the file once and applies it.
    pub async fn reload(&self) -> Result<Config> {
        let config = load_config(&self.path).await?;
        config.apply(self.selector.as_ref());

        if let Some(metrics) = &self.metrics {
            metrics.record_config(&config);
        }

        debug!(
            "Applied config: {} stable, {} canary, ratio {}%",
            config.stable_servers.len(),
            config.canary_servers.len(),
            config.canary_ratio
        );
        Ok(config)
    }
}
