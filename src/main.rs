// src/main.rs
use anyhow::{Context, Result};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use dhcplb_selector::{
    config::{self, ConfigWatcher},
    dhcp::DhcpMessage,
    metrics::MetricsRegistry,
    selector::create_selector,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dhcplb_selector=debug".parse()?),
        )
        .init();

    // dhcplb-selector <config> [giaddr...]
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.yaml".to_string());
    let giaddrs = args
        .map(|arg| {
            arg.parse::<Ipv4Addr>()
                .with_context(|| format!("Invalid giaddr: {}", arg))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    let metrics_registry = MetricsRegistry::new()?;
    let metrics = metrics_registry.collector();

    let selector = create_selector(config.strategy);
    config.apply(selector.as_ref());
    metrics.record_config(&config);
    info!("Using {} selection strategy", selector.name());

    // One-shot lookup mode
    if !giaddrs.is_empty() {
        for giaddr in giaddrs {
            let result = selector.route(&DhcpMessage::from_giaddr(giaddr));
            metrics.record_route(&result);
            match result {
                Ok((pool, server)) => println!("{} -> {} [{}]", giaddr, server, pool),
                Err(e) => println!("{} -> error: {}", giaddr, e),
            }
        }
        if config.metrics.enabled {
            print_metrics(&metrics_registry)?;
        }
        return Ok(());
    }

    let watcher = Arc::new(ConfigWatcher::new(
        &config_path,
        config.reload_interval(),
        selector.clone(),
        Some(metrics),
    ));
    let handle = tokio::spawn(watcher.clone().start());

    shutdown_signal().await?;
    watcher.shutdown();
    handle.await?;

    if config.metrics.enabled {
        print_metrics(&metrics_registry)?;
    }
    Ok(())
}

fn print_metrics(registry: &MetricsRegistry) -> Result<()> {
    print!("{}", String::from_utf8_lossy(&registry.gather()?));
    Ok(())
}

async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => result?,
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    signal::ctrl_c().await?;

    info!("Shutdown signal received");
    Ok(())
}
