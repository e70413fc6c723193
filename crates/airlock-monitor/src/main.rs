//! # airlock-monitor
//!
//! Terminal monitor for an Airlock appliance status feed. Connects with a
//! bearer token, logs every observed state change, and prints a periodic
//! tunnel-table snapshot — the console dashboard, minus the dashboard.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use airlock_core::InterfaceStats;
use airlock_settings::{ConsoleSettings, load_settings, load_settings_from_path};
use airlock_sync::{
    Collaborators, ConfigStore, CredentialSource, FeedConfig, InterfaceStatsSink, StatusFeed,
};
use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Airlock status feed monitor.
#[derive(Parser, Debug)]
#[command(name = "airlock-monitor", about = "Follow an Airlock appliance status feed")]
struct Cli {
    /// Appliance host (and optional port). Overrides settings.
    #[arg(long)]
    host: Option<String>,

    /// Connect with `ws://` instead of `wss://`.
    #[arg(long)]
    insecure: bool,

    /// Bearer token for the feed.
    #[arg(long, env = "AIRLOCK_TOKEN")]
    token: Option<String>,

    /// Feed endpoint path. Overrides settings.
    #[arg(long)]
    path: Option<String>,

    /// Settings file to load instead of `~/.airlock/settings.json`.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Seconds between tunnel-table snapshot logs.
    #[arg(long, default_value = "30")]
    snapshot_interval_secs: u64,
}

/// Fixed token handed over on the command line or environment.
struct StaticToken(String);

impl CredentialSource for StaticToken {
    fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Stand-in for a CRUD store: logs the invalidation instead of re-fetching.
struct LoggingStore(&'static str);

impl ConfigStore for LoggingStore {
    fn refresh(&self) {
        info!(store = self.0, "configuration changed on the appliance");
    }
}

/// Stand-in for the interface-stats table: logs each snapshot.
struct LoggingSink;

impl InterfaceStatsSink for LoggingSink {
    fn update(&self, stats: InterfaceStats) {
        info!(
            interface = %stats.interface,
            rx_bytes = stats.rx_bytes,
            tx_bytes = stats.tx_bytes,
            rx_packets = stats.rx_packets,
            tx_packets = stats.tx_packets,
            rx_errors = stats.rx_errors,
            tx_errors = stats.tx_errors,
            "interface counters updated"
        );
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn resolve_config(cli: &Cli, settings: &ConsoleSettings) -> FeedConfig {
    let mut config = FeedConfig::from_settings(settings);
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(path) = &cli.path {
        config.path = path.clone();
    }
    if cli.insecure {
        config.secure = false;
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => load_settings().context("loading settings")?,
    };
    init_logging(&settings.logging.level);

    let Some(token) = cli.token.clone() else {
        bail!("an access token is required (--token or AIRLOCK_TOKEN)");
    };

    let config = resolve_config(&cli, &settings);
    let collaborators = Collaborators {
        auth: Arc::new(StaticToken(token)),
        peers: Arc::new(LoggingStore("peers")),
        routes: Arc::new(LoggingStore("routes")),
        interfaces: Arc::new(LoggingStore("interfaces")),
        interface_stats: Arc::new(LoggingSink),
    };

    let feed = StatusFeed::new(config, &collaborators);
    feed.connect();
    info!("monitor started, press Ctrl-C to stop");

    let mut snapshot_tick =
        tokio::time::interval(Duration::from_secs(cli.snapshot_interval_secs.max(1)));
    // The first tick fires immediately; skip it so the feed has a chance
    // to populate the table.
    let _ = snapshot_tick.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = snapshot_tick.tick() => {
                let tunnels = feed.tunnels();
                info!(
                    connected = feed.is_connected(),
                    reconnect_attempts = feed.reconnect_attempts(),
                    peers = tunnels.len(),
                    "tunnel table snapshot"
                );
                for record in tunnels.snapshot() {
                    info!(
                        peer_id = record.peer_id,
                        peer = %record.peer_name,
                        status = record.status.as_str(),
                        bytes_in = record.bytes_in,
                        bytes_out = record.bytes_out,
                        passing_traffic = record.is_passing_traffic,
                        "tunnel"
                    );
                }
            }
        }
    }

    feed.disconnect();
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn static_token_always_present() {
        let source = StaticToken("tok".to_string());
        assert_eq!(source.access_token().as_deref(), Some("tok"));
    }

    #[test]
    fn cli_overrides_win_over_settings() {
        let cli = Cli::parse_from([
            "airlock-monitor",
            "--host",
            "10.9.9.9:8443",
            "--insecure",
            "--path",
            "/feed",
            "--token",
            "t",
        ]);
        let config = resolve_config(&cli, &ConsoleSettings::default());
        assert_eq!(config.host, "10.9.9.9:8443");
        assert_eq!(config.path, "/feed");
        assert!(!config.secure);
    }

    #[test]
    fn settings_used_when_cli_silent() {
        let cli = Cli::parse_from(["airlock-monitor", "--token", "t"]);
        let config = resolve_config(&cli, &ConsoleSettings::default());
        assert_eq!(config.host, "127.0.0.1:8443");
        assert_eq!(config.path, "/api/v1/ws");
        assert!(config.secure);
    }
}
