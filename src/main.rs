//! Funding Rate Monitor - Main Entry Point
//!
//! Polls Bitget funding rates every few minutes and posts symbols beyond the
//! threshold to Telegram.

use anyhow::Result;
use clap::Parser;
use funding_rate_monitor::config::Config;
use funding_rate_monitor::exchange::BitgetClient;
use funding_rate_monitor::logging;
use funding_rate_monitor::monitor::Monitor;
use funding_rate_monitor::notify::TelegramNotifier;
use tracing::{error, info};

/// Funding Rate Monitor CLI
#[derive(Parser)]
#[command(name = "funding-rate-monitor")]
#[command(version, about = "Bitget funding rate alerts delivered to Telegram")]
struct Cli {
    /// Run a single cycle and exit instead of polling forever
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    let _log_guard = logging::init(&config.logging)?;

    info!("╔════════════════════════════════════════════════════════════╗");
    info!(
        "║           Funding Rate Monitor v{}                      ║",
        env!("CARGO_PKG_VERSION")
    );
    info!("╚════════════════════════════════════════════════════════════╝");

    if let Err(e) = config.validate() {
        error!("❌ Invalid configuration: {:#}", e);
        return Err(e);
    }
    log_config(&config);

    let client = BitgetClient::new(&config.exchange)?;
    let notifier = TelegramNotifier::new(&config.telegram);
    let monitor = Monitor::new(client, notifier, config.scan.clone());

    if cli.once {
        let report = monitor.run_cycle().await;
        info!("Single cycle finished: {:?}", report);
        return Ok(());
    }

    info!("🚀 Starting monitor loop...");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    tokio::select! {
        _ = monitor.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Shutdown signal received");
        }
    }

    Ok(())
}

/// Log configuration on startup.
fn log_config(config: &Config) {
    info!("📋 Configuration:");
    info!("   Exchange: {} ({})", config.exchange.base_url, config.exchange.product_type);
    info!("   Threshold: ±{}%", config.scan.threshold_pct);
    info!(
        "   Batches: {} symbols, {}ms pause",
        config.scan.batch_size, config.scan.batch_delay_ms
    );
    info!(
        "   Interval: {}s (listing backoff {}s)",
        config.scan.interval_secs, config.scan.listing_backoff_secs
    );
    info!(
        "   Telegram: chat {}, token {}",
        if config.telegram.chat_id.is_empty() {
            "<unset>"
        } else {
            config.telegram.chat_id.as_str()
        },
        if config.telegram.bot_token.is_empty() {
            "<unset>"
        } else {
            "<set>"
        }
    );
    info!(
        "   Logs: {}/ (filter \"{}\", json {})",
        config.logging.dir, config.logging.filter, config.logging.json
    );
}
