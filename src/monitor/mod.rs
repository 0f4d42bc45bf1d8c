//! The polling loop.
//!
//! Each cycle walks a small state machine:
//!
//! ```text
//! Listing ──(no symbols)──────────────────────────────┐
//!    │                                                 ▼
//!    └─> Fetching ─> Formatting ─> Notifying ─> Sleeping ─> Listing ...
//! ```
//!
//! Transitions between states are pure functions of what the previous state
//! produced; the network calls and the pacing live in [`Monitor::step`].
//! Nothing survives from one cycle to the next.

mod batch;
mod report;

pub use batch::{fetch_sample, BatchScheduler};
pub use report::{AlertFormatter, NO_MATCH_LINE, REPORT_TITLE};

use crate::config::ScanConfig;
use crate::exchange::{FundingRateSample, MarketDataSource};
use crate::notify::Notifier;
use chrono::Local;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// One state of a monitoring cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleState {
    Listing,
    Fetching { symbols: Vec<String> },
    Formatting { samples: Vec<FundingRateSample> },
    Notifying { message: String },
    Sleeping { duration: Duration },
}

impl CycleState {
    /// Empty listing skips the cycle with the listing backoff.
    pub fn after_listing(symbols: Vec<String>, config: &ScanConfig) -> Self {
        if symbols.is_empty() {
            CycleState::Sleeping {
                duration: config.listing_backoff(),
            }
        } else {
            CycleState::Fetching { symbols }
        }
    }

    pub fn after_fetching(samples: Vec<FundingRateSample>) -> Self {
        CycleState::Formatting { samples }
    }

    pub fn after_formatting(message: String) -> Self {
        CycleState::Notifying { message }
    }

    /// The regular interval applies no matter how long the cycle took.
    pub fn after_notifying(config: &ScanConfig) -> Self {
        CycleState::Sleeping {
            duration: config.interval(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CycleState::Listing => "listing",
            CycleState::Fetching { .. } => "fetching",
            CycleState::Formatting { .. } => "formatting",
            CycleState::Notifying { .. } => "notifying",
            CycleState::Sleeping { .. } => "sleeping",
        }
    }
}

/// What one cycle did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub symbols: usize,
    pub fetched: usize,
    pub failed: usize,
    pub qualifying: usize,
    pub notified: bool,
    pub elapsed: Duration,
    pub next_sleep: Duration,
}

/// Drives the list → fetch → filter → notify cycle forever.
pub struct Monitor<S, N> {
    source: S,
    notifier: N,
    config: ScanConfig,
    scheduler: BatchScheduler,
    formatter: AlertFormatter,
}

impl<S, N> Monitor<S, N>
where
    S: MarketDataSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, config: ScanConfig) -> Self {
        let scheduler = BatchScheduler::from_config(&config);
        let formatter = AlertFormatter::new(config.threshold_pct);
        Self {
            source,
            notifier,
            config,
            scheduler,
            formatter,
        }
    }

    /// Run cycles until the task is dropped.
    pub async fn run(&self) {
        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            info!("🟡 [CYCLE] Starting scan #{}", cycle);

            let report = self.run_cycle().await;
            tokio::time::sleep(report.next_sleep).await;
        }
    }

    /// Run one cycle up to (not including) its sleep.
    pub async fn run_cycle(&self) -> CycleReport {
        let start = Instant::now();
        let mut report = CycleReport::default();
        let mut state = CycleState::Listing;

        loop {
            let from = state.name();
            state = self.step(state, &mut report).await;
            debug!("[CYCLE] {} -> {}", from, state.name());
            if let CycleState::Sleeping { duration } = state {
                report.next_sleep = duration;
                break;
            }
        }

        report.elapsed = start.elapsed();
        if report.notified {
            info!(
                symbols = report.symbols,
                fetched = report.fetched,
                failed = report.failed,
                qualifying = report.qualifying,
                "📤 [CYCLE] Report sent in {:.2}s, sleeping {}s",
                report.elapsed.as_secs_f64(),
                report.next_sleep.as_secs()
            );
        } else {
            warn!(
                "⏸️  [CYCLE] No symbols listed, retrying in {}s",
                report.next_sleep.as_secs()
            );
        }

        report
    }

    /// Perform the work of `state` and return the next state.
    ///
    /// `Sleeping` is terminal for a cycle and is returned unchanged.
    pub async fn step(&self, state: CycleState, report: &mut CycleReport) -> CycleState {
        match state {
            CycleState::Listing => {
                let symbols = self.list_symbols().await;
                report.symbols = symbols.len();
                CycleState::after_listing(symbols, &self.config)
            }
            CycleState::Fetching { symbols } => {
                info!(
                    "📡 [FETCH] {} symbols in {} batches of up to {}",
                    symbols.len(),
                    self.scheduler.batch_count(symbols.len()),
                    self.scheduler.batch_size()
                );
                let samples = self.scheduler.fetch_all(&self.source, &symbols).await;
                report.fetched = samples.iter().filter(|s| s.is_present()).count();
                report.failed = samples.len() - report.fetched;
                CycleState::after_fetching(samples)
            }
            CycleState::Formatting { samples } => {
                report.qualifying = self.formatter.qualifying(&samples).len();
                info!(
                    "🔎 [FILTER] {} of {} symbols at or beyond ±{}%",
                    report.qualifying,
                    samples.len(),
                    self.formatter.threshold_pct()
                );
                let message = self.formatter.render(&samples, Local::now().time());
                CycleState::after_formatting(message)
            }
            CycleState::Notifying { message } => {
                self.notifier.notify(&message).await;
                report.notified = true;
                CycleState::after_notifying(&self.config)
            }
            sleeping @ CycleState::Sleeping { .. } => sleeping,
        }
    }

    /// Symbol listing that degrades every failure to an empty list.
    async fn list_symbols(&self) -> Vec<String> {
        match self.source.list_symbols().await {
            Ok(symbols) => symbols,
            Err(e) => {
                error!("❌ [LIST] Failed to fetch symbol list: {:#}", e);
                Vec::new()
            }
        }
    }
}
