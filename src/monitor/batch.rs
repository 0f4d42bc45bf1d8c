//! Rate-limited batch fetching of funding rates.

use crate::config::ScanConfig;
use crate::exchange::{FundingRateSample, MarketDataSource};
use futures_util::future::join_all;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches funding rates for a symbol list in fixed-size batches.
///
/// Symbols of one batch are fetched concurrently; batches run strictly one
/// after another with a fixed pause after each, the last included.
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    batch_size: usize,
    delay: Duration,
}

impl BatchScheduler {
    /// `batch_size` is clamped to at least 1.
    pub fn new(batch_size: usize, delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            delay,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.batch_size, config.batch_delay())
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Contiguous batches of at most `batch_size` symbols, in input order.
    pub fn partition<'a>(&self, symbols: &'a [String]) -> impl Iterator<Item = &'a [String]> {
        symbols.chunks(self.batch_size)
    }

    pub fn batch_count(&self, symbol_count: usize) -> usize {
        symbol_count.div_ceil(self.batch_size)
    }

    /// Fetch one sample per symbol. The result has the same length and order
    /// as `symbols`.
    pub async fn fetch_all<S>(&self, source: &S, symbols: &[String]) -> Vec<FundingRateSample>
    where
        S: MarketDataSource + ?Sized,
    {
        let total = self.batch_count(symbols.len());
        let mut samples = Vec::with_capacity(symbols.len());

        for (index, batch) in self.partition(symbols).enumerate() {
            let results = join_all(batch.iter().map(|symbol| fetch_sample(source, symbol))).await;
            let failed = results.iter().filter(|s| !s.is_present()).count();
            debug!(
                batch = index + 1,
                total,
                size = batch.len(),
                failed,
                "Batch fetched"
            );
            samples.extend(results);

            tokio::time::sleep(self.delay).await;
        }

        samples
    }
}

/// Fetch one symbol's rate, degrading any failure to an absent sample.
pub async fn fetch_sample<S>(source: &S, symbol: &str) -> FundingRateSample
where
    S: MarketDataSource + ?Sized,
{
    match source.funding_rate_pct(symbol).await {
        Ok(rate) => FundingRateSample::present(symbol, rate),
        Err(e) => {
            warn!(symbol, "Funding rate unavailable: {:#}", e);
            FundingRateSample::absent(symbol)
        }
    }
}
