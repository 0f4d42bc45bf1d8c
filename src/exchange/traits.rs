//! Venue-agnostic seam for funding data.
//!
//! The monitor only needs two things from a venue: the list of perpetual
//! symbols and the current funding rate of one symbol. Keeping them behind a
//! trait lets the polling loop be driven by a mock in tests.

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Source of perpetual symbols and their current funding rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// All tradable perpetual symbols, in the venue's listing order.
    async fn list_symbols(&self) -> anyhow::Result<Vec<String>>;

    /// Current funding rate of `symbol`, already scaled to percent.
    async fn funding_rate_pct(&self, symbol: &str) -> anyhow::Result<Decimal>;
}
