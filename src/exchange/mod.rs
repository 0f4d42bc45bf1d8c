//! Exchange integration for funding rate polling.
//!
//! ## Bitget
//! Read-only access to the public USDT-futures market endpoints:
//! - Contract listing (the symbol universe)
//! - Current funding rate per symbol
//!
//! # Funding Rate Notes
//!
//! Bitget reports `fundingRate` as a decimal fraction per funding period
//! (`0.0001` = 0.01%). Everything downstream of [`MarketDataSource`] works in
//! percent; the scaling happens once in the client.

mod client;
mod error;
mod traits;
mod types;

pub use client::BitgetClient;
pub use error::ExchangeError;
#[cfg(test)]
pub use traits::MockMarketDataSource;
pub use traits::MarketDataSource;
pub use types::*;
