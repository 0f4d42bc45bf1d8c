//! # Funding Rate Monitor
//!
//! Polls Bitget USDT-margined perpetual funding rates on a fixed cadence and
//! pushes a threshold report to a Telegram chat.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading and validation
//! - `exchange`: Bitget public market data client (symbol listing, funding rates)
//! - `notify`: Telegram delivery of rendered reports
//! - `monitor`: Batch scheduling, report rendering and the polling state machine
//! - `utils`: Shared decimal helpers
//! - `logging`: Subscriber setup for stdout and the rolling log file

pub mod config;
pub mod exchange;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod utils;

pub use config::Config;
