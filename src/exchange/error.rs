//! Exchange error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Bitget HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Bitget API error {code}: {msg}")]
    Api { code: String, msg: String },

    #[error("No funding rate data for {0}")]
    MissingData(String),

    #[error("Funding rate for {symbol} out of range: {rate}")]
    RateOutOfRange { symbol: String, rate: String },
}
