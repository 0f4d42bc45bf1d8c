//! Type definitions for Bitget API responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Code Bitget returns in the envelope of every successful call.
pub const SUCCESS_CODE: &str = "00000";

/// Common Bitget response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub code: Option<String>,
    pub msg: Option<String>,
    /// Absent and `null` both mean "no rows"
    pub data: Option<Vec<T>>,
}

/// One perpetual contract from the contracts endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    pub symbol: String,
    #[serde(default)]
    pub base_coin: Option<String>,
    #[serde(default)]
    pub quote_coin: Option<String>,
}

/// Current funding rate entry for a single contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentFundingRate {
    #[serde(default)]
    pub symbol: Option<String>,
    /// Decimal fraction per funding period (0.0001 = 0.01%).
    /// A missing field reads as zero; `null` or a blank string is an error.
    #[serde(default, deserialize_with = "deserialize_decimal_lenient")]
    pub funding_rate: Decimal,
}

/// Funding rate of one symbol for one cycle, in percent.
///
/// `rate_pct` is `None` when the fetch failed; such samples never qualify
/// for the report but still account for the symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingRateSample {
    pub symbol: String,
    pub rate_pct: Option<Decimal>,
}

impl FundingRateSample {
    pub fn present(symbol: impl Into<String>, rate_pct: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            rate_pct: Some(rate_pct),
        }
    }

    pub fn absent(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            rate_pct: None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.rate_pct.is_some()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Str(String),
    Num(serde_json::Number),
}

/// Accepts `"0.0001"`, `0.0001` and `"1E-4"`.
fn deserialize_decimal_lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match RawDecimal::deserialize(deserializer)? {
        RawDecimal::Str(s) => s,
        RawDecimal::Num(n) => n.to_string(),
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(serde::de::Error::custom("empty decimal"));
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(serde::de::Error::custom)
}
