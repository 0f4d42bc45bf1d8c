//! Bitget public market data REST client.

use crate::config::ExchangeConfig;
use crate::exchange::error::ExchangeError;
use crate::exchange::traits::MarketDataSource;
use crate::exchange::types::*;
use crate::utils::to_percentage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bitget client for the public USDT-futures market endpoints.
///
/// One `reqwest::Client` (and therefore one connection pool) is shared by
/// every request the client makes, so a whole fetch phase reuses the same
/// session. Timeouts are applied per request.
#[derive(Debug, Clone)]
pub struct BitgetClient {
    http: Client,
    base_url: String,
    product_type: String,
    list_timeout: Duration,
    rate_timeout: Duration,
}

impl BitgetClient {
    /// Create a new Bitget client from configuration.
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            product_type: config.product_type.clone(),
            list_timeout: config.list_timeout(),
            rate_timeout: config.rate_timeout(),
        })
    }

    /// Get all contracts of the configured product type.
    #[instrument(skip(self))]
    pub async fn get_contracts(&self) -> Result<Vec<ContractInfo>> {
        let url = format!(
            "{}/api/v2/mix/market/contracts?productType={}",
            self.base_url,
            urlencoding::encode(&self.product_type)
        );

        let contracts: Vec<ContractInfo> = self
            .get_data(&url, self.list_timeout)
            .await
            .context("Failed to fetch contracts")?;

        debug!("Fetched {} contracts from Bitget", contracts.len());
        Ok(contracts)
    }

    /// Get the current funding rate of one contract as a decimal fraction.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_current_funding_rate(&self, symbol: &str) -> Result<Decimal> {
        let url = format!(
            "{}/api/v2/mix/market/current-fund-rate?symbol={}&productType={}",
            self.base_url,
            urlencoding::encode(symbol),
            urlencoding::encode(&self.product_type)
        );

        let entries: Vec<CurrentFundingRate> = self
            .get_data(&url, self.rate_timeout)
            .await
            .with_context(|| format!("Failed to fetch funding rate for {}", symbol))?;

        entries
            .first()
            .map(|entry| entry.funding_rate)
            .ok_or_else(|| ExchangeError::MissingData(symbol.to_string()).into())
    }

    /// GET `url` and unwrap the `data` array of the Bitget envelope.
    async fn get_data<T: DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<Vec<T>> {
        let response = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .context("Request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExchangeError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .context("Failed to parse response body")?;

        if let Some(code) = envelope.code.as_deref() {
            if code != SUCCESS_CODE {
                return Err(ExchangeError::Api {
                    code: code.to_string(),
                    msg: envelope.msg.unwrap_or_default(),
                }
                .into());
            }
        }

        Ok(envelope.data.unwrap_or_default())
    }
}

#[async_trait]
impl MarketDataSource for BitgetClient {
    async fn list_symbols(&self) -> Result<Vec<String>> {
        let contracts = self.get_contracts().await?;
        Ok(contracts.into_iter().map(|c| c.symbol).collect())
    }

    async fn funding_rate_pct(&self, symbol: &str) -> Result<Decimal> {
        let rate = self.get_current_funding_rate(symbol).await?;
        to_percentage(rate).ok_or_else(|| {
            ExchangeError::RateOutOfRange {
                symbol: symbol.to_string(),
                rate: rate.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::FundingRateSample;
    use crate::monitor::fetch_sample;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BitgetClient {
        let config = ExchangeConfig {
            base_url: server.uri(),
            product_type: "usdt-futures".to_string(),
            list_timeout_secs: 1,
            rate_timeout_secs: 1,
        };
        BitgetClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_list_symbols_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/mix/market/contracts"))
            .and(query_param("productType", "usdt-futures"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "00000",
                "msg": "success",
                "data": [
                    {"symbol": "BTCUSDT"},
                    {"symbol": "ETHUSDT"},
                    {"symbol": "SOLUSDT"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let symbols = client_for(&server).list_symbols().await.unwrap();
        assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
    }

    #[tokio::test]
    async fn test_list_symbols_without_data_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/mix/market/contracts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "00000"})))
            .mount(&server)
            .await;

        let symbols = client_for(&server).list_symbols().await.unwrap();
        assert!(symbols.is_empty());
    }

    #[tokio::test]
    async fn test_list_symbols_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/mix/market/contracts"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_symbols().await.unwrap_err();
        let exchange_err = err.downcast_ref::<ExchangeError>().unwrap();
        assert!(matches!(exchange_err, ExchangeError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_list_symbols_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/mix/market/contracts"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        assert!(client_for(&server).list_symbols().await.is_err());
    }

    #[tokio::test]
    async fn test_funding_rate_scaled_to_percent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/mix/market/current-fund-rate"))
            .and(query_param("symbol", "XYZUSDT"))
            .and(query_param("productType", "usdt-futures"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "00000",
                "msg": "success",
                "data": [{"symbol": "XYZUSDT", "fundingRate": "-0.023"}]
            })))
            .mount(&server)
            .await;

        let rate = client_for(&server).funding_rate_pct("XYZUSDT").await.unwrap();
        assert_eq!(rate, dec!(-2.3));
    }

    #[tokio::test]
    async fn test_funding_rate_empty_data_is_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/mix/market/current-fund-rate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "00000",
                "data": []
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_current_funding_rate("GONEUSDT")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExchangeError>(),
            Some(ExchangeError::MissingData(s)) if s == "GONEUSDT"
        ));
    }

    #[tokio::test]
    async fn test_funding_rate_api_error_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/mix/market/current-fund-rate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "40034",
                "msg": "Parameter does not exist",
                "data": null
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).funding_rate_pct("BADUSDT").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExchangeError>(),
            Some(ExchangeError::Api { code, .. }) if code == "40034"
        ));
    }

    #[tokio::test]
    async fn test_oversized_funding_rate_becomes_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/mix/market/current-fund-rate"))
            .and(query_param("symbol", "HUGEUSDT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "00000",
                "data": [{"symbol": "HUGEUSDT", "fundingRate": "79228162514264337593543950335"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.funding_rate_pct("HUGEUSDT").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExchangeError>(),
            Some(ExchangeError::RateOutOfRange { symbol, .. }) if symbol == "HUGEUSDT"
        ));

        let sample = fetch_sample(&client, "HUGEUSDT").await;
        assert_eq!(sample, FundingRateSample::absent("HUGEUSDT"));
    }

    #[tokio::test]
    async fn test_blank_funding_rate_becomes_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/mix/market/current-fund-rate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "00000",
                "data": [{"symbol": "BLANKUSDT", "fundingRate": ""}]
            })))
            .mount(&server)
            .await;

        let sample = fetch_sample(&client_for(&server), "BLANKUSDT").await;
        assert_eq!(sample, FundingRateSample::absent("BLANKUSDT"));
    }

    #[tokio::test]
    async fn test_funding_rate_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/mix/market/current-fund-rate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": "00000", "data": [{"fundingRate": "0.0001"}]}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        assert!(client_for(&server).funding_rate_pct("SLOWUSDT").await.is_err());
    }
}
