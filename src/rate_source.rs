use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::error::FetchError;
use crate::rate::{LatestRates, is_currency_code};

/// Client for the exchangerate-api `latest` endpoint.
pub struct RateSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RateSource {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetches the full rate table for `base`. One request, no retries.
    pub async fn fetch_rates(&self, base: &str) -> Result<LatestRates, FetchError> {
        if !is_currency_code(base) {
            return Err(FetchError::InvalidBase(base.to_string()));
        }

        debug!("Fetching rates from {}", self.get_url(base, "***"));
        let resp = self
            .client
            .get(self.get_url(base, &self.api_key))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let text = resp.text().await?;
        let latest: LatestRates = serde_json::from_str(&text)?;
        debug!(
            "Received {} rates for {}",
            latest.conversion_rates.len(),
            base
        );

        Ok(latest)
    }

    fn get_url(&self, base: &str, api_key: &str) -> String {
        format!("{}/v6/{}/latest/{}", self.base_url, api_key, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"{
        "result": "success",
        "time_last_update_unix": 1700000000,
        "base_code": "EUR",
        "conversion_rates": {"EUR": 1, "USD": 1.08, "GBP": 0.87}
    }"#;

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v6/test-key/latest/EUR"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn source(uri: &str) -> RateSource {
        RateSource::new(uri, "test-key", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_rates() {
        let mock_server = create_mock_server(200, MOCK_JSON).await;

        let latest = source(&mock_server.uri()).fetch_rates("EUR").await.unwrap();

        assert_eq!(latest.time_last_update_unix, 1700000000);
        assert_eq!(latest.conversion_rates.len(), 3);
        assert_eq!(latest.conversion_rates["EUR"], 1.0);
        assert_eq!(latest.conversion_rates["USD"], 1.08);
        assert_eq!(latest.conversion_rates["GBP"], 0.87);
    }

    #[tokio::test]
    async fn test_fetch_rates_server_error() {
        let mock_server = create_mock_server(500, "oops").await;

        let err = source(&mock_server.uri())
            .fetch_rates("EUR")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_fetch_rates_malformed_body() {
        let mock_server = create_mock_server(200, r#"{"result": "success"}"#).await;

        let err = source(&mock_server.uri())
            .fetch_rates("EUR")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_rates_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(MOCK_JSON)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;
        let source =
            RateSource::new(&mock_server.uri(), "test-key", Duration::from_millis(100)).unwrap();

        let err = source.fetch_rates("EUR").await.unwrap_err();

        assert!(matches!(err, FetchError::Request(e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_invalid_base_skips_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let err = source(&mock_server.uri())
            .fetch_rates("EURO")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::InvalidBase(code) if code == "EURO"));
    }
}
