use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::QUOTES;
use crate::data::quote_feed::{FeedError, QuoteBatch, QuoteRequest, parse_time_series};

/// Abstract interface for fetching bars from a quote API.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_time_series(&self, request: &QuoteRequest) -> Result<QuoteBatch, FeedError>;
}

/// Twelve Data `time_series` over HTTPS.
pub struct TwelveDataProvider {
    client: Client,
    base_url: String,
}

impl TwelveDataProvider {
    pub fn new() -> Result<Self, FeedError> {
        Self::with_base_url(QUOTES.base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FeedError> {
        // No client-level timeout: the poller bounds each fetch and can cancel it.
        let client = Client::builder()
            .user_agent(QUOTES.user_agent)
            .build()
            .map_err(|e| FeedError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn query_params(request: &QuoteRequest) -> [(&'static str, &str); 5] {
        [
            ("apikey", request.api_key.as_str()),
            ("interval", request.interval.as_str()),
            ("symbol", request.symbol.as_str()),
            ("timezone", "exchange"),
            ("format", "JSON"),
        ]
    }
}

#[async_trait]
impl QuoteProvider for TwelveDataProvider {
    async fn fetch_time_series(&self, request: &QuoteRequest) -> Result<QuoteBatch, FeedError> {
        if request.api_key.trim().is_empty() {
            return Err(FeedError::MissingApiKey);
        }

        // without_url(): reqwest errors embed the full URL, api key included
        let response = self
            .client
            .get(&self.base_url)
            .query(&Self::query_params(request))
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Transport(e.without_url().to_string()))?;

        parse_time_series(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_carry_request_fields() {
        let req = QuoteRequest {
            symbol: "MSFT".into(),
            interval: "1min".into(),
            api_key: "k".into(),
        };
        let params = TwelveDataProvider::query_params(&req);
        assert!(params.contains(&("symbol", "MSFT")));
        assert!(params.contains(&("interval", "1min")));
        assert!(params.contains(&("apikey", "k")));
        assert!(params.contains(&("timezone", "exchange")));
    }

    #[tokio::test]
    async fn test_blank_key_short_circuits() {
        let provider = TwelveDataProvider::with_base_url("http://127.0.0.1:9").unwrap();
        let req = QuoteRequest {
            symbol: "MSFT".into(),
            interval: "1min".into(),
            api_key: "  ".into(),
        };
        assert_eq!(
            provider.fetch_time_series(&req).await,
            Err(FeedError::MissingApiKey)
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_error_hides_key() {
        // port 9 (discard) on loopback: nothing listens there in a test sandbox
        let provider = TwelveDataProvider::with_base_url("http://127.0.0.1:9/time_series").unwrap();
        let req = QuoteRequest {
            symbol: "MSFT".into(),
            interval: "1min".into(),
            api_key: "secret".into(),
        };
        match provider.fetch_time_series(&req).await {
            Err(FeedError::Transport(msg)) => assert!(!msg.contains("secret")),
            // an HTTP proxy in the environment may answer instead
            Err(FeedError::Status(_)) => {}
            other => panic!("expected a failed fetch, got {:?}", other),
        }
    }
}
