use std::time::Duration;

/// Remote quote API (Twelve Data `time_series`) settings.
pub struct QuotesConfig {
    pub base_url: &'static str,
    /// Bar width requested from the API. Also the cadence we poll at.
    pub interval: &'static str,
    pub default_symbol: &'static str,
    /// Env var read when `--api-key` is not given on the command line.
    pub api_key_env: &'static str,
    pub poll_interval: Duration,
    /// Upper bound on a single fetch before the worker gives up on it.
    pub request_timeout: Duration,
    pub user_agent: &'static str,
}

pub const QUOTES: QuotesConfig = QuotesConfig {
    base_url: "https://api.twelvedata.com/time_series",
    interval: "1min",
    default_symbol: "AAPL",
    api_key_env: "TWELVE_DATA_API_KEY",
    poll_interval: Duration::from_secs(60),
    request_timeout: Duration::from_secs(10),
    user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
};
