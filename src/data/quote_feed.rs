use std::{error::Error, fmt, time::Duration};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::Sample;

const INTRADAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DAILY_FORMAT: &str = "%Y-%m-%d";

/// What to ask the quote API for.
#[derive(Clone, PartialEq)]
pub struct QuoteRequest {
    pub symbol: String,
    pub interval: String,
    pub api_key: String,
}

// Hand-written so the key never ends up in a log line.
impl fmt::Debug for QuoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteRequest")
            .field("symbol", &self.symbol)
            .field("interval", &self.interval)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// One bar from the `values` array.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    pub datetime: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl From<QuoteRecord> for Sample {
    fn from(r: QuoteRecord) -> Self {
        Sample::bar(r.open, r.high, r.low, r.close, r.datetime)
    }
}

/// Parsed poll result: valid records oldest first, plus how many were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteBatch {
    pub records: Vec<QuoteRecord>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    MissingApiKey,
    Transport(String),
    Status(u16),
    /// The API answered 200 but with `"status": "error"`.
    Api { code: i64, message: String },
    Parse(String),
    Timeout(Duration),
    Worker(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeedError::MissingApiKey => write!(f, "No API key configured"),
            FeedError::Transport(msg) => write!(f, "Request failed: {}", msg),
            FeedError::Status(code) => write!(f, "HTTP error: {}", code),
            FeedError::Api { code, message } => write!(f, "API error {}: {}", code, message),
            FeedError::Parse(msg) => write!(f, "Malformed response: {}", msg),
            FeedError::Timeout(limit) => {
                write!(f, "Request timed out after {:.1}s", limit.as_secs_f64())
            }
            FeedError::Worker(msg) => write!(f, "Quote worker unavailable: {}", msg),
        }
    }
}

impl Error for FeedError {}

#[derive(Deserialize)]
struct TimeSeriesEnvelope {
    status: Option<String>,
    code: Option<i64>,
    message: Option<String>,
    // Kept as raw values so one bad record can't fail the whole document.
    values: Option<Vec<Value>>,
}

/// Parse a `time_series` response body.
///
/// Envelope problems (bad JSON, error payload, no `values`) fail the whole batch.
/// Individual records that don't parse are counted in `skipped` and left out.
pub fn parse_time_series(body: &str) -> Result<QuoteBatch, FeedError> {
    let envelope: TimeSeriesEnvelope =
        serde_json::from_str(body).map_err(|e| FeedError::Parse(e.to_string()))?;

    if envelope.status.as_deref() == Some("error") {
        return Err(FeedError::Api {
            code: envelope.code.unwrap_or_default(),
            message: envelope.message.unwrap_or_default(),
        });
    }

    let values = envelope
        .values
        .ok_or_else(|| FeedError::Parse("response has no `values` array".to_string()))?;

    let mut batch = QuoteBatch::default();
    for (idx, value) in values.iter().enumerate() {
        match parse_record(value) {
            Ok(record) => batch.records.push(record),
            Err(reason) => {
                log::warn!("Skipping quote record #{}: {}", idx, reason);
                batch.skipped += 1;
            }
        }
    }

    // The API lists newest first. Stable sort keeps equal timestamps in arrival order
    // so the dedup check sees the first one.
    batch.records.sort_by_key(|r| r.datetime);
    Ok(batch)
}

fn parse_record(value: &Value) -> Result<QuoteRecord, String> {
    let datetime_str = value["datetime"]
        .as_str()
        .ok_or_else(|| "missing datetime".to_string())?;
    let datetime = parse_datetime(datetime_str)?;

    let open = price_field(value, "open")?;
    let high = price_field(value, "high")?;
    let low = price_field(value, "low")?;
    let close = price_field(value, "close")?;

    if low > open.min(close) || open.max(close) > high {
        return Err(format!(
            "inconsistent bar o={} h={} l={} c={}",
            open, high, low, close
        ));
    }

    Ok(QuoteRecord {
        datetime,
        open,
        high,
        low,
        close,
    })
}

fn price_field(value: &Value, key: &str) -> Result<f64, String> {
    let raw = value[key]
        .as_str()
        .ok_or_else(|| format!("missing {}", key))?;
    let price = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("non-numeric {} {:?}", key, raw))?;
    if !price.is_finite() {
        return Err(format!("non-finite {} {:?}", key, raw));
    }
    Ok(price)
}

/// Accepts `YYYY-MM-DD HH:MM:SS` (intraday) and `YYYY-MM-DD` (daily and up).
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, INTRADAY_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DAILY_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| format!("bad datetime {:?}", raw))
}
