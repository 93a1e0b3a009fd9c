use chrono::NaiveDateTime;

/// One observation handed to the aggregator.
///
/// A raw tick is the degenerate case where all four prices are equal. A feed record keeps
/// the bar's own OHLC plus the timestamp used for dedup.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub source_ts: Option<NaiveDateTime>,
}

impl Sample {
    pub fn tick(value: f64) -> Self {
        Self {
            open: value,
            high: value,
            low: value,
            close: value,
            source_ts: None,
        }
    }

    pub fn bar(open: f64, high: f64, low: f64, close: f64, source_ts: NaiveDateTime) -> Self {
        Self {
            open,
            high,
            low,
            close,
            source_ts: Some(source_ts),
        }
    }

    /// Latest price carried by the sample.
    pub fn value(&self) -> f64 {
        self.close
    }

    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}
