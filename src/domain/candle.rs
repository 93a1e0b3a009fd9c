use chrono::NaiveDateTime;

#[derive(Debug, PartialEq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// One closed OHLC bucket. Once appended to history it is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    /// Running bucket index (not wall-clock time).
    pub time: u64,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    /// Timestamp of the last feed record folded into this bucket. `None` for synthetic ticks.
    pub source_ts: Option<NaiveDateTime>,
}

/// Read-only OHLC view shared by closed candles and the bucket still forming.
pub trait Ohlc {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;

    fn get_type(&self) -> CandleType {
        if self.close() >= self.open() {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    // Returns the low and high of the candle body as a tuple
    fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open(), self.close()),
            CandleType::Bearish => (self.close(), self.open()),
        }
    }

    /// low <= min(open, close) <= max(open, close) <= high
    fn is_well_formed(&self) -> bool {
        let (body_low, body_high) = self.body_range();
        self.low() <= body_low && body_high <= self.high()
    }
}

impl Ohlc for Candle {
    fn open(&self) -> f64 {
        self.open
    }
    fn high(&self) -> f64 {
        self.high
    }
    fn low(&self) -> f64 {
        self.low
    }
    fn close(&self) -> f64 {
        self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            time: 0,
            open,
            high,
            low,
            close,
            source_ts: None,
        }
    }

    #[test]
    fn test_body_range_follows_direction() {
        let up = candle(10.0, 15.0, 5.0, 12.0);
        assert_eq!(up.get_type(), CandleType::Bullish);
        assert_eq!(up.body_range(), (10.0, 12.0));

        let down = candle(12.0, 15.0, 5.0, 10.0);
        assert_eq!(down.get_type(), CandleType::Bearish);
        assert_eq!(down.body_range(), (10.0, 12.0));
    }

    #[test]
    fn test_well_formed_rejects_wick_inside_body() {
        assert!(candle(10.0, 15.0, 5.0, 12.0).is_well_formed());
        assert!(candle(7.0, 7.0, 7.0, 7.0).is_well_formed());
        assert!(!candle(10.0, 11.0, 5.0, 12.0).is_well_formed());
        assert!(!candle(10.0, 15.0, 11.0, 12.0).is_well_formed());
    }
}
