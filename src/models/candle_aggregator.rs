use std::collections::VecDeque;

use chrono::NaiveDateTime;

use crate::config::SIMULATION;
use crate::domain::{Candle, Ohlc, Sample};

#[cfg(debug_assertions)]
use crate::config::DF;

/// How the aggregator buckets, numbers and retains candles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorConfig {
    /// Samples per candle.
    pub bucket_size: usize,
    /// Maximum candles kept in history.
    pub history_cap: usize,
    /// Index given to the first candle emitted.
    pub first_index: u64,
    /// Open each new bucket at the previous bucket's close.
    pub carry_open: bool,
}

impl AggregatorConfig {
    /// Random-walk ticks, one per frame.
    pub const SYNTHETIC: Self = Self {
        bucket_size: SIMULATION.ticks_per_candle,
        history_cap: SIMULATION.history_cap,
        first_index: 0,
        carry_open: true,
    };

    /// Every feed record is already a bar, so it becomes one candle on its own.
    pub const FEED: Self = Self {
        bucket_size: 1,
        history_cap: SIMULATION.history_cap,
        first_index: 1,
        carry_open: false,
    };

    fn sanitized(self) -> Self {
        Self {
            bucket_size: self.bucket_size.max(1),
            history_cap: self.history_cap.max(1),
            ..self
        }
    }
}

/// The bucket currently being filled.
#[derive(Debug, Clone, PartialEq)]
pub struct InProgressCandle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub ticks: usize,
    pub source_ts: Option<NaiveDateTime>,
}

impl InProgressCandle {
    // high/low start from the first sample (and the carried open), never from +/- infinity
    fn start(open: f64, sample: &Sample) -> Self {
        Self {
            open,
            high: sample.high.max(open),
            low: sample.low.min(open),
            close: sample.close,
            ticks: 1,
            source_ts: sample.source_ts,
        }
    }

    fn absorb(&mut self, sample: &Sample) {
        self.high = self.high.max(sample.high);
        self.low = self.low.min(sample.low);
        self.close = sample.close;
        self.ticks += 1;
        if sample.source_ts.is_some() {
            self.source_ts = sample.source_ts;
        }
    }
}

impl Ohlc for InProgressCandle {
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

/// Folds samples into fixed-size OHLC buckets and keeps the most recent ones.
#[derive(Debug, Clone)]
pub struct CandleAggregator {
    config: AggregatorConfig,
    history: VecDeque<Candle>,
    current: Option<InProgressCandle>,
    carried_open: Option<f64>,
    next_index: u64,
    last_key: Option<NaiveDateTime>,
    duplicates_suppressed: usize,
}

impl CandleAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        let config = config.sanitized();
        Self {
            config,
            history: VecDeque::with_capacity(config.history_cap + 1),
            current: None,
            carried_open: None,
            next_index: config.first_index,
            last_key: None,
            duplicates_suppressed: 0,
        }
    }

    pub fn config(&self) -> AggregatorConfig {
        self.config
    }

    /// Finalized candles, oldest first.
    pub fn history(&self) -> &VecDeque<Candle> {
        &self.history
    }

    pub fn in_progress(&self) -> Option<&InProgressCandle> {
        self.current.as_ref()
    }

    /// Most recent price seen, whether or not its bucket has closed.
    pub fn last_close(&self) -> Option<f64> {
        self.current
            .as_ref()
            .map(|c| c.close)
            .or_else(|| self.history.back().map(|c| c.close))
    }

    /// Timestamp of the newest accepted feed sample.
    pub fn last_key(&self) -> Option<NaiveDateTime> {
        self.last_key
    }

    pub fn duplicates_suppressed(&self) -> usize {
        self.duplicates_suppressed
    }

    /// Index the in-progress bucket will get when it closes.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Drop everything, including the dedup key and bucket numbering.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    pub fn reconfigure(&mut self, config: AggregatorConfig) {
        *self = Self::new(config);
    }

    /// Fold one sample in. Returns the candle closed by this sample, if any.
    pub fn ingest(&mut self, sample: Sample) -> Option<Candle> {
        if !sample.is_finite() {
            log::warn!("Dropping non-finite sample {:?}", sample);
            return None;
        }

        if let Some(key) = sample.source_ts {
            if self.last_key.is_some_and(|last| key <= last) {
                self.duplicates_suppressed += 1;
                #[cfg(debug_assertions)]
                if DF.log_dedup {
                    log::info!("Dedup: dropping sample at {} (last accepted {:?})", key, self.last_key);
                }
                return None;
            }
            self.last_key = Some(key);
        }

        if let Some(current) = self.current.as_mut() {
            current.absorb(&sample);
        } else {
            let open = self.carried_open.take().unwrap_or(sample.open);
            self.current = Some(InProgressCandle::start(open, &sample));
        }

        let bucket_full = self
            .current
            .as_ref()
            .is_some_and(|c| c.ticks >= self.config.bucket_size);
        if !bucket_full {
            return None;
        }

        let finished = self.current.take()?;
        if self.config.carry_open {
            self.carried_open = Some(finished.close);
        }

        let candle = Candle {
            time: self.next_index,
            open: finished.open,
            high: finished.high,
            low: finished.low,
            close: finished.close,
            source_ts: finished.source_ts,
        };
        self.next_index += 1;
        debug_assert!(candle.is_well_formed(), "malformed candle {:?}", candle);

        #[cfg(debug_assertions)]
        if DF.log_candle_close {
            log::info!("Candle #{} closed: {:?}", candle.time, candle);
        }

        self.history.push_back(candle.clone());
        self.trim();
        Some(candle)
    }

    /// Ingest in order. Returns how many candles were emitted.
    pub fn ingest_batch(&mut self, samples: impl IntoIterator<Item = Sample>) -> usize {
        samples
            .into_iter()
            .filter_map(|sample| self.ingest(sample))
            .count()
    }

    fn trim(&mut self) {
        while self.history.len() > self.config.history_cap {
            self.history.pop_front();
        }
    }
}

impl Default for CandleAggregator {
    fn default() -> Self {
        Self::new(AggregatorConfig::SYNTHETIC)
    }
}
