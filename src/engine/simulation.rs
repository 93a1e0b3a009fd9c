use std::sync::Arc;
use std::time::Duration;

use strum_macros::{Display, EnumIter};

use crate::config::{QUOTES, SIMULATION};
use crate::data::{FeedError, FeedEvent, FeedPoller, QuoteBatch, QuoteProvider, QuoteRequest, RandomWalk};
use crate::domain::Sample;
use crate::models::{AggregatorConfig, CandleAggregator, Portfolio, TradeError, Transaction};
use crate::utils::AppInstant;

#[cfg(debug_assertions)]
use crate::config::DF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter)]
pub enum FeedMode {
    #[default]
    #[strum(to_string = "Synthetic")]
    Synthetic,
    #[strum(to_string = "Live Feed")]
    Live,
}

impl FeedMode {
    pub fn aggregator_config(self) -> AggregatorConfig {
        match self {
            FeedMode::Synthetic => AggregatorConfig::SYNTHETIC,
            FeedMode::Live => AggregatorConfig::FEED,
        }
    }
}

/// Startup knobs, normally filled from the CLI.
#[derive(Clone)]
pub struct SimulationSettings {
    pub mode: FeedMode,
    pub symbol: String,
    pub api_key: Option<String>,
    pub interval: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            mode: FeedMode::Synthetic,
            symbol: QUOTES.default_symbol.to_string(),
            api_key: None,
            interval: QUOTES.interval.to_string(),
            poll_interval: QUOTES.poll_interval,
            request_timeout: QUOTES.request_timeout,
        }
    }
}

/// Live-feed health, shown in the status bar.
#[derive(Debug, Clone, Default)]
pub struct FeedStatus {
    pub last_error: Option<FeedError>,
    pub last_success: Option<AppInstant>,
    pub records_accepted: usize,
    pub records_skipped: usize,
    /// Requests sent to the worker that haven't reported back yet.
    pub pending: usize,
}

impl FeedStatus {
    pub fn in_flight(&self) -> bool {
        self.pending > 0
    }
}

/// All mutable simulation state. Advanced once per frame by [`Simulation::tick`];
/// the UI only reads it by reference (plus the buy/sell/mode/symbol commands).
pub struct Simulation {
    settings: SimulationSettings,
    mode: FeedMode,
    symbol: String,
    /// Current price. `None` in live mode until a bar for `symbol` has been accepted.
    price: Option<f64>,
    walk: RandomWalk,
    aggregator: CandleAggregator,
    portfolio: Portfolio,
    provider: Arc<dyn QuoteProvider>,
    poller: Option<FeedPoller>,
    last_poll: Option<AppInstant>,
    feed_status: FeedStatus,
}

impl Simulation {
    pub fn new(settings: SimulationSettings, provider: Arc<dyn QuoteProvider>) -> Self {
        let mode = settings.mode;
        let mut sim = Self {
            symbol: normalize_symbol(&settings.symbol)
                .unwrap_or_else(|| QUOTES.default_symbol.to_string()),
            settings,
            mode,
            price: match mode {
                FeedMode::Synthetic => Some(SIMULATION.initial_price),
                FeedMode::Live => None,
            },
            walk: RandomWalk::default(),
            aggregator: CandleAggregator::new(mode.aggregator_config()),
            portfolio: Portfolio::default(),
            provider,
            poller: None,
            last_poll: None,
            feed_status: FeedStatus::default(),
        };
        if mode == FeedMode::Live {
            sim.ensure_poller();
        }
        sim
    }

    pub fn mode(&self) -> FeedMode {
        self.mode
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn aggregator(&self) -> &CandleAggregator {
        &self.aggregator
    }

    pub fn feed_status(&self) -> &FeedStatus {
        &self.feed_status
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Time left until the next scheduled poll (zero if one is due now).
    pub fn next_poll_in(&self, now: AppInstant) -> Option<Duration> {
        if self.mode != FeedMode::Live || self.feed_status.in_flight() {
            return None;
        }
        Some(match self.last_poll {
            Some(at) => self
                .settings
                .poll_interval
                .saturating_sub(now.duration_since(at)),
            None => Duration::ZERO,
        })
    }

    /// Advance one frame.
    pub fn tick(&mut self, now: AppInstant) {
        match self.mode {
            FeedMode::Synthetic => {
                let sample = self.walk.next_sample();
                self.price = Some(sample.value());
                self.aggregator.ingest(sample);
            }
            FeedMode::Live => {
                self.drain_feed_events();
                self.schedule_poll(now);
            }
        }
    }

    pub fn set_mode(&mut self, mode: FeedMode) {
        if mode == self.mode {
            return;
        }
        #[cfg(debug_assertions)]
        if DF.log_mode_changes {
            log::info!("Switching mode {} -> {}", self.mode, mode);
        }
        if let Some(poller) = &self.poller {
            poller.cancel();
        }
        self.mode = mode;
        self.aggregator.reconfigure(mode.aggregator_config());
        self.last_poll = None;
        self.feed_status.last_error = None;

        match mode {
            // continue the walk from whatever price is on screen
            FeedMode::Synthetic => {
                let resume = self.price.unwrap_or(self.walk.price());
                self.walk.reset(resume);
                self.price = Some(self.walk.price());
            }
            FeedMode::Live => {
                self.price = None;
                self.ensure_poller();
            }
        }
    }

    /// Switch instrument. Blank input is ignored.
    pub fn set_symbol(&mut self, symbol: &str) {
        let Some(symbol) = normalize_symbol(symbol) else {
            return;
        };
        if symbol == self.symbol {
            return;
        }
        #[cfg(debug_assertions)]
        if DF.log_mode_changes {
            log::info!("Switching symbol {} -> {}", self.symbol, symbol);
        }
        self.symbol = symbol;
        if self.mode == FeedMode::Live {
            if let Some(poller) = &self.poller {
                poller.cancel();
            }
            self.aggregator.reset();
            self.price = None;
            self.last_poll = None;
            self.feed_status.last_error = None;
        }
    }

    pub fn buy(&mut self) -> Result<Transaction, TradeError> {
        let result = match self.price {
            Some(price) => self.portfolio.buy(price),
            None => Err(TradeError::NoQuote),
        };
        self.log_trade(&result);
        result
    }

    pub fn sell(&mut self) -> Result<Transaction, TradeError> {
        let result = match self.price {
            Some(price) => self.portfolio.sell(price),
            None => Err(TradeError::NoQuote),
        };
        self.log_trade(&result);
        result
    }

    fn log_trade(&self, result: &Result<Transaction, TradeError>) {
        match result {
            Ok(_tx) => {
                #[cfg(debug_assertions)]
                if DF.log_trades {
                    log::info!("{} ({})", _tx, self.symbol);
                }
            }
            Err(e) => log::warn!("Trade rejected: {}", e),
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    fn ensure_poller(&mut self) {
        if self.poller.is_some() {
            return;
        }
        match FeedPoller::spawn(self.provider.clone(), self.settings.request_timeout) {
            Ok(poller) => self.poller = Some(poller),
            Err(e) => {
                log::error!("Failed to start quote worker: {:#}", e);
                self.feed_status.last_error = Some(FeedError::Worker(e.to_string()));
            }
        }
    }

    fn schedule_poll(&mut self, now: AppInstant) {
        let Some(api_key) = self.api_key().map(str::to_string) else {
            self.feed_status.last_error = Some(FeedError::MissingApiKey);
            return;
        };
        if self.feed_status.in_flight() {
            return;
        }
        let due = self
            .last_poll
            .is_none_or(|at| now.duration_since(at) >= self.settings.poll_interval);
        if !due {
            return;
        }
        let Some(poller) = &self.poller else {
            return;
        };

        let request = QuoteRequest {
            symbol: self.symbol.clone(),
            interval: self.settings.interval.clone(),
            api_key,
        };
        if poller.request(request) {
            self.feed_status.pending += 1;
        } else {
            log::error!("Quote worker has stopped; live feed is offline");
            self.feed_status.last_error =
                Some(FeedError::Worker("worker thread exited".to_string()));
        }
        // Failed sends wait a full interval too, so a dead worker isn't hammered every frame.
        self.last_poll = Some(now);
    }

    fn drain_feed_events(&mut self) {
        let Some(poller) = &self.poller else {
            return;
        };
        let mut events = Vec::new();
        while let Some(event) = poller.try_next_event() {
            events.push(event);
        }

        for event in events {
            self.feed_status.pending = self.feed_status.pending.saturating_sub(1);
            match event {
                FeedEvent::Batch { symbol, batch } if symbol == self.symbol => {
                    self.apply_batch(batch);
                }
                FeedEvent::Batch { symbol: _stale, .. } => {
                    #[cfg(debug_assertions)]
                    if DF.log_feed_polls {
                        log::info!("Ignoring stale batch for {}", _stale);
                    }
                }
                FeedEvent::Failed(e) => {
                    // Prior history stays; the next poll cycle retries.
                    log::warn!("Quote poll for {} failed: {}", self.symbol, e);
                    self.feed_status.last_error = Some(e);
                }
                FeedEvent::Cancelled => {
                    #[cfg(debug_assertions)]
                    if DF.log_feed_polls {
                        log::info!("Quote poll cancelled");
                    }
                }
            }
        }
    }

    fn apply_batch(&mut self, batch: QuoteBatch) {
        let QuoteBatch { records, skipped } = batch;
        #[cfg(debug_assertions)]
        let received = records.len();
        let accepted = self
            .aggregator
            .ingest_batch(records.into_iter().map(Sample::from));

        #[cfg(debug_assertions)]
        if DF.log_feed_polls {
            log::info!(
                "Poll for {}: {} records, {} new, {} skipped",
                self.symbol,
                received,
                accepted,
                skipped
            );
        }

        self.feed_status.records_accepted += accepted;
        self.feed_status.records_skipped += skipped;
        self.feed_status.last_error = None;
        self.feed_status.last_success = Some(AppInstant::now());
        if let Some(close) = self.aggregator.last_close() {
            self.price = Some(close);
        }
    }
}

fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    (!symbol.is_empty()).then_some(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_time_series;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::thread;

    /// Serves canned bodies in order through the real parser; the last one repeats.
    struct ScriptedProvider {
        bodies: Mutex<Vec<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(bodies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                bodies: Mutex::new(bodies.iter().rev().map(|b| b.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl QuoteProvider for ScriptedProvider {
        async fn fetch_time_series(&self, req: &QuoteRequest) -> Result<QuoteBatch, FeedError> {
            self.calls.lock().unwrap().push(req.symbol.clone());
            let body = {
                let mut bodies = self.bodies.lock().unwrap();
                if bodies.len() > 1 {
                    bodies.pop().unwrap_or_default()
                } else {
                    bodies.last().cloned().unwrap_or_default()
                }
            };
            parse_time_series(&body)
        }
    }

    fn live_settings(api_key: Option<&str>) -> SimulationSettings {
        SimulationSettings {
            mode: FeedMode::Live,
            api_key: api_key.map(str::to_string),
            poll_interval: Duration::from_secs(3600),
            request_timeout: Duration::from_secs(2),
            ..SimulationSettings::default()
        }
    }

    fn tick_until(sim: &mut Simulation, done: impl Fn(&Simulation) -> bool) {
        for _ in 0..500 {
            sim.tick(AppInstant::now());
            if done(sim) {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("simulation never reached the expected state");
    }

    const THREE_VALID_ONE_BAD: &str = r#"{"values":[
        {"datetime":"2024-03-01 09:33:00","open":"103","high":"104","low":"102","close":"103.5"},
        {"datetime":"2024-03-01 09:32:00","open":"102","high":"103","low":"101","close":"N/A"},
        {"datetime":"2024-03-01 09:31:00","open":"101","high":"102","low":"100","close":"101.5"},
        {"datetime":"2024-03-01 09:30:00","open":"100","high":"101","low":"99","close":"100.5"}
    ],"status":"ok"}"#;

    #[test]
    fn test_synthetic_mode_closes_a_candle_every_bucket() {
        let mut sim = Simulation::new(SimulationSettings::default(), ScriptedProvider::new(&[]));
        let now = AppInstant::now();
        for _ in 0..SIMULATION.ticks_per_candle * 3 {
            sim.tick(now);
        }
        let history = sim.aggregator().history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].time, 0);
        assert_eq!(sim.aggregator().last_close(), sim.price());
    }

    #[test]
    fn test_live_poll_keeps_only_valid_records_in_order() {
        let provider = ScriptedProvider::new(&[THREE_VALID_ONE_BAD]);
        let mut sim = Simulation::new(live_settings(Some("key")), provider.clone());

        tick_until(&mut sim, |s| s.feed_status().records_accepted > 0);

        let closes: Vec<f64> = sim.aggregator().history().iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![100.5, 101.5, 103.5]);
        assert_eq!(sim.feed_status().records_skipped, 1);
        assert_eq!(sim.price(), Some(103.5));
        assert_eq!(sim.aggregator().history()[0].time, 1);
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_failed_poll_keeps_history() {
        let provider = ScriptedProvider::new(&[
            THREE_VALID_ONE_BAD,
            r#"{"code":500,"message":"boom","status":"error"}"#,
        ]);
        let mut settings = live_settings(Some("key"));
        settings.poll_interval = Duration::ZERO;
        let mut sim = Simulation::new(settings, provider.clone());

        tick_until(&mut sim, |s| s.feed_status().records_accepted > 0);
        tick_until(&mut sim, |s| s.feed_status().last_error.is_some());

        assert_eq!(sim.aggregator().history().len(), 3);
        assert!(matches!(
            sim.feed_status().last_error,
            Some(FeedError::Api { code: 500, .. })
        ));
    }

    #[test]
    fn test_repeat_polls_do_not_duplicate_candles() {
        let provider = ScriptedProvider::new(&[THREE_VALID_ONE_BAD]);
        let mut settings = live_settings(Some("key"));
        settings.poll_interval = Duration::ZERO;
        let mut sim = Simulation::new(settings, provider.clone());

        tick_until(&mut sim, |s| s.aggregator().duplicates_suppressed() >= 6);

        assert_eq!(sim.aggregator().history().len(), 3);
        assert_eq!(sim.feed_status().records_accepted, 3);
        assert!(provider.call_count() >= 3);
    }

    #[test]
    fn test_live_mode_without_key_never_polls() {
        let provider = ScriptedProvider::new(&[THREE_VALID_ONE_BAD]);
        let mut sim = Simulation::new(live_settings(None), provider.clone());
        for _ in 0..10 {
            sim.tick(AppInstant::now());
        }
        thread::sleep(Duration::from_millis(20));

        assert_eq!(provider.call_count(), 0);
        assert_eq!(sim.feed_status().last_error, Some(FeedError::MissingApiKey));
        assert!(!sim.has_api_key());
    }

    #[test]
    fn test_symbol_change_resets_live_history() {
        let provider = ScriptedProvider::new(&[THREE_VALID_ONE_BAD]);
        let mut sim = Simulation::new(live_settings(Some("key")), provider.clone());
        tick_until(&mut sim, |s| s.feed_status().records_accepted > 0);

        sim.set_symbol("  msft ");
        assert_eq!(sim.symbol(), "MSFT");
        assert!(sim.aggregator().history().is_empty());

        tick_until(&mut sim, |s| !s.aggregator().history().is_empty());
        assert_eq!(provider.calls.lock().unwrap().last().map(String::as_str), Some("MSFT"));
    }

    #[test]
    fn test_symbol_change_blocks_trades_until_new_quote() {
        let provider = ScriptedProvider::new(&[THREE_VALID_ONE_BAD]);
        let mut sim = Simulation::new(live_settings(Some("key")), provider);
        tick_until(&mut sim, |s| s.feed_status().records_accepted > 0);
        assert_eq!(sim.price(), Some(103.5));

        sim.set_symbol("MSFT");
        assert_eq!(sim.price(), None);
        assert_eq!(sim.buy(), Err(TradeError::NoQuote));
        assert_eq!(sim.sell(), Err(TradeError::NoQuote));
        assert_eq!(sim.portfolio().shares(), 0);
        assert!(sim.portfolio().transactions().is_empty());

        tick_until(&mut sim, |s| s.price().is_some());
        let tx = sim.buy().unwrap();
        assert_eq!(tx.price, 103.5);
    }

    #[test]
    fn test_switch_to_live_drops_synthetic_price() {
        let provider = ScriptedProvider::new(&[THREE_VALID_ONE_BAD]);
        let mut sim = Simulation::new(SimulationSettings::default(), provider);
        sim.tick(AppInstant::now());
        assert!(sim.price().is_some());

        sim.set_mode(FeedMode::Live);
        assert_eq!(sim.price(), None);
        assert_eq!(sim.buy(), Err(TradeError::NoQuote));
        assert_eq!(sim.portfolio().cash(), SIMULATION.initial_cash);
    }

    #[test]
    fn test_live_start_has_no_price() {
        let sim = Simulation::new(live_settings(None), ScriptedProvider::new(&[]));
        assert_eq!(sim.price(), None);
    }

    #[test]
    fn test_blank_symbol_is_ignored() {
        let mut sim = Simulation::new(SimulationSettings::default(), ScriptedProvider::new(&[]));
        sim.set_symbol("   ");
        assert_eq!(sim.symbol(), QUOTES.default_symbol);
    }

    #[test]
    fn test_mode_switch_reconfigures_aggregator() {
        let mut sim = Simulation::new(SimulationSettings::default(), ScriptedProvider::new(&[]));
        for _ in 0..SIMULATION.ticks_per_candle {
            sim.tick(AppInstant::now());
        }
        assert_eq!(sim.aggregator().history().len(), 1);
        let before = sim.price().unwrap();

        sim.set_mode(FeedMode::Live);
        assert_eq!(sim.mode(), FeedMode::Live);
        assert!(sim.aggregator().history().is_empty());
        assert_eq!(sim.aggregator().config(), AggregatorConfig::FEED);

        // the walk resumes where it left off
        sim.set_mode(FeedMode::Synthetic);
        assert_eq!(sim.price(), Some(before));
        sim.tick(AppInstant::now());
        let after = sim.price().unwrap();
        assert!((after - before).abs() <= 0.5 + 1e-9);
    }

    #[test]
    fn test_trades_use_current_price() {
        let mut sim = Simulation::new(SimulationSettings::default(), ScriptedProvider::new(&[]));
        sim.tick(AppInstant::now());
        let price = sim.price().unwrap();

        let tx = sim.buy().unwrap();
        assert_eq!(tx.price, price);
        assert_eq!(sim.portfolio().shares(), 1);
        assert!(sim.sell().is_ok());
        assert_eq!(sim.sell(), Err(TradeError::NoShares));
        assert!((sim.portfolio().cash() - SIMULATION.initial_cash).abs() < 1e-9);
    }

    #[test]
    fn test_next_poll_countdown() {
        let provider = ScriptedProvider::new(&[THREE_VALID_ONE_BAD]);
        let mut sim = Simulation::new(live_settings(Some("key")), provider);
        let start = AppInstant::now();
        assert_eq!(sim.next_poll_in(start), Some(Duration::ZERO));

        tick_until(&mut sim, |s| s.feed_status().records_accepted > 0);
        let remaining = sim.next_poll_in(AppInstant::now()).unwrap();
        assert!(remaining > Duration::from_secs(3500));
    }
}
