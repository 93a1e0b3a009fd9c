pub struct SimulationConfig {
    pub initial_price: f64,
    /// The random walk never goes below this.
    pub price_floor: f64,
    /// Each step moves the price by a whole number of cents in `-max_step_cents..max_step_cents`.
    pub max_step_cents: i32,
    pub initial_cash: f64,
    /// Synthetic mode: one tick per frame, so 60 ticks is roughly one candle per second.
    pub ticks_per_candle: usize,
    /// Oldest candles are evicted beyond this.
    pub history_cap: usize,
}

pub const SIMULATION: SimulationConfig = SimulationConfig {
    initial_price: 100.0,
    price_floor: 10.0,
    max_step_cents: 50,
    initial_cash: 10_000.0,
    ticks_per_candle: 60,
    history_cap: 100,
};
