use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::SIMULATION;
use crate::domain::Sample;

/// Synthetic price source: a floored random walk in whole-cent steps.
pub struct RandomWalk<R = StdRng> {
    price: f64,
    floor: f64,
    max_step_cents: i32,
    rng: R,
}

impl RandomWalk<StdRng> {
    pub fn new(start: f64) -> Self {
        Self::with_rng(start, StdRng::from_os_rng())
    }

    /// Same seed, same path.
    pub fn seeded(start: f64, seed: u64) -> Self {
        Self::with_rng(start, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomWalk<R> {
    pub fn with_rng(start: f64, rng: R) -> Self {
        Self {
            price: start.max(SIMULATION.price_floor),
            floor: SIMULATION.price_floor,
            max_step_cents: SIMULATION.max_step_cents.max(1),
            rng,
        }
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Restart the walk from `price` (still floored).
    pub fn reset(&mut self, price: f64) {
        self.price = price.max(self.floor);
    }

    /// Advance one step and return the new price.
    pub fn step(&mut self) -> f64 {
        let cents = self
            .rng
            .random_range(-self.max_step_cents..self.max_step_cents);
        self.price = (self.price + cents as f64 / 100.0).max(self.floor);
        self.price
    }

    pub fn next_sample(&mut self) -> Sample {
        Sample::tick(self.step())
    }
}

impl Default for RandomWalk<StdRng> {
    fn default() -> Self {
        Self::new(SIMULATION.initial_price)
    }
}
