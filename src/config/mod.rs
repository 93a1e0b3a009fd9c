//! Configuration module for the trading simulator.

// Can all be private now because we have a public re-export.
mod debug;
mod quotes;
mod simulation;

// Can't be private because we don't re-export it
pub mod plot;

// Re-export commonly used items
pub use debug::DF;
pub use quotes::{QUOTES, QuotesConfig};
pub use simulation::{SIMULATION, SimulationConfig};
