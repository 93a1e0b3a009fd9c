// Domain types and value objects
mod candle;
mod sample;

// Re-export commonly used types to the world
pub use candle::{Candle, CandleType, Ohlc};
pub use sample::Sample;
