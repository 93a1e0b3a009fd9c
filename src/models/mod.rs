mod candle_aggregator;
mod portfolio;

pub use candle_aggregator::{AggregatorConfig, CandleAggregator, InProgressCandle};
pub use portfolio::{Portfolio, TradeError, TradeSide, Transaction};
