mod feed_poller;
mod price_generator;
mod provider;
mod quote_feed;

pub use {
    feed_poller::{FeedEvent, FeedPoller},
    price_generator::RandomWalk,
    provider::{QuoteProvider, TwelveDataProvider},
    quote_feed::{
        FeedError, QuoteBatch, QuoteRecord, QuoteRequest, parse_datetime, parse_time_series,
    },
};
