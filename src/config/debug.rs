//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Log every poll request sent to the quote worker and every event drained from it.
    pub log_feed_polls: bool,

    /// Log samples dropped by the timestamp dedup check.
    pub log_dedup: bool,

    /// Log each candle as its bucket closes. Very noisy in synthetic mode (one per second).
    pub log_candle_close: bool,

    pub log_trades: bool,

    /// Warn when a frame takes longer than `slow_frame_micros`
    pub log_performance: bool,
    pub slow_frame_micros: u128,

    pub log_mode_changes: bool,
}

pub const DF: LogFlags = LogFlags {
    log_feed_polls: true,
    log_trades: true,
    log_mode_changes: true,

    log_dedup: false,
    log_candle_close: false,
    log_performance: false,

    slow_frame_micros: 16_000,
};
