pub struct UiText {
    pub app_title: &'static str,

    // --- Top toolbar ---
    pub label_mode: &'static str,
    pub label_symbol: &'static str,
    pub button_apply_symbol: &'static str,
    pub hint_symbol: &'static str,
    pub label_show_candles: &'static str,
    pub label_show_forming: &'static str,
    pub label_show_price: &'static str,

    // --- Trade panel ---
    pub trade_heading: &'static str,
    pub label_price: &'static str,
    pub price_waiting: &'static str,
    pub button_buy: &'static str,
    pub button_sell: &'static str,
    pub portfolio_heading: &'static str,
    pub label_cash: &'static str,
    pub label_shares: &'static str,
    pub label_value: &'static str,
    pub label_pnl: &'static str,
    pub log_heading: &'static str,
    pub log_empty: &'static str,

    // --- Plot ---
    pub plot_y_axis: &'static str,
    pub plot_x_axis: &'static str,
    pub plot_waiting_synthetic: &'static str,
    pub plot_waiting_feed: &'static str,

    // --- Status bar ---
    pub status_synthetic: &'static str,
    pub status_live: &'static str,
    pub label_candles: &'static str,
    pub label_forming: &'static str,
    pub label_duplicates: &'static str,
    pub label_accepted: &'static str,
    pub label_skipped: &'static str,
    pub label_last_poll: &'static str,
    pub label_next_poll: &'static str,
    pub status_fetching: &'static str,
    pub status_never_polled: &'static str,
    pub status_no_key_hint: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    app_title: "Trading Simulator",

    label_mode: "Source:",
    label_symbol: "Symbol:",
    button_apply_symbol: "Load",
    hint_symbol: "e.g. AAPL",
    label_show_candles: "Candles",
    label_show_forming: "Forming candle",
    label_show_price: "Price line",

    trade_heading: "Trade",
    label_price: "Price",
    price_waiting: "Waiting for quote",
    button_buy: "Buy 1",
    button_sell: "Sell 1",
    portfolio_heading: "Portfolio",
    label_cash: "Cash",
    label_shares: "Shares",
    label_value: "Total value",
    label_pnl: "P&L",
    log_heading: "Transactions",
    log_empty: "No trades yet",

    plot_y_axis: "Price",
    plot_x_axis: "Candle",
    plot_waiting_synthetic: "Building first candle...",
    plot_waiting_feed: "Waiting for quotes...",

    status_synthetic: "SYNTHETIC",
    status_live: "LIVE FEED",
    label_candles: "Candles",
    label_forming: "Forming",
    label_duplicates: "Dupes dropped",
    label_accepted: "Accepted",
    label_skipped: "Skipped",
    label_last_poll: "Last poll",
    label_next_poll: "Next poll",
    status_fetching: "Fetching...",
    status_never_polled: "never",
    status_no_key_hint: "pass --api-key or set TWELVE_DATA_API_KEY",
};
