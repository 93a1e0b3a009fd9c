//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    // --- CANDLESTICKS ---
    pub candle_bullish_color: Color32,
    pub candle_bearish_color: Color32,
    pub candle_width_pct: f64,  // 0.0 to 1.0 (relative to one bucket)
    pub candle_wick_width: f32, // Pixels
    /// Opacity of the still-forming candle (it is redrawn every frame)
    pub in_progress_opacity_pct: f32,

    // PRICE LINE
    pub current_price_color: Color32,
    pub current_price_line_width: f32,

    pub plot_y_padding_pct: f64, // Y-Axis Padding factor (e.g. 0.05 = 5% padding top and bottom)
    /// Empty buckets kept to the right of the newest candle
    pub plot_x_right_margin: f64,
    /// Minimum number of buckets the x axis always shows, so a young history doesn't stretch
    pub plot_min_visible_candles: f64,

    // --- SEMANTIC COLORS ---
    pub color_profit: Color32,
    pub color_loss: Color32,
    pub color_info: Color32,
    pub color_warning: Color32,
    pub color_text_neutral: Color32,
    pub color_text_subdued: Color32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    candle_bullish_color: Color32::from_rgb(38, 166, 154),
    candle_bearish_color: Color32::from_rgb(239, 83, 80),
    candle_width_pct: 0.7,
    candle_wick_width: 1.5,
    in_progress_opacity_pct: 0.45,

    current_price_color: Color32::from_rgb(255, 215, 0), // Gold
    current_price_line_width: 1.5,

    plot_y_padding_pct: 0.05,
    plot_x_right_margin: 2.0,
    plot_min_visible_candles: 30.0,

    color_profit: Color32::from_rgb(38, 166, 154),
    color_loss: Color32::from_rgb(239, 83, 80),
    color_info: Color32::from_rgb(100, 149, 237),
    color_warning: Color32::from_rgb(255, 165, 0),
    color_text_neutral: Color32::WHITE,
    color_text_subdued: Color32::from_gray(140),
};
