use std::collections::VecDeque;

use eframe::egui::{Color32, Stroke};
use egui_plot::{HLine, Line, LineStyle, PlotPoints, PlotUi, Polygon};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::{Candle, CandleType, Ohlc};
use crate::models::InProgressCandle;

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub history: &'a VecDeque<Candle>,
    /// The forming bucket and the x slot it occupies.
    pub in_progress: Option<(f64, &'a InProgressCandle)>,
    pub current_price: Option<f64>,
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// CANDLESTICKS
// ============================================================================
pub struct CandlestickLayer;

impl PlotLayer for CandlestickLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for candle in ctx.history {
            draw_candle(plot_ui, candle.time as f64, candle, 1.0);
        }
    }
}

/// The bucket still being filled, drawn faded since it changes every frame.
pub struct InProgressCandleLayer;

impl PlotLayer for InProgressCandleLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if let Some((x, forming)) = ctx.in_progress {
            draw_candle(plot_ui, x, forming, PLOT_CONFIG.in_progress_opacity_pct);
        }
    }
}

// ============================================================================
// PRICE LINE
// ============================================================================
pub struct PriceLineLayer;

impl PlotLayer for PriceLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if let Some(price) = ctx.current_price {
            plot_ui.hline(
                HLine::new("Current Price", price)
                    .color(PLOT_CONFIG.current_price_color)
                    .width(PLOT_CONFIG.current_price_line_width)
                    .style(LineStyle::dashed_loose()),
            );
        }
    }
}

// --- HELPERS ---

fn candle_color(candle: &impl Ohlc) -> Color32 {
    match candle.get_type() {
        CandleType::Bullish => PLOT_CONFIG.candle_bullish_color,
        CandleType::Bearish => PLOT_CONFIG.candle_bearish_color,
    }
}

/// Vertical extent of the body. A doji gets a sliver of height so it stays visible.
fn body_bounds(candle: &impl Ohlc) -> (f64, f64) {
    let (bottom, top) = candle.body_range();
    if (top - bottom).abs() < f64::EPSILON {
        (bottom, bottom * 1.0001 + 1e-6)
    } else {
        (bottom, top)
    }
}

fn draw_candle(ui: &mut PlotUi, x: f64, candle: &impl Ohlc, opacity: f32) {
    let color = candle_color(candle).linear_multiply(opacity);

    if candle.high() > candle.low() {
        draw_wick_line(ui, x, candle.high(), candle.low(), color);
    }
    let (body_bot, body_top) = body_bounds(candle);
    draw_body_rect(ui, x, body_top, body_bot, color);
}

#[inline]
fn draw_wick_line(ui: &mut PlotUi, x: f64, top: f64, bottom: f64, color: Color32) {
    ui.line(
        Line::new("", PlotPoints::new(vec![[x, bottom], [x, top]]))
            .color(color)
            .width(PLOT_CONFIG.candle_wick_width),
    );
}

#[inline]
fn draw_body_rect(ui: &mut PlotUi, x: f64, top: f64, bottom: f64, color: Color32) {
    let half_w = PLOT_CONFIG.candle_width_pct / 2.0;
    let pts = vec![
        [x - half_w, bottom],
        [x + half_w, bottom],
        [x + half_w, top],
        [x - half_w, top],
    ];

    // No stroke: outlines blur on thin candles
    ui.polygon(
        Polygon::new("", PlotPoints::new(pts))
            .fill_color(color)
            .stroke(Stroke::NONE),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, close: f64) -> Candle {
        Candle {
            time: 0,
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            source_ts: None,
        }
    }

    #[test]
    fn test_doji_body_has_height() {
        let (bot, top) = body_bounds(&candle(100.0, 100.0));
        assert_eq!(bot, 100.0);
        assert!(top > bot);
    }

    #[test]
    fn test_body_bounds_ignore_direction() {
        assert_eq!(body_bounds(&candle(10.0, 12.0)), (10.0, 12.0));
        assert_eq!(body_bounds(&candle(12.0, 10.0)), (10.0, 12.0));
    }

    #[test]
    fn test_flat_candle_is_bullish_colored() {
        assert_eq!(candle_color(&candle(5.0, 5.0)), PLOT_CONFIG.candle_bullish_color);
        assert_eq!(candle_color(&candle(5.0, 4.0)), PLOT_CONFIG.candle_bearish_color);
    }
}
