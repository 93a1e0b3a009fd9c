use std::collections::HashMap;
use std::ops::RangeInclusive;

use eframe::egui::{Direction, Layout, RichText, Ui, Vec2b};
use egui_plot::{AxisHints, HPlacement, Plot, VPlacement};

use crate::config::plot::PLOT_CONFIG;
use crate::engine::{FeedMode, Simulation};
use crate::ui::plot_layers::{
    CandlestickLayer, InProgressCandleLayer, LayerContext, PlotLayer, PriceLineLayer,
};
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::format_price;
use crate::utils::format_bar_time;

/// Which layers the chart draws. Toggled from the top toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotVisibility {
    pub candles: bool,
    pub in_progress: bool,
    pub price_line: bool,
}

impl Default for PlotVisibility {
    fn default() -> Self {
        Self {
            candles: true,
            in_progress: true,
            price_line: true,
        }
    }
}

#[derive(Default)]
pub struct PlotView;

impl PlotView {
    pub fn new() -> Self {
        Self
    }

    pub fn show_my_plot(&mut self, ui: &mut Ui, sim: &Simulation, visibility: &PlotVisibility) {
        let aggregator = sim.aggregator();
        let history = aggregator.history();
        let in_progress = aggregator
            .in_progress()
            .map(|c| (aggregator.next_index() as f64, c));

        let Some((first_x, last_x)) = occupied_span(
            history.front().map(|c| c.time as f64),
            history.back().map(|c| c.time as f64),
            in_progress.map(|(x, _)| x),
        ) else {
            let msg = match sim.mode() {
                FeedMode::Synthetic => UI_TEXT.plot_waiting_synthetic,
                FeedMode::Live => UI_TEXT.plot_waiting_feed,
            };
            render_fullscreen_message(ui, msg);
            return;
        };

        let current_price = sim.price();
        let x_range = calculate_x_bounds(first_x, last_x);
        let y_range = calculate_y_bounds(
            history
                .iter()
                .map(|c| (c.low, c.high))
                .chain(in_progress.map(|(_, c)| (c.low, c.high))),
            current_price,
        );

        // Feed candles carry their bar time; label those, fall back to the index otherwise.
        let bar_times: HashMap<u64, String> = history
            .iter()
            .filter_map(|c| c.source_ts.map(|ts| (c.time, format_bar_time(ts))))
            .collect();

        Plot::new("candle_plot")
            .custom_x_axes(vec![create_x_axis(bar_times)])
            .custom_y_axes(vec![create_y_axis(sim.symbol())])
            .label_formatter(|_, _| String::new())
            .allow_double_click_reset(false)
            .allow_scroll(false)
            .allow_drag(Vec2b { x: false, y: false })
            .allow_zoom(Vec2b { x: false, y: false })
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds_x(x_range);
                plot_ui.set_plot_bounds_y(y_range);

                let ctx = LayerContext {
                    history,
                    in_progress,
                    current_price,
                };

                let mut layers: Vec<Box<dyn PlotLayer>> = Vec::with_capacity(3);
                if visibility.price_line {
                    layers.push(Box::new(PriceLineLayer));
                }
                if visibility.candles {
                    layers.push(Box::new(CandlestickLayer));
                }
                if visibility.in_progress {
                    layers.push(Box::new(InProgressCandleLayer));
                }

                for layer in layers {
                    layer.render(plot_ui, &ctx);
                }
            });
    }
}

/// First and last occupied x slot, or `None` when there is nothing to draw.
fn occupied_span(
    first_closed: Option<f64>,
    last_closed: Option<f64>,
    forming: Option<f64>,
) -> Option<(f64, f64)> {
    let first = first_closed.or(forming)?;
    let last = forming.or(last_closed).unwrap_or(first);
    Some((first, last.max(first)))
}

/// The newest candle stays pinned near the right edge; a short history doesn't stretch to fill.
/// The oldest candle keeps half a slot of room so its body isn't cut by the frame.
fn calculate_x_bounds(first_x: f64, last_x: f64) -> RangeInclusive<f64> {
    let max = last_x + PLOT_CONFIG.plot_x_right_margin;
    let min = (first_x - 0.5).min(max - PLOT_CONFIG.plot_min_visible_candles);
    min..=max
}

fn calculate_y_bounds(
    ranges: impl Iterator<Item = (f64, f64)>,
    current_price: Option<f64>,
) -> RangeInclusive<f64> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for (low, high) in ranges.chain(current_price.map(|p| (p, p))) {
        lo = lo.min(low);
        hi = hi.max(high);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..=1.0;
    }

    let range = hi - lo;
    // flat series: pad around the value so the candle isn't drawn on the frame edge
    let pad = if range > f64::EPSILON {
        range * PLOT_CONFIG.plot_y_padding_pct
    } else {
        (hi.abs() * 0.01).max(0.5)
    };
    (lo - pad).max(0.0)..=(hi + pad)
}

fn create_x_axis(bar_times: HashMap<u64, String>) -> AxisHints<'static> {
    AxisHints::new_x()
        .label(UI_TEXT.plot_x_axis)
        .formatter(move |mark, _range| {
            let x = mark.value;
            if x < 0.0 || (x - x.round()).abs() > 1e-6 {
                return String::new();
            }
            let idx = x.round() as u64;
            bar_times
                .get(&idx)
                .cloned()
                .unwrap_or_else(|| format!("#{}", idx))
        })
        .placement(VPlacement::Bottom)
}

fn create_y_axis(symbol: &str) -> AxisHints<'static> {
    let label = format!("{}  {}", symbol, UI_TEXT.plot_y_axis);
    AxisHints::new_y()
        .label(label)
        .formatter(|grid_mark, _range| format_price(grid_mark.value))
        .placement(HPlacement::Right)
}

fn render_fullscreen_message(ui: &mut Ui, text: &str) {
    ui.with_layout(Layout::centered_and_justified(Direction::TopDown), |ui| {
        ui.label(
            RichText::new(text)
                .size(18.0)
                .color(PLOT_CONFIG.color_text_subdued),
        );
    });
}
