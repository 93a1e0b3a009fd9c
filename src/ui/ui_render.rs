use eframe::egui::{CentralPanel, Context, RichText, SidePanel, TopBottomPanel, Ui};

use crate::app::App;
use crate::config::SIMULATION;
use crate::config::plot::PLOT_CONFIG;
use crate::data::FeedError;
use crate::engine::FeedMode;
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::ui_panels::{MarketEvent, MarketPanel, Panel, TradeEvent, TradePanel};
use crate::utils::{AppInstant, format_ago};

impl App {
    pub(crate) fn render_top_panel(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.toolbar_frame();

        let events = TopBottomPanel::top("top_toolbar")
            .frame(frame)
            .min_height(UI_CONFIG.toolbar_height)
            .resizable(false)
            .show(ctx, |ui| {
                MarketPanel::new(
                    self.sim.mode(),
                    &mut self.symbol_input,
                    &mut self.plot_visibility,
                )
                .render(ui)
            })
            .inner;

        for event in events {
            match event {
                MarketEvent::Mode(mode) => self.sim.set_mode(mode),
                MarketEvent::Symbol(symbol) => {
                    self.sim.set_symbol(&symbol);
                    self.symbol_input = self.sim.symbol().to_string();
                }
            }
        }
    }

    pub(crate) fn render_trade_panel(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.trade_panel_frame();

        let events = SidePanel::left("trade_panel")
            .frame(frame)
            .exact_width(UI_CONFIG.trade_panel_width)
            .resizable(false)
            .show(ctx, |ui| {
                TradePanel::new(
                    self.sim.portfolio(),
                    self.sim.price(),
                    SIMULATION.initial_cash,
                    self.last_rejection.as_deref(),
                )
                .render(ui)
            })
            .inner;

        for event in events {
            let result = match event {
                TradeEvent::Buy => self.sim.buy(),
                TradeEvent::Sell => self.sim.sell(),
            };
            self.last_rejection = result.err().map(|e| e.to_string());
        }
    }

    pub(crate) fn render_central_panel(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.chart_frame();

        CentralPanel::default().frame(frame).show(ctx, |ui| {
            self.plot_view
                .show_my_plot(ui, &self.sim, &self.plot_visibility);
        });
    }

    pub(crate) fn render_status_panel(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.status_bar_frame();
        let now = AppInstant::now();

        TopBottomPanel::bottom("status_panel")
            .frame(frame)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    self.render_status_mode(ui);
                    ui.separator();
                    self.render_status_candles(ui);
                    if self.sim.mode() == FeedMode::Live {
                        ui.separator();
                        self.render_status_feed(ui, now);
                    }
                });
            });
    }

    fn render_status_mode(&self, ui: &mut Ui) {
        let (label, color) = match self.sim.mode() {
            FeedMode::Synthetic => (UI_TEXT.status_synthetic, PLOT_CONFIG.color_warning),
            FeedMode::Live => (UI_TEXT.status_live, PLOT_CONFIG.color_profit),
        };
        ui.label(RichText::new(label).small().strong().color(color));
        ui.label(
            RichText::new(self.sim.symbol())
                .small()
                .color(PLOT_CONFIG.color_text_neutral),
        );
    }

    fn render_status_candles(&self, ui: &mut Ui) {
        let aggregator = self.sim.aggregator();
        let config = aggregator.config();

        ui.metric(
            UI_TEXT.label_candles,
            &format!("{}/{}", aggregator.history().len(), config.history_cap),
            PLOT_CONFIG.color_text_neutral,
        );
        if config.bucket_size > 1 {
            let ticks = aggregator.in_progress().map_or(0, |c| c.ticks);
            ui.metric(
                UI_TEXT.label_forming,
                &format!("{}/{}", ticks, config.bucket_size),
                PLOT_CONFIG.color_info,
            );
        }
        if aggregator.duplicates_suppressed() > 0 {
            ui.metric(
                UI_TEXT.label_duplicates,
                &aggregator.duplicates_suppressed().to_string(),
                PLOT_CONFIG.color_text_subdued,
            );
        }
    }

    fn render_status_feed(&self, ui: &mut Ui, now: AppInstant) {
        let status = self.sim.feed_status();

        ui.metric(
            UI_TEXT.label_accepted,
            &status.records_accepted.to_string(),
            PLOT_CONFIG.color_profit,
        );
        if status.records_skipped > 0 {
            ui.metric(
                UI_TEXT.label_skipped,
                &status.records_skipped.to_string(),
                PLOT_CONFIG.color_warning,
            );
        }

        let last = status
            .last_success
            .map(|at| format_ago(now.duration_since(at)))
            .unwrap_or_else(|| UI_TEXT.status_never_polled.to_string());
        ui.metric(UI_TEXT.label_last_poll, &last, PLOT_CONFIG.color_text_neutral);

        if status.in_flight() {
            ui.label(
                RichText::new(UI_TEXT.status_fetching)
                    .small()
                    .color(PLOT_CONFIG.color_info),
            );
        } else if let Some(wait) = self.sim.next_poll_in(now)
            && self.sim.has_api_key()
        {
            ui.metric(
                UI_TEXT.label_next_poll,
                &format!("{}s", wait.as_secs()),
                PLOT_CONFIG.color_text_subdued,
            );
        }

        if let Some(err) = &status.last_error {
            ui.separator();
            ui.label(
                RichText::new(err.to_string())
                    .small()
                    .color(PLOT_CONFIG.color_loss),
            );
            if *err == FeedError::MissingApiKey {
                ui.label_subdued(UI_TEXT.status_no_key_hint);
            }
        }
    }
}
