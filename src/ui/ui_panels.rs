use eframe::egui::{Button, ComboBox, Grid, Key, RichText, ScrollArea, TextEdit, TextStyle, Ui};
use strum::IntoEnumIterator;

use crate::config::plot::PLOT_CONFIG;
use crate::engine::FeedMode;
use crate::models::{Portfolio, TradeSide};
use crate::ui::styles::{UiStyleExt, get_outcome_color};
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::ui_plot_view::PlotVisibility;
use crate::ui::utils::{format_price, format_signed_price, section_heading, spaced_separator};

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeEvent {
    Buy,
    Sell,
}

/// Price, buy/sell buttons, holdings and the transaction log.
pub struct TradePanel<'a> {
    portfolio: &'a Portfolio,
    /// `None` while the live feed has no quote for the current symbol.
    price: Option<f64>,
    starting_cash: f64,
    last_rejection: Option<&'a str>,
}

impl<'a> TradePanel<'a> {
    pub fn new(
        portfolio: &'a Portfolio,
        price: Option<f64>,
        starting_cash: f64,
        last_rejection: Option<&'a str>,
    ) -> Self {
        Self {
            portfolio,
            price,
            starting_cash,
            last_rejection,
        }
    }

    fn render_holdings(&self, ui: &mut Ui) {
        ui.label_subheader(UI_TEXT.portfolio_heading);
        // without a quote the position can't be marked
        let value = self.price.map(|p| self.portfolio.value(p));
        let pnl = value.map(|v| v - self.starting_cash);

        Grid::new("holdings_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label_subdued(UI_TEXT.label_cash);
                ui.label(format_price(self.portfolio.cash()));
                ui.end_row();

                ui.label_subdued(UI_TEXT.label_shares);
                ui.label(self.portfolio.shares().to_string());
                ui.end_row();

                ui.label_subdued(UI_TEXT.label_value);
                ui.label(RichText::new(value.map_or_else(|| "-".to_string(), format_price)).strong());
                ui.end_row();

                ui.label_subdued(UI_TEXT.label_pnl);
                match pnl {
                    Some(pnl) => {
                        ui.label(
                            RichText::new(format_signed_price(pnl)).color(get_outcome_color(pnl)),
                        );
                    }
                    None => ui.label_subdued("-"),
                }
                ui.end_row();
            });
    }

    fn render_log(&self, ui: &mut Ui) {
        ui.label_subheader(UI_TEXT.log_heading);
        let log = self.portfolio.transactions();
        if log.is_empty() {
            ui.label_subdued(UI_TEXT.log_empty);
            return;
        }

        let row_height = ui.text_style_height(&TextStyle::Body);
        ScrollArea::vertical()
            .max_height(UI_CONFIG.log_height(row_height))
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for tx in log {
                    let color = match tx.side {
                        TradeSide::Buy => PLOT_CONFIG.color_profit,
                        TradeSide::Sell => PLOT_CONFIG.color_loss,
                    };
                    ui.label(RichText::new(tx.to_string()).small().color(color));
                }
            });
    }
}

impl<'a> Panel for TradePanel<'a> {
    type Event = TradeEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.trade_heading);

        ui.label_subdued(UI_TEXT.label_price);
        match self.price {
            Some(price) => ui.label(
                RichText::new(format_price(price))
                    .size(UI_CONFIG.price_text_size)
                    .strong()
                    .color(PLOT_CONFIG.current_price_color),
            ),
            None => ui.label(
                RichText::new(UI_TEXT.price_waiting)
                    .size(UI_CONFIG.price_text_size * 0.6)
                    .color(PLOT_CONFIG.color_text_subdued),
            ),
        };
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            let can_buy = self.price.is_some_and(|p| self.portfolio.cash() >= p);
            let can_sell = self.price.is_some() && self.portfolio.shares() > 0;

            if ui
                .add_enabled(
                    can_buy,
                    Button::new(ui.button_text_primary(UI_TEXT.button_buy)),
                )
                .clicked()
            {
                events.push(TradeEvent::Buy);
            }
            if ui
                .add_enabled(
                    can_sell,
                    Button::new(ui.button_text_secondary(UI_TEXT.button_sell)),
                )
                .clicked()
            {
                events.push(TradeEvent::Sell);
            }
        });

        if let Some(msg) = self.last_rejection {
            ui.label(RichText::new(msg).small().color(PLOT_CONFIG.color_warning));
        }

        spaced_separator(ui);
        self.render_holdings(ui);
        spaced_separator(ui);
        self.render_log(ui);

        events
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketEvent {
    Mode(FeedMode),
    Symbol(String),
}

/// Source selector, symbol entry and layer toggles for the top toolbar.
pub struct MarketPanel<'a> {
    mode: FeedMode,
    symbol_input: &'a mut String,
    visibility: &'a mut PlotVisibility,
}

impl<'a> MarketPanel<'a> {
    pub fn new(
        mode: FeedMode,
        symbol_input: &'a mut String,
        visibility: &'a mut PlotVisibility,
    ) -> Self {
        Self {
            mode,
            symbol_input,
            visibility,
        }
    }
}

impl<'a> Panel for MarketPanel<'a> {
    type Event = MarketEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();

        ui.horizontal(|ui| {
            ui.label(UI_TEXT.label_mode);
            let mut selected = self.mode;
            ComboBox::from_id_salt("feed_mode")
                .selected_text(selected.to_string())
                .show_ui(ui, |ui| {
                    for mode in FeedMode::iter() {
                        ui.selectable_value(&mut selected, mode, mode.to_string());
                    }
                });
            if selected != self.mode {
                events.push(MarketEvent::Mode(selected));
            }

            ui.separator();

            ui.label(UI_TEXT.label_symbol);
            let edit = ui.add(
                TextEdit::singleline(self.symbol_input)
                    .hint_text(UI_TEXT.hint_symbol)
                    .desired_width(UI_CONFIG.symbol_input_width),
            );
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if (ui.button(UI_TEXT.button_apply_symbol).clicked() || submitted)
                && !self.symbol_input.trim().is_empty()
            {
                events.push(MarketEvent::Symbol(self.symbol_input.trim().to_uppercase()));
            }

            ui.separator();

            ui.checkbox(&mut self.visibility.candles, UI_TEXT.label_show_candles);
            ui.checkbox(&mut self.visibility.in_progress, UI_TEXT.label_show_forming);
            ui.checkbox(&mut self.visibility.price_line, UI_TEXT.label_show_price);
        });

        events
    }
}
