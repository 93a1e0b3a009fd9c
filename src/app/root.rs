use std::sync::Arc;

use anyhow::Context as _;
use eframe::{Frame, egui::Context};

use crate::{
    Cli,
    config::QUOTES,
    data::TwelveDataProvider,
    engine::{FeedMode, Simulation, SimulationSettings},
    ui::{PlotView, PlotVisibility, setup_custom_visuals},
    utils::AppInstant,
};

use crate::config::DF;

pub struct App {
    pub(crate) sim: Simulation,
    pub(crate) plot_view: PlotView,
    pub(crate) plot_visibility: PlotVisibility,
    /// Symbol text box contents; only applied on Enter or the Load button.
    pub(crate) symbol_input: String,
    /// Why the last buy/sell was refused, cleared by the next successful trade.
    pub(crate) last_rejection: Option<String>,
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> anyhow::Result<Self> {
        setup_custom_visuals(&cc.egui_ctx);

        let provider = TwelveDataProvider::new().context("Failed to build quote client")?;

        let settings = SimulationSettings {
            mode: if args.live {
                FeedMode::Live
            } else {
                FeedMode::Synthetic
            },
            symbol: args.symbol,
            api_key: args.api_key,
            ..SimulationSettings::default()
        };

        if settings.mode == FeedMode::Live && settings.api_key.is_none() {
            log::warn!(
                "Starting in live mode without an API key (--api-key or {}); the feed will stay idle",
                QUOTES.api_key_env
            );
        }

        let sim = Simulation::new(settings, Arc::new(provider));
        log::info!("Starting {} mode for {}", sim.mode(), sim.symbol());

        Ok(Self {
            symbol_input: sim.symbol().to_string(),
            sim,
            plot_view: PlotView::new(),
            plot_visibility: PlotVisibility::default(),
            last_rejection: None,
        })
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        crate::trace_time!("Simulation tick", 2_000, {
            self.sim.tick(AppInstant::now());
        });

        crate::trace_time!("Render", DF.slow_frame_micros, {
            self.render_top_panel(ctx);
            self.render_status_panel(ctx);
            self.render_trade_panel(ctx);
            self.render_central_panel(ctx);
        });

        // Synthetic mode produces a tick per frame, live mode needs to keep draining the worker.
        ctx.request_repaint();
    }
}
