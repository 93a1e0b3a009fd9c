#![allow(clippy::collapsible_if)]

// Core modules
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod ui;
pub mod utils;

pub use app::App;
pub use engine::{FeedMode, Simulation, SimulationSettings};

use clap::Parser;

use crate::config::QUOTES;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ticker symbol to trade and chart
    #[arg(long, default_value = QUOTES.default_symbol)]
    pub symbol: String,

    /// Start with the Twelve Data feed instead of the synthetic random walk
    #[arg(long, default_value_t = false)]
    pub live: bool,

    /// Twelve Data API key
    #[arg(long, env = "TWELVE_DATA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Creates the GUI app. Called from the eframe creator closure in `main`.
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> anyhow::Result<App> {
    App::new(cc, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["trading-sim"]).unwrap();
        assert_eq!(cli.symbol, QUOTES.default_symbol);
        assert!(!cli.live);
    }

    #[test]
    fn test_cli_flags() {
        let cli =
            Cli::try_parse_from(["trading-sim", "--symbol", "MSFT", "--live", "--api-key", "k"])
                .unwrap();
        assert_eq!(cli.symbol, "MSFT");
        assert!(cli.live);
        assert_eq!(cli.api_key.as_deref(), Some("k"));
    }
}
