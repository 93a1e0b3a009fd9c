mod plot_layers;
mod styles;
mod ui_config;
mod ui_panels;
mod ui_plot_view;
mod ui_render;
mod ui_text;
mod utils;

pub(crate) use ui_plot_view::{PlotView, PlotVisibility};
pub(crate) use utils::setup_custom_visuals;

pub use ui_text::UI_TEXT;
