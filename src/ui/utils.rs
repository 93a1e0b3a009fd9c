use eframe::egui::{Context, RichText, Ui, Visuals};

use crate::ui::ui_config::UI_CONFIG;

/// Dollar amount with thousands separators, e.g. `$10,000.00` or `-$3.25`.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "-".to_string();
    }
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Like [`format_price`] but always carries a sign, for P&L.
pub fn format_signed_price(value: f64) -> String {
    if value > 0.0 && (value * 100.0).round() > 0.0 {
        format!("+{}", format_price(value))
    } else {
        format_price(value)
    }
}

pub(crate) fn colored_subsection_heading(text: impl Into<String>) -> RichText {
    RichText::new(text.into()).color(UI_CONFIG.colors.subsection_heading)
}

pub(crate) fn section_heading(ui: &mut Ui, text: &str) {
    ui.heading(RichText::new(text).color(UI_CONFIG.colors.heading));
}

pub(crate) fn spaced_separator(ui: &mut Ui) {
    ui.add_space(4.0);
    ui.separator();
    ui.add_space(4.0);
}

pub fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();

    visuals.window_fill = UI_CONFIG.colors.chart_background;
    visuals.panel_fill = UI_CONFIG.colors.trade_panel;

    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;

    ctx.set_visuals(visuals);
    ctx.style_mut(|s| s.interaction.selectable_labels = false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(99.5), "$99.50");
        assert_eq!(format_price(250.0), "$250.00");
        assert_eq!(format_price(10_000.0), "$10,000.00");
        assert_eq!(format_price(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_price(-3.25), "-$3.25");
        assert_eq!(format_price(f64::NAN), "-");
    }

    #[test]
    fn test_tiny_negative_rounds_to_unsigned_zero() {
        assert_eq!(format_price(-0.001), "$0.00");
        assert_eq!(format_signed_price(0.001), "$0.00");
    }

    #[test]
    fn test_signed_price() {
        assert_eq!(format_signed_price(12.5), "+$12.50");
        assert_eq!(format_signed_price(-12.5), "-$12.50");
        assert_eq!(format_signed_price(0.0), "$0.00");
    }
}
