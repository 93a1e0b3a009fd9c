use eframe::egui::{Color32, Frame, Margin, Stroke};

/// Palette shared by the panel frames and `setup_custom_visuals`.
#[derive(Clone, Copy)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub chart_background: Color32,
    pub toolbar: Color32,
    pub trade_panel: Color32,
    pub status_bar: Color32,
    pub panel_border: Color32,
}

/// Layout knobs for the toolbar, trade panel, chart and status bar.
#[derive(Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub toolbar_height: f32,
    pub trade_panel_width: f32,
    pub trade_panel_padding: i8,
    /// (horizontal, vertical)
    pub status_bar_padding: (i8, i8),
    /// Room right of the chart for the price axis labels
    pub price_axis_gutter: i8,
    pub price_text_size: f32,
    pub symbol_input_width: f32,
    /// Rows shown in the transaction log before it scrolls
    pub max_log_rows: usize,
}

pub const UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,
        heading: Color32::YELLOW,
        subsection_heading: Color32::ORANGE,
        chart_background: Color32::from_rgb(18, 20, 26),
        toolbar: Color32::from_rgb(30, 32, 38),
        trade_panel: Color32::from_rgb(25, 25, 25),
        status_bar: Color32::from_rgb(22, 22, 22),
        panel_border: Color32::from_gray(50),
    },
    toolbar_height: 30.0,
    trade_panel_width: 260.0,
    trade_panel_padding: 10,
    status_bar_padding: (8, 3),
    price_axis_gutter: 8,
    price_text_size: 28.0,
    symbol_input_width: 80.0,
    max_log_rows: 12,
};

impl UiConfig {
    pub fn toolbar_frame(&self) -> Frame {
        Frame::new()
            .fill(self.colors.toolbar)
            .stroke(Stroke::new(1.0, self.colors.panel_border))
            .inner_margin(Margin::symmetric(self.trade_panel_padding, 6))
    }

    pub fn trade_panel_frame(&self) -> Frame {
        Frame::new()
            .fill(self.colors.trade_panel)
            .inner_margin(Margin::same(self.trade_panel_padding))
    }

    pub fn status_bar_frame(&self) -> Frame {
        let (x, y) = self.status_bar_padding;
        Frame::new()
            .fill(self.colors.status_bar)
            .inner_margin(Margin::symmetric(x, y))
    }

    pub fn chart_frame(&self) -> Frame {
        Frame::new().fill(self.colors.chart_background).inner_margin(Margin {
            left: 0,
            right: self.price_axis_gutter,
            top: 4,
            bottom: 0,
        })
    }

    /// Height the transaction log may grow to before scrolling.
    pub fn log_height(&self, row_height: f32) -> f32 {
        row_height * self.max_log_rows as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bar_is_tighter_than_trade_panel() {
        let status = UI_CONFIG.status_bar_frame().inner_margin;
        let trade = UI_CONFIG.trade_panel_frame().inner_margin;
        assert!(status.top < trade.top);
        assert_eq!(trade.left, UI_CONFIG.trade_panel_padding);
    }

    #[test]
    fn test_chart_keeps_gutter_for_price_axis() {
        let margin = UI_CONFIG.chart_frame().inner_margin;
        assert_eq!(margin.right, UI_CONFIG.price_axis_gutter);
        assert_eq!(margin.left, 0);
    }

    #[test]
    fn test_log_height_scales_with_rows() {
        assert_eq!(UI_CONFIG.log_height(10.0), 10.0 * UI_CONFIG.max_log_rows as f32);
    }
}
