use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Compute auto-margins from axis labels and config.
    ///
    /// `y_axes` lists every y axis sharing the left edge (main and ratio panels).
    pub fn auto(canvas: &Canvas, y_axes: &[&Axis], x_axis: &Axis, config: &VizConfig) -> Self {
        let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };

        // Left margin: widest y tick label + rotated axis label
        let max_tick_w = y_axes
            .iter()
            .flat_map(|y| y.tick_labels.iter())
            .map(|l| canvas.measure_text(l, &tick_style).width)
            .fold(0.0_f64, f64::max);
        let mut left = 15.0 + max_tick_w + 8.0;
        if y_axes.iter().any(|y| !y.label.is_empty()) {
            left += config.font.label_size * 1.2 + 6.0;
        }

        // Bottom margin: x tick labels + axis label
        let mut bottom = 15.0 + config.font.tick_size * 1.2 + 6.0;
        if !x_axis.label.is_empty() {
            bottom += config.font.label_size * 1.2 + 6.0;
        }

        let has_header = !config.experiment.name.is_empty()
            || config.experiment.lumi_fb_inv > 0.0
            || config.experiment.sqrt_s_tev > 0.0;
        let top = if has_header { config.font.header_size * 1.3 + 12.0 } else { 12.0 };

        let right = 20.0;

        let width = canvas.width - left - right;
        let height = canvas.height - top - bottom;

        Self { left, top, width: width.max(50.0), height: height.max(50.0) }
    }

    /// Manual margins (for multi-panel layouts).
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}
