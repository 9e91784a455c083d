//! Caller-facing description of a histogram overlay figure.

use sp_hist::{RatioSeries, ReducedSeries};

use crate::RenderError;
use crate::color::Color;

/// Fixed axis limits and label, supplied per plot type rather than derived from data.
#[derive(Debug, Clone)]
pub struct AxisSpec {
    /// May carry `_{}`/`^{}` markup.
    pub label: String,
    pub min: f64,
    pub max: f64,
    /// Decade ticks; `min` must then be positive.
    pub log: bool,
}

impl AxisSpec {
    pub fn linear(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max, log: false }
    }

    pub fn log(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max, log: true }
    }

    fn validate(&self, what: &str) -> crate::Result<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.min < self.max) {
            return Err(RenderError::Layout(format!(
                "{what} axis limits must satisfy min < max, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.log && self.min <= 0.0 {
            return Err(RenderError::Layout(format!(
                "{what} axis is logarithmic but min is {}",
                self.min
            )));
        }
        Ok(())
    }
}

/// One trigger's reduced histogram.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    /// Legend text.
    pub label: String,
    /// Fixed color; `None` takes the next palette color.
    pub color: Option<Color>,
    /// SVG `stroke-dasharray` for the step line, e.g. `"6 3"`; `None` is solid.
    pub dash: Option<String>,
    pub data: ReducedSeries,
}

impl SeriesSpec {
    pub fn new(label: impl Into<String>, data: ReducedSeries) -> Self {
        Self { label: label.into(), color: None, dash: None, data }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// A ratio curve drawn in the color of `series` (an index into the figure's series).
#[derive(Debug, Clone)]
pub struct RatioEntry {
    /// Index into [`HistogramFigure::series`] whose color the curve is drawn in.
    pub series: usize,
    pub data: RatioSeries,
}

#[derive(Debug, Clone)]
pub struct RatioPanelSpec {
    pub y_label: String,
    /// Fixed limits; `None` fits the finite ratio values.
    pub y_range: Option<(f64, f64)>,
    /// Log ratio axis, usually matching the main panel.
    pub log: bool,
    pub entries: Vec<RatioEntry>,
}

/// Free text at data coordinates of the main panel.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct HistogramFigure {
    /// Shared by the main and ratio panels.
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    /// Drawn and listed in the legend in this order.
    pub series: Vec<SeriesSpec>,
    /// Second panel below the main one; `None` draws a single panel.
    pub ratio: Option<RatioPanelSpec>,
    pub annotations: Vec<Annotation>,
}

impl HistogramFigure {
    pub fn new(x_axis: AxisSpec, y_axis: AxisSpec) -> Self {
        Self { x_axis, y_axis, series: Vec::new(), ratio: None, annotations: Vec::new() }
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.x_axis.validate("x")?;
        self.y_axis.validate("y")?;
        if let Some(ratio) = &self.ratio {
            if let Some((lo, hi)) = ratio.y_range {
                AxisSpec { label: String::new(), min: lo, max: hi, log: ratio.log }
                    .validate("ratio")?;
            }
            if let Some(bad) = ratio.entries.iter().find(|e| e.series >= self.series.len()) {
                return Err(RenderError::Layout(format!(
                    "ratio entry refers to series {} but the figure has {}",
                    bad.series,
                    self.series.len()
                )));
            }
        }
        Ok(())
    }
}
