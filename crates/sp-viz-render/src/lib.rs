//! Publication-style rendering of trigger histogram overlays.
//!
//! A [`figure::HistogramFigure`] is drawn onto an immediate-mode SVG
//! [`canvas::Canvas`] styled by a [`config::VizConfig`], then converted to
//! PNG (resvg) or PDF (svg2pdf).

pub mod canvas;
pub mod color;
pub mod config;
pub mod figure;
pub mod font;
pub mod header;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use std::path::Path;

use config::VizConfig;
use figure::HistogramFigure;
use thiserror::Error;

pub use output::SavedFigure;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[error("PDF conversion error: {0}")]
    Pdf(String),
    #[error(transparent)]
    Hist(#[from] sp_hist::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render a figure to an SVG string.
pub fn render_svg(fig: &HistogramFigure, config: &VizConfig) -> Result<String> {
    plots::histogram::render(fig, config)
}

/// Render a figure to bytes in the specified format (`svg`, `png` or `pdf`).
pub fn render_to_bytes(fig: &HistogramFigure, format: &str, config: &VizConfig) -> Result<Vec<u8>> {
    let svg = render_svg(fig, config)?;
    match format {
        "svg" => Ok(svg.into_bytes()),
        "png" => output::png::svg_to_png(&svg, config.output.dpi),
        "pdf" => output::pdf::svg_to_pdf(&svg),
        other => Err(RenderError::UnknownFormat(other.to_string())),
    }
}

/// Render once and write `<prefix>.pdf` and `<prefix>.png`.
pub fn save_figure(fig: &HistogramFigure, prefix: &Path, config: &VizConfig) -> Result<SavedFigure> {
    let svg = render_svg(fig, config)?;
    output::save_figure(&svg, prefix, config.output.dpi)
}
