use crate::canvas::Canvas;
use crate::config::{ExperimentConfig, VizConfig};
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw the experiment header above the top panel:
/// **CMS** *Preliminary* on the left, `1.62 fb^{-1} (2024, 13.6 TeV)` on the right.
pub fn draw_experiment_header(canvas: &mut Canvas, area: &PlotArea, config: &VizConfig) {
    let exp = &config.experiment;
    let y = area.top - 6.0;

    if !exp.name.is_empty() {
        let bold_style = TextStyle {
            size: config.font.header_size * 1.3,
            weight: FontWeight::Bold,
            ..Default::default()
        };
        canvas.text(area.left, y, &exp.name, &bold_style);
        let name_w = canvas.measure_text(&exp.name, &bold_style).width;

        if !exp.status.is_empty() {
            let italic_style = TextStyle {
                size: config.font.header_size,
                style: FontStyle::Italic,
                ..Default::default()
            };
            canvas.text(area.left + name_w + 6.0, y, &exp.status, &italic_style);
        }
    }

    if let Some(info) = lumi_text(exp) {
        let info_style = TextStyle {
            size: config.font.header_size,
            anchor: TextAnchor::End,
            ..Default::default()
        };
        canvas.text(area.right(), y, &info, &info_style);
    }
}

/// Right-hand header text, `None` when there is nothing to show.
pub fn lumi_text(exp: &ExperimentConfig) -> Option<String> {
    let mut paren = Vec::new();
    if !exp.year.is_empty() {
        paren.push(exp.year.clone());
    }
    if exp.sqrt_s_tev > 0.0 {
        paren.push(format!("{} TeV", exp.sqrt_s_tev));
    }

    let mut out = String::new();
    if exp.lumi_fb_inv > 0.0 {
        out.push_str(&format!("{} fb^{{-1}}", exp.lumi_fb_inv));
    }
    if !paren.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("({})", paren.join(", ")));
    }
    (!out.is_empty()).then_some(out)
}
