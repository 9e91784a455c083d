use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

pub enum LegendKind {
    Line(Option<String>), // dash pattern
    /// Step line with a data marker on top, as drawn for each histogram series.
    LineMarker(Option<String>),
}

/// Draw a legend in the top-right corner of the plot area and return its box.
pub fn draw_legend(
    canvas: &mut Canvas,
    area: &PlotArea,
    entries: &[LegendEntry],
    font_size: f64,
    frame: bool,
) -> Option<PlotArea> {
    if entries.is_empty() {
        return None;
    }

    let row_height = font_size * 1.4;
    let swatch_w = font_size * 1.8;
    let gap = 6.0;
    let padding = 8.0;

    let text_style = TextStyle { size: font_size, baseline: TextBaseline::Central, ..Default::default() };

    let max_w = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, &text_style).width)
        .fold(0.0_f64, f64::max);

    let legend_w = padding + swatch_w + gap + max_w + padding;
    let legend_h = padding + entries.len() as f64 * row_height + padding;

    let lx = area.right() - legend_w - 5.0;
    let ly = area.top + 5.0;

    if frame {
        let bg_style = Style {
            fill: Some(Color::rgba(255, 255, 255, 0.9)),
            stroke: Some(Color::rgb(200, 200, 200)),
            stroke_width: 0.5,
            opacity: 1.0,
        };
        canvas.rect(lx, ly, legend_w, legend_h, &bg_style);
    }

    for (i, entry) in entries.iter().enumerate() {
        let ey = ly + padding + i as f64 * row_height + row_height / 2.0;
        let sx = lx + padding;

        let dash = match &entry.kind {
            LegendKind::Line(dash) | LegendKind::LineMarker(dash) => dash.clone(),
        };
        let ls = LineStyle { color: entry.color, width: 1.5, dash };
        canvas.line(sx, ey, sx + swatch_w, ey, &ls);
        if let LegendKind::LineMarker(_) = entry.kind {
            canvas.marker(
                sx + swatch_w / 2.0,
                ey,
                &MarkerStyle { color: entry.color, size: 3.0, ..Default::default() },
            );
        }

        canvas.text(sx + swatch_w + gap, ey, &entry.label, &text_style);
    }
    Some(PlotArea::manual(lx, ly, legend_w, legend_h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontHandle;
    use std::sync::OnceLock;

    fn canvas() -> Canvas {
        static EMPTY: OnceLock<FontHandle> = OnceLock::new();
        Canvas::with_fonts(300.0, 200.0, EMPTY.get_or_init(FontHandle::empty)).unwrap()
    }

    fn entry(label: &str) -> LegendEntry {
        LegendEntry { label: label.into(), color: Color::BLACK, kind: LegendKind::LineMarker(None) }
    }

    #[test]
    fn frameless_legend_has_no_box() {
        let mut c = canvas();
        let area = PlotArea::manual(10.0, 10.0, 280.0, 180.0);
        draw_legend(&mut c, &area, &[entry("Zero Bias")], 10.0, false);
        let svg = c.finish_svg();
        assert!(svg.contains("Zero Bias"));
        assert!(svg.contains("<circle"));
        assert_eq!(svg.matches("<rect").count(), 1); // page background only
    }

    #[test]
    fn labels_stay_inside_plot_area() {
        let mut c = Canvas::with_fonts(648.0, 504.0, FontHandle::shared()).unwrap();
        let area = PlotArea::manual(90.0, 40.0, 530.0, 400.0);
        let labels = ["AXO Nominal", "AXO VTight", "Zero Bias", "CICADA Medium"];
        let entries: Vec<LegendEntry> = labels.iter().map(|l| entry(l)).collect();
        let style = TextStyle { size: 16.0, baseline: TextBaseline::Central, ..Default::default() };
        let widest = labels.iter().map(|l| c.measure_text(l, &style).width).fold(0.0, f64::max);

        let bbox = draw_legend(&mut c, &area, &entries, 16.0, false).unwrap();
        assert!(bbox.right() <= area.right());
        assert!(bbox.left >= area.left);
        // swatch, gap and padding around the widest label
        assert!(bbox.width >= widest + 16.0 * 1.8 + 6.0 + 16.0);
    }

    #[test]
    fn no_entries_no_box() {
        let mut c = canvas();
        let area = PlotArea::manual(10.0, 10.0, 280.0, 180.0);
        assert!(draw_legend(&mut c, &area, &[], 10.0, true).is_none());
    }

    #[test]
    fn framed_legend_draws_box() {
        let mut c = canvas();
        let area = PlotArea::manual(10.0, 10.0, 280.0, 180.0);
        draw_legend(&mut c, &area, &[entry("a"), entry("b")], 10.0, true);
        assert_eq!(c.finish_svg().matches("<rect").count(), 2);
    }
}
