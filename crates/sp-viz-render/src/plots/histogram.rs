use sp_hist::{RatioSeries, ReducedSeries};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::figure::{AxisSpec, HistogramFigure, RatioPanelSpec};
use crate::header::draw_experiment_header;
use crate::layout::axes::Axis;
use crate::layout::legend::{self, LegendEntry, LegendKind};
use crate::layout::margins::PlotArea;
use crate::layout::multi_panel::MainRatioLayout;
use crate::plots::axes_draw::{PanelRole, draw_axes};
use crate::primitives::*;

/// Render a step + error bar overlay, with an optional ratio panel underneath.
pub fn render(fig: &HistogramFigure, config: &VizConfig) -> crate::Result<String> {
    fig.validate()?;

    let mut canvas = Canvas::new(config.figure.width, config.figure.height)?;
    let colors = series_colors(fig, &config.palette_colors());

    let x_axis = axis_from_spec(&fig.x_axis, 8);
    let y_axis = axis_from_spec(&fig.y_axis, 6);
    let ratio_axis = fig.ratio.as_ref().map(|r| ratio_y_axis(r, config));

    let mut y_axes = vec![&y_axis];
    if let Some(ra) = &ratio_axis {
        y_axes.push(ra);
    }
    let area = PlotArea::auto(&canvas, &y_axes, &x_axis, config);

    let (main, ratio_area) = match &ratio_axis {
        Some(_) => {
            let layout = MainRatioLayout::split(&area, config.ratio.gap, config.ratio.height_frac);
            (layout.main, Some(layout.ratio))
        }
        None => (area, None),
    };

    draw_experiment_header(&mut canvas, &main, config);

    // --- Main panel ---
    let main_role = if ratio_area.is_some() { PanelRole::Upper } else { PanelRole::Single };
    draw_axes(&mut canvas, &main, &x_axis, &y_axis, main_role, config);

    canvas.push_clip(main.left, main.top, main.width, main.height);
    for (spec, &color) in fig.series.iter().zip(&colors) {
        let panel = Panel { area: &main, x: &x_axis, y: &y_axis };
        draw_series(&mut canvas, &panel, &spec.data, color, spec.dash.as_deref(), config);
    }
    canvas.pop_clip();

    let note_style = TextStyle { size: config.font.size, ..Default::default() };
    for note in &fig.annotations {
        if !(x_axis.accepts(note.x) && y_axis.accepts(note.y)) {
            log::warn!("annotation '{}' is outside a log axis, skipped", note.text);
            continue;
        }
        let px = x_axis.data_to_pixel(note.x, main.left, main.right());
        let py = y_axis.data_to_pixel(note.y, main.bottom(), main.top);
        canvas.text(px, py, &note.text, &note_style);
    }

    // Every series gets an entry, drawn or not.
    let entries: Vec<LegendEntry> = fig
        .series
        .iter()
        .zip(&colors)
        .map(|(s, &color)| {
            let dash = s.dash.clone();
            LegendEntry {
                label: s.label.clone(),
                color,
                kind: if config.series.markers {
                    LegendKind::LineMarker(dash)
                } else {
                    LegendKind::Line(dash)
                },
            }
        })
        .collect();
    legend::draw_legend(&mut canvas, &main, &entries, config.font.legend_size, false);

    // --- Ratio panel ---
    if let (Some(spec), Some(ra), Some(rarea)) = (&fig.ratio, &ratio_axis, &ratio_area) {
        draw_axes(&mut canvas, rarea, &x_axis, ra, PanelRole::Lower, config);
        canvas.push_clip(rarea.left, rarea.top, rarea.width, rarea.height);

        if ra.accepts(1.0) {
            let ref_py = ra.data_to_pixel(1.0, rarea.bottom(), rarea.top);
            canvas.line(
                rarea.left,
                ref_py,
                rarea.right(),
                ref_py,
                &LineStyle::dashed(config.colors.ratio_line, 1.0),
            );
        }

        let panel = Panel { area: rarea, x: &x_axis, y: ra };
        for entry in &spec.entries {
            let color = colors[entry.series];
            draw_series(&mut canvas, &panel, &ratio_as_series(&entry.data), color, None, config);
        }
        canvas.pop_clip();
    }

    Ok(canvas.finish_svg())
}

struct Panel<'a> {
    area: &'a PlotArea,
    x: &'a Axis,
    y: &'a Axis,
}

/// Fixed colors stay put; the rest walk the palette in order.
pub fn series_colors(fig: &HistogramFigure, palette: &[Color]) -> Vec<Color> {
    let mut next = 0usize;
    fig.series
        .iter()
        .map(|s| match s.color {
            Some(c) => c,
            None => {
                let c = palette.get(next % palette.len().max(1)).copied().unwrap_or(Color::BLACK);
                next += 1;
                c
            }
        })
        .collect()
}

fn axis_from_spec(spec: &AxisSpec, target_ticks: usize) -> Axis {
    let axis = if spec.log {
        Axis::log(spec.min, spec.max)
    } else {
        Axis::linear(spec.min, spec.max, target_ticks)
    };
    axis.with_label(spec.label.clone())
}

/// Ratio-panel y axis: explicit range, then the configured range, then a fit to the data.
fn ratio_y_axis(spec: &RatioPanelSpec, config: &VizConfig) -> Axis {
    let fixed = spec.y_range.or(config.ratio.y_range.map(|[lo, hi]| (lo, hi)));
    let axis = match fixed {
        Some((lo, hi)) if spec.log && lo > 0.0 && lo < hi => Axis::log(lo, hi),
        Some((lo, hi)) if !spec.log && lo < hi => Axis::linear(lo, hi, 4),
        _ => {
            let (lo, hi) = ratio_data_range(spec.entries.iter().map(|e| &e.data), spec.log);
            if spec.log { Axis::auto_log(lo, hi) } else { Axis::auto_linear(lo, hi, 4) }
        }
    };
    axis.with_label(spec.y_label.clone())
}

/// Range covering every finite `ratio ± error` (positive only on log axes) and 1.
pub fn ratio_data_range<'a>(series: impl Iterator<Item = &'a RatioSeries>, log: bool) -> (f64, f64) {
    let mut lo = 1.0_f64;
    let mut hi = 1.0_f64;
    for s in series {
        for (&r, &e) in s.ratio.iter().zip(&s.errors) {
            if !r.is_finite() {
                continue;
            }
            let e = if e.is_finite() { e } else { 0.0 };
            for v in [r - e, r, r + e] {
                if log && v <= 0.0 {
                    continue;
                }
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
    }
    if !log {
        let pad = 0.05 * (hi - lo).max(0.1);
        lo -= pad;
        hi += pad;
    }
    (lo, hi)
}

fn ratio_as_series(r: &RatioSeries) -> ReducedSeries {
    ReducedSeries { edges: r.edges.clone(), counts: r.ratio.clone(), errors: r.errors.clone() }
}

/// Step-post polylines in data coordinates.
///
/// A bin whose value cannot sit on the axes (NaN, or non-positive on a log axis)
/// breaks the line; the next drawable bin starts a new segment. On a log x axis a
/// bin starting at or below zero is cut at the axis minimum.
pub fn step_segments(edges: &[f64], values: &[f64], x: &Axis, y: &Axis) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        let hi = edges[i + 1];
        let lo = if x.log && edges[i] <= 0.0 { x.min.min(hi) } else { edges[i] };
        if !(y.accepts(v) && x.accepts(lo) && x.accepts(hi)) {
            if current.len() >= 2 {
                segments.push(std::mem::take(&mut current));
            }
            current.clear();
            continue;
        }
        current.push((lo, v));
        current.push((hi, v));
    }
    if current.len() >= 2 {
        segments.push(current);
    }
    segments
}

fn draw_series(
    canvas: &mut Canvas,
    panel: &Panel<'_>,
    data: &ReducedSeries,
    color: Color,
    dash: Option<&str>,
    config: &VizConfig,
) {
    if data.is_empty() {
        return;
    }
    let Panel { area, x, y } = *panel;
    let to_px = |dx: f64, dy: f64| {
        (x.data_to_pixel(dx, area.left, area.right()), y.data_to_pixel(dy, area.bottom(), area.top))
    };

    let line = LineStyle {
        color,
        width: config.series.line_width,
        dash: dash.map(str::to_string),
    };
    for seg in step_segments(&data.edges, &data.counts, x, y) {
        let points: Vec<(f64, f64)> = seg.iter().map(|&(dx, dy)| to_px(dx, dy)).collect();
        canvas.polyline(&points, &line);
    }

    let err_style = LineStyle::solid(color, config.series.line_width);
    let marker = MarkerStyle { color, size: config.series.marker_size, ..Default::default() };
    for ((cx, &v), &e) in data.centers().into_iter().zip(&data.counts).zip(&data.errors) {
        if !(y.accepts(v) && x.accepts(cx)) {
            continue;
        }
        let (px, py) = to_px(cx, v);
        if e.is_finite() && e > 0.0 {
            let mut lo = v - e;
            if y.log && lo <= 0.0 {
                // Below the visible range; the panel clip cuts it.
                lo = y.min * 0.1;
            }
            let (_, py_lo) = to_px(cx, lo);
            let (_, py_hi) = to_px(cx, v + e);
            canvas.error_bar(px, py_lo, py_hi, config.series.cap_width, &err_style);
        }
        if config.series.markers {
            canvas.marker(px, py, &marker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{Annotation, RatioEntry, SeriesSpec};

    fn series(counts: &[f64]) -> ReducedSeries {
        let edges: Vec<f64> = (0..=counts.len()).map(|i| i as f64).collect();
        sp_hist::reduce_counts(counts, &edges, false).unwrap()
    }

    fn figure() -> HistogramFigure {
        HistogramFigure::new(
            AxisSpec::linear("N_{L1Mu}", 0.0, 4.0),
            AxisSpec::log("Events", 0.5, 1e3),
        )
    }

    #[test]
    fn step_breaks_on_nan_and_log_zero() {
        let edges = [0.0, 1.0, 2.0, 3.0, 4.0];
        let x = Axis::linear(0.0, 4.0, 5);
        let segs = step_segments(&edges, &[1.0, f64::NAN, 2.0, 3.0], &x, &Axis::log(0.1, 10.0));
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0], vec![(0.0, 1.0), (1.0, 1.0)]);
        assert_eq!(segs[1].len(), 4);

        let segs = step_segments(&edges, &[1.0, 0.0, 2.0, 3.0], &x, &Axis::log(0.1, 10.0));
        assert_eq!(segs.len(), 2);
        let segs = step_segments(&edges, &[1.0, 0.0, 2.0, 3.0], &x, &Axis::linear(0.0, 10.0, 5));
        assert_eq!(segs.len(), 1);
    }

    #[test]
    fn log_x_bin_from_zero_is_cut_at_axis_min() {
        let x = Axis::log(5e-2, 1e3);
        let y = Axis::log(0.5, 1e3);
        let segs = step_segments(&[0.0, 1.0, 10.0], &[2.0, 3.0], &x, &y);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0], vec![(5e-2, 2.0), (1.0, 2.0), (1.0, 3.0), (10.0, 3.0)]);

        let segs = step_segments(&[-2.0, 0.0, 10.0], &[2.0, 3.0], &x, &y);
        assert_eq!(segs, vec![vec![(5e-2, 3.0), (10.0, 3.0)]]);
    }

    #[test]
    fn palette_skips_fixed_colors() {
        let mut fig = figure();
        fig.series.push(SeriesSpec::new("Zero Bias", series(&[1.0])).with_color(Color::BLACK));
        fig.series.push(SeriesSpec::new("a", series(&[1.0])));
        fig.series.push(SeriesSpec::new("b", series(&[1.0])));
        let palette = [Color::hex("#111111"), Color::hex("#222222")];
        let colors = series_colors(&fig, &palette);
        assert_eq!(colors, vec![Color::BLACK, palette[0], palette[1]]);
    }

    #[test]
    fn ratio_range_ignores_nan() {
        let r = RatioSeries {
            edges: vec![0.0, 1.0, 2.0],
            ratio: vec![f64::NAN, 2.0],
            errors: vec![f64::NAN, 0.5],
        };
        let (lo, hi) = ratio_data_range(std::iter::once(&r), true);
        assert_eq!(lo, 1.0);
        assert_eq!(hi, 2.5);
    }

    #[test]
    fn empty_series_renders_with_legend() {
        let mut fig = figure();
        fig.series.push(SeriesSpec::new("Double Muon", ReducedSeries::empty()));
        let svg = render(&fig, &VizConfig::default()).unwrap();
        assert!(svg.contains("Double Muon"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn ratio_panel_and_annotation() {
        let mut fig = figure();
        let zb = series(&[10.0, 20.0, 0.0, 5.0]);
        let axo = series(&[5.0, 20.0, 3.0, 0.0]);
        fig.series.push(SeriesSpec::new("Zero Bias", zb.clone()).with_color(Color::BLACK));
        fig.series.push(SeriesSpec::new("AXO Nominal", axo.clone()));
        fig.ratio = Some(RatioPanelSpec {
            y_label: "Ratio to Zero Bias".into(),
            y_range: None,
            log: true,
            entries: vec![RatioEntry { series: 1, data: sp_hist::ratio(&axo, &zb).unwrap() }],
        });
        fig.annotations.push(Annotation { x: 1.0, y: 100.0, text: "p_{T} > 3 GeV".into() });

        let svg = render(&fig, &VizConfig::default()).unwrap();
        assert!(svg.contains("Ratio to Zero Bias"));
        assert!(svg.contains(r#"stroke-dasharray="6 3""#));
        assert!(svg.contains("clip1"));
        assert!(svg.contains("&gt; 3 GeV"));
    }

    #[test]
    fn invalid_figure_is_an_error() {
        let mut fig = figure();
        fig.y_axis.min = -1.0;
        assert!(render(&fig, &VizConfig::default()).is_err());
    }
}
