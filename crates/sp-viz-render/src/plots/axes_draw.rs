use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Where a panel sits in a vertical stack, which decides the labels it prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelRole {
    /// Only panel: every label.
    Single,
    /// Main panel above a ratio panel: x ticks without labels.
    Upper,
    /// Ratio panel: x labels, but no y tick label on the edge shared with the panel above.
    Lower,
}

impl PanelRole {
    fn x_labels(self) -> bool {
        self != PanelRole::Upper
    }
}

/// Draw a standard box frame with axes, ticks, grid, and labels.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    role: PanelRole,
    config: &VizConfig,
) {
    let frame_color = Color::BLACK;
    let frame_style = LineStyle::solid(frame_color, 1.0);
    let tick_style_line = LineStyle::solid(frame_color, 0.8);
    let minor_tick_style = LineStyle::solid(frame_color, 0.6);

    let inward = config.axes.tick_direction == "in";
    let dir = if inward { -1.0 } else { 1.0 };
    let tl = config.axes.tick_length;
    let mtl = config.axes.minor_tick_length;

    // Frame rectangle
    canvas.line(area.left, area.top, area.right(), area.top, &frame_style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &frame_style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &frame_style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &frame_style);

    let grid_style = LineStyle {
        color: config.grid.color.with_alpha(config.grid.alpha),
        width: 0.5,
        dash: Some("3 3".into()),
    };

    // --- X axis ---
    let x_tick_label_style = TextStyle {
        size: config.font.tick_size,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    let x_label_top = area.bottom() + if inward { 6.0 } else { tl + 6.0 };

    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        if config.grid.show {
            canvas.line(px, area.top, px, area.bottom(), &grid_style);
        }
        canvas.line(px, area.bottom(), px, area.bottom() + dir * tl, &tick_style_line);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top - dir * tl, &tick_style_line);
        }
        if role.x_labels()
            && let Some(label) = x_axis.tick_labels.get(i)
        {
            canvas.text(px, x_label_top, label, &x_tick_label_style);
        }
    }

    for &val in &x_axis.minor_ticks {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        canvas.line(px, area.bottom(), px, area.bottom() + dir * mtl, &minor_tick_style);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top - dir * mtl, &minor_tick_style);
        }
    }

    // --- Y axis ---
    let y_tick_label_style = TextStyle {
        size: config.font.tick_size,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    let y_label_right = area.left - if inward { 6.0 } else { tl + 6.0 };

    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        if config.grid.show {
            canvas.line(area.left, py, area.right(), py, &grid_style);
        }
        canvas.line(area.left, py, area.left - dir * tl, py, &tick_style_line);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() + dir * tl, py, &tick_style_line);
        }
        if role == PanelRole::Lower && py - area.top < config.font.tick_size * 0.5 {
            continue;
        }
        if let Some(label) = y_axis.tick_labels.get(i) {
            canvas.text(y_label_right, py, label, &y_tick_label_style);
        }
    }

    for &val in &y_axis.minor_ticks {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        canvas.line(area.left, py, area.left - dir * mtl, py, &minor_tick_style);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() + dir * mtl, py, &minor_tick_style);
        }
    }

    // --- Axis labels ---
    let at_end = config.axes.label_at_end;
    let label_style = TextStyle {
        size: config.font.label_size,
        anchor: if at_end { TextAnchor::End } else { TextAnchor::Middle },
        ..Default::default()
    };

    if role.x_labels() && !x_axis.label.is_empty() {
        let label_y = x_label_top + config.font.tick_size * 1.2 + config.font.label_size + 4.0;
        let label_x = if at_end { area.right() } else { area.left + area.width / 2.0 };
        canvas.text(label_x, label_y, &x_axis.label, &label_style);
    }

    if !y_axis.label.is_empty() {
        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &y_tick_label_style).width)
            .fold(0.0_f64, f64::max);
        let label_x = y_label_right - max_tick_w - 8.0;
        let label_y = if at_end { area.top } else { area.top + area.height / 2.0 };
        canvas.text_rotated(label_x, label_y, &y_axis.label, &label_style, -90.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontHandle;
    use std::sync::OnceLock;

    fn canvas() -> Canvas {
        static EMPTY: OnceLock<FontHandle> = OnceLock::new();
        Canvas::with_fonts(400.0, 300.0, EMPTY.get_or_init(FontHandle::empty)).unwrap()
    }

    #[test]
    fn hidden_x_labels_skip_text() {
        let area = PlotArea::manual(60.0, 20.0, 300.0, 200.0);
        let x = Axis::linear(0.0, 10.0, 6).with_label("N_{L1Mu}");
        let y = Axis::log(1.0, 1e3).with_label("Events");
        let config = VizConfig::default();

        let mut full = canvas();
        draw_axes(&mut full, &area, &x, &y, PanelRole::Single, &config);
        let full = full.finish_svg();
        assert!(full.contains(">N<tspan"));

        let mut hidden = canvas();
        draw_axes(&mut hidden, &area, &x, &y, PanelRole::Upper, &config);
        let hidden = hidden.finish_svg();
        assert!(!hidden.contains(">N<tspan"));
        assert!(hidden.contains(">Events<"));
    }

    #[test]
    fn lower_panel_drops_top_y_label() {
        let area = PlotArea::manual(60.0, 20.0, 300.0, 100.0);
        let x = Axis::linear(0.0, 10.0, 6);
        let y = Axis::log(0.1, 10.0);
        let config = VizConfig::default();

        let mut single = canvas();
        draw_axes(&mut single, &area, &x, &y, PanelRole::Single, &config);
        let single = single.finish_svg();
        assert_eq!(single.matches(">10<tspan").count(), 3);

        let mut lower = canvas();
        draw_axes(&mut lower, &area, &x, &y, PanelRole::Lower, &config);
        let lower = lower.finish_svg();
        assert_eq!(lower.matches(">10<tspan").count(), 2);
        // the top tick itself is still drawn
        assert_eq!(
            lower.matches("<line").count(),
            single.matches("<line").count()
        );
    }
}
