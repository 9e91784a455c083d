use crate::layout::margins::PlotArea;

/// Main + ratio panel layout sharing one x axis.
/// The ratio panel gets `ratio_frac` of the stacked height (1/3 for a 2:1 split).
#[derive(Debug, Clone)]
pub struct MainRatioLayout {
    pub main: PlotArea,
    pub ratio: PlotArea,
}

impl MainRatioLayout {
    pub fn new(
        left: f64,
        top: f64,
        width: f64,
        total_height: f64,
        gap: f64,
        ratio_frac: f64,
    ) -> Self {
        let ratio_h = (total_height - gap) * ratio_frac;
        let main_h = total_height - ratio_h - gap;

        Self {
            main: PlotArea::manual(left, top, width, main_h),
            ratio: PlotArea::manual(left, top + main_h + gap, width, ratio_h),
        }
    }

    /// Split an auto-margined area.
    pub fn split(area: &PlotArea, gap: f64, ratio_frac: f64) -> Self {
        Self::new(area.left, area.top, area.width, area.height, gap, ratio_frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn two_to_one_split() {
        let l = MainRatioLayout::new(0.0, 0.0, 100.0, 300.0, 0.0, 1.0 / 3.0);
        assert_relative_eq!(l.main.height, 200.0, epsilon = 1e-9);
        assert_relative_eq!(l.ratio.height, 100.0, epsilon = 1e-9);
        assert_relative_eq!(l.ratio.top, l.main.bottom(), epsilon = 1e-9);
    }

    #[test]
    fn gap_is_excluded() {
        let l = MainRatioLayout::new(0.0, 10.0, 100.0, 310.0, 10.0, 1.0 / 3.0);
        assert_relative_eq!(l.main.height, 200.0, epsilon = 1e-9);
        assert_relative_eq!(l.ratio.top, 220.0, epsilon = 1e-9);
    }
}
