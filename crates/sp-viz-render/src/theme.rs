use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    Cms,
    Minimal,
}

impl BuiltinTheme {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            "cms" => Self::Cms,
            other => {
                log::warn!("unknown theme '{other}', using cms");
                Self::Cms
            }
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Cms => cms(),
            Self::Minimal => minimal(),
        }
    }
}

/// mplhep `style.CMS`: inward ticks on all four sides, Petroff palette, no grid.
fn cms() -> VizConfig {
    VizConfig {
        theme: "cms".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        grid: GridConfig::default(),
        experiment: ExperimentConfig::default(),
        colors: ColorsConfig::default(),
        palette: "cms_petroff10".into(),
        output: OutputConfig::default(),
        ratio: RatioConfig::default(),
        series: SeriesConfig::default(),
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        figure: FigureConfig { width: 432.0, height: 302.4 },
        font: FontConfig {
            size: 9.0,
            label_size: 10.0,
            tick_size: 8.0,
            legend_size: 8.0,
            header_size: 10.0,
        },
        axes: AxesConfig {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 4.0,
            minor_tick_length: 2.0,
            label_at_end: false,
        },
        experiment: ExperimentConfig {
            name: String::new(),
            status: String::new(),
            sqrt_s_tev: 0.0,
            lumi_fb_inv: 0.0,
            year: String::new(),
        },
        series: SeriesConfig { marker_size: 2.0, line_width: 1.0, ..SeriesConfig::default() },
        palette: "tableau10".into(),
        ..cms()
    }
}
