use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::color::Color;
use crate::theme::BuiltinTheme;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub experiment: ExperimentConfig,
    pub colors: ColorsConfig,
    pub palette: String,
    pub output: OutputConfig,
    pub ratio: RatioConfig,
    pub series: SeriesConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Cms.base_config()
    }
}

impl VizConfig {
    pub fn palette_colors(&self) -> Vec<Color> {
        crate::color::palette_colors(&self.palette)
    }
}

/// Figure size in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 720.0,  // 10" * 72
            height: 720.0, // 10" * 72
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub legend_size: f64,
    /// Status and luminosity text; the experiment name is drawn 1.3x larger.
    pub header_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 16.0, label_size: 20.0, tick_size: 16.0, legend_size: 16.0, header_size: 18.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
    /// Axis labels at the far end of each axis (y at top, x at right).
    pub label_at_end: bool,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "in".into(),
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 10.0,
            minor_tick_length: 5.0,
            label_at_end: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: false, color: Color::hex("#cbd5e1"), alpha: 0.55 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub name: String,
    pub status: String,
    pub sqrt_s_tev: f64,
    pub lumi_fb_inv: f64,
    /// Free-form year tag, e.g. `2024` or `2024 Run 386924`.
    pub year: String,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: "CMS".into(),
            status: "Preliminary".into(),
            sqrt_s_tev: 13.6,
            lumi_fb_inv: 0.0,
            year: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Series drawn without an explicit color when they are the ratio reference.
    pub reference: Color,
    /// Dashed unity line in the ratio panel.
    pub ratio_line: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self { reference: Color::BLACK, ratio_line: Color::hex("darkgray") }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: 150 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioConfig {
    /// Share of the stacked plot height given to the ratio panel.
    pub height_frac: f64,
    pub gap: f64,
    pub y_range: Option<[f64; 2]>,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self { height_frac: 1.0 / 3.0, gap: 0.0, y_range: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub marker_size: f64,
    pub line_width: f64,
    pub markers: bool,
    pub cap_width: f64,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self { marker_size: 3.0, line_width: 1.5, markers: true, cap_width: 0.0 }
    }
}

/// Resolve a VizConfig from an optional YAML style tree.
/// Priority: user overrides → theme base config (picked by the user's `theme` key).
pub fn resolve_config(user: Option<&Value>) -> crate::Result<VizConfig> {
    apply_overrides(theme_for(user).base_config(), user)
}

/// Theme named by the style's `theme` key, CMS otherwise.
pub fn theme_for(user: Option<&Value>) -> BuiltinTheme {
    user.and_then(|v| v.get("theme"))
        .and_then(Value::as_str)
        .map(BuiltinTheme::parse)
        .unwrap_or(BuiltinTheme::Cms)
}

/// Deep-merge a partial YAML style onto `base`. Keys absent from `user` keep their base value.
pub fn apply_overrides(base: VizConfig, user: Option<&Value>) -> crate::Result<VizConfig> {
    let Some(user) = user.filter(|v| !v.is_null()) else {
        return Ok(base);
    };
    if !user.is_mapping() {
        return Err(crate::RenderError::Config("style must be a mapping".into()));
    }

    let mut merged =
        serde_yaml_ng::to_value(base).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    merge_values(&mut merged, user);

    serde_yaml_ng::from_value(merged).map_err(|e| crate::RenderError::Config(e.to_string()))
}

/// Same as [`resolve_config`], from YAML text.
pub fn resolve_config_str(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    match user_yaml {
        None => Ok(VizConfig::default()),
        Some(yaml) => {
            let value: Value = serde_yaml_ng::from_str(yaml)
                .map_err(|e| crate::RenderError::Config(e.to_string()))?;
            resolve_config(Some(&value))
        }
    }
}

fn merge_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Mapping(b), Value::Mapping(o)) => {
            for (k, v) in o {
                match b.get_mut(k) {
                    Some(slot) => merge_values(slot, v),
                    None => {
                        b.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (slot, v) => *slot = v.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_cms() {
        let cfg = VizConfig::default();
        assert_eq!(cfg.theme, "cms");
        assert_eq!(cfg.experiment.name, "CMS");
    }

    #[test]
    fn partial_override_keeps_theme_values() {
        let cfg = resolve_config_str(Some("font:\n  size: 12\nexperiment:\n  lumi_fb_inv: 1.62\n"))
            .unwrap();
        assert_eq!(cfg.font.size, 12.0);
        assert_eq!(cfg.font.header_size, 18.0);
        assert_eq!(cfg.font.label_size, VizConfig::default().font.label_size);
        assert_eq!(cfg.experiment.lumi_fb_inv, 1.62);
        assert_eq!(cfg.experiment.name, "CMS");
    }

    #[test]
    fn theme_key_selects_base() {
        let cfg = resolve_config_str(Some("theme: minimal\n")).unwrap();
        assert_eq!(cfg.theme, "minimal");
        assert_eq!(cfg.axes.tick_direction, "out");
    }

    #[test]
    fn null_style_is_default() {
        let cfg = resolve_config(Some(&Value::Null)).unwrap();
        assert_eq!(cfg.palette, VizConfig::default().palette);
    }

    #[test]
    fn bad_color_is_config_error() {
        let err = resolve_config_str(Some("colors:\n  reference: notacolor\n")).unwrap_err();
        assert!(matches!(err, crate::RenderError::Config(_)));
    }

    #[test]
    fn overrides_win_over_base() {
        let mut base = VizConfig::default();
        base.figure.width = 576.0;
        base.experiment.year = "2024".into();
        let style: Value = serde_yaml_ng::from_str("figure:\n  height: 400\n").unwrap();
        let cfg = apply_overrides(base, Some(&style)).unwrap();
        assert_eq!(cfg.figure.width, 576.0);
        assert_eq!(cfg.figure.height, 400.0);
        assert_eq!(cfg.experiment.year, "2024");
    }

    #[test]
    fn non_mapping_is_rejected() {
        assert!(resolve_config_str(Some("- 1\n- 2\n")).is_err());
    }
}
