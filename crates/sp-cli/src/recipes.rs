//! The four scouting plot recipes: which histogram, which triggers, which axes.

use anyhow::{Context, Result};
use clap::ValueEnum;
use sp_hist::{DatasetSelection, HistogramBundle, PlottingConfig, ReduceOptions, ReducedSeries};
use sp_viz_render::config::{VizConfig, apply_overrides, theme_for};
use sp_viz_render::figure::{
    Annotation, AxisSpec, HistogramFigure, RatioEntry, RatioPanelSpec, SeriesSpec,
};

const ZERO_BIAS: &str = "DST_PFScouting_ZeroBias";

/// L1 object for `obj-mult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MultObject {
    #[value(name = "L1Mu")]
    L1Mu,
    #[value(name = "L1EG")]
    L1EG,
    #[value(name = "L1Jet")]
    L1Jet,
}

/// Observable for `l1-dist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum L1Observable {
    Ht,
    Met,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    HtPurity,
    Dimuon,
    ObjMult(MultObject),
    L1Dist(L1Observable),
}

#[derive(Debug, Clone, Copy)]
pub enum Setting<T> {
    FromConfig,
    Fixed(T),
}

/// Figure size, font sizes and header text of one recipe.
#[derive(Debug, Clone)]
pub struct Page {
    pub width_in: f64,
    pub height_in: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub legend_size: f64,
    pub header_size: f64,
    pub lumi_fb_inv: f64,
    pub year: &'static str,
    pub sqrt_s_tev: f64,
}

/// Everything a recipe fixes before looking at the data.
#[derive(Debug, Clone)]
pub struct RecipeSpec {
    pub observable: &'static str,
    pub dataset: DatasetSelection,
    pub triggers: &'static [&'static str],
    /// Ratio denominator, drawn in the reference color. `None` means a single panel.
    pub reference: Option<&'static str>,
    pub ratio_label: &'static str,
    pub rebin: Setting<usize>,
    pub normalize: Setting<bool>,
    pub x: AxisSpec,
    pub y: AxisSpec,
    pub annotations: Vec<Annotation>,
    pub default_labels: &'static [(&'static str, &'static str)],
    pub page: Page,
}

/// Optional command-line replacements for the recipe's axis limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct LimitOverrides {
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

impl LimitOverrides {
    fn apply(&self, x: &mut AxisSpec, y: &mut AxisSpec) {
        x.min = self.x_min.unwrap_or(x.min);
        x.max = self.x_max.unwrap_or(x.max);
        y.min = self.y_min.unwrap_or(y.min);
        y.max = self.y_max.unwrap_or(y.max);
    }
}

const LARGE_PAGE: Page = Page {
    width_in: 9.0,
    height_in: 7.0,
    label_size: 25.0,
    tick_size: 18.0,
    legend_size: 16.0,
    header_size: 18.0,
    lumi_fb_inv: 11.45,
    year: "2024",
    sqrt_s_tev: 13.6,
};

pub const L1_DIST_LABELS: &[(&str, &str)] = &[
    (ZERO_BIAS, "Zero Bias"),
    ("DST_PFScouting_ZeroBias_DST_PFScouting_AXONominal", "Zero Bias & AXO Medium"),
    ("DST_PFScouting_ZeroBias_DST_PFScouting_CICADAMedium", "Zero Bias & CICADA Medium"),
];

impl Recipe {
    pub fn name(&self) -> &'static str {
        match self {
            Recipe::HtPurity => "ht-purity",
            Recipe::Dimuon => "dimuon",
            Recipe::ObjMult(_) => "obj-mult",
            Recipe::L1Dist(_) => "l1-dist",
        }
    }

    pub fn spec(&self) -> RecipeSpec {
        match *self {
            Recipe::HtPurity => RecipeSpec {
                observable: "l1_ht",
                dataset: DatasetSelection::Named("2024I_paper".into()),
                triggers: &[
                    "DST_PFScouting_AXONominal",
                    "DST_PFScouting_CICADAMedium",
                    "pure_L1_DST_PFScouting_AXONominal",
                    "pure_L1_DST_PFScouting_CICADAMedium",
                ],
                reference: None,
                ratio_label: "",
                rebin: Setting::FromConfig,
                normalize: Setting::FromConfig,
                x: AxisSpec::linear("L1 H_{T} [GeV]", 0.0, 2000.0),
                y: AxisSpec::log("", 5.0, 4e7),
                annotations: Vec::new(),
                default_labels: &[],
                page: Page { lumi_fb_inv: 0.83, year: "2024 Run 386924", ..LARGE_PAGE },
            },
            Recipe::Dimuon => RecipeSpec {
                observable: "ScoutingMuonVtx_ScoutingMuonVtx_mass",
                dataset: DatasetSelection::Named("2024I_10".into()),
                triggers: &["DST_PFScouting_AXONominal", "DST_PFScouting_AXOVTight", ZERO_BIAS],
                reference: None,
                ratio_label: "",
                rebin: Setting::FromConfig,
                normalize: Setting::FromConfig,
                x: AxisSpec::log("HLT Scouting m_{\u{3bc}\u{3bc}} [GeV]", 5e-2, 1e3),
                y: AxisSpec::log("", 5e-1, 1e6),
                annotations: vec![Annotation {
                    x: 60.0,
                    y: 4e4,
                    text: "p_{T}^{\u{3bc}}>3 GeV, |\u{3b7}|<2.4".into(),
                }],
                default_labels: &[],
                page: Page { width_in: 14.0, height_in: 8.0, lumi_fb_inv: 1.62, ..LARGE_PAGE },
            },
            Recipe::ObjMult(object) => {
                let (observable, x_label, x_max, y_min, y_max) = match object {
                    MultObject::L1Mu => ("L1Mu_mult", "N_{L1Mu}", 8.5, 5e-10, 1e2),
                    MultObject::L1EG => ("L1EG_mult", "N_{L1EG}", 12.5, 5e-5, 5e1),
                    MultObject::L1Jet => ("L1Jet_mult", "N_{L1Jet}", 12.5, 5e-8, 5e2),
                };
                RecipeSpec {
                    observable,
                    dataset: DatasetSelection::Integrate,
                    triggers: &[
                        ZERO_BIAS,
                        "DST_PFScouting_JetHT",
                        "DST_PFScouting_CICADAMedium",
                        "DST_PFScouting_DoubleMuon",
                        "DST_PFScouting_AXONominal",
                    ],
                    reference: Some(ZERO_BIAS),
                    ratio_label: "Ratio to Zero Bias",
                    rebin: Setting::Fixed(1),
                    normalize: Setting::Fixed(true),
                    x: AxisSpec::linear(x_label, -0.5, x_max),
                    y: AxisSpec::log("", y_min, y_max),
                    annotations: Vec::new(),
                    default_labels: &[],
                    page: Page {
                        width_in: 8.0,
                        height_in: 8.0,
                        label_size: 14.0,
                        tick_size: 12.0,
                        legend_size: 12.0,
                        header_size: 12.0,
                        ..LARGE_PAGE
                    },
                }
            }
            Recipe::L1Dist(obs) => {
                let (observable, x_label, rebin, x_max) = match obs {
                    L1Observable::Ht => ("l1_ht", "L1 H_{T} [GeV]", 5, 1000.0),
                    L1Observable::Met => ("l1_met", "L1 p_{T}^{miss} [GeV]", 1, 180.0),
                };
                RecipeSpec {
                    observable,
                    dataset: DatasetSelection::Named("2024I".into()),
                    triggers: &[
                        ZERO_BIAS,
                        "DST_PFScouting_ZeroBias_DST_PFScouting_AXONominal",
                        "DST_PFScouting_ZeroBias_DST_PFScouting_CICADAMedium",
                    ],
                    reference: None,
                    ratio_label: "",
                    rebin: Setting::Fixed(rebin),
                    normalize: Setting::Fixed(false),
                    x: AxisSpec::linear(x_label, 0.0, x_max),
                    y: AxisSpec::log("", 1.0, 5e9),
                    annotations: Vec::new(),
                    default_labels: L1_DIST_LABELS,
                    page: LARGE_PAGE,
                }
            }
        }
    }
}

/// A figure ready to render, with the style it should be rendered in.
pub struct Plot {
    pub figure: HistogramFigure,
    pub viz: VizConfig,
}

pub fn y_label(normalize: bool) -> String {
    format!("Events{}", if normalize { " [A.U.]" } else { "" })
}

/// Theme base, then the recipe's page, then the config's `style` overrides.
pub fn viz_config(page: &Page, config: &PlottingConfig) -> Result<VizConfig> {
    let style = config.style.as_ref();
    let mut viz = theme_for(style).base_config();
    viz.figure.width = page.width_in * 72.0;
    viz.figure.height = page.height_in * 72.0;
    viz.font.label_size = page.label_size;
    viz.font.tick_size = page.tick_size;
    viz.font.legend_size = page.legend_size;
    viz.font.header_size = page.header_size;
    viz.font.size = page.legend_size;
    viz.experiment.status = config.cms_label.clone();
    viz.experiment.lumi_fb_inv = page.lumi_fb_inv;
    viz.experiment.year = page.year.to_string();
    viz.experiment.sqrt_s_tev = page.sqrt_s_tev;
    apply_overrides(viz, style).context("invalid style section in plotting config")
}

fn reduce_trigger(
    bundle: &HistogramBundle,
    spec: &RecipeSpec,
    trigger: &str,
    opts: ReduceOptions,
) -> Result<ReducedSeries> {
    let hist = bundle.get(spec.observable)?;
    let slice = sp_hist::trigger_slice(hist, &spec.dataset, trigger)
        .with_context(|| format!("cannot slice '{}' for trigger {trigger}", spec.observable))?;
    let series = sp_hist::reduce(&slice, opts)?;
    if series.is_empty() {
        tracing::warn!(trigger, observable = spec.observable, "no entries, drawing an empty series");
    } else {
        tracing::debug!(trigger, bins = series.len(), integral = series.integral(), "reduced");
    }
    Ok(series)
}

/// Load every trigger of the recipe and assemble the figure.
pub fn build(
    recipe: Recipe,
    bundle: &HistogramBundle,
    config: &PlottingConfig,
    limits: &LimitOverrides,
) -> Result<Plot> {
    let spec = recipe.spec();
    let config = config.clone().with_default_labels(spec.default_labels);

    let opts = ReduceOptions {
        rebin: match spec.rebin {
            Setting::FromConfig => config.rebin_for(spec.observable),
            Setting::Fixed(k) => k,
        },
        normalize: match spec.normalize {
            Setting::FromConfig => config.normalized,
            Setting::Fixed(n) => n,
        },
    };
    tracing::info!(
        recipe = recipe.name(),
        observable = spec.observable,
        rebin = opts.rebin,
        normalize = opts.normalize,
        "building figure"
    );

    let viz = viz_config(&spec.page, &config)?;

    let mut x = spec.x.clone();
    let mut y = spec.y.clone();
    y.label = y_label(opts.normalize);
    limits.apply(&mut x, &mut y);

    let mut figure = HistogramFigure::new(x, y);
    figure.annotations = spec.annotations.clone();

    for &trigger in spec.triggers {
        let data = reduce_trigger(bundle, &spec, trigger, opts)?;
        let mut series = SeriesSpec::new(config.trigger_label(trigger), data);
        if spec.reference == Some(trigger) {
            series = series.with_color(viz.colors.reference);
        }
        figure.series.push(series);
    }

    if let Some(reference) = spec.reference {
        let ref_idx = spec
            .triggers
            .iter()
            .position(|t| *t == reference)
            .context("reference trigger is not among the plotted triggers")?;
        let mut entries = Vec::new();
        for (i, series) in figure.series.iter().enumerate() {
            if i == ref_idx {
                continue;
            }
            let data = sp_hist::ratio(&series.data, &figure.series[ref_idx].data)?;
            entries.push(RatioEntry { series: i, data });
        }
        figure.ratio = Some(RatioPanelSpec {
            y_label: spec.ratio_label.to_string(),
            y_range: None,
            log: figure.y_axis.log,
            entries,
        });
    }

    Ok(Plot { figure, viz })
}
