//! scoutplot CLI

mod recipes;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sp_hist::{Axis, HistogramBundle, PlottingConfig};
use std::path::{Path, PathBuf};

use recipes::{L1Observable, LimitOverrides, MultObject, Recipe};

#[derive(Parser)]
#[command(name = "scoutplot")]
#[command(about = "scoutplot - CMS scouting trigger plots from histogram bundles")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// L1 H_T for the AXO and CICADA triggers, with and without the pure-L1 requirement
    HtPurity {
        /// Input histogram bundle (JSON)
        #[arg(short, long, default_value = "histograms/hist_result_plotF.json")]
        input: PathBuf,

        /// Plotting config (YAML)
        #[arg(long, default_value = "plotting_config.yaml")]
        plotting_config: PathBuf,

        #[command(flatten)]
        plot: PlotArgs,
    },

    /// Scouting dimuon vertex mass for AXO Nominal, AXO VTight and Zero Bias
    Dimuon {
        /// Input histogram bundle (JSON)
        #[arg(short, long, default_value = "histograms/hist_result_plotG.json")]
        input: PathBuf,

        /// Plotting config (YAML)
        #[arg(long, default_value = "plotting_config.yaml")]
        plotting_config: PathBuf,

        #[command(flatten)]
        plot: PlotArgs,
    },

    /// L1 object multiplicity with a ratio panel to Zero Bias
    ObjMult {
        /// L1 object whose multiplicity is drawn
        #[arg(long, value_enum)]
        object: MultObject,

        /// Input histogram bundle (JSON)
        #[arg(short, long, default_value = "histograms/hist_result_plotA_plotB_plotC.json")]
        input: PathBuf,

        /// Plotting config (YAML)
        #[arg(long, default_value = "plotting_config.yaml")]
        plotting_config: PathBuf,

        #[command(flatten)]
        plot: PlotArgs,
    },

    /// L1 H_T or missing p_T for Zero Bias and its AXO/CICADA overlaps
    L1Dist {
        /// Observable to draw
        #[arg(long, value_enum)]
        observable: L1Observable,

        /// Input histogram bundle (JSON)
        #[arg(short, long, default_value = "histograms/hist_result_plotD_plotE.json")]
        input: PathBuf,

        /// Plotting config (YAML). Built-in labels are used when omitted.
        #[arg(long)]
        plotting_config: Option<PathBuf>,

        #[command(flatten)]
        plot: PlotArgs,
    },

    /// List the observables of a bundle with their axes
    Inspect {
        /// Input histogram bundle (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print version
    Version,
}

/// Output and axis-limit options shared by the plot commands.
#[derive(Args)]
struct PlotArgs {
    /// Output prefix; `<prefix>.pdf` and `<prefix>.png` are written
    #[arg(short, long)]
    output: PathBuf,

    /// Lower x-axis limit
    #[arg(long, allow_negative_numbers = true)]
    x_min: Option<f64>,

    /// Upper x-axis limit
    #[arg(long, allow_negative_numbers = true)]
    x_max: Option<f64>,

    /// Lower y-axis limit
    #[arg(long, allow_negative_numbers = true)]
    y_min: Option<f64>,

    /// Upper y-axis limit
    #[arg(long, allow_negative_numbers = true)]
    y_max: Option<f64>,
}

impl PlotArgs {
    fn limits(&self) -> LimitOverrides {
        LimitOverrides { x_min: self.x_min, x_max: self.x_max, y_min: self.y_min, y_max: self.y_max }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::HtPurity { input, plotting_config, plot } => {
            cmd_plot(Recipe::HtPurity, &input, Some(&plotting_config), &plot)
        }
        Commands::Dimuon { input, plotting_config, plot } => {
            cmd_plot(Recipe::Dimuon, &input, Some(&plotting_config), &plot)
        }
        Commands::ObjMult { object, input, plotting_config, plot } => {
            cmd_plot(Recipe::ObjMult(object), &input, Some(&plotting_config), &plot)
        }
        Commands::L1Dist { observable, input, plotting_config, plot } => {
            cmd_plot(Recipe::L1Dist(observable), &input, plotting_config.as_deref(), &plot)
        }
        Commands::Inspect { input } => cmd_inspect(&input),
        Commands::Version => {
            println!("scoutplot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_bundle(input: &Path) -> Result<HistogramBundle> {
    HistogramBundle::load(input)
        .with_context(|| format!("failed to load histogram bundle {}", input.display()))
}

fn cmd_plot(
    recipe: Recipe,
    input: &Path,
    plotting_config: Option<&Path>,
    args: &PlotArgs,
) -> Result<()> {
    let bundle = load_bundle(input)?;
    let config = match plotting_config {
        Some(path) => PlottingConfig::load(path)
            .with_context(|| format!("failed to load plotting config {}", path.display()))?,
        None => PlottingConfig::default(),
    };

    let plot = recipes::build(recipe, &bundle, &config, &args.limits())?;
    let saved = sp_viz_render::save_figure(&plot.figure, &args.output, &plot.viz)
        .with_context(|| format!("failed to write figure {}", args.output.display()))?;
    tracing::info!(
        recipe = recipe.name(),
        pdf = %saved.pdf.display(),
        png = %saved.png.display(),
        "figure written"
    );

    let prefix = args.output.display();
    println!("Saved {prefix}.pdf and {prefix}.png");
    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<()> {
    let bundle = load_bundle(input)?;
    let mut names: Vec<&str> = bundle.observables().collect();
    names.sort_unstable();

    for name in names {
        let hist = bundle.get(name)?;
        println!("{name}");
        for axis in hist.axes() {
            println!("  {}", describe_axis(axis));
        }
        println!("  total: {}", hist.sum());
    }
    Ok(())
}

fn describe_axis(axis: &Axis) -> String {
    match axis {
        Axis::Category { name, categories } => {
            format!("{name}: category [{}]", categories.join(", "))
        }
        Axis::Regular { name, bins, start, stop } => {
            format!("{name}: regular, {bins} bins on [{start}, {stop})")
        }
        Axis::Variable { name, edges } => match (edges.first(), edges.last()) {
            (Some(lo), Some(hi)) => {
                format!("{name}: variable, {} bins on [{lo}, {hi})", axis.len())
            }
            _ => format!("{name}: variable, no bins"),
        },
    }
}
