//! # sp-hist
//!
//! Histogram bundles and the numeric post-processing behind the scouting
//! trigger plots: slicing by dataset/trigger, rebinning, density
//! normalization, Poisson errors and ratio-to-reference series.
//!
//! ## Example
//!
//! ```no_run
//! use sp_hist::{DatasetSelection, HistogramBundle, ReduceOptions};
//!
//! let bundle = HistogramBundle::load("histograms/hists.json").unwrap();
//! let hist = bundle.get("l1_ht").unwrap();
//! let slice = sp_hist::trigger_slice(
//!     hist,
//!     &DatasetSelection::Named("2024I".into()),
//!     "DST_PFScouting_ZeroBias",
//! )
//! .unwrap();
//! let series = sp_hist::reduce(&slice, ReduceOptions { rebin: 5, normalize: false }).unwrap();
//! println!("{} bins, integral {}", series.len(), series.integral());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bundle;
pub mod config;
pub mod error;
pub mod hist;
pub mod ratio;
pub mod reduce;

pub use bundle::{DATASET_AXIS, DatasetSelection, HistogramBundle, TRIGGER_AXIS, trigger_slice};
pub use config::PlottingConfig;
pub use error::{Error, Result};
pub use hist::{Axis, Hist};
pub use ratio::{RatioSeries, ratio};
pub use reduce::{ReduceOptions, ReducedSeries, poisson_errors, rebin_counts, reduce, reduce_counts};
