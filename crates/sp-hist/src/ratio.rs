//! Ratio of two reduced series sharing bin edges.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::reduce::ReducedSeries;

/// Per-bin `numerator / denominator` with a propagated error.
///
/// Bins with a zero denominator hold NaN in both `ratio` and `errors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioSeries {
    /// Shared bin edges.
    pub edges: Vec<f64>,
    /// Per-bin ratio.
    pub ratio: Vec<f64>,
    /// Per-bin error.
    pub errors: Vec<f64>,
}

impl RatioSeries {
    /// Ratio with no bins.
    pub fn empty() -> Self {
        Self { edges: Vec::new(), ratio: Vec::new(), errors: Vec::new() }
    }

    /// `true` if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.ratio.is_empty()
    }

    /// Bin centres.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}

fn relative(err: f64, count: f64) -> f64 {
    if count == 0.0 { 0.0 } else { err / count }
}

fn same_edges(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= 1e-9 * x.abs().max(y.abs()).max(1.0))
}

/// Divide `num` by `den` bin by bin.
///
/// The error adds the two relative errors in quadrature:
/// `r * sqrt((e_n/n)^2 + (e_d/d)^2)`. This treats numerator and denominator
/// as independent, which is only an approximation for overlapping trigger
/// selections.
pub fn ratio(num: &ReducedSeries, den: &ReducedSeries) -> Result<RatioSeries> {
    if num.is_empty() || den.is_empty() {
        return Ok(RatioSeries::empty());
    }
    if !same_edges(&num.edges, &den.edges) {
        return Err(Error::BinningMismatch(format!(
            "numerator has {} bins on [{}, {}], denominator has {} bins on [{}, {}]",
            num.len(),
            num.edges[0],
            num.edges[num.len()],
            den.len(),
            den.edges[0],
            den.edges[den.len()],
        )));
    }

    let n = num.len();
    let mut ratio = Vec::with_capacity(n);
    let mut errors = Vec::with_capacity(n);
    for i in 0..n {
        let d = den.counts[i];
        if d == 0.0 || !d.is_finite() {
            ratio.push(f64::NAN);
            errors.push(f64::NAN);
            continue;
        }
        let c = num.counts[i];
        let r = c / d;
        let rel = relative(num.errors[i], c).hypot(relative(den.errors[i], d));
        ratio.push(r);
        errors.push(r * rel);
    }
    Ok(RatioSeries { edges: num.edges.clone(), ratio, errors })
}
