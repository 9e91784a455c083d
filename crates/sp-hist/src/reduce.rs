//! Histogram slice → plottable series (rebin, sum extra axes, normalize, errors).

use serde::Serialize;

use crate::error::{Error, Result};
use crate::hist::{Axis, Hist};

/// Counts and errors along one observable axis, ready to draw.
///
/// An empty series (no bins at all) stands for a slice without entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReducedSeries {
    /// Bin edges (length = bins + 1, or 0 when empty).
    pub edges: Vec<f64>,
    /// Per-bin counts, or densities when normalized.
    pub counts: Vec<f64>,
    /// Per-bin errors; exactly zero where the count is zero.
    pub errors: Vec<f64>,
}

impl ReducedSeries {
    /// Series with no bins.
    pub fn empty() -> Self {
        Self { edges: Vec::new(), counts: Vec::new(), errors: Vec::new() }
    }

    /// `true` if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Bin centres.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Bin widths.
    pub fn widths(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Sum of `count * width` over all bins (1 for a normalized series).
    pub fn integral(&self) -> f64 {
        self.counts.iter().zip(self.widths()).map(|(c, w)| c * w).sum()
    }
}

/// Knobs for [`reduce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOptions {
    /// Number of adjacent bins merged into one.
    pub rebin: usize,
    /// Divide by `total * bin_width` to get a unit-area density.
    pub normalize: bool,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self { rebin: 1, normalize: false }
    }
}

fn check_shape(counts: &[f64], edges: &[f64]) -> Result<()> {
    if edges.len() != counts.len() + 1 {
        return Err(Error::Validation(format!(
            "{} counts need {} edges, got {}",
            counts.len(),
            counts.len() + 1,
            edges.len()
        )));
    }
    Ok(())
}

/// Merge groups of `factor` adjacent bins; an incomplete trailing group is dropped.
///
/// Bare-array form of [`Hist::rebin`].
pub fn rebin_counts(counts: &[f64], edges: &[f64], factor: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    check_shape(counts, edges)?;
    let axis = Axis::Variable { name: "x".into(), edges: edges.to_vec() };
    Hist::new(vec![axis], counts.to_vec())?.rebin("x", factor)?.to_counts()
}

/// Plain Poisson errors, `sqrt(count)`; negative counts get zero.
pub fn poisson_errors(counts: &[f64]) -> Vec<f64> {
    counts.iter().map(|&c| if c > 0.0 { c.sqrt() } else { 0.0 }).collect()
}

/// Turn raw counts into a [`ReducedSeries`], optionally as a density.
pub fn reduce_counts(counts: &[f64], edges: &[f64], normalize: bool) -> Result<ReducedSeries> {
    check_shape(counts, edges)?;
    let total: f64 = counts.iter().sum();
    if counts.is_empty() || total == 0.0 {
        log::debug!("slice has no entries, returning empty series");
        return Ok(ReducedSeries::empty());
    }

    let raw_errors = poisson_errors(counts);
    if !normalize {
        return Ok(ReducedSeries {
            edges: edges.to_vec(),
            counts: counts.to_vec(),
            errors: raw_errors,
        });
    }

    let mut dens = Vec::with_capacity(counts.len());
    let mut errors = Vec::with_capacity(counts.len());
    for (i, (&c, &e)) in counts.iter().zip(&raw_errors).enumerate() {
        let norm = total * (edges[i + 1] - edges[i]);
        let d = c / norm;
        dens.push(d);
        errors.push(if d == 0.0 { 0.0 } else { e / norm });
    }
    Ok(ReducedSeries { edges: edges.to_vec(), counts: dens, errors })
}

/// Reduce a histogram slice along its observable (last) axis.
///
/// Any leading axes left on the slice are summed away first.
pub fn reduce(hist: &Hist, opts: ReduceOptions) -> Result<ReducedSeries> {
    let axis = hist.observable_axis()?;
    let (counts, edges) = hist.rebin(axis, opts.rebin)?.to_counts()?;
    reduce_counts(&counts, &edges, opts.normalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn unit_edges(n: usize) -> Vec<f64> {
        (0..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn poisson_errors_example() {
        let s = reduce_counts(&[4.0, 0.0, 9.0, 16.0], &unit_edges(4), false).unwrap();
        assert_eq!(s.errors, vec![2.0, 0.0, 3.0, 4.0]);
        assert_eq!(s.counts, vec![4.0, 0.0, 9.0, 16.0]);
    }

    #[test]
    fn rebin_example() {
        let (c, e) = rebin_counts(&[1.0, 2.0, 3.0, 4.0], &unit_edges(4), 2).unwrap();
        assert_eq!(c, vec![3.0, 7.0]);
        assert_eq!(e, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn rebin_rejects_zero_factor() {
        assert!(rebin_counts(&[1.0], &unit_edges(1), 0).is_err());
    }

    #[test]
    fn shape_mismatch_is_error() {
        assert!(reduce_counts(&[1.0, 2.0], &[0.0, 1.0], false).is_err());
    }

    #[test]
    fn empty_slice_gives_empty_series() {
        let s = reduce_counts(&[0.0, 0.0, 0.0], &unit_edges(3), true).unwrap();
        assert!(s.is_empty());
        assert!(s.centers().is_empty());
        assert_eq!(s.integral(), 0.0);
    }

    #[test]
    fn normalized_uses_bin_width() {
        let edges = vec![0.0, 1.0, 3.0];
        let s = reduce_counts(&[2.0, 2.0], &edges, true).unwrap();
        assert_relative_eq!(s.counts[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(s.counts[1], 0.25, epsilon = 1e-12);
        assert_relative_eq!(s.errors[0], 2.0_f64.sqrt() / 4.0, epsilon = 1e-12);
        assert_relative_eq!(s.errors[1], 2.0_f64.sqrt() / 8.0, epsilon = 1e-12);
        assert_relative_eq!(s.integral(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn reduce_sums_extra_axis_then_rebins() {
        let h = Hist::new(
            vec![
                Axis::Category { name: "cat".into(), categories: vec!["a".into(), "b".into()] },
                Axis::Regular { name: "x".into(), bins: 4, start: 0.0, stop: 8.0 },
            ],
            vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0, 4.0, 0.0],
        )
        .unwrap();
        let s = reduce(&h, ReduceOptions { rebin: 2, normalize: false }).unwrap();
        assert_eq!(s.counts, vec![4.0, 6.0]);
        assert_eq!(s.edges, vec![0.0, 4.0, 8.0]);
        assert_eq!(s.centers(), vec![2.0, 6.0]);
    }

    #[test]
    fn reduce_drops_rebin_remainder() {
        let h = Hist::new(
            vec![Axis::Regular { name: "x".into(), bins: 5, start: 0.0, stop: 10.0 }],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap();
        let s = reduce(&h, ReduceOptions { rebin: 2, normalize: false }).unwrap();
        assert_eq!(s.counts, vec![3.0, 7.0]);
        assert_eq!(s.edges, vec![0.0, 4.0, 8.0]);
        assert_eq!(rebin_counts(h.values(), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0], 2).unwrap().0, s.counts);
    }

    proptest! {
        #[test]
        fn prop_normalized_density_integrates_to_one(
            counts in proptest::collection::vec(0u32..10_000, 1..64),
            widths in proptest::collection::vec(0.1f64..50.0, 64),
        ) {
            prop_assume!(counts.iter().any(|&c| c > 0));
            let counts: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
            let mut edges = vec![0.0];
            for w in &widths[..counts.len()] {
                let last = *edges.last().unwrap();
                edges.push(last + w);
            }
            let s = reduce_counts(&counts, &edges, true).unwrap();
            prop_assert!((s.integral() - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_zero_bins_have_zero_error(
            counts in proptest::collection::vec(0u32..5, 1..64),
            normalize in any::<bool>(),
        ) {
            let counts: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
            let s = reduce_counts(&counts, &unit_edges(counts.len()), normalize).unwrap();
            for (c, e) in s.counts.iter().zip(&s.errors) {
                prop_assert!(*e >= 0.0 && e.is_finite());
                if *c == 0.0 {
                    prop_assert_eq!(*e, 0.0);
                }
            }
        }

        #[test]
        fn prop_rebin_sums_contiguous_groups(
            k in 1usize..6,
            groups in 1usize..20,
            seed in proptest::collection::vec(0u32..1000, 120),
        ) {
            let n = k * groups;
            let counts: Vec<f64> = seed[..n].iter().map(|&c| c as f64).collect();
            let (merged, edges) = rebin_counts(&counts, &unit_edges(n), k).unwrap();
            prop_assert_eq!(merged.len(), n / k);
            prop_assert_eq!(edges.len(), n / k + 1);
            for (g, m) in merged.iter().enumerate() {
                let expected: f64 = counts[g * k..(g + 1) * k].iter().sum();
                prop_assert_eq!(*m, expected);
            }
        }
    }
}
