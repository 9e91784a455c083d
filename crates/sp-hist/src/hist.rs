//! Multi-axis histograms with category and numeric axes.
//!
//! Values are stored flat in row-major order (last axis fastest), without
//! under/overflow bins. Every reduction (`select`, `integrate`, `rebin`) is
//! expressed through the same `(outer, len, inner)` stride decomposition
//! around the affected axis.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One histogram axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Axis {
    /// String categories (dataset era, trigger name, ...).
    Category {
        /// Axis name.
        name: String,
        /// Ordered categories.
        categories: Vec<String>,
    },
    /// `bins` equal-width bins on `[start, stop)`.
    Regular {
        /// Axis name.
        name: String,
        /// Number of bins.
        bins: usize,
        /// Lower edge of the first bin.
        start: f64,
        /// Upper edge of the last bin.
        stop: f64,
    },
    /// Explicit bin edges (length = bins + 1).
    Variable {
        /// Axis name.
        name: String,
        /// Strictly increasing bin edges.
        edges: Vec<f64>,
    },
}

impl Axis {
    /// Axis name.
    pub fn name(&self) -> &str {
        match self {
            Axis::Category { name, .. } | Axis::Regular { name, .. } | Axis::Variable { name, .. } => {
                name
            }
        }
    }

    /// Number of bins (or categories).
    pub fn len(&self) -> usize {
        match self {
            Axis::Category { categories, .. } => categories.len(),
            Axis::Regular { bins, .. } => *bins,
            Axis::Variable { edges, .. } => edges.len().saturating_sub(1),
        }
    }

    /// `true` if the axis has no bins.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` for string-category axes.
    pub fn is_category(&self) -> bool {
        matches!(self, Axis::Category { .. })
    }

    /// Bin edges of a numeric axis; `None` for category axes.
    pub fn edges(&self) -> Option<Vec<f64>> {
        match self {
            Axis::Category { .. } => None,
            Axis::Regular { bins, start, stop, .. } => {
                let n = *bins as f64;
                Some((0..=*bins).map(|i| start + (stop - start) * (i as f64) / n).collect())
            }
            Axis::Variable { edges, .. } => Some(edges.clone()),
        }
    }

    fn category_index(&self, category: &str) -> Result<usize> {
        match self {
            Axis::Category { name, categories } => {
                categories.iter().position(|c| c == category).ok_or_else(|| {
                    Error::UnknownCategory { axis: name.clone(), category: category.to_string() }
                })
            }
            _ => Err(Error::Validation(format!(
                "axis '{}' is numeric, cannot select category '{category}'",
                self.name()
            ))),
        }
    }

    /// Axis after merging `factor` adjacent bins; trailing remainder bins are dropped.
    fn rebinned(&self, factor: usize) -> Result<Axis> {
        let n_out = self.len() / factor;
        match self {
            Axis::Category { name, .. } => {
                Err(Error::Validation(format!("cannot rebin category axis '{name}'")))
            }
            Axis::Regular { name, bins, start, stop } => {
                let width = (stop - start) / (*bins as f64);
                Ok(Axis::Regular {
                    name: name.clone(),
                    bins: n_out,
                    start: *start,
                    stop: start + width * (n_out * factor) as f64,
                })
            }
            Axis::Variable { name, edges } => Ok(Axis::Variable {
                name: name.clone(),
                edges: (0..=n_out).map(|i| edges[i * factor]).collect(),
            }),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Axis::Category { name, categories } => {
                for (i, c) in categories.iter().enumerate() {
                    if categories[..i].contains(c) {
                        return Err(Error::Validation(format!(
                            "axis '{name}': duplicate category '{c}'"
                        )));
                    }
                }
            }
            Axis::Regular { name, bins, start, stop } => {
                if *bins == 0 {
                    return Err(Error::Validation(format!("axis '{name}': bins must be > 0")));
                }
                if !(start.is_finite() && stop.is_finite() && stop > start) {
                    return Err(Error::Validation(format!(
                        "axis '{name}': invalid range [{start}, {stop})"
                    )));
                }
            }
            Axis::Variable { name, edges } => {
                if edges.len() < 2 {
                    return Err(Error::Validation(format!(
                        "axis '{name}': need at least 2 edges, got {}",
                        edges.len()
                    )));
                }
                if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[1] <= w[0])
                {
                    return Err(Error::Validation(format!(
                        "axis '{name}': edges must be finite and strictly increasing"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A dense multi-axis histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHist")]
pub struct Hist {
    axes: Vec<Axis>,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawHist {
    axes: Vec<Axis>,
    values: Vec<f64>,
}

impl TryFrom<RawHist> for Hist {
    type Error = Error;

    fn try_from(raw: RawHist) -> Result<Self> {
        Hist::new(raw.axes, raw.values)
    }
}

impl Hist {
    /// Build a histogram, validating axes and the value count.
    pub fn new(axes: Vec<Axis>, values: Vec<f64>) -> Result<Self> {
        for (i, ax) in axes.iter().enumerate() {
            ax.validate()?;
            if axes[..i].iter().any(|a| a.name() == ax.name()) {
                return Err(Error::Validation(format!("duplicate axis name '{}'", ax.name())));
            }
        }
        let expected: usize = axes.iter().map(Axis::len).product();
        if values.len() != expected {
            return Err(Error::Validation(format!(
                "expected {expected} values for axes {:?}, got {}",
                axes.iter().map(Axis::name).collect::<Vec<_>>(),
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::Validation("histogram values must be finite".into()));
        }
        Ok(Self { axes, values })
    }

    /// Axes in storage order.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Flat row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sum of all values.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Index of the axis called `name`.
    pub fn axis_index(&self, name: &str) -> Result<usize> {
        self.axes
            .iter()
            .position(|a| a.name() == name)
            .ok_or_else(|| Error::UnknownAxis(name.to_string()))
    }

    /// Axis called `name`.
    pub fn axis(&self, name: &str) -> Result<&Axis> {
        Ok(&self.axes[self.axis_index(name)?])
    }

    fn strides(&self, idx: usize) -> (usize, usize, usize) {
        let outer: usize = self.axes[..idx].iter().map(Axis::len).product();
        let inner: usize = self.axes[idx + 1..].iter().map(Axis::len).product();
        (outer, self.axes[idx].len(), inner)
    }

    fn without_axis(&self, idx: usize, values: Vec<f64>) -> Hist {
        let mut axes = self.axes.clone();
        axes.remove(idx);
        Hist { axes, values }
    }

    /// Pick one category of `axis` and drop that axis.
    pub fn select(&self, axis: &str, category: &str) -> Result<Hist> {
        let idx = self.axis_index(axis)?;
        let pick = self.axes[idx].category_index(category)?;
        let (outer, len, inner) = self.strides(idx);

        let mut values = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            let base = (o * len + pick) * inner;
            values.extend_from_slice(&self.values[base..base + inner]);
        }
        Ok(self.without_axis(idx, values))
    }

    /// Sum over every bin of `axis` and drop that axis.
    pub fn integrate(&self, axis: &str) -> Result<Hist> {
        let idx = self.axis_index(axis)?;
        Ok(self.integrate_index(idx))
    }

    fn integrate_index(&self, idx: usize) -> Hist {
        let (outer, len, inner) = self.strides(idx);
        let mut values = vec![0.0; outer * inner];
        for o in 0..outer {
            for k in 0..len {
                let base = (o * len + k) * inner;
                for i in 0..inner {
                    values[o * inner + i] += self.values[base + i];
                }
            }
        }
        self.without_axis(idx, values)
    }

    /// Merge `factor` adjacent bins along the numeric `axis`.
    ///
    /// Trailing bins that do not fill a complete group are dropped.
    pub fn rebin(&self, axis: &str, factor: usize) -> Result<Hist> {
        if factor == 0 {
            return Err(Error::Validation("rebin factor must be >= 1".into()));
        }
        let idx = self.axis_index(axis)?;
        if factor == 1 {
            self.axes[idx].rebinned(1)?;
            return Ok(self.clone());
        }
        let new_axis = self.axes[idx].rebinned(factor)?;
        let (outer, len, inner) = self.strides(idx);
        let n_out = len / factor;
        if len % factor != 0 {
            log::debug!(
                "rebin of axis '{axis}' by {factor}: dropping {} trailing bin(s)",
                len % factor
            );
        }

        let mut values = vec![0.0; outer * n_out * inner];
        for o in 0..outer {
            for b in 0..n_out {
                for j in 0..factor {
                    let src = (o * len + b * factor + j) * inner;
                    let dst = (o * n_out + b) * inner;
                    for i in 0..inner {
                        values[dst + i] += self.values[src + i];
                    }
                }
            }
        }
        let mut axes = self.axes.clone();
        axes[idx] = new_axis;
        Ok(Hist { axes, values })
    }

    /// Name of the last axis, which holds the observable bins.
    pub fn observable_axis(&self) -> Result<&str> {
        match self.axes.last() {
            Some(ax) if !ax.is_category() => Ok(ax.name()),
            Some(ax) => Err(Error::Validation(format!(
                "last axis '{}' is a category axis, expected observable bins",
                ax.name()
            ))),
            None => Err(Error::Validation("histogram has no axes".into())),
        }
    }

    /// Counts and edges along the observable axis, summing away every leading axis.
    pub fn to_counts(&self) -> Result<(Vec<f64>, Vec<f64>)> {
        let name = self.observable_axis()?;
        let edges = self.axes[self.axes.len() - 1].edges().ok_or_else(|| {
            Error::Validation(format!("axis '{name}' has no edges"))
        })?;

        let mut h = self.clone();
        while h.axes.len() > 1 {
            h = h.integrate_index(0);
        }
        Ok((h.values, edges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(name: &str, cats: &[&str]) -> Axis {
        Axis::Category { name: name.into(), categories: cats.iter().map(|s| s.to_string()).collect() }
    }

    fn reg(name: &str, bins: usize, start: f64, stop: f64) -> Axis {
        Axis::Regular { name: name.into(), bins, start, stop }
    }

    /// dataset(2) x trigger(2) x x(4); value = 100*d + 10*t + bin.
    fn sample() -> Hist {
        let mut values = Vec::new();
        for d in 0..2 {
            for t in 0..2 {
                for b in 0..4 {
                    values.push((100 * d + 10 * t + b) as f64);
                }
            }
        }
        Hist::new(
            vec![cat("dataset", &["A", "B"]), cat("trigger", &["t0", "t1"]), reg("x", 4, 0.0, 4.0)],
            values,
        )
        .unwrap()
    }

    #[test]
    fn regular_edges() {
        let ax = reg("x", 4, 0.0, 2.0);
        assert_eq!(ax.edges().unwrap(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert!(cat("c", &["a"]).edges().is_none());
    }

    #[test]
    fn value_count_is_checked() {
        let err = Hist::new(vec![reg("x", 3, 0.0, 3.0)], vec![1.0, 2.0]).unwrap_err();
        assert!(err.to_string().contains("expected 3 values"));
    }

    #[test]
    fn rejects_bad_axes() {
        assert!(Hist::new(vec![reg("x", 0, 0.0, 1.0)], vec![]).is_err());
        let v = Axis::Variable { name: "x".into(), edges: vec![0.0, 2.0, 1.0] };
        assert!(Hist::new(vec![v], vec![1.0, 1.0]).is_err());
        let dup = vec![reg("x", 1, 0.0, 1.0), reg("x", 1, 0.0, 1.0)];
        assert!(Hist::new(dup, vec![1.0]).is_err());
    }

    #[test]
    fn select_dataset_and_trigger() {
        let h = sample();
        let s = h.select("dataset", "B").unwrap().select("trigger", "t1").unwrap();
        assert_eq!(s.axes().len(), 1);
        assert_eq!(s.values(), &[110.0, 111.0, 112.0, 113.0]);
    }

    #[test]
    fn select_unknown_category() {
        let h = sample();
        match h.select("trigger", "nope") {
            Err(Error::UnknownCategory { axis, category }) => {
                assert_eq!(axis, "trigger");
                assert_eq!(category, "nope");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(h.select("era", "A"), Err(Error::UnknownAxis(_))));
    }

    #[test]
    fn integrate_dataset() {
        let h = sample();
        let s = h.select("trigger", "t0").unwrap().integrate("dataset").unwrap();
        assert_eq!(s.values(), &[100.0, 102.0, 104.0, 106.0]);
    }

    #[test]
    fn rebin_regular_axis() {
        let h = sample().select("dataset", "A").unwrap().select("trigger", "t0").unwrap();
        let r = h.rebin("x", 2).unwrap();
        assert_eq!(r.values(), &[1.0, 5.0]);
        assert_eq!(r.axes()[0].edges().unwrap(), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn rebin_drops_remainder() {
        let v = Axis::Variable { name: "m".into(), edges: vec![0.0, 1.0, 2.0, 4.0, 8.0, 16.0] };
        let h = Hist::new(vec![v], vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let r = h.rebin("m", 2).unwrap();
        assert_eq!(r.values(), &[3.0, 7.0]);
        assert_eq!(r.axes()[0].edges().unwrap(), vec![0.0, 2.0, 8.0]);
    }

    #[test]
    fn rebin_keeps_leading_axes() {
        let h = sample().select("dataset", "A").unwrap();
        let r = h.rebin("x", 4).unwrap();
        assert_eq!(r.values(), &[6.0, 46.0]);
    }

    #[test]
    fn rebin_rejects_zero_and_categories() {
        let h = sample();
        assert!(h.rebin("x", 0).is_err());
        assert!(h.rebin("trigger", 2).is_err());
    }

    #[test]
    fn to_counts_sums_leading_axes() {
        let h = sample().select("dataset", "A").unwrap();
        let (counts, edges) = h.to_counts().unwrap();
        assert_eq!(counts, vec![10.0, 12.0, 14.0, 16.0]);
        assert_eq!(edges.len(), 5);
    }

    #[test]
    fn to_counts_needs_numeric_last_axis() {
        let h = Hist::new(vec![cat("c", &["a", "b"])], vec![1.0, 2.0]).unwrap();
        assert!(h.to_counts().is_err());
    }

    #[test]
    fn json_roundtrip_validates() {
        let json = r#"{"axes":[{"type":"regular","name":"x","bins":2,"start":0,"stop":1}],"values":[1,2,3]}"#;
        let err = serde_json::from_str::<Hist>(json).unwrap_err();
        assert!(err.to_string().contains("expected 2 values"));
    }
}
