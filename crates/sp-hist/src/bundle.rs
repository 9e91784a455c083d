//! Histogram bundle: observable name → histogram, read from JSON.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hist::Hist;

/// Name of the dataset (data-taking era) category axis.
pub const DATASET_AXIS: &str = "dataset";
/// Name of the trigger category axis.
pub const TRIGGER_AXIS: &str = "trigger";

/// All histograms produced by one processing job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBundle {
    /// Observable name → histogram with dataset and trigger axes.
    pub hists: BTreeMap<String, Hist>,
}

impl HistogramBundle {
    /// Parse a bundle from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a bundle from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read a bundle file. The file is closed once fully deserialized.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Histogram for `observable`.
    pub fn get(&self, observable: &str) -> Result<&Hist> {
        self.hists.get(observable).ok_or_else(|| Error::UnknownObservable(observable.to_string()))
    }

    /// Observable names in sorted order.
    pub fn observables(&self) -> impl Iterator<Item = &str> {
        self.hists.keys().map(String::as_str)
    }
}

/// How the dataset axis is resolved before a trigger is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSelection {
    /// Keep one dataset, e.g. `"2024I"`.
    Named(String),
    /// Sum over all datasets.
    Integrate,
}

/// Slice `hist` down to one trigger, resolving the dataset axis first.
pub fn trigger_slice(hist: &Hist, dataset: &DatasetSelection, trigger: &str) -> Result<Hist> {
    let h = match dataset {
        DatasetSelection::Named(name) => hist.select(DATASET_AXIS, name)?,
        DatasetSelection::Integrate => hist.integrate(DATASET_AXIS)?,
    };
    h.select(TRIGGER_AXIS, trigger)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "hists": {
            "l1_ht": {
                "axes": [
                    {"type": "category", "name": "dataset", "categories": ["2024I", "2024H"]},
                    {"type": "category", "name": "trigger", "categories": ["ZB", "AXO"]},
                    {"type": "regular", "name": "l1_ht", "bins": 2, "start": 0, "stop": 100}
                ],
                "values": [1, 2, 3, 4, 10, 20, 30, 40]
            }
        },
        "cutflow": {"ignored": true}
    }"#;

    #[test]
    fn parse_and_slice() {
        let b = HistogramBundle::from_json_str(JSON).unwrap();
        assert_eq!(b.observables().collect::<Vec<_>>(), vec!["l1_ht"]);
        let h = b.get("l1_ht").unwrap();

        let s = trigger_slice(h, &DatasetSelection::Named("2024I".into()), "AXO").unwrap();
        assert_eq!(s.values(), &[3.0, 4.0]);

        let s = trigger_slice(h, &DatasetSelection::Integrate, "ZB").unwrap();
        assert_eq!(s.values(), &[11.0, 22.0]);
    }

    #[test]
    fn unknown_observable() {
        let b = HistogramBundle::from_json_str(JSON).unwrap();
        assert!(matches!(b.get("l1_met"), Err(Error::UnknownObservable(_))));
    }

    #[test]
    fn missing_hists_key_is_error() {
        assert!(HistogramBundle::from_json_str(r#"{"other": {}}"#).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = HistogramBundle::load("/nonexistent/dir/hists.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
