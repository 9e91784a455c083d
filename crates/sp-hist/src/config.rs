//! Plotting configuration (trigger labels, rebin factors, normalization).

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// YAML plotting options shared by every plot recipe.
///
/// All keys are optional; lookups fall back instead of failing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlottingConfig {
    /// Trigger id → legend label.
    pub trigger_labels: BTreeMap<String, String>,
    /// Observable key → rebin factor.
    pub rebin: BTreeMap<String, usize>,
    /// Draw unit-area densities instead of raw counts.
    pub normalized: bool,
    /// Status text next to the experiment name.
    pub cms_label: String,
    /// Renderer style overrides, passed through untouched.
    pub style: Option<serde_yaml_ng::Value>,
}

impl Default for PlottingConfig {
    fn default() -> Self {
        Self {
            trigger_labels: BTreeMap::new(),
            rebin: BTreeMap::new(),
            normalized: false,
            cms_label: "Preliminary".into(),
            style: None,
        }
    }
}

impl PlottingConfig {
    /// Parse from a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Read and parse a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Legend label for `trigger`, or the raw id (with a warning) if unmapped.
    pub fn trigger_label(&self, trigger: &str) -> String {
        match self.trigger_labels.get(trigger) {
            Some(label) => label.clone(),
            None => {
                log::warn!("{trigger} name not in plotting config, please edit");
                trigger.to_string()
            }
        }
    }

    /// Rebin factor for `observable`, 1 if not configured.
    pub fn rebin_for(&self, observable: &str) -> usize {
        self.rebin.get(observable).copied().unwrap_or(1)
    }

    /// Add built-in labels for triggers the file does not mention.
    pub fn with_default_labels(mut self, defaults: &[(&str, &str)]) -> Self {
        for (id, label) in defaults {
            self.trigger_labels.entry((*id).to_string()).or_insert_with(|| (*label).to_string());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
trigger_labels:
  DST_PFScouting_ZeroBias: Zero Bias
  DST_PFScouting_AXONominal: AXO Nominal
rebin:
  l1_ht: 4
normalized: true
cms_label: Preliminary
"#;

    #[test]
    fn parse_full() {
        let cfg = PlottingConfig::from_yaml_str(YAML).unwrap();
        assert!(cfg.normalized);
        assert_eq!(cfg.cms_label, "Preliminary");
        assert_eq!(cfg.rebin_for("l1_ht"), 4);
        assert!(cfg.style.is_none());
    }

    #[test]
    fn missing_rebin_defaults_to_one() {
        let cfg = PlottingConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(cfg.rebin_for("l1_met"), 1);
    }

    #[test]
    fn unknown_trigger_falls_back_to_id() {
        let cfg = PlottingConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(cfg.trigger_label("DST_PFScouting_ZeroBias"), "Zero Bias");
        assert_eq!(cfg.trigger_label("DST_Unknown"), "DST_Unknown");
    }

    #[test]
    fn partial_and_empty_documents() {
        let cfg = PlottingConfig::from_yaml_str("normalized: false\n").unwrap();
        assert!(cfg.trigger_labels.is_empty());
        assert_eq!(cfg.cms_label, "Preliminary");
        let cfg = PlottingConfig::from_yaml_str("").unwrap();
        assert!(!cfg.normalized);
    }

    #[test]
    fn malformed_yaml_is_error() {
        assert!(PlottingConfig::from_yaml_str("rebin: [1, 2").is_err());
        assert!(PlottingConfig::from_yaml_str("rebin:\n  l1_ht: many\n").is_err());
    }

    #[test]
    fn file_labels_win_over_defaults() {
        let cfg = PlottingConfig::from_yaml_str(YAML)
            .unwrap()
            .with_default_labels(&[("DST_PFScouting_ZeroBias", "ZB"), ("DST_X", "X")]);
        assert_eq!(cfg.trigger_label("DST_PFScouting_ZeroBias"), "Zero Bias");
        assert_eq!(cfg.trigger_label("DST_X"), "X");
    }

    #[test]
    fn style_section_is_kept() {
        let cfg = PlottingConfig::from_yaml_str("style:\n  theme: minimal\n").unwrap();
        assert!(cfg.style.is_some());
    }
}
