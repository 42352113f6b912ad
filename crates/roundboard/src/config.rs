//! Dashboard configuration
//!
//! Loaded from a TOML file. Every field has a default, so an empty file
//! (or no file at all) gives the standard layout under `data/`.
//!
//! ```toml
//! [inputs]
//! finance_report = "data/FinanceReport_r1.xlsx"
//!
//! [targets]
//! delivery_reliability = 95.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use roundboard_frame::{NormalizeRules, DIRECTIONAL_METRICS};

use crate::error::{DashboardError, DashboardResult};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Input workbooks
    #[serde(default)]
    pub inputs: InputFiles,

    /// KPI target lines
    #[serde(default)]
    pub targets: KpiTargets,

    /// Finance report normalization
    #[serde(default)]
    pub normalize: NormalizeConfig,

    /// Destination every supplier route is drawn to
    #[serde(default)]
    pub hub: HubLocation,
}

/// Paths of the three input workbooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFiles {
    /// Finance report: metrics as rows, rounds as columns
    #[serde(default = "default_finance_report")]
    pub finance_report: PathBuf,

    /// Flat supplier list with locations
    #[serde(default = "default_suppliers")]
    pub suppliers: PathBuf,

    /// Main multi-sheet export
    #[serde(default = "default_main_data")]
    pub main_data: PathBuf,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            finance_report: default_finance_report(),
            suppliers: default_suppliers(),
            main_data: default_main_data(),
        }
    }
}

fn default_finance_report() -> PathBuf {
    PathBuf::from("data/FinanceReport_r1.xlsx")
}

fn default_suppliers() -> PathBuf {
    PathBuf::from("data/Suppliers_NEW.xlsx")
}

fn default_main_data() -> PathBuf {
    PathBuf::from("data/TFC_MAIN_DATA_R-2to1.xlsx")
}

/// Target values drawn as reference lines, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiTargets {
    #[serde(default = "default_raw_material_costs")]
    pub raw_material_costs: f64,

    #[serde(default = "default_delivery_reliability")]
    pub delivery_reliability: f64,

    #[serde(default = "default_rejection")]
    pub rejection: f64,

    #[serde(default = "default_transport_costs")]
    pub transport_costs: f64,
}

impl Default for KpiTargets {
    fn default() -> Self {
        Self {
            raw_material_costs: default_raw_material_costs(),
            delivery_reliability: default_delivery_reliability(),
            rejection: default_rejection(),
            transport_costs: default_transport_costs(),
        }
    }
}

fn default_raw_material_costs() -> f64 {
    32.0
}

fn default_delivery_reliability() -> f64 {
    95.0
}

fn default_rejection() -> f64 {
    2.1
}

fn default_transport_costs() -> f64 {
    12.0
}

/// Metric names reported once per flow direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default = "default_directional")]
    pub directional: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            directional: default_directional(),
        }
    }
}

fn default_directional() -> Vec<String> {
    DIRECTIONAL_METRICS.iter().map(|s| s.to_string()).collect()
}

/// A named map location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubLocation {
    #[serde(default = "default_hub_name")]
    pub name: String,
    #[serde(default = "default_hub_lon")]
    pub lon: f64,
    #[serde(default = "default_hub_lat")]
    pub lat: f64,
}

impl Default for HubLocation {
    fn default() -> Self {
        Self {
            name: default_hub_name(),
            lon: default_hub_lon(),
            lat: default_hub_lat(),
        }
    }
}

fn default_hub_name() -> String {
    "Netherlands".to_string()
}

fn default_hub_lon() -> f64 {
    4.8952
}

fn default_hub_lat() -> f64 {
    52.3676
}

impl DashboardConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> DashboardResult<Self> {
        toml::from_str(content).map_err(|e| DashboardError::Config(e.to_string()))
    }

    /// Load a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Look for every input file by name in `dir`
    pub fn with_data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        let dir = dir.as_ref();
        for path in [
            &mut self.inputs.finance_report,
            &mut self.inputs.suppliers,
            &mut self.inputs.main_data,
        ] {
            if let Some(name) = path.file_name() {
                *path = dir.join(name);
            }
        }
        self
    }

    /// Rules for normalizing the finance report
    pub fn normalize_rules(&self) -> NormalizeRules {
        NormalizeRules {
            directional: self.normalize.directional.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(
            config.inputs.main_data,
            PathBuf::from("data/TFC_MAIN_DATA_R-2to1.xlsx")
        );
        assert_eq!(config.targets.rejection, 2.1);
        assert_eq!(config.normalize_rules(), NormalizeRules::default());
    }

    #[test]
    fn test_partial_override() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [inputs]
            suppliers = "exports/suppliers.csv"

            [targets]
            transport_costs = 10.0
            "#,
        )
        .unwrap();

        assert_eq!(config.inputs.suppliers, PathBuf::from("exports/suppliers.csv"));
        assert_eq!(config.inputs.finance_report, default_finance_report());
        assert_eq!(config.targets.transport_costs, 10.0);
        assert_eq!(config.targets.delivery_reliability, 95.0);
    }

    #[test]
    fn test_with_data_dir() {
        let config = DashboardConfig::default().with_data_dir("/srv/game");
        assert_eq!(
            config.inputs.finance_report,
            PathBuf::from("/srv/game/FinanceReport_r1.xlsx")
        );
        assert_eq!(config.inputs.suppliers, PathBuf::from("/srv/game/Suppliers_NEW.xlsx"));
    }

    #[test]
    fn test_invalid_document() {
        let err = DashboardConfig::from_toml_str("[targets]\nrejection = \"high\"").unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
