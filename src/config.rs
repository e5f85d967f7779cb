//! Pipeline configuration.
//!
//! Everything the pipeline needs is carried by [`PipelineConfig`] and passed
//! to [`run`](crate::pipeline::run) explicitly. It can be loaded from a JSON
//! file; unset keys fall back to the defaults:
//! ```json
//! {
//!   "start_date": "2005-01-01",
//!   "end_date": "2021-12-31",
//!   "top_n": 10,
//!   "heat_layer": { "radius": 15, "blur": 10 }
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregators::DEFAULT_TOP_N;
use crate::error::{PipelineError, Result};
use crate::filter::DateRange;

/// Rendering hints for the density layer. Passed through to the report untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatLayerSettings {
    pub radius: u32,
    pub blur: u32,
}

impl Default for HeatLayerSettings {
    fn default() -> Self {
        HeatLayerSettings { radius: 15, blur: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// First count date included. Unset means from the earliest row.
    pub start_date: Option<NaiveDate>,
    /// Last count date included. Unset means up to the latest row.
    pub end_date: Option<NaiveDate>,
    pub top_n: usize,
    pub heat_layer: HeatLayerSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            start_date: None,
            end_date: None,
            top_n: DEFAULT_TOP_N,
            heat_layer: HeatLayerSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(PipelineError::InvalidConfig(
                "top_n must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.range(), DateRange::open());
        assert_eq!(config.heat_layer, HeatLayerSettings { radius: 15, blur: 10 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_full() {
        let config = PipelineConfig::from_json(
            r#"{"start_date": "2005-01-01", "end_date": "2021-12-31", "top_n": 5,
                "heat_layer": {"radius": 20, "blur": 4}}"#,
        )
        .unwrap();

        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2005, 1, 1));
        assert_eq!(config.end_date, NaiveDate::from_ymd_opt(2021, 12, 31));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.heat_layer, HeatLayerSettings { radius: 20, blur: 4 });
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let config = PipelineConfig::from_json(r#"{"end_date": "2019-06-30"}"#).unwrap();
        assert_eq!(config.start_date, None);
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert_eq!(config.heat_layer.blur, 10);
    }

    #[test]
    fn test_from_json_rejects_zero_top_n() {
        let err = PipelineConfig::from_json(r#"{"top_n": 0}"#).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_rejects_bad_date() {
        let err = PipelineConfig::from_json(r#"{"start_date": "yesterday"}"#).unwrap_err();
        assert!(matches!(err, PipelineError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = format!("{}/adt_pipeline_test_config.json", env::temp_dir().display());
        fs::write(&path, r#"{"top_n": 3}"#).unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.top_n, 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = PipelineConfig::load("/nonexistent/adt_pipeline.json").unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
