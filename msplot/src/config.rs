use std::fs;
use std::path::Path;

use clap::ValueEnum;
use msgauss::data::params::ReconstructionParameters;
use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// tab separated `x<TAB>y` lines
    #[default]
    Tsv,
    /// JSON array of `{"x": .., "y": ..}` objects
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

/// Configuration for a plotting run, loadable from JSON
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Gaussian reconstruction parameters
    pub reconstruction: ReconstructionParameters,
    /// Rescale every curve so its maximum equals this value (default: none)
    pub normalize_to: Option<f64>,
    /// Worker threads for reconstructing several inputs (default: 4)
    pub num_threads: usize,
    /// Output file format (default: tsv)
    pub format: OutputFormat,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            reconstruction: ReconstructionParameters::default(),
            normalize_to: None,
            num_threads: 4,
            format: OutputFormat::Tsv,
        }
    }
}

impl PlotConfig {
    pub fn from_json_str(json: &str, source: &Path) -> PlotResult<Self> {
        serde_json::from_str(json).map_err(|e| PlotError::json(source, e))
    }

    pub fn from_json_file(path: &Path) -> PlotResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| PlotError::io(path, e))?;
        PlotConfig::from_json_str(&json, path)
    }
}
