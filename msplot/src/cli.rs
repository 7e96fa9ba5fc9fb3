use std::path::PathBuf;

use clap::Parser;

use crate::config::{OutputFormat, PlotConfig};
use crate::error::PlotResult;

/// Convert stick spectra into continuous Gaussian curves for plotting.
#[derive(Parser, Debug, Clone)]
#[command(name = "msplot", version, about)]
pub struct Args {
    /// Stick files: `.json` arrays of {x, y} or two-column text
    pub inputs: Vec<PathBuf>,

    /// JSON configuration file, command line options take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Resolving power of the simulated instrument
    #[arg(long)]
    pub resolution: Option<i32>,

    /// m/z at which the resolving power applies
    #[arg(long)]
    pub resolution_mass: Option<f64>,

    /// Samples-per-peak multiplier, 1 to 75
    #[arg(long)]
    pub quality_factor: Option<i32>,

    /// Rescale each curve so its maximum equals this value
    #[arg(long)]
    pub normalize: Option<f64>,

    /// Worker threads used when several inputs are given
    #[arg(long)]
    pub threads: Option<usize>,

    /// Write `<stem>.gauss.<ext>` files here instead of printing to stdout
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Generate averagine sticks for this neutral mass instead of reading files
    #[arg(long)]
    pub averagine_mass: Option<f64>,

    /// Charge state for --averagine-mass
    #[arg(long, default_value_t = 1)]
    pub charge: i32,

    /// Number of isotope peaks for --averagine-mass
    #[arg(long, default_value_t = 6)]
    pub isotopes: usize,
}

impl Args {
    /// Loads the config file if given and applies the command line overrides.
    pub fn plot_config(&self) -> PlotResult<PlotConfig> {
        let mut config = match &self.config {
            Some(path) => PlotConfig::from_json_file(path)?,
            None => PlotConfig::default(),
        };

        if let Some(resolution) = self.resolution {
            config.reconstruction.resolution = resolution;
        }
        if let Some(resolution_mass) = self.resolution_mass {
            config.reconstruction.resolution_mass = resolution_mass;
        }
        if let Some(quality_factor) = self.quality_factor {
            config.reconstruction.quality_factor = quality_factor;
        }
        if let Some(normalize) = self.normalize {
            config.normalize_to = Some(normalize);
        }
        if let Some(threads) = self.threads {
            config.num_threads = threads;
        }
        if let Some(format) = self.format {
            config.format = format;
        }

        Ok(config)
    }
}
