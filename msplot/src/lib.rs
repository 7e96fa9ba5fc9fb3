pub mod cli;
pub mod config;
pub mod error;
pub mod io;

use std::io::{stdout, Write};
use std::path::Path;

use msgauss::algorithm::averagine::averagine_sticks;
use msgauss::algorithm::cancel::AbortFlag;
use msgauss::algorithm::reconstruction::reconstruct_many;
use msgauss::data::spectrum::MzSpectrum;
use tracing::info;

use crate::cli::Args;
use crate::config::OutputFormat;
use crate::error::{PlotError, PlotResult};

/// One stick spectrum to reconstruct, labelled by where it came from.
#[derive(Clone, Debug)]
pub struct PlotJob {
    pub label: String,
    /// output file stem, free of `.`
    pub stem: String,
    pub sticks: MzSpectrum,
}

fn averagine_stem(mass: f64, charge: i32) -> String {
    format!("averagine_{}_{}", mass.to_string().replace('.', "p"), charge)
}

/// Collects the stick spectra named on the command line.
pub fn collect_jobs(args: &Args) -> PlotResult<Vec<PlotJob>> {
    let mut jobs = Vec::new();

    if let Some(mass) = args.averagine_mass {
        let sticks = MzSpectrum::from_points(&averagine_sticks(mass, args.charge, args.isotopes));
        let stem = averagine_stem(mass, args.charge);
        jobs.push(PlotJob { label: stem.clone(), stem, sticks });
    }

    for path in &args.inputs {
        let sticks = io::read_sticks(path)?;
        info!(path = %path.display(), sticks = sticks.len(), "read stick file");
        jobs.push(PlotJob { label: path.display().to_string(), stem: io::input_stem(path), sticks });
    }

    if jobs.is_empty() {
        return Err(PlotError::NoInput);
    }

    Ok(jobs)
}

/// Reads the inputs, reconstructs all curves and writes them out.
pub fn run(args: &Args) -> PlotResult<()> {
    let config = args.plot_config()?;
    let jobs = collect_jobs(args)?;

    let output_paths = match &args.output_dir {
        Some(dir) => {
            let stems: Vec<String> = jobs.iter().map(|job| job.stem.clone()).collect();
            Some(io::output_paths(dir, &stems, config.format)?)
        }
        None => None,
    };

    let spectra: Vec<_> = jobs.iter().map(|job| job.sticks.to_points()).collect();
    let curves = reconstruct_many(&spectra, &config.reconstruction, config.num_threads, &AbortFlag::new())?;

    for (index, (job, curve)) in jobs.iter().zip(curves).enumerate() {
        let mut curve = MzSpectrum::from_points(&curve);
        if let Some(target) = config.normalize_to {
            curve = curve.scaled_to_max(target);
        }
        info!(source = %job.label, points = curve.len(), "reconstructed {}", curve);

        match &output_paths {
            Some(paths) => {
                let path = &paths[index];
                io::write_curve_file(path, &curve, config.format)?;
                info!(path = %path.display(), "wrote curve");
            }
            None => {
                let destination = Path::new("-");
                let mut handle = stdout().lock();
                if config.format == OutputFormat::Tsv {
                    writeln!(handle, "# source: {}", job.label).map_err(|e| PlotError::io(destination, e))?;
                }
                io::write_curve(handle, &curve, config.format, destination)?;
            }
        }
    }

    Ok(())
}
