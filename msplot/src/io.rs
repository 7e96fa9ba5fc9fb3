use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use msgauss::data::spectrum::MzSpectrum;
use msgauss::data::stick::StickPoint;

use crate::config::OutputFormat;
use crate::error::{PlotError, PlotResult};

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == ';'
}

fn parse_pair(line: &str) -> Option<(f64, f64)> {
    let mut fields = line.split(is_separator).filter(|field| !field.is_empty());
    let x = fields.next()?.parse::<f64>().ok()?;
    let y = fields.next()?.parse::<f64>().ok()?;
    Some((x, y))
}

/// Reads two-column stick text: x and y separated by whitespace, comma or semicolon.
///
/// Blank lines and lines starting with `#` are skipped, as is a single
/// non-numeric header line before the first data line. Extra columns are ignored.
pub fn parse_sticks<R: BufRead>(reader: R, source: &Path) -> PlotResult<MzSpectrum> {
    let mut mz = Vec::new();
    let mut intensity = Vec::new();
    let mut header_skipped = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| PlotError::io(source, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_pair(trimmed) {
            Some((x, y)) => {
                mz.push(x);
                intensity.push(y);
            }
            None if mz.is_empty() && !header_skipped => header_skipped = true,
            None => return Err(PlotError::parse(source, index + 1, trimmed)),
        }
    }

    Ok(MzSpectrum::try_new(mz, intensity)?)
}

pub fn parse_sticks_json(json: &str, source: &Path) -> PlotResult<MzSpectrum> {
    let points: Vec<StickPoint> = serde_json::from_str(json).map_err(|e| PlotError::json(source, e))?;
    let (mz, intensity) = points.into_iter().map(|p| (p.x, p.y)).unzip();
    Ok(MzSpectrum::try_new(mz, intensity)?)
}

/// Reads a stick file, JSON for a `.json` extension and column text otherwise.
pub fn read_sticks(path: &Path) -> PlotResult<MzSpectrum> {
    let is_json = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let json = std::fs::read_to_string(path).map_err(|e| PlotError::io(path, e))?;
        parse_sticks_json(&json, path)
    } else {
        let file = File::open(path).map_err(|e| PlotError::io(path, e))?;
        parse_sticks(BufReader::new(file), path)
    }
}

/// File name stem of an input path, the whole path text if it has none.
pub fn input_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `<dir>/<stem>.gauss.<ext>` for every stem, in order.
///
/// A stem shared by several inputs gets the 1-based input position appended
/// (`x_1`, `x_3`). Names that still coincide are rejected.
pub fn output_paths(dir: &Path, stems: &[String], format: OutputFormat) -> PlotResult<Vec<PathBuf>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in stems {
        *counts.entry(stem.as_str()).or_default() += 1;
    }

    let mut seen = HashSet::new();
    let mut paths = Vec::with_capacity(stems.len());
    for (index, stem) in stems.iter().enumerate() {
        let name = if counts[stem.as_str()] > 1 {
            format!("{}_{}.gauss.{}", stem, index + 1, format.extension())
        } else {
            format!("{}.gauss.{}", stem, format.extension())
        };
        let path = dir.join(name);
        if !seen.insert(path.clone()) {
            return Err(PlotError::OutputCollision { path });
        }
        paths.push(path);
    }

    Ok(paths)
}

pub fn write_curve<W: Write>(mut writer: W, curve: &MzSpectrum, format: OutputFormat, destination: &Path) -> PlotResult<()> {
    match format {
        OutputFormat::Tsv => {
            for (x, y) in curve.mz.iter().zip(curve.intensity.iter()) {
                writeln!(writer, "{:.7}\t{}", x, y).map_err(|e| PlotError::io(destination, e))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut writer, &curve.to_points()).map_err(|e| PlotError::json(destination, e))?;
            writeln!(writer).map_err(|e| PlotError::io(destination, e))?;
        }
    }
    writer.flush().map_err(|e| PlotError::io(destination, e))
}

pub fn write_curve_file(path: &Path, curve: &MzSpectrum, format: OutputFormat) -> PlotResult<()> {
    let file = File::create(path).map_err(|e| PlotError::io(path, e))?;
    write_curve(BufWriter::new(file), curve, format, path)
}
