use std::fmt;
use std::fmt::{Display, Formatter};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::algorithm::reconstruction::reconstruct;
use crate::data::params::ReconstructionParameters;
use crate::data::stick::StickPoint;
use crate::error::{ReconstructionError, ReconstructionResult};

/// Represents a mass spectrum with associated m/z values and intensities.
///
/// Holds either centroided sticks or a reconstructed continuous curve; both are
/// kept sorted ascending by m/z.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MzSpectrum {
    pub mz: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl MzSpectrum {
    /// Constructs a new `MzSpectrum`, sorting the pairs by m/z.
    ///
    /// # Arguments
    ///
    /// * `mz` - A vector of m/z values.
    /// * `intensity` - A vector of intensity values corresponding to the m/z values.
    ///
    /// # Panics
    ///
    /// Panics if the lengths of `mz` and `intensity` are not the same, use
    /// [`MzSpectrum::try_new`] for untrusted input.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use msgauss::data::spectrum::MzSpectrum;
    /// let spectrum = MzSpectrum::new(vec![200.0, 100.0], vec![20.0, 10.0]);
    /// assert_eq!(spectrum.mz, vec![100.0, 200.0]);
    /// assert_eq!(spectrum.intensity, vec![10.0, 20.0]);
    /// ```
    pub fn new(mz: Vec<f64>, intensity: Vec<f64>) -> Self {
        assert_eq!(mz.len(), intensity.len(), "mz and intensity vectors must have the same length");
        let mut mz_intensity: Vec<(f64, f64)> = mz.into_iter().zip(intensity).collect();
        mz_intensity.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (mz, intensity) = mz_intensity.into_iter().unzip();
        MzSpectrum { mz, intensity }
    }

    /// Checked variant of [`MzSpectrum::new`] rejecting mismatched lengths and non-finite values.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use msgauss::data::spectrum::MzSpectrum;
    /// assert!(MzSpectrum::try_new(vec![100.0, 200.0], vec![1.0]).is_err());
    /// assert!(MzSpectrum::try_new(vec![100.0, f64::NAN], vec![1.0, 2.0]).is_err());
    /// assert!(MzSpectrum::try_new(vec![100.0], vec![1.0]).is_ok());
    /// ```
    pub fn try_new(mz: Vec<f64>, intensity: Vec<f64>) -> ReconstructionResult<Self> {
        if mz.len() != intensity.len() {
            return Err(ReconstructionError::length_mismatch(mz.len(), intensity.len()));
        }

        if let Some((index, (&x, &y))) = mz
            .iter()
            .zip(intensity.iter())
            .enumerate()
            .find(|(_, (x, y))| !x.is_finite() || !y.is_finite())
        {
            return Err(ReconstructionError::non_finite(index, x, y));
        }

        Ok(MzSpectrum::new(mz, intensity))
    }

    pub fn from_points(points: &[StickPoint]) -> Self {
        MzSpectrum::new(points.iter().map(|p| p.x).collect(), points.iter().map(|p| p.y).collect())
    }

    pub fn to_points(&self) -> Vec<StickPoint> {
        self.mz.iter().zip(self.intensity.iter()).map(|(&x, &y)| StickPoint::new(x, y)).collect()
    }

    pub fn len(&self) -> usize {
        self.mz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }

    /// Filters the m/z values and intensities based on a range of m/z values and intensities.
    ///
    /// # Arguments
    ///
    /// * `mz_min` - The minimum m/z value.
    /// * `mz_max` - The maximum m/z value.
    /// * `intensity_min` - The minimum intensity value.
    /// * `intensity_max` - The maximum intensity value.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use msgauss::data::spectrum::MzSpectrum;
    /// let spectrum = MzSpectrum::new(vec![100.0, 200.0, 300.0], vec![10.0, 20.0, 30.0]);
    /// let filtered_spectrum = spectrum.filter_ranged(150.0, 250.0, 15.0, 25.0);
    /// assert_eq!(filtered_spectrum.mz, vec![200.0]);
    /// assert_eq!(filtered_spectrum.intensity, vec![20.0]);
    /// ```
    pub fn filter_ranged(&self, mz_min: f64, mz_max: f64, intensity_min: f64, intensity_max: f64) -> Self {
        let (mz, intensity) = self
            .mz
            .iter()
            .zip(self.intensity.iter())
            .filter(|(&mz, &intensity)| {
                mz_min <= mz && mz <= mz_max && intensity >= intensity_min && intensity <= intensity_max
            })
            .map(|(&mz, &intensity)| (mz, intensity))
            .unzip();
        MzSpectrum { mz, intensity }
    }

    /// The most intense (m/z, intensity) pair, `None` for an empty spectrum.
    pub fn base_peak(&self) -> Option<(f64, f64)> {
        self.mz
            .iter()
            .zip(self.intensity.iter())
            .max_by_key(|(_, &intensity)| OrderedFloat(intensity))
            .map(|(&mz, &intensity)| (mz, intensity))
    }

    /// Rescales intensities so that the base peak has intensity `target`.
    ///
    /// Spectra without a positive maximum are returned unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use msgauss::data::spectrum::MzSpectrum;
    /// let spectrum = MzSpectrum::new(vec![100.0, 101.0], vec![4.0, 2.0]).scaled_to_max(100.0);
    /// assert_eq!(spectrum.intensity, vec![100.0, 50.0]);
    /// ```
    pub fn scaled_to_max(&self, target: f64) -> Self {
        match self.base_peak() {
            Some((_, max)) if max > 0.0 => MzSpectrum {
                mz: self.mz.clone(),
                intensity: self.intensity.iter().map(|i| i * target / max).collect(),
            },
            _ => self.clone(),
        }
    }

    /// Replaces every stick by a Gaussian peak and returns the summed curve.
    ///
    /// See [`crate::algorithm::reconstruction::reconstruct`] for the algorithm and
    /// the meaning of `abort`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use msgauss::data::spectrum::MzSpectrum;
    /// # use msgauss::data::params::ReconstructionParameters;
    /// let sticks = MzSpectrum::new(vec![1000.0], vec![100.0]);
    /// let curve = sticks.to_continuous(&ReconstructionParameters::new(2000, 1000.0, 50), || false);
    /// assert_eq!(curve.len(), 255);
    /// ```
    pub fn to_continuous<F>(&self, params: &ReconstructionParameters, abort: F) -> MzSpectrum
    where
        F: FnMut() -> bool,
    {
        let curve = reconstruct(&self.to_points(), params, abort);
        let (mz, intensity) = curve.into_iter().map(|p| (p.x, p.y)).unzip();
        MzSpectrum { mz, intensity }
    }
}

/// Formats the `MzSpectrum` for display.
impl Display for MzSpectrum {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.base_peak() {
            Some((mz, i)) => write!(f, "MzSpectrum(data points: {}, max by intensity:({:.3}, {}))", self.len(), mz, i),
            None => write!(f, "MzSpectrum(data points: 0)"),
        }
    }
}
