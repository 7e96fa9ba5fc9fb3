use serde::{Deserialize, Serialize};

pub const DEFAULT_RESOLUTION: i32 = 5000;
pub const DEFAULT_RESOLUTION_MASS: f64 = 1000.0;
pub const DEFAULT_QUALITY_FACTOR: i32 = 50;
pub const MIN_QUALITY_FACTOR: i32 = 1;
pub const MAX_QUALITY_FACTOR: i32 = 75;

/// Tuning parameters for converting stick data into a continuous Gaussian curve
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionParameters {
    /// Instrument resolving power (default: 5000), clamped to at least 1
    pub resolution: i32,
    /// The m/z at which `resolution` was determined (default: 1000.0)
    pub resolution_mass: f64,
    /// Samples-per-peak multiplier in [1, 75] (default: 50)
    pub quality_factor: i32,
}

impl Default for ReconstructionParameters {
    fn default() -> Self {
        ReconstructionParameters {
            resolution: DEFAULT_RESOLUTION,
            resolution_mass: DEFAULT_RESOLUTION_MASS,
            quality_factor: DEFAULT_QUALITY_FACTOR,
        }
    }
}

impl ReconstructionParameters {
    pub fn new(resolution: i32, resolution_mass: f64, quality_factor: i32) -> Self {
        ReconstructionParameters { resolution, resolution_mass, quality_factor }
    }

    /// Returns a copy with every field forced into its valid range.
    ///
    /// Invalid values are replaced rather than reported, so a parameter sweep
    /// passing through transient nonsense never stalls the pipeline:
    ///
    /// * `resolution` below 1 becomes 1
    /// * `quality_factor` outside [1, 75] becomes 50
    /// * a non-finite or non-positive `resolution_mass` becomes 1000.0
    ///
    /// # Example
    ///
    /// ```rust
    /// # use msgauss::data::params::ReconstructionParameters;
    /// let params = ReconstructionParameters::new(-3, 1000.0, 120).normalized();
    /// assert_eq!(params.resolution, 1);
    /// assert_eq!(params.quality_factor, 50);
    /// ```
    pub fn normalized(&self) -> Self {
        let quality_factor = if (MIN_QUALITY_FACTOR..=MAX_QUALITY_FACTOR).contains(&self.quality_factor) {
            self.quality_factor
        } else {
            DEFAULT_QUALITY_FACTOR
        };

        let resolution_mass = if self.resolution_mass.is_finite() && self.resolution_mass > 0.0 {
            self.resolution_mass
        } else {
            DEFAULT_RESOLUTION_MASS
        };

        ReconstructionParameters {
            resolution: self.resolution.max(1),
            resolution_mass,
            quality_factor,
        }
    }

    /// Gaussian standard deviation implied by the resolving power.
    ///
    /// The peak FWHM at `resolution_mass` is `resolution_mass / resolution`, and
    /// `FWHM = sqrt(8 ln 2) * sigma ≈ sqrt(5.54) * sigma`.
    pub fn sigma(&self) -> f64 {
        let params = self.normalized();
        params.resolution_mass / params.resolution as f64 / 5.54f64.sqrt()
    }
}
