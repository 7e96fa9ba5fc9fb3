extern crate statrs;

use statrs::distribution::{Discrete, Poisson};

use crate::chemistry::constants::{MASS_NEUTRON, MASS_PROTON};
use crate::data::stick::StickPoint;

pub const AVERAGINE_SLOPE: f64 = 0.000594;
pub const AVERAGINE_INTERCEPT: f64 = -0.03091;

/// calculate the lambda value for a given mass
///
/// Arguments:
///
/// * `mass` - neutral mass of the peptide
/// * `slope` - slope of the linear regression
/// * `intercept` - intercept of the linear regression
///
/// Returns:
///
/// * `f64` - lambda value
///
/// # Examples
///
/// ```
/// use msgauss::algorithm::averagine::lam;
///
/// let lambda = lam(1000.0, 0.000594, -0.03091);
/// assert!((lambda - 0.56309).abs() < 1e-12);
/// ```
pub fn lam(mass: f64, slope: f64, intercept: f64) -> f64 {
    slope * mass + intercept
}

/// relative isotope abundances of the averagine model, summing to one
///
/// Arguments:
///
/// * `mass` - neutral mass of the peptide
/// * `num_isotopes` - number of isotope peaks to return
///
/// Returns:
///
/// * `Vec<f64>` - Poisson weights for isotope 0..num_isotopes, normalized
///
pub fn isotope_weights(mass: f64, num_isotopes: usize) -> Vec<f64> {
    if num_isotopes == 0 {
        return Vec::new();
    }

    let lambda = lam(mass, AVERAGINE_SLOPE, AVERAGINE_INTERCEPT);
    let weights: Vec<f64> = match Poisson::new(lambda) {
        Ok(poisson) => (0..num_isotopes as u64).map(|k| poisson.pmf(k)).collect(),
        // light masses carry no heavy isotopes in this model
        Err(_) => (0..num_isotopes).map(|k| if k == 0 { 1.0 } else { 0.0 }).collect(),
    };

    let sum: f64 = weights.iter().sum();
    weights.iter().map(|&w| w / sum).collect()
}

/// generate an averagine stick spectrum for a given mass and charge
///
/// Sticks are placed at (mass + k * MASS_NEUTRON) / charge + MASS_PROTON and
/// scaled so that the most abundant isotope has height 100.
///
/// Arguments:
///
/// * `mass` - neutral mass of the peptide
/// * `charge` - charge state, values below 1 are treated as 1
/// * `num_isotopes` - number of isotope peaks to generate
///
/// Returns:
///
/// * `Vec<StickPoint>` - stick spectrum sorted by m/z
///
/// # Examples
///
/// ```
/// use msgauss::algorithm::averagine::averagine_sticks;
///
/// let sticks = averagine_sticks(3000.0, 2, 5);
/// assert_eq!(sticks.len(), 5);
/// assert!(sticks.windows(2).all(|w| w[0].x < w[1].x));
/// ```
pub fn averagine_sticks(mass: f64, charge: i32, num_isotopes: usize) -> Vec<StickPoint> {
    let charge = charge.max(1) as f64;
    let weights = isotope_weights(mass, num_isotopes);
    let max_weight = weights.iter().cloned().fold(0.0, f64::max);

    if max_weight <= 0.0 {
        return Vec::new();
    }

    weights
        .iter()
        .enumerate()
        .map(|(k, &w)| StickPoint::new((mass + MASS_NEUTRON * k as f64) / charge + MASS_PROTON, 100.0 * w / max_weight))
        .collect()
}
