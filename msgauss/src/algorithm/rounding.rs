/// Hard cap on refinement steps in [`round_to_multiple`].
pub const MAX_ROUNDING_ITERATIONS: usize = 500;

// relative slack for treating value / multiple as a whole number
const WHOLE_RATIO_TOLERANCE: f64 = 1e-9;
// absorbs representation error when reading the leading digit
const MANTISSA_SLACK: f64 = 1e-9;

/// rescale a digit by a power of ten, dividing for negative exponents so that
/// results like 0.01 come out correctly rounded
fn scale_by_power_of_ten(digit: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        digit * 10f64.powi(exponent)
    } else {
        digit / 10f64.powi(-exponent)
    }
}

/// round a raw step width to a "nice" value of the form {1, 2, 5} x 10^k
///
/// Arguments:
///
/// * `x` - raw step width
///
/// Returns:
///
/// * `f64` - the nice step with the same order of magnitude as `x`; the leading
///   digit of `x` maps 1 -> 1, 2..=4 -> 2 and 5..=9 -> 5. Zero and non-finite
///   input yield 0.0, the sign of negative input is kept.
///
/// # Examples
///
/// ```
/// use msgauss::algorithm::rounding::round_to_nice_step;
///
/// assert_eq!(round_to_nice_step(0.0133), 0.01);
/// assert_eq!(round_to_nice_step(0.037), 0.02);
/// assert_eq!(round_to_nice_step(730.0), 500.0);
/// ```
pub fn round_to_nice_step(x: f64) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return 0.0;
    }

    let magnitude = x.abs();
    let mut exponent = magnitude.log10().floor() as i32;
    let mut mantissa = magnitude / scale_by_power_of_ten(1.0, exponent);

    // log10 may land one off for exact powers of ten
    if mantissa >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    } else if mantissa < 1.0 {
        mantissa *= 10.0;
        exponent -= 1;
    }

    let mut leading_digit = (mantissa + MANTISSA_SLACK).floor();
    if leading_digit >= 10.0 {
        leading_digit = 1.0;
        exponent += 1;
    }

    let nice_digit = match leading_digit {
        d if d < 2.0 => 1.0,
        d if d < 5.0 => 2.0,
        _ => 5.0,
    };

    scale_by_power_of_ten(nice_digit, exponent).copysign(x)
}

/// round a value to an exact multiple of `multiple`, towards +inf or -inf
///
/// A value that already is a multiple (within floating point drift) is
/// returned on the lattice unchanged. The candidate is corrected step by step
/// while product rounding leaves it on the wrong side of `value`; after
/// [`MAX_ROUNDING_ITERATIONS`] steps the current candidate is returned as-is.
///
/// Arguments:
///
/// * `value` - value to round
/// * `multiple` - lattice spacing, must be positive and finite
/// * `round_up` - round towards +inf if true, else towards -inf
///
/// Returns:
///
/// * `f64` - the rounded value, or `value` unchanged if `multiple` is unusable
///
/// # Examples
///
/// ```
/// use msgauss::algorithm::rounding::round_to_multiple;
///
/// let up = round_to_multiple(1000.0003, 0.002, true);
/// let down = round_to_multiple(1000.0003, 0.002, false);
/// assert!((up - 1000.002).abs() < 1e-9);
/// assert!((down - 1000.0).abs() < 1e-9);
/// ```
pub fn round_to_multiple(value: f64, multiple: f64, round_up: bool) -> f64 {
    if !value.is_finite() || !multiple.is_finite() || multiple <= 0.0 {
        return value;
    }

    let ratio = value / multiple;
    let nearest = ratio.round();

    let steps = if (ratio - nearest).abs() <= WHOLE_RATIO_TOLERANCE * nearest.abs().max(1.0) {
        nearest
    } else if round_up {
        ratio.ceil()
    } else {
        ratio.floor()
    };

    refine_multiple(value, multiple, steps, round_up, MAX_ROUNDING_ITERATIONS)
}

/// step `steps` towards the correct side of `value`, giving up after `max_iterations`
/// and returning the last candidate
fn refine_multiple(value: f64, multiple: f64, mut steps: f64, round_up: bool, max_iterations: usize) -> f64 {
    let mut candidate = steps * multiple;

    for _ in 0..max_iterations {
        let slack = multiple * WHOLE_RATIO_TOLERANCE * steps.abs().max(1.0);
        let wrong_side = if round_up {
            value - candidate
        } else {
            candidate - value
        };

        if wrong_side <= slack {
            return candidate;
        }

        steps += if round_up { 1.0 } else { -1.0 };
        candidate = steps * multiple;
    }

    candidate
}
