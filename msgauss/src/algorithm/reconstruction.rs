use itertools::{EitherOrBoth, Itertools};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use crate::algorithm::cancel::AbortFlag;
use crate::algorithm::rounding::{round_to_multiple, round_to_nice_step};
use crate::data::params::ReconstructionParameters;
use crate::data::stick::StickPoint;
use crate::error::ReconstructionResult;

/// Upper bound on `x_range / bin_width`; the bin width is widened beyond it.
pub const MAX_DATA_POINTS: f64 = 1_000_000.0;
/// Number of sticks processed between two polls of the abort predicate.
pub const ABORT_POLL_INTERVAL: usize = 25;
/// Two x values closer than this are treated as the same bin.
pub const X_TOLERANCE: f64 = 1e-7;
/// Densification keeps every gap below `x_range / DENSIFY_DIVISIONS`.
pub const DENSIFY_DIVISIONS: f64 = 100.0;

// total window span in units of sigma, i.e. +-6 sigma around the center
const WINDOW_SIGMAS: f64 = 12.0;
/// Smallest bin width; adjacent samples must stay more than [`X_TOLERANCE`] apart.
///
/// A nice step of `1e-7` or finer is raised to this value.
pub const MIN_BIN_WIDTH: f64 = 2.0 * X_TOLERANCE;
/// Upper bound on `|x| / bin_width`, keeps lattice indices exact in both `i64` and `f64`.
pub const MAX_LATTICE_INDEX: f64 = 1e15;

/// lattice index of an x value; samples of all windows sit on `index * bin_width`
fn lattice_index(x: f64, bin_width: f64) -> i64 {
    (x / bin_width).round() as i64
}

/// Per-call scale quantities derived once from the stick range and parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleParameters {
    /// last.x - first.x of the input, 1.0 for single point or zero-width input
    pub x_range: f64,
    /// sample spacing of the curve
    pub bin_width: f64,
    /// Gaussian standard deviation
    pub sigma: f64,
    /// total x extent of one synthesized peak window
    pub window_span: f64,
    /// number of samples per peak window, always odd
    pub samples_per_window: usize,
    /// index of the sample that sits on the snapped stick position
    pub midpoint_index: usize,
}

impl ScaleParameters {
    /// Derives bin width, sigma and window geometry for a reconstruction.
    ///
    /// # Arguments
    ///
    /// * `sticks` - input sticks, sorted ascending by x
    /// * `params` - tuning parameters, normalized before use
    ///
    /// # Example
    ///
    /// ```rust
    /// # use msgauss::algorithm::reconstruction::ScaleParameters;
    /// # use msgauss::data::params::ReconstructionParameters;
    /// # use msgauss::data::stick::StickPoint;
    /// let sticks = vec![StickPoint::new(1000.0, 100.0)];
    /// let scale = ScaleParameters::derive(&sticks, &ReconstructionParameters::new(2000, 1000.0, 50));
    /// assert!((scale.bin_width - 0.01).abs() < 1e-12);
    /// assert_eq!(scale.samples_per_window, 255);
    /// assert_eq!(scale.midpoint_index, 127);
    /// ```
    pub fn derive(sticks: &[StickPoint], params: &ReconstructionParameters) -> Self {
        let params = params.normalized();

        let x_range = match (sticks.first(), sticks.last()) {
            (Some(first), Some(last)) if last.x - first.x > 0.0 => last.x - first.x,
            _ => 1.0,
        };

        let raw_bin_width = params.resolution_mass / params.resolution as f64 / params.quality_factor as f64;
        let mut bin_width = round_to_nice_step(raw_bin_width);
        if !(bin_width > f64::EPSILON) {
            bin_width = 1.0;
        }
        bin_width = bin_width.max(MIN_BIN_WIDTH);

        let sigma = params.sigma();
        let window_span = WINDOW_SIGMAS * sigma;

        if x_range / bin_width > MAX_DATA_POINTS {
            let widened = x_range / MAX_DATA_POINTS;
            warn!(
                requested = bin_width,
                widened,
                x_range,
                "bin width too fine for the x range, widening"
            );
            bin_width = widened;
        }

        let max_abs_x = sticks.iter().map(|s| s.x.abs()).fold(0.0, f64::max);
        if max_abs_x / bin_width > MAX_LATTICE_INDEX {
            let widened = max_abs_x / MAX_LATTICE_INDEX;
            warn!(requested = bin_width, widened, max_abs_x, "bin width too fine for the x magnitude, widening");
            bin_width = widened;
        }

        let mut samples_per_window = (window_span / bin_width).round() as usize;
        if samples_per_window % 2 == 0 {
            samples_per_window += 1;
        }
        let midpoint_index = (samples_per_window + 1) / 2 - 1;

        ScaleParameters {
            x_range,
            bin_width,
            sigma,
            window_span,
            samples_per_window,
            midpoint_index,
        }
    }

    /// Lattice index of the stick's x after snapping it up onto the bin lattice.
    pub fn center_index(&self, stick: &StickPoint) -> i64 {
        lattice_index(round_to_multiple(stick.x, self.bin_width, true), self.bin_width)
    }

    /// Fills `window` with the Gaussian samples of one stick.
    ///
    /// Sample `i` sits at lattice index `center_index - midpoint_index + i` and its
    /// x is computed from that index alone, so windows of different sticks produce
    /// bit-identical x values wherever they overlap.
    pub fn fill_window(&self, stick: &StickPoint, window: &mut [StickPoint]) {
        let center = self.center_index(stick);
        let first = center - self.midpoint_index as i64;
        let two_sigma_sq = 2.0 * self.sigma * self.sigma;

        for (i, sample) in window.iter_mut().enumerate() {
            let index = first + i as i64;
            let offset = (index - center) as f64 * self.bin_width;
            *sample = StickPoint::new(
                index as f64 * self.bin_width,
                stick.y * (-(offset * offset) / two_sigma_sq).exp(),
            );
        }
    }

    /// Allocating variant of [`ScaleParameters::fill_window`].
    pub fn gaussian_window(&self, stick: &StickPoint) -> Vec<StickPoint> {
        let mut window = vec![StickPoint::default(); self.samples_per_window];
        self.fill_window(stick, &mut window);
        window
    }
}

/// Merges a sorted peak window into the sorted accumulator.
///
/// Points on the same lattice index of `bin_width` are summed, everything else
/// is interleaved. Only the accumulator tail at or past the window start is
/// touched, so the cost is proportional to window plus overlap.
///
/// `cursor` is the start index returned by the previous merge. Windows of
/// x-ascending sticks never start before it; if one does, the start is looked
/// up over the whole accumulator instead.
///
/// Returns the index where this window's merge began.
fn merge_window(summation: &mut Vec<StickPoint>, window: &[StickPoint], cursor: usize, bin_width: f64) -> usize {
    let Some(first) = window.first() else {
        return cursor;
    };
    let key = |x: f64| lattice_index(x, bin_width);
    let window_start = key(first.x);

    let mut cursor = cursor.min(summation.len());
    if cursor > 0 && key(summation[cursor - 1].x) >= window_start {
        cursor = 0;
    }

    let start = cursor + summation[cursor..].partition_point(|point| key(point.x) < window_start);

    if start == summation.len() {
        summation.extend_from_slice(window);
        return start;
    }

    let overlap = summation.split_off(start);
    summation.reserve(overlap.len() + window.len());

    let merged = overlap
        .into_iter()
        .merge_join_by(window.iter().copied(), |acc, sample| key(acc.x).cmp(&key(sample.x)))
        .map(|pair| match pair {
            EitherOrBoth::Both(acc, sample) => StickPoint::new(acc.x, acc.y + sample.y),
            EitherOrBoth::Left(acc) => acc,
            EitherOrBoth::Right(sample) => sample,
        });
    summation.extend(merged);

    start
}

/// Fills gaps wider than `min_spacing` with interpolated points.
///
/// A gap below twice the spacing is split in half, a wider gap gets a point
/// one spacing to the right of its left neighbour; the new point's y is the
/// mean of its neighbours and it becomes the left neighbour for the rest of
/// the gap. The spacing is raised if needed so that at most
/// [`MAX_DATA_POINTS`] points are inserted.
fn densify(points: Vec<StickPoint>, min_spacing: f64) -> Vec<StickPoint> {
    if points.len() < 2 {
        return points;
    }
    let last = points[points.len() - 1];
    let extent = last.x - points[0].x;
    let min_spacing = min_spacing.max(extent / MAX_DATA_POINTS);
    if !(min_spacing > 0.0) || !min_spacing.is_finite() {
        return points;
    }

    let mut dense = Vec::with_capacity(points.len());

    for (left, right) in points.iter().copied().tuple_windows() {
        dense.push(left);

        let mut anchor = left;
        loop {
            let gap = right.x - anchor.x;
            if !gap.is_finite() || gap <= min_spacing + X_TOLERANCE {
                break;
            }

            let x = if gap < 2.0 * min_spacing {
                anchor.x + gap / 2.0
            } else {
                anchor.x + min_spacing
            };
            anchor = StickPoint::new(x, (anchor.y + right.y) / 2.0);
            dense.push(anchor);
        }
    }
    dense.push(last);

    dense
}

/// convert centroided stick data into a continuous curve of summed Gaussians
///
/// Every stick is replaced by a Gaussian of unit amplitude scaled by the stick
/// height, with a width set by the resolving power. Peaks are sampled on a
/// shared bin lattice so that overlapping peaks add up point by point, and
/// sparse regions are filled afterwards so that no gap exceeds 1% of the x range.
///
/// Arguments:
///
/// * `sticks` - stick data sorted ascending by x; unsorted input is a caller error
///   that still yields a sorted curve, only slower
/// * `params` - tuning parameters, silently normalized
/// * `abort` - polled before every 25th stick; returning true stops processing and
///   the curve built so far is densified and returned
///
/// Returns:
///
/// * `Vec<StickPoint>` - the curve, sorted ascending by x without duplicate x values
///
/// # Examples
///
/// ```
/// use msgauss::algorithm::reconstruction::reconstruct;
/// use msgauss::data::params::ReconstructionParameters;
/// use msgauss::data::stick::StickPoint;
///
/// let sticks = vec![StickPoint::new(1000.0, 100.0)];
/// let params = ReconstructionParameters::new(2000, 1000.0, 50);
/// let curve = reconstruct(&sticks, &params, || false);
///
/// let apex = curve.iter().max_by(|a, b| a.y.total_cmp(&b.y)).unwrap();
/// assert!((apex.x - 1000.0).abs() < 1e-7);
/// assert!((apex.y - 100.0).abs() < 1e-9);
/// ```
pub fn reconstruct<F>(sticks: &[StickPoint], params: &ReconstructionParameters, mut abort: F) -> Vec<StickPoint>
where
    F: FnMut() -> bool,
{
    if sticks.is_empty() {
        return Vec::new();
    }

    let scale = ScaleParameters::derive(sticks, params);
    debug!(
        sticks = sticks.len(),
        x_range = scale.x_range,
        bin_width = scale.bin_width,
        sigma = scale.sigma,
        samples_per_window = scale.samples_per_window,
        "derived scale parameters"
    );

    let mut summation: Vec<StickPoint> = Vec::with_capacity(scale.samples_per_window * sticks.len().min(64));
    let mut window = vec![StickPoint::default(); scale.samples_per_window];
    let mut cursor = 0;

    for (index, stick) in sticks.iter().enumerate() {
        if index % ABORT_POLL_INTERVAL == 0 && abort() {
            info!(processed = index, total = sticks.len(), "reconstruction aborted");
            break;
        }

        scale.fill_window(stick, &mut window);
        cursor = merge_window(&mut summation, &window, cursor, scale.bin_width);
    }

    densify(summation, scale.x_range / DENSIFY_DIVISIONS)
}

/// parallel version of `reconstruct`, one independent call per stick list
///
/// Arguments:
///
/// * `spectra` - stick lists, each sorted ascending by x
/// * `params` - tuning parameters shared by all calls
/// * `num_threads` - number of threads to use
/// * `abort` - shared flag, setting it stops every running call at its next poll
///
/// Returns:
///
/// * `Vec<Vec<StickPoint>>` - one curve per input, in input order
///
/// # Examples
///
/// ```
/// use msgauss::algorithm::cancel::AbortFlag;
/// use msgauss::algorithm::reconstruction::reconstruct_many;
/// use msgauss::data::params::ReconstructionParameters;
/// use msgauss::data::stick::StickPoint;
///
/// let spectra = vec![
///     vec![StickPoint::new(500.0, 10.0)],
///     vec![StickPoint::new(800.0, 20.0), StickPoint::new(801.0, 5.0)],
/// ];
/// let curves = reconstruct_many(&spectra, &ReconstructionParameters::default(), 2, &AbortFlag::new()).unwrap();
/// assert_eq!(curves.len(), 2);
/// ```
pub fn reconstruct_many(
    spectra: &[Vec<StickPoint>],
    params: &ReconstructionParameters,
    num_threads: usize,
    abort: &AbortFlag,
) -> ReconstructionResult<Vec<Vec<StickPoint>>> {
    let thread_pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;

    let curves = thread_pool.install(|| {
        spectra
            .par_iter()
            .map(|sticks| reconstruct(sticks, params, abort.poller()))
            .collect()
    });

    Ok(curves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn sticks(points: &[(f64, f64)]) -> Vec<StickPoint> {
        points.iter().map(|&p| p.into()).collect()
    }

    fn find_at(curve: &[StickPoint], x: f64) -> Option<StickPoint> {
        curve.iter().copied().find(|p| (p.x - x).abs() < X_TOLERANCE)
    }

    #[test]
    fn test_empty_input() {
        let curve = reconstruct(&[], &ReconstructionParameters::default(), || false);
        assert!(curve.is_empty());
    }

    #[test]
    fn test_derive_scale_scenario() {
        let scale = ScaleParameters::derive(&sticks(&[(1000.0, 100.0)]), &ReconstructionParameters::new(2000, 1000.0, 50));
        assert!((scale.x_range - 1.0).abs() < 1e-12);
        assert!((scale.bin_width - 0.01).abs() < 1e-12);
        assert!((scale.sigma - 0.2124).abs() < 1e-3);
        assert!((scale.window_span - 12.0 * scale.sigma).abs() < 1e-12);
        assert_eq!(scale.samples_per_window, 255);
        assert_eq!(scale.midpoint_index, 127);
    }

    #[test]
    fn test_derive_scale_forces_odd_window() {
        // 12 sigma / bin width = 10.19, rounds to an even 10
        let scale = ScaleParameters::derive(&sticks(&[(1000.0, 1.0)]), &ReconstructionParameters::new(1000, 1000.0, 2));
        assert!((scale.bin_width - 0.5).abs() < 1e-12);
        assert_eq!(scale.samples_per_window, 11);
        assert_eq!(scale.midpoint_index, 5);
    }

    #[test]
    fn test_derive_scale_normalizes_parameters() {
        let lhs = ScaleParameters::derive(&sticks(&[(10.0, 1.0)]), &ReconstructionParameters::new(-5, 1000.0, 99));
        let rhs = ScaleParameters::derive(&sticks(&[(10.0, 1.0)]), &ReconstructionParameters::new(1, 1000.0, 50));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_derive_scale_widens_bin_width() {
        let scale = ScaleParameters::derive(
            &sticks(&[(0.0, 1.0), (2_000_000.0, 1.0)]),
            &ReconstructionParameters::new(2000, 1000.0, 50),
        );
        assert!((scale.bin_width - 2.0).abs() < 1e-12);
        assert!(scale.x_range / scale.bin_width <= MAX_DATA_POINTS);
        assert_eq!(scale.samples_per_window % 2, 1);
    }

    #[test]
    fn test_derive_scale_keeps_fine_bin_width() {
        // raw width 2e-7 is already nice, the 0.1 range stays below the point ceiling
        let scale = ScaleParameters::derive(&sticks(&[(1.0, 1.0), (1.1, 1.0)]), &ReconstructionParameters::new(100_000, 1.0, 50));
        assert!((scale.bin_width - 2e-7).abs() < 1e-15);
        assert_eq!(scale.samples_per_window, 255);
    }

    #[test]
    fn test_derive_scale_floors_bin_width() {
        // raw width 1e-7 would put neighbours at the comparison tolerance
        let scale = ScaleParameters::derive(&sticks(&[(1.0, 1.0), (1.1, 1.0)]), &ReconstructionParameters::new(200_000, 1.0, 50));
        assert!((scale.bin_width - MIN_BIN_WIDTH).abs() < 1e-15);
    }

    #[test]
    fn test_derive_scale_bounds_lattice_index() {
        let scale = ScaleParameters::derive(&sticks(&[(1e12, 1.0)]), &ReconstructionParameters::new(100_000, 1.0, 50));
        assert!(1e12 / scale.bin_width <= MAX_LATTICE_INDEX * (1.0 + 1e-12));
        assert!(scale.bin_width > MIN_BIN_WIDTH);
    }

    #[test]
    fn test_gaussian_window_shape() {
        let scale = ScaleParameters::derive(&sticks(&[(1000.003, 10.0)]), &ReconstructionParameters::new(2000, 1000.0, 50));
        let window = scale.gaussian_window(&StickPoint::new(1000.003, 10.0));

        assert_eq!(window.len(), scale.samples_per_window);
        // snapped up onto the 0.01 lattice
        assert!((window[scale.midpoint_index].x - 1000.01).abs() < 1e-9);
        assert!((window[scale.midpoint_index].y - 10.0).abs() < 1e-12);
        for i in 0..scale.midpoint_index {
            let mirror = window.len() - 1 - i;
            assert!((window[i].y - window[mirror].y).abs() < 1e-12);
            assert!(window[i].x < window[i + 1].x);
        }
    }

    #[test]
    fn test_single_stick_scenario() {
        let params = ReconstructionParameters::new(2000, 1000.0, 50);
        let curve = reconstruct(&sticks(&[(1000.0, 100.0)]), &params, || false);

        assert_eq!(curve.len(), 255);
        let apex = find_at(&curve, 1000.0).unwrap();
        assert!((apex.y - 100.0).abs() < 1e-9);
        assert!(curve.iter().all(|p| p.y <= apex.y + 1e-9));

        // full width at half maximum is 0.5 at resolution 2000 and m/z 1000
        let above_half: Vec<f64> = curve.iter().filter(|p| p.y >= 50.0).map(|p| p.x).collect();
        let width = above_half.last().unwrap() - above_half.first().unwrap();
        assert!((width - 0.5).abs() <= 0.02);
    }

    #[test]
    fn test_adjacent_sticks_are_summed() {
        let params = ReconstructionParameters::new(2000, 1000.0, 50);
        let scale = ScaleParameters::derive(&sticks(&[(100.0, 1.0), (100.01, 1.0)]), &params);
        let curve = reconstruct(&sticks(&[(100.0, 1.0), (100.01, 1.0)]), &params, || false);

        let neighbour = (-(scale.bin_width * scale.bin_width) / (2.0 * scale.sigma * scale.sigma)).exp();
        let left = find_at(&curve, 100.0).unwrap();
        let right = find_at(&curve, 100.01).unwrap();
        assert!((left.y - (1.0 + neighbour)).abs() < 1e-9);
        assert!((right.y - (1.0 + neighbour)).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_sticks_are_merged() {
        let params = ReconstructionParameters::new(2000, 1000.0, 50);
        let curve = reconstruct(&sticks(&[(500.0, 3.0), (500.0, 4.0)]), &params, || false);

        assert_eq!(curve.len(), 255);
        let apex = find_at(&curve, 500.0).unwrap();
        assert!((apex.y - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_widened_bin_width_merges_overlaps() {
        // pairs 0.01 apart every 1.0 over a range that forces a non-nice bin width
        let mut input: Vec<StickPoint> = (0..124)
            .flat_map(|j| {
                let x = 1000.0 + j as f64;
                [StickPoint::new(x, 1.0), StickPoint::new(x + 0.01, 2.0)]
            })
            .collect();
        input.push(StickPoint::new(1123.45678, 1.0));

        let params = ReconstructionParameters::new(200_000, 1000.0, 50);
        let scale = ScaleParameters::derive(&input, &params);
        assert!((scale.bin_width - 123.45678 / MAX_DATA_POINTS).abs() < 1e-15);

        let curve = reconstruct(&input, &params, || false);
        for pair in curve.windows(2) {
            assert!(pair[1].x - pair[0].x >= X_TOLERANCE, "{} !< {}", pair[0].x, pair[1].x);
        }

        // overlapping samples are summed, not kept side by side
        let samples: f64 = input
            .iter()
            .map(|stick| scale.gaussian_window(stick).iter().map(|p| p.y).sum::<f64>())
            .sum();
        let summed: f64 = curve.iter().map(|p| p.y).sum();
        assert!((samples - summed).abs() < 1e-9 * samples);
        let distinct: std::collections::BTreeSet<i64> = input
            .iter()
            .flat_map(|stick| scale.gaussian_window(stick))
            .map(|p| lattice_index(p.x, scale.bin_width))
            .collect();
        assert_eq!(curve.len(), distinct.len());
    }

    #[test]
    fn test_large_x_keeps_neighbours_apart() {
        let params = ReconstructionParameters::new(2000, 1000.0, 50);
        let curve = reconstruct(&sticks(&[(1e12, 1.0), (1e12 + 0.5, 1.0)]), &params, || false);

        assert!(curve.windows(2).all(|w| w[1].x - w[0].x >= X_TOLERANCE));
        let max = curve.iter().map(|p| p.y).fold(0.0, f64::max);
        // the two peaks overlap only in their tails
        assert!(max > 1.0 && max < 1.1);
    }

    #[test]
    fn test_abort_before_first_stick() {
        let curve = reconstruct(&sticks(&[(100.0, 1.0), (200.0, 1.0)]), &ReconstructionParameters::default(), || true);
        assert!(curve.is_empty());
    }

    #[test]
    fn test_abort_keeps_partial_result() {
        let input: Vec<StickPoint> = (0..100).map(|i| StickPoint::new(100.0 + 10.0 * i as f64, 1.0)).collect();
        let params = ReconstructionParameters::new(2000, 1000.0, 50);
        let polls = Cell::new(0);

        let curve = reconstruct(&input, &params, || {
            polls.set(polls.get() + 1);
            polls.get() > 1
        });

        assert_eq!(polls.get(), 2);
        let last_processed = input[ABORT_POLL_INTERVAL - 1].x;
        assert!(!curve.is_empty());
        assert!(curve.iter().all(|p| p.x <= last_processed + 2.0));
        assert!(curve.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn test_merge_window_into_empty() {
        let mut summation = Vec::new();
        let window = sticks(&[(1.0, 1.0), (2.0, 2.0)]);
        let start = merge_window(&mut summation, &window, 0, 1.0);
        assert_eq!(start, 0);
        assert_eq!(summation, window);
    }

    #[test]
    fn test_merge_window_overlap() {
        let mut summation = sticks(&[(1.0, 1.0), (2.0, 1.0), (3.0, 1.0)]);
        let window = sticks(&[(2.0, 5.0), (2.5, 5.0), (3.0000000001, 5.0), (4.0, 5.0)]);
        let start = merge_window(&mut summation, &window, 0, 0.5);

        assert_eq!(start, 1);
        assert_eq!(summation.len(), 5);
        let xs: Vec<f64> = summation.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 2.5, 3.0, 4.0]);
        let ys: Vec<f64> = summation.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![1.0, 6.0, 5.0, 6.0, 5.0]);
    }

    #[test]
    fn test_merge_window_past_end_appends() {
        let mut summation = sticks(&[(1.0, 1.0)]);
        let start = merge_window(&mut summation, &sticks(&[(5.0, 2.0), (6.0, 2.0)]), 0, 1.0);
        assert_eq!(start, 1);
        assert_eq!(summation.len(), 3);
    }

    #[test]
    fn test_merge_window_before_cursor_stays_sorted() {
        let mut summation = sticks(&[(1.0, 1.0), (2.0, 1.0), (3.0, 1.0)]);
        let start = merge_window(&mut summation, &sticks(&[(0.5, 1.0), (2.0, 1.0)]), 2, 0.5);
        assert_eq!(start, 0);
        let xs: Vec<f64> = summation.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.5, 1.0, 2.0, 3.0]);
        assert!((summation[2].y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_densify_fills_gap() {
        let dense = densify(sticks(&[(0.0, 0.0), (1.0, 2.0)]), 0.3);
        let xs: Vec<f64> = dense.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = dense.iter().map(|p| p.y).collect();

        assert_eq!(dense.len(), 5);
        for (x, expected) in xs.iter().zip([0.0, 0.3, 0.6, 0.8, 1.0]) {
            assert!((x - expected).abs() < 1e-12);
        }
        for (y, expected) in ys.iter().zip([0.0, 1.0, 1.5, 1.75, 2.0]) {
            assert!((y - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_densify_leaves_tight_curve_alone() {
        let points = sticks(&[(0.0, 1.0), (0.1, 2.0), (0.2, 3.0)]);
        assert_eq!(densify(points.clone(), 0.1), points);
    }

    #[test]
    fn test_separated_sticks_respect_gap_bound() {
        let input = sticks(&[(100.0, 10.0), (200.0, 20.0)]);
        let curve = reconstruct(&input, &ReconstructionParameters::new(2000, 1000.0, 50), || false);

        for pair in curve.windows(2) {
            assert!(pair[1].x - pair[0].x <= 1.0 + X_TOLERANCE);
            assert!(pair[1].x > pair[0].x);
        }
    }

    #[test]
    fn test_reconstruct_many_matches_sequential() {
        let spectra = vec![
            sticks(&[(400.0, 5.0), (401.0, 2.0)]),
            sticks(&[(900.0, 1.0)]),
            Vec::new(),
        ];
        let params = ReconstructionParameters::new(3000, 500.0, 20);
        let curves = reconstruct_many(&spectra, &params, 2, &AbortFlag::new()).unwrap();

        assert_eq!(curves.len(), 3);
        for (sticks, curve) in spectra.iter().zip(curves.iter()) {
            assert_eq!(&reconstruct(sticks, &params, || false), curve);
        }
    }

    #[test]
    fn test_reconstruct_many_honours_abort() {
        let spectra = vec![sticks(&[(400.0, 5.0)]), sticks(&[(900.0, 1.0)])];
        let flag = AbortFlag::new();
        flag.set();
        let curves = reconstruct_many(&spectra, &ReconstructionParameters::default(), 2, &flag).unwrap();
        assert!(curves.iter().all(|curve| curve.is_empty()));
    }
}
