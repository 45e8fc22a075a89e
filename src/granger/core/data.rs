//! Signal and time-grid containers for the bivariate model.
//!
//! Purpose
//! -------
//! Provide validated containers for a pair of irregularly sampled signals
//! and their shared time grid. Everything downstream (likelihood,
//! estimator, simulator, bootstrap) may assume clean inputs once one of
//! these types exists.
//!
//! Key behaviors
//! -------------
//! - [`TimeGrid`] enforces a non-empty, finite, non-negative, strictly
//!   increasing sequence of sampling times.
//! - [`GrangerData`] pairs two equal-length, finite signals with a grid of
//!   the same length and at least [`MIN_OBSERVATIONS`] points.
//!
//! Invariants & assumptions
//! ------------------------
//! - Gaps between consecutive times are strictly positive, so every
//!   autoregressive weight `exp(−Δ/φ)` lies in (0, 1).
//! - Signals are stored as given; no centering or scaling is applied.
//!
//! Conventions
//! -----------
//! - Index `i` refers to the same sampling time in both signals.
//! - Validation stops at the first offending element and reports its index.
//!
//! Downstream usage
//! ----------------
//! - Build a [`GrangerData`] at the public boundary; the bootstrap reuses the
//!   observed [`TimeGrid`] for every simulated replicate.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each rejection path plus span, spacing, and sample
//!   variance helpers.
use crate::granger::{
    core::params::Signal,
    errors::{GrangerError, GrangerResult},
};
use ndarray::Array1;

/// Fewest paired observations accepted for a fit.
///
/// The two-direction model has eight free parameters; ten points leave at
/// least a couple of degrees of freedom in each equation.
pub const MIN_OBSERVATIONS: usize = 10;

/// `TimeGrid` — validated, strictly increasing sampling times.
///
/// Invariants
/// ----------
/// - Non-empty, all entries finite and ≥ 0.
/// - `times[i] > times[i - 1]` for every `i ≥ 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Array1<f64>,
}

impl TimeGrid {
    /// Validate and wrap a sequence of sampling times.
    ///
    /// Errors
    /// ------
    /// - `GrangerError::EmptyTimeGrid` for an empty input.
    /// - `GrangerError::NonFiniteTime { index, value }` for NaN/±∞.
    /// - `GrangerError::NegativeTime { index, value }` for a value < 0.
    /// - `GrangerError::NonIncreasingTime { index, previous, value }` when a
    ///   time does not exceed its predecessor.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use irregular_granger::granger::core::data::TimeGrid;
    /// let grid = TimeGrid::new(array![0.0, 5.0, 10.0, 30.0]).unwrap();
    /// assert_eq!(grid.span(), 30.0);
    /// assert!(TimeGrid::new(array![0.0, 5.0, 5.0]).is_err());
    /// ```
    pub fn new(times: Array1<f64>) -> GrangerResult<Self> {
        if times.is_empty() {
            return Err(GrangerError::EmptyTimeGrid);
        }
        let mut previous: Option<f64> = None;
        for (index, &value) in times.iter().enumerate() {
            if !value.is_finite() {
                return Err(GrangerError::NonFiniteTime { index, value });
            }
            if value < 0.0 {
                return Err(GrangerError::NegativeTime { index, value });
            }
            if let Some(prev) = previous {
                if value <= prev {
                    return Err(GrangerError::NonIncreasingTime { index, previous: prev, value });
                }
            }
            previous = Some(value);
        }
        Ok(Self { times })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn as_array(&self) -> &Array1<f64> {
        &self.times
    }

    /// Contiguous view of the times.
    ///
    /// Grids are always built from owned, standard-layout arrays, so the
    /// fallback branch is unreachable in practice.
    pub fn as_slice(&self) -> &[f64] {
        self.times.as_slice().unwrap_or(&[])
    }

    /// Last time minus first time.
    pub fn span(&self) -> f64 {
        self.times[self.times.len() - 1] - self.times[0]
    }

    /// Average gap between consecutive times (the span for a single point).
    pub fn mean_spacing(&self) -> f64 {
        if self.times.len() < 2 {
            return self.span();
        }
        self.span() / (self.times.len() - 1) as f64
    }
}

/// `GrangerData` — two paired signals on a shared [`TimeGrid`].
///
/// Fields
/// ------
/// - `root`, `shoot`: observed values, finite, one per grid point.
/// - `grid`: sampling times shared by both signals.
///
/// Invariants
/// ----------
/// - `root.len() == shoot.len() == grid.len() >= MIN_OBSERVATIONS`.
#[derive(Debug, Clone, PartialEq)]
pub struct GrangerData {
    root: Array1<f64>,
    shoot: Array1<f64>,
    grid: TimeGrid,
}

impl GrangerData {
    /// Validate raw inputs and build the container.
    ///
    /// Errors
    /// ------
    /// - `GrangerError::LengthMismatch` when the three lengths differ.
    /// - `GrangerError::InsufficientData` below [`MIN_OBSERVATIONS`].
    /// - Any [`TimeGrid::new`] error.
    /// - `GrangerError::NonFiniteData { signal, index, value }` for a
    ///   non-finite signal value.
    pub fn new(
        root: Array1<f64>, shoot: Array1<f64>, times: Array1<f64>,
    ) -> GrangerResult<Self> {
        if root.len() != shoot.len() || root.len() != times.len() {
            return Err(GrangerError::LengthMismatch {
                root: root.len(),
                shoot: shoot.len(),
                times: times.len(),
            });
        }
        if root.len() < MIN_OBSERVATIONS {
            return Err(GrangerError::InsufficientData { len: root.len(), min: MIN_OBSERVATIONS });
        }
        let grid = TimeGrid::new(times)?;
        Self::with_grid(root, shoot, grid)
    }

    /// Convenience wrapper over [`GrangerData::new`] for borrowed slices.
    pub fn from_slices(root: &[f64], shoot: &[f64], times: &[f64]) -> GrangerResult<Self> {
        Self::new(Array1::from(root.to_vec()), Array1::from(shoot.to_vec()), Array1::from(times.to_vec()))
    }

    /// Pair new signals with an already validated grid.
    ///
    /// Used by the bootstrap, where every replicate shares the observed
    /// grid. Lengths and finiteness are still checked.
    pub fn with_grid(root: Array1<f64>, shoot: Array1<f64>, grid: TimeGrid) -> GrangerResult<Self> {
        if root.len() != grid.len() || shoot.len() != grid.len() {
            return Err(GrangerError::LengthMismatch {
                root: root.len(),
                shoot: shoot.len(),
                times: grid.len(),
            });
        }
        if grid.len() < MIN_OBSERVATIONS {
            return Err(GrangerError::InsufficientData { len: grid.len(), min: MIN_OBSERVATIONS });
        }
        check_finite(&root, Signal::Root)?;
        check_finite(&shoot, Signal::Shoot)?;
        Ok(Self { root, shoot, grid })
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn root(&self) -> &Array1<f64> {
        &self.root
    }

    pub fn shoot(&self) -> &Array1<f64> {
        &self.shoot
    }

    pub fn signal(&self, signal: Signal) -> &Array1<f64> {
        match signal {
            Signal::Root => &self.root,
            Signal::Shoot => &self.shoot,
        }
    }

    /// Reject a signal without any variation.
    ///
    /// Standardized inputs never have zero variance; a constant signal
    /// leaves the variance parameter unidentified and any statistic built on
    /// it meaningless.
    ///
    /// # Errors
    /// `GrangerError::ConstantSignal` naming the first constant signal.
    pub fn ensure_varying(&self) -> GrangerResult<()> {
        for signal in [Signal::Root, Signal::Shoot] {
            let values = self.signal(signal);
            let Some(&first) = values.first() else { continue };
            if values.iter().all(|&v| v == first) {
                return Err(GrangerError::ConstantSignal { signal, value: first });
            }
        }
        Ok(())
    }

    /// Unbiased sample variance (`n − 1` denominator) of one signal.
    pub fn sample_variance(&self, signal: Signal) -> f64 {
        let values = self.signal(signal);
        let n = values.len() as f64;
        let mean = values.sum() / n;
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
    }
}

fn check_finite(values: &Array1<f64>, signal: Signal) -> GrangerResult<()> {
    match values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(GrangerError::NonFiniteData { signal, index, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn grid10() -> Array1<f64> {
        array![0.0, 5.0, 10.0, 15.0, 20.0, 30.0, 45.0, 60.0, 90.0, 120.0]
    }

    #[test]
    // Purpose
    // -------
    // Every time-grid rejection path fires with the offending index.
    //
    // Given
    // -----
    // - Empty, NaN, negative, repeated, and decreasing grids.
    //
    // Expect
    // ------
    // - The matching `GrangerError` variant for each.
    fn time_grid_rejects_invalid_sequences() {
        assert_eq!(TimeGrid::new(array![]), Err(GrangerError::EmptyTimeGrid));
        assert!(matches!(
            TimeGrid::new(array![0.0, f64::NAN]),
            Err(GrangerError::NonFiniteTime { index: 1, .. })
        ));
        assert!(matches!(
            TimeGrid::new(array![-1.0, 2.0]),
            Err(GrangerError::NegativeTime { index: 0, .. })
        ));
        assert!(matches!(
            TimeGrid::new(array![0.0, 3.0, 3.0]),
            Err(GrangerError::NonIncreasingTime { index: 2, .. })
        ));
        assert!(matches!(
            TimeGrid::new(array![0.0, 3.0, 1.0]),
            Err(GrangerError::NonIncreasingTime { index: 2, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Grid helpers report span and mean spacing.
    //
    // Given
    // -----
    // - The ten-point example grid ending at 120.
    //
    // Expect
    // ------
    // - Span 120, mean spacing 120 / 9.
    fn time_grid_span_and_spacing() {
        let grid = TimeGrid::new(grid10()).expect("Valid grid");
        assert_eq!(grid.len(), 10);
        assert_abs_diff_eq!(grid.span(), 120.0);
        assert_abs_diff_eq!(grid.mean_spacing(), 120.0 / 9.0, epsilon = 1e-12);
        assert_eq!(grid.as_slice()[3], 15.0);
    }

    #[test]
    // Purpose
    // -------
    // `GrangerData::new` checks lengths, size, and finiteness.
    //
    // Given
    // -----
    // - Mismatched lengths, a 5-point input, and a NaN in `shoot`.
    //
    // Expect
    // ------
    // - `LengthMismatch`, `InsufficientData`, `NonFiniteData` on shoot.
    fn data_rejects_invalid_inputs() {
        let ok = Array1::from_elem(10, 1.0);

        assert!(matches!(
            GrangerData::new(ok.clone(), Array1::from_elem(9, 1.0), grid10()),
            Err(GrangerError::LengthMismatch { root: 10, shoot: 9, times: 10 })
        ));
        assert!(matches!(
            GrangerData::new(
                Array1::from_elem(5, 1.0),
                Array1::from_elem(5, 1.0),
                array![0.0, 1.0, 2.0, 3.0, 4.0]
            ),
            Err(GrangerError::InsufficientData { len: 5, min: MIN_OBSERVATIONS })
        ));

        let mut bad = ok.clone();
        bad[7] = f64::NAN;
        match GrangerData::new(ok, bad, grid10()) {
            Err(GrangerError::NonFiniteData { signal, index, .. }) => {
                assert_eq!(signal, Signal::Shoot);
                assert_eq!(index, 7);
            }
            other => panic!("Expected NonFiniteData, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Sample variance uses the unbiased denominator.
    //
    // Given
    // -----
    // - root = 0..9, shoot constant.
    //
    // Expect
    // ------
    // - Var(root) = 55 / 6, Var(shoot) = 0.
    fn sample_variance_is_unbiased() {
        let root = Array1::from_iter((0..10).map(|i| i as f64));
        let data =
            GrangerData::new(root, Array1::from_elem(10, 2.0), grid10()).expect("Valid data");
        assert_abs_diff_eq!(data.sample_variance(Signal::Root), 55.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(data.sample_variance(Signal::Shoot), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Constant signals are rejected by `ensure_varying`.
    //
    // Given
    // -----
    // - A varying root with a constant shoot, then both varying.
    //
    // Expect
    // ------
    // - `ConstantSignal` naming shoot; the varying pair passes.
    fn ensure_varying_rejects_constant_signal() {
        // Arrange
        let root = Array1::from_iter((0..10).map(|i| (i as f64).sin()));
        let constant = GrangerData::new(root.clone(), Array1::from_elem(10, 2.0), grid10())
            .expect("Valid data");
        let varying =
            GrangerData::new(root.clone(), root.mapv(|v| -v), grid10()).expect("Valid data");

        // Act
        let constant_check = constant.ensure_varying();
        let varying_check = varying.ensure_varying();

        // Assert
        assert_eq!(
            constant_check,
            Err(GrangerError::ConstantSignal { signal: Signal::Shoot, value: 2.0 })
        );
        assert_eq!(varying_check, Ok(()));
    }
}
