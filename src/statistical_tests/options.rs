//! Configuration of a bootstrap Granger test.
//!
//! Purpose
//! -------
//! Collect the test-level knobs (alternative, replicate count, seed,
//! optional starting parameters, progress, reliability threshold) together
//! with the estimator's [`FitOptions`], validated once before any fitting.
//!
//! Key behaviors
//! -------------
//! - [`GrangerOptions::default`] matches the documented defaults: `twodir`,
//!   100 replicates, seed 123, progress on, threshold 0.5.
//! - [`GrangerOptions::new`] parses and validates raw inputs; the `with_*`
//!   builders adjust optional settings.
//!
//! Testing notes
//! -------------
//! - Unit tests cover defaults and every rejection path.
use crate::{
    granger::core::{
        options::FitOptions,
        params::{GrangerParams, Signal},
        variant::Alternative,
    },
    statistical_tests::errors::{GrangerTestError, GrangerTestResult},
};

pub const DEFAULT_REPLICATES: usize = 100;
pub const DEFAULT_SEED: u64 = 123;

/// Below this fraction of successful replicates the outcome is flagged.
pub const DEFAULT_MIN_SUCCESS_FRACTION: f64 = 0.5;

/// Test-level configuration.
///
/// Fields
/// ------
/// - `alternative`: which direction(s) of influence the alternative frees.
/// - `replicates`: number of bootstrap replicates `H ≥ 1`.
/// - `seed`: master seed; replicate `i` derives its own stream from it.
/// - `theta0`: optional start for the observed-data fits; `None` derives a
///   default from the data.
/// - `show_progress`: log progress when no explicit sink is given.
/// - `min_success_fraction`: reliability threshold in `[0, 1]`.
/// - `fit_opts`: optimizer and restart settings for every fit.
#[derive(Debug, Clone, PartialEq)]
pub struct GrangerOptions {
    pub alternative: Alternative,
    pub replicates: usize,
    pub seed: u64,
    pub theta0: Option<GrangerParams>,
    pub show_progress: bool,
    pub min_success_fraction: f64,
    pub fit_opts: FitOptions,
}

impl GrangerOptions {
    /// Build options from raw inputs.
    ///
    /// # Errors
    /// - `Model(InvalidAlternative)` for an unknown selector.
    /// - `Model(Param(..))` for an out-of-domain `theta0`.
    /// - `InvalidReplicates` when `replicates == 0`.
    pub fn new(
        alternative: &str, replicates: usize, seed: u64, theta0: Option<&[f64]>,
        show_progress: bool,
    ) -> GrangerTestResult<Self> {
        let alternative = alternative.parse::<Alternative>()?;
        let theta0 = theta0.map(GrangerParams::from_slice).transpose()?;
        let opts = Self { alternative, replicates, seed, theta0, show_progress, ..Self::default() };
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_fit_options(mut self, fit_opts: FitOptions) -> Self {
        self.fit_opts = fit_opts;
        self
    }

    /// # Errors
    /// `InvalidReliabilityThreshold` outside `[0, 1]`.
    pub fn with_min_success_fraction(mut self, fraction: f64) -> GrangerTestResult<Self> {
        self.min_success_fraction = fraction;
        self.validate()?;
        Ok(self)
    }

    /// Check fields that can be set directly.
    ///
    /// # Errors
    /// `InvalidReplicates`, `InvalidReliabilityThreshold`, or
    /// `Model(Param(..))` for a `theta0` outside its domains.
    pub fn validate(&self) -> GrangerTestResult<()> {
        if self.replicates == 0 {
            return Err(GrangerTestError::InvalidReplicates { replicates: self.replicates });
        }
        if !(0.0..=1.0).contains(&self.min_success_fraction) {
            return Err(GrangerTestError::InvalidReliabilityThreshold {
                value: self.min_success_fraction,
            });
        }
        if let Some(theta0) = &self.theta0 {
            theta0.root.validate(Signal::Root)?;
            theta0.shoot.validate(Signal::Shoot)?;
        }
        Ok(())
    }
}

impl Default for GrangerOptions {
    fn default() -> Self {
        Self {
            alternative: Alternative::default(),
            replicates: DEFAULT_REPLICATES,
            seed: DEFAULT_SEED,
            theta0: None,
            show_progress: true,
            min_success_fraction: DEFAULT_MIN_SUCCESS_FRACTION,
            fit_opts: FitOptions::default(),
        }
    }
}
