//! statistical_tests — bootstrap likelihood-ratio Granger test.
//!
//! Purpose
//! -------
//! Turn the bivariate model of `granger` into a hypothesis test: fit the
//! null and an alternative to observed data, compare them with a
//! likelihood-ratio statistic, and calibrate that statistic with a
//! parametric bootstrap instead of its (unreliable) χ² limit.
//!
//! Key behaviors
//! -------------
//! - [`granger_test`] / [`GrangerOutcome::granger_test`] run the whole test.
//! - [`bootstrap`] simulates and refits replicates with per-replicate seeds
//!   from [`replicate_seed`], so replicate `i` is the same for any `H`.
//! - [`progress`] defines the [`ProgressSink`] notified once per replicate.
//! - [`errors`] reports fatal conditions as [`GrangerTestError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Observed and bootstrap statistics are ≥ 0.
//! - Replicate non-convergence is a discard, never an error; an observed
//!   fit that does not converge is an error.
//!
//! Downstream usage
//! ----------------
//! ```rust,no_run
//! use irregular_granger::statistical_tests::{granger_test, GrangerTestResult};
//!
//! fn run(root: &[f64], shoot: &[f64], times: &[f64]) -> GrangerTestResult<f64> {
//!     let out = granger_test(root, shoot, times, None, "twodir", 100, 123, false)?;
//!     Ok(out.p_value())
//! }
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests sit in each submodule; `tests/integration_granger_pipeline.rs`
//!   checks determinism, power, null calibration, and validation end to end.

pub mod bootstrap;
pub mod errors;
pub mod granger;
pub mod options;
pub mod progress;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bootstrap::{replicate_seed, BootstrapSample, ReplicateOutcome};
pub use self::errors::{GrangerTestError, GrangerTestResult};
pub use self::granger::{granger_test, GrangerOutcome};
pub use self::options::GrangerOptions;
pub use self::progress::{LogProgress, NoProgress, ProgressSink};

pub mod prelude {
    pub use super::errors::{GrangerTestError, GrangerTestResult};
    pub use super::granger::{granger_test, GrangerOutcome};
    pub use super::options::GrangerOptions;
    pub use super::progress::{LogProgress, ProgressSink};
}
