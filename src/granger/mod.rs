//! granger — bivariate model of two irregularly sampled signals.
//!
//! Purpose
//! -------
//! Model a *root* and a *shoot* signal observed at shared, irregular times.
//! Each signal decays toward its own past with a range `φ` and may be pushed
//! by the other signal's past through a kernel peaking at `γ` with intensity
//! `ψ`. This module holds the model itself; the hypothesis test built on top
//! lives in `statistical_tests`.
//!
//! Key behaviors
//! -------------
//! - [`core`]: data containers, parameters, variants, kernel, recursion, and
//!   the exact Gaussian log-likelihood.
//! - [`models`]: maximum-likelihood fitting of any [`ModelVariant`] and
//!   seeded simulation from the same generative model.
//! - [`errors`]: [`GrangerError`] and [`ParamError`].
//!
//! Downstream usage
//! ----------------
//! 1. Build [`GrangerData`] from the observed signals and times.
//! 2. Fit with `models::fit` for the null and an alternative variant.
//! 3. Simulate replicates from a fitted [`GrangerParams`] with
//!    `models::simulate`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; integration tests under
//!   `tests/` run the full pipeline through `statistical_tests`.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    Alternative, FitOptions, GrangerData, GrangerParams, ModelVariant, Signal, SignalParams,
    TimeGrid,
};
pub use self::errors::{GrangerError, GrangerResult, ParamError, ParamResult};
pub use self::models::{fit, sim_proc, simulate, ConvergenceStatus, FitResult, SimulatedPair};

pub mod prelude {
    pub use super::{
        fit, sim_proc, simulate, Alternative, ConvergenceStatus, FitOptions, FitResult,
        GrangerData, GrangerError, GrangerParams, GrangerResult, ModelVariant, ParamError,
        ParamResult, Signal, SignalParams, SimulatedPair, TimeGrid,
    };
}
