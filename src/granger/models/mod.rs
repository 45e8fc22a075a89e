//! models — estimation and simulation for the bivariate model.
//!
//! - [`estimator`]: [`GrangerModel`] implements `LogLikelihood` for one
//!   [`ModelVariant`](crate::granger::core::ModelVariant); [`fit`] and
//!   [`fit_from_starts`] return a [`FitResult`] whose
//!   [`ConvergenceStatus`] reports non-convergence instead of erroring.
//! - [`simulator`]: [`simulate`] draws from the same conditional moments the
//!   likelihood uses; [`sim_proc`] is the validated, seeded entry point.

pub mod estimator;
pub mod simulator;

pub use self::estimator::{fit, fit_from_starts, ConvergenceStatus, FitResult, GrangerModel};
pub use self::simulator::{sim_proc, simulate, SimulatedPair};

pub mod prelude {
    pub use super::estimator::{fit, fit_from_starts, ConvergenceStatus, FitResult, GrangerModel};
    pub use super::simulator::{sim_proc, simulate, SimulatedPair};
}
