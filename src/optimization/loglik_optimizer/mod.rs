//! loglik_optimizer — argmin-backed log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Let a model implement one trait, [`LogLikelihood`], and get a maximum
//! likelihood fit out of [`maximize`]: L-BFGS with a More–Thuente or
//! Hager–Zhang line search, tolerances from [`MLEOptions`], and a
//! finite-difference gradient when the model has no analytic one.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost
//!   `c(θ) = −ℓ(θ)` and flips analytic gradients.
//! - [`finite_diff::fd_gradient`] supplies central (then forward)
//!   differences of the cost when `grad` is not implemented.
//! - [`builders`] construct the solver; [`run::run_lbfgs`] executes it and
//!   normalizes the final state into an [`OptimOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters live in an unconstrained space; constrained model
//!   parameters are mapped by the model layer.
//! - `OptimOutcome::converged` is only `true` when a tolerance was met.
//!   Hitting `max_iter` is reported, not hidden.
//! - Invalid inputs surface as [`OptError`](crate::optimization::errors::OptError),
//!   never as panics.
//!
//! Downstream usage
//! ----------------
//! - `granger::models::estimator` implements [`LogLikelihood`] for the
//!   bivariate model and calls [`maximize`] once per starting point.
//!
//! Testing notes
//! -------------
//! - Unit tests cover solver construction ([`builders`]), gradient
//!   fallbacks ([`finite_diff`]), configuration and convergence semantics
//!   ([`traits`]), validation helpers, and full solves on a quadratic
//!   target ([`api`]).

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
