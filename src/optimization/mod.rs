//! optimization — MLE stack, parameter transforms, and optimizer errors.
//!
//! Purpose
//! -------
//! Provide the model-agnostic half of fitting: an argmin-backed
//! log-likelihood maximizer, numerically stable transforms between
//! unconstrained and constrained parameters, and one error surface for
//! everything that can go wrong on the way.
//!
//! Key behaviors
//! -------------
//! - [`loglik_optimizer`]: implement `LogLikelihood`, call `maximize`, get an
//!   `OptimOutcome` with an honest convergence flag.
//! - [`numerical_stability`]: softplus / bounded-tanh maps with derivatives.
//! - [`errors`]: `OptError` / `OptResult<T>`, with conversions from argmin
//!   errors and from model parameter errors.
//!
//! Conventions
//! -----------
//! - Solvers minimize `c(θ) = −ℓ(θ)`; everything user-facing is in `ℓ`.
//! - This subtree performs no I/O. Solver tracing is opt-in through the
//!   `obs_slog` feature.
//!
//! Downstream usage
//! ----------------
//! - `granger::models::estimator` is the only in-crate consumer; the module
//!   is public so other models can reuse the optimizer.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
