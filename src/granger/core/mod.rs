//! core — data, parameters, kernel, recursion, and likelihood of the
//! bivariate model.
//!
//! Purpose
//! -------
//! Collect the building blocks shared by estimation, simulation, and
//! testing: validated signal/grid containers, the 8-entry parameter vector
//! and its θ-space map, model variants, the cross-influence kernel, the
//! conditional-moment recursion, the log-likelihood, and fit options.
//!
//! Key behaviors
//! -------------
//! - [`TimeGrid`] / [`GrangerData`] validate raw inputs once; everything
//!   downstream assumes them.
//! - [`GrangerParams`] maps between model space and the free unconstrained
//!   coordinates of a [`ModelVariant`].
//! - [`conditional_moments`] is the single definition of the model used by
//!   both [`log_likelihood`] and the simulator.
//!
//! Invariants & assumptions
//! ------------------------
//! - Times are strictly increasing; every gap is positive.
//! - Fixed cross pairs are exactly zero and excluded from θ-space.
//!
//! Conventions
//! -----------
//! - Canonical parameter order is grouped per signal:
//!   `(φ, ψ, γ, σ²)` for root, then for shoot.
//! - No I/O and no logging in this subtree.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests; gradients are checked against
//!   central differences in [`recursion`], [`kernel`], and [`likelihood`].

pub mod data;
pub mod kernel;
pub mod likelihood;
pub mod options;
pub mod params;
pub mod recursion;
pub mod variant;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{GrangerData, TimeGrid, MIN_OBSERVATIONS};
pub use self::kernel::{cross_influence, kernel_value};
pub use self::likelihood::{log_likelihood, log_likelihood_raw, log_likelihood_with_score};
pub use self::options::FitOptions;
pub use self::params::{GrangerParams, Signal, SignalParams, THETA_LEN};
pub use self::recursion::{conditional_moments, Moments};
pub use self::variant::{Alternative, ModelVariant};

pub mod prelude {
    pub use super::data::{GrangerData, TimeGrid};
    pub use super::likelihood::{log_likelihood, log_likelihood_raw};
    pub use super::options::FitOptions;
    pub use super::params::{GrangerParams, Signal, SignalParams};
    pub use super::variant::{Alternative, ModelVariant};
}
