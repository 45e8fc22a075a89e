//! numerical_stability — stable parameter transforms and shared tolerances.
//!
//! Purpose
//! -------
//! Collect the scalar maps that carry unconstrained optimizer coordinates
//! into the bivariate model's parameter domains, plus the small constants
//! that keep the likelihood away from degenerate corners.
//!
//! Key behaviors
//! -------------
//! - Softplus for decay ranges `φ`, variances `σ²`, and kernel peaks `γ`,
//!   floored at [`POSITIVE_FLOOR`].
//! - Scaled `tanh` for cross-impacts `ψ`, strictly inside (−1, 1) by
//!   [`PSI_MARGIN`].
//! - Every forward map returns its derivative alongside the value so the
//!   model can apply the chain rule without a second pass.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; validation of model-space values happens in
//!   `granger::core::params`.
//! - No I/O and no allocation; safe inside the likelihood inner loop.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] compare against naïve formulas on
//!   safe grids, check tail behaviour, floors, round trips, and slopes
//!   against central differences.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    bounded_from_unconstrained, bounded_to_unconstrained, positive_from_unconstrained,
    positive_to_unconstrained, safe_logistic, safe_softplus, safe_softplus_inv, POSITIVE_FLOOR,
    PSI_MARGIN, VARIANCE_FLOOR,
};

pub mod prelude {
    pub use super::transformations::{
        bounded_from_unconstrained, bounded_to_unconstrained, positive_from_unconstrained,
        positive_to_unconstrained, POSITIVE_FLOOR, PSI_MARGIN, VARIANCE_FLOOR,
    };
}
