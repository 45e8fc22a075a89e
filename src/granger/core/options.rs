//! Fit options — optimizer settings plus the multi-start policy.
//!
//! Purpose
//! -------
//! Bundle everything the estimator needs beyond data and a starting point:
//! the L-BFGS configuration and the φ rescaling factors used for restarts
//! when no supplied start converges.
//!
//! Key behaviors
//! -------------
//! - [`FitOptions::default`] uses More–Thuente, `tol_grad = 1e-6`,
//!   `tol_cost = 1e-10`, `max_iter = 500`, memory 7, and restart scales
//!   `[0.2, 5.0]`.
//! - [`FitOptions::new`] validates the restart scales; the optimizer options
//!   arrive already validated by their own builders.
//!
//! Testing notes
//! -------------
//! - Unit tests cover defaults and the rejection of bad restart scales.
use crate::{
    granger::errors::{GrangerError, GrangerResult},
    optimization::loglik_optimizer::{
        LineSearcher, MLEOptions, Tolerances, DEFAULT_LBFGS_MEM,
    },
};

/// Default φ rescaling factors tried when no start converges.
pub const DEFAULT_PHI_RESTART_SCALES: [f64; 2] = [0.2, 5.0];

/// Estimation-time configuration for the bivariate model.
///
/// Fields
/// ------
/// - `mle_opts`: L-BFGS tolerances, line search, memory, and verbosity.
/// - `phi_restart_scales`: factors applied to both decay ranges of the
///   default start when retrying a fit; empty disables retries.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub mle_opts: MLEOptions,
    pub phi_restart_scales: Vec<f64>,
}

impl FitOptions {
    /// # Errors
    /// `GrangerError::InvalidRestartScale` for a non-finite or non-positive
    /// factor.
    pub fn new(mle_opts: MLEOptions, phi_restart_scales: Vec<f64>) -> GrangerResult<Self> {
        if let Some(&value) = phi_restart_scales.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(GrangerError::InvalidRestartScale { value });
        }
        Ok(Self { mle_opts, phi_restart_scales })
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            mle_opts: MLEOptions {
                tols: Tolerances { tol_grad: Some(1e-6), tol_cost: Some(1e-10), max_iter: Some(500) },
                line_searcher: LineSearcher::MoreThuente,
                verbose: false,
                lbfgs_mem: Some(DEFAULT_LBFGS_MEM),
            },
            phi_restart_scales: DEFAULT_PHI_RESTART_SCALES.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Defaults match the documented optimizer configuration.
    //
    // Given
    // -----
    // - `FitOptions::default()`.
    //
    // Expect
    // ------
    // - More–Thuente, tolerances 1e-6 / 1e-10, 500 iterations, two restarts.
    fn defaults_are_documented_values() {
        let opts = FitOptions::default();
        assert_eq!(opts.mle_opts.line_searcher, LineSearcher::MoreThuente);
        assert_eq!(opts.mle_opts.tols.tol_grad, Some(1e-6));
        assert_eq!(opts.mle_opts.tols.tol_cost, Some(1e-10));
        assert_eq!(opts.mle_opts.tols.max_iter, Some(500));
        assert_eq!(opts.phi_restart_scales, vec![0.2, 5.0]);
    }

    #[test]
    // Purpose
    // -------
    // Restart scales must be finite and positive.
    //
    // Given
    // -----
    // - Scales containing 0 and NaN; an empty list.
    //
    // Expect
    // ------
    // - `InvalidRestartScale` for the first two; the empty list is accepted.
    fn new_validates_restart_scales() {
        let mle = MLEOptions::default();
        assert!(matches!(
            FitOptions::new(mle.clone(), vec![0.5, 0.0]),
            Err(GrangerError::InvalidRestartScale { value }) if value == 0.0
        ));
        assert!(FitOptions::new(mle.clone(), vec![f64::NAN]).is_err());
        assert!(FitOptions::new(mle, Vec::new()).is_ok());
    }
}
