//! Consistency checks shared by the optimizer entry points.
//!
//! - [`verify_tol_grad`], [`verify_tol_cost`]: optional tolerances must be
//!   finite and strictly positive.
//! - [`validate_theta`]: a starting vector has the expected length and only
//!   finite entries.
//! - [`validate_grad`]: gradients match the parameter dimension and are
//!   finite.
//! - [`validate_theta_hat`], [`validate_value`]: solver output is present and
//!   finite before it is wrapped into an `OptimOutcome`.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta},
};

/// Validate the optional gradient-norm tolerance.
///
/// # Errors
/// [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost-change tolerance.
///
/// # Errors
/// [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate an unconstrained parameter vector against its expected length.
///
/// # Errors
/// - [`OptError::ThetaLengthMismatch`] if `theta.len() != dim`.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaInput { index, value });
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] for the first non-finite element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap the solver's best parameter vector.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a log-likelihood value is finite.
///
/// # Errors
/// [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Tolerance checks accept `None` and reject zero, negative, and NaN.
    //
    // Given
    // -----
    // - A grid of tolerance candidates.
    //
    // Expect
    // ------
    // - Only `None` and strictly positive finite values pass.
    fn tolerance_checks_reject_non_positive_and_non_finite() {
        // Arrange / Act / Assert
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-6)).is_ok());
        assert!(verify_tol_grad(Some(0.0)).is_err());
        assert!(verify_tol_grad(Some(f64::NAN)).is_err());
        assert!(verify_tol_cost(Some(-1.0)).is_err());
        assert!(verify_tol_cost(Some(f64::INFINITY)).is_err());
        assert!(verify_tol_cost(Some(1e-10)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `validate_theta` reports the first offending coordinate.
    //
    // Given
    // -----
    // - A short vector and a vector with a NaN at index 1.
    //
    // Expect
    // ------
    // - Length mismatch and `InvalidThetaInput { index: 1 }` respectively.
    fn validate_theta_reports_length_and_first_non_finite() {
        // Arrange
        let short = array![0.0, 1.0];
        let bad = array![0.0, f64::NAN, 2.0];

        // Act
        let short_err = validate_theta(&short, 3).unwrap_err();
        let bad_err = validate_theta(&bad, 3).unwrap_err();

        // Assert
        assert_eq!(short_err, OptError::ThetaLengthMismatch { expected: 3, actual: 2 });
        assert!(matches!(bad_err, OptError::InvalidThetaInput { index: 1, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Solver output must be present and finite.
    //
    // Given
    // -----
    // - `None`, a vector with an infinity, and a clean vector.
    //
    // Expect
    // ------
    // - `MissingThetaHat`, `InvalidThetaHat`, and `Ok` respectively.
    fn validate_theta_hat_requires_present_finite_vector() {
        // Arrange / Act / Assert
        assert_eq!(validate_theta_hat(None).unwrap_err(), OptError::MissingThetaHat);
        assert!(matches!(
            validate_theta_hat(Some(array![1.0, f64::INFINITY])),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
        assert!(validate_theta_hat(Some(array![1.0, 2.0])).is_ok());
    }
}
