//! loglik_optimizer::finite_diff — finite-difference gradient fallback.
//!
//! Purpose
//! -------
//! Supply a gradient of the solver cost when a model does not implement
//! [`LogLikelihood::grad`](crate::optimization::loglik_optimizer::LogLikelihood::grad).
//! `finitediff` closures must return a bare `f64`, so errors raised while
//! evaluating the cost are parked in a `RefCell` and the closure returns
//! `NaN`; this module turns that side channel back into a proper error.
//!
//! Key behaviors
//! -------------
//! - Central differences first.
//! - Forward differences when a central evaluation errored or the central
//!   gradient fails [`validate_grad`] (e.g. a stencil point stepped outside the
//!   region where the cost is finite).
//!
//! Invariants & assumptions
//! ------------------------
//! - Differences are taken in the unconstrained optimizer space; any model
//!   reparameterization happens upstream.
//! - A gradient returned by [`fd_gradient`] always passes [`validate_grad`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path on a smooth quadratic and the
//!   central → forward fallback when one side of the stencil errors.
use crate::optimization::loglik_optimizer::{validation::validate_grad, Grad, Theta};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Finite-difference gradient of a fallible scalar function.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Point at which the gradient is approximated.
/// - `func`: `&G`
///   Fallible objective (typically the solver cost `c(θ)`).
///
/// Returns
/// -------
/// `Result<Grad, Error>`
///   A validated gradient, or the first error raised by `func` on the
///   forward-difference retry.
///
/// Errors
/// ------
/// - Any error returned by `func` during the forward-difference pass.
/// - `OptError::InvalidGradient` (boxed) if the forward gradient is still
///   non-finite.
pub fn fd_gradient<G>(theta: &Theta, func: &G) -> Result<Grad, Error>
where
    G: Fn(&Theta) -> Result<f64, Error>,
{
    let dim = theta.len();
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let capture = |x: &Theta| -> f64 {
        match func(x) {
            Ok(val) => val,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };

    let central = theta.central_diff(&capture);
    if closure_err.borrow().is_none() && validate_grad(&central, dim).is_ok() {
        return Ok(central);
    }

    closure_err.replace(None);
    let forward = theta.forward_diff(&capture);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&forward, dim)?;
    Ok(forward)
}
