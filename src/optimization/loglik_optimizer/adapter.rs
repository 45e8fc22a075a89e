//! Adapter that exposes a [`LogLikelihood`] as an argmin problem.
//!
//! argmin minimizes, so the cost is `c(θ) = −ℓ(θ)` and an analytic gradient
//! is negated on the way through. Without an analytic gradient the cost
//! itself is finite-differenced, which needs no sign flip.
use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::fd_gradient,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges a [`LogLikelihood`] and its data to argmin's `CostFunction` and
/// `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<F: LogLikelihood> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// `c(θ) = −ℓ(θ)`; a non-finite `ℓ` is reported as
    /// [`OptError::NonFiniteCost`] so the line search can back off.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<F: LogLikelihood> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `∇c(θ)`: the negated analytic gradient when the model provides one,
    /// otherwise [`fd_gradient`] of the cost.
    ///
    /// # Errors
    /// - Errors from the model's `grad` other than `GradientNotImplemented`.
    /// - Validation errors for wrongly sized or non-finite gradients.
    /// - Cost errors raised during finite differencing.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                fd_gradient(theta, &|x: &Theta| self.cost(x))
            }
            Err(e) => Err(e.into()),
        }
    }
}
