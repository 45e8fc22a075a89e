//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait a model implements to be fitted.
//! - [`MLEOptions`] and [`Tolerances`]: optimizer configuration.
//! - [`LineSearcher`]: line search used inside L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by `maximize`.
//!
//! Convention: we *maximize* `ℓ(θ)` by minimizing `c(θ) = −ℓ(θ)`. An analytic
//! gradient, when provided, is `∇ℓ(θ)`; the adapter flips the sign.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
        Cost, FnEvalMap, Grad, Theta,
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented log-likelihood interface.
///
/// - `type Data`: payload carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject malformed starting
///   points. Called once before the solver starts.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic `∇ℓ(θ)`. The default
///   returns [`OptError::GradientNotImplemented`], which switches the adapter
///   to finite differences.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parses case-insensitively from `"MoreThuente"` / `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols`: stopping rules and iteration cap.
/// - `line_searcher`: line search used by L-BFGS.
/// - `verbose`: attach a terminal observer (only with the `obs_slog` feature).
/// - `lbfgs_mem`: L-BFGS history size; `None` uses [`DEFAULT_LBFGS_MEM`].
///
/// [`DEFAULT_LBFGS_MEM`]: crate::optimization::loglik_optimizer::DEFAULT_LBFGS_MEM
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Build options; numeric tolerances are validated by [`Tolerances::new`].
    ///
    /// # Errors
    /// [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: stop once the gradient norm falls below this threshold.
/// - `tol_cost`: stop once the change in cost falls below this threshold.
/// - `max_iter`: hard cap on iterations; hitting it is *not* convergence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** `ℓ(θ̂)` (not the cost).
/// - `converged`: `true` only when the solver met one of its tolerances.
///   Running out of iterations, a user interrupt, or an early solver exit
///   all leave this `false`.
/// - `status`: termination status as reported by argmin.
/// - `iterations`, `fn_evals`: solver counters.
/// - `grad_norm`: norm of the last available gradient, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// Propagates validation errors for `theta_hat` (missing or non-finite)
    /// and `value` (non-finite).
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let converged = is_convergence(&termination);
        let status = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            TerminationStatus::Terminated(reason) => reason.text().to_string(),
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
        })
    }
}

fn is_convergence(termination: &TerminationStatus) -> bool {
    matches!(
        termination,
        TerminationStatus::Terminated(
            TerminationReason::SolverConverged | TerminationReason::TargetCostReached
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Only tolerance-based stops count as convergence.
    //
    // Given
    // -----
    // - The same finite state terminated by `SolverConverged` and by
    //   `MaxItersReached`.
    //
    // Expect
    // ------
    // - `converged` is `true` for the first and `false` for the second.
    fn optim_outcome_treats_iteration_cap_as_not_converged() {
        // Arrange
        let theta = array![0.5, -0.5];

        // Act
        let converged = OptimOutcome::new(
            Some(theta.clone()),
            -1.0,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            FnEvalMap::new(),
            None,
        )
        .expect("Finite outcome should validate");
        let capped = OptimOutcome::new(
            Some(theta),
            -1.0,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            500,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .expect("Finite outcome should validate");

        // Assert
        assert!(converged.converged);
        assert!(!capped.converged);
        assert_eq!(capped.grad_norm, Some(5.0));
        assert_eq!(capped.iterations, 500);
    }

    #[test]
    // Purpose
    // -------
    // Configuration guards reject degenerate settings.
    //
    // Given
    // -----
    // - No tolerances at all, a zero iteration cap, and zero L-BFGS memory.
    //
    // Expect
    // ------
    // - Each is rejected with its dedicated error variant.
    fn configuration_guards_reject_degenerate_settings() {
        // Arrange / Act / Assert
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(Some(1e-6), None, Some(0)),
            Err(OptError::InvalidMaxIter { max_iter: 0, .. })
        ));
        let tols = Tolerances::new(Some(1e-6), None, Some(10)).expect("Tolerances should be valid");
        assert!(matches!(
            MLEOptions::new(tols, LineSearcher::MoreThuente, false, Some(0)),
            Err(OptError::InvalidLBFGSMem { mem: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Line-search names parse case-insensitively and unknown names fail.
    //
    // Given
    // -----
    // - "HAGERZHANG", "morethuente", and "newton".
    //
    // Expect
    // ------
    // - Two successes and one `InvalidLineSearch`.
    fn line_searcher_parses_case_insensitively() {
        // Arrange / Act / Assert
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert_eq!("morethuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert!(matches!(
            "newton".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }
}
