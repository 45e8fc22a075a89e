//! High-level entry point for maximizing a [`LogLikelihood`].
//!
//! Picks the L-BFGS flavour from `opts.line_searcher`, wraps the model in an
//! [`ArgMinAdapter`] (which minimizes `−ℓ(θ)`), and delegates to
//! [`run_lbfgs`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
        OptimOutcome, Theta,
    },
};

/// Maximize `ℓ(θ)` with L-BFGS and the configured line search.
///
/// Parameters
/// ----------
/// - `f`: model implementing [`LogLikelihood`].
/// - `theta0`: starting point in unconstrained space (consumed).
/// - `data`: payload forwarded to `value` / `grad`.
/// - `opts`: tolerances, line search, memory, verbosity.
///
/// Returns
/// -------
/// An [`OptimOutcome`] with `θ̂`, `ℓ(θ̂)`, and solver diagnostics. Whether
/// the run *converged* is reported in the outcome, not as an error.
///
/// Errors
/// ------
/// - Anything `f.check` rejects.
/// - Builder errors for invalid tolerances.
/// - Runtime solver errors, e.g. a line search that cannot find a finite
///   point.
///
/// Examples
/// --------
/// ```rust
/// use ndarray::array;
/// use irregular_granger::optimization::errors::OptResult;
/// use irregular_granger::optimization::loglik_optimizer::{
///     maximize, LogLikelihood, MLEOptions, Theta,
/// };
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.5, -0.25], &(), &MLEOptions::default()).unwrap();
/// assert!(out.theta_hat.iter().all(|v| v.abs() < 1e-4));
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
