//! loglik_optimizer::builders — L-BFGS solver construction.
//!
//! Purpose
//! -------
//! Build an argmin L-BFGS solver for the requested line search and wire the
//! optional gradient / cost-change tolerances from [`MLEOptions`] into it.
//! Initial parameters and the iteration cap are executor concerns and are
//! applied by [`run_lbfgs`](crate::optimization::loglik_optimizer::run::run_lbfgs).
//!
//! Conventions
//! -----------
//! - History size is `opts.lbfgs_mem`, or [`DEFAULT_LBFGS_MEM`] when unset.
//! - A tolerance left at `None` keeps argmin's own default.
//! - argmin errors surface as `OptError` through `From<argmin::core::Error>`.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Theta,
            DEFAULT_LBFGS_MEM,
        },
    },
};

/// L-BFGS with a Hager–Zhang line search, tolerances applied.
///
/// # Errors
/// `OptError` when argmin rejects one of the tolerances.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with a More–Thuente line search, tolerances applied.
///
/// # Errors
/// `OptError` when argmin rejects one of the tolerances.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional tolerances of `opts` to an L-BFGS solver with any
/// line search `L`.
///
/// # Errors
/// `OptError` when `with_tolerance_grad` / `with_tolerance_cost` rejects a
/// value.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
