//! loglik_optimizer::types — numeric aliases and pre-wired solver types.
//!
//! Purpose
//! -------
//! Keep the `ndarray` and argmin generics in one place so the rest of the
//! optimizer talks about `Theta`, `Grad`, and `Cost` instead of spelling out
//! `Array1<f64>` and `LBFGS<_, _, _, _>` every time.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` have one entry per *free* coordinate of the model
//!   being fitted; fixed coordinates never appear in optimizer space.
//! - `Cost` is the value the solver minimizes, `c(θ) = −ℓ(θ)`.
//!
//! Testing notes
//! -------------
//! - Aliases only; exercised by the solver tests in the sibling modules.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Unconstrained parameter vector handed to the solver.
pub type Theta = Array1<f64>;

/// Gradient with the same length as [`Theta`].
pub type Grad = Array1<f64>;

/// Scalar objective minimized by the solver.
pub type Cost = f64;

/// Function-evaluation counters as reported by argmin (`"cost_count"`, ...).
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
