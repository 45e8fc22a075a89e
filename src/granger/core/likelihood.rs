//! Exact Gaussian log-likelihood of the bivariate model.
//!
//! Purpose
//! -------
//! Evaluate `ℓ(θ) = Σ_signals Σ_i log N(xᵢ; μᵢ, vᵢ)` with the moments of
//! [`conditional_moments`], and its gradient with respect to the eight
//! model-space parameters.
//!
//! Key behaviors
//! -------------
//! - [`log_likelihood`] works on validated inputs and is total.
//! - [`log_likelihood_raw`] accepts raw slices, returning `−∞` instead of an
//!   error when the parameters or the grid are invalid, so a caller probing
//!   the parameter space can reject a point without unwinding.
//! - [`log_likelihood_with_score`] adds `∂ℓ/∂θ` in canonical order, only for
//!   the coordinates free under a [`ModelVariant`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Root and shoot innovations are independent given the past, so the
//!   log-likelihood splits into one sum per signal.
//! - Pure; no allocation besides what the caller passes in.
//!
//! Testing notes
//! -------------
//! - Unit tests check the `ψ = 0` case against an independent OU density,
//!   the `−∞` contract for invalid input, and the score against central
//!   differences for each variant.
use crate::granger::core::{
    data::{GrangerData, TimeGrid},
    params::{GrangerParams, Signal, SignalParams, THETA_LEN},
    recursion::{conditional_moments, conditional_moments_with_slopes, Moments},
    variant::ModelVariant,
};
use ndarray::Array1;
use std::f64::consts::PI;

/// `log N(x; μ, v)`.
pub fn gaussian_log_density(x: f64, m: &Moments) -> f64 {
    let r = x - m.mean;
    -0.5 * ((2.0 * PI).ln() + m.var.ln() + r * r / m.var)
}

/// Log-likelihood contribution of one signal's equation.
pub fn signal_log_likelihood(p: &SignalParams, times: &[f64], own: &[f64], other: &[f64]) -> f64 {
    (0..times.len())
        .map(|i| gaussian_log_density(own[i], &conditional_moments(p, times, own, other, i)))
        .sum()
}

/// One signal's log-likelihood and its slopes with respect to
/// `(φ, ψ, γ, σ²)`.
pub fn signal_score(
    p: &SignalParams, times: &[f64], own: &[f64], other: &[f64], cross_free: bool,
) -> (f64, [f64; 4]) {
    let mut value = 0.0;
    let mut score = [0.0; 4];
    for i in 0..times.len() {
        let (m, slopes) = conditional_moments_with_slopes(p, times, own, other, i, cross_free);
        value += gaussian_log_density(own[i], &m);

        let r = own[i] - m.mean;
        let d_mean = r / m.var;
        let d_var = 0.5 * (r * r / m.var - 1.0) / m.var;
        for (slot, s) in score.iter_mut().enumerate() {
            *s += d_mean * slopes.d_mean[slot] + d_var * slopes.d_var[slot];
        }
    }
    (value, score)
}

/// Joint log-likelihood of validated data.
pub fn log_likelihood(params: &GrangerParams, data: &GrangerData) -> f64 {
    let (times, root, shoot) = slices(data);
    signal_log_likelihood(&params.root, times, root, shoot)
        + signal_log_likelihood(&params.shoot, times, shoot, root)
}

/// Joint log-likelihood and `∂ℓ/∂θ` in canonical order.
///
/// Entries for coordinates fixed under `variant` are 0.
pub fn log_likelihood_with_score(
    params: &GrangerParams, data: &GrangerData, variant: ModelVariant,
) -> (f64, [f64; THETA_LEN]) {
    let (times, root, shoot) = slices(data);
    let (v_root, s_root) =
        signal_score(&params.root, times, root, shoot, variant.frees_root_cross());
    let (v_shoot, s_shoot) =
        signal_score(&params.shoot, times, shoot, root, variant.frees_shoot_cross());

    let mut score = [0.0; THETA_LEN];
    for (signal, block) in [(Signal::Root, s_root), (Signal::Shoot, s_shoot)] {
        let offset = signal.offset();
        for (slot, s) in block.into_iter().enumerate() {
            if variant.is_free(offset + slot) {
                score[offset + slot] = s;
            }
        }
    }
    (v_root + v_shoot, score)
}

/// Log-likelihood of raw inputs with a canonical 8-vector.
///
/// Returns `f64::NEG_INFINITY` when `theta` is outside its domain, the
/// lengths differ, or `times` is not a valid grid.
///
/// # Examples
/// ```rust
/// use irregular_granger::granger::core::likelihood::log_likelihood_raw;
///
/// let times = [0.0, 5.0, 10.0, 15.0];
/// let root = [0.1, -0.2, 0.05, 0.3];
/// let shoot = [1.0, 0.7, 0.9, 1.1];
/// let ok = log_likelihood_raw(&[1.0, 0.5, 2.0, 0.1, 1.0, 0.0, 0.0, 0.2], &root, &shoot, &times);
/// assert!(ok.is_finite());
/// let bad = log_likelihood_raw(&[1.0, 0.5, 2.0, -0.1, 1.0, 0.0, 0.0, 0.2], &root, &shoot, &times);
/// assert_eq!(bad, f64::NEG_INFINITY);
/// ```
pub fn log_likelihood_raw(theta: &[f64], root: &[f64], shoot: &[f64], times: &[f64]) -> f64 {
    let Ok(params) = GrangerParams::from_slice(theta) else {
        return f64::NEG_INFINITY;
    };
    if root.len() != times.len() || shoot.len() != times.len() {
        return f64::NEG_INFINITY;
    }
    if TimeGrid::new(Array1::from(times.to_vec())).is_err() {
        return f64::NEG_INFINITY;
    }
    let value = signal_log_likelihood(&params.root, times, root, shoot)
        + signal_log_likelihood(&params.shoot, times, shoot, root);
    if value.is_nan() {
        f64::NEG_INFINITY
    } else {
        value
    }
}

fn slices(data: &GrangerData) -> (&[f64], &[f64], &[f64]) {
    (
        data.grid().as_slice(),
        data.root().as_slice().unwrap_or(&[]),
        data.shoot().as_slice().unwrap_or(&[]),
    )
}
