//! Conditional-moment recursion shared by the likelihood and the simulator.
//!
//! Purpose
//! -------
//! Compute the Gaussian conditional mean and variance of one signal at
//! index `i` given both signals' past. The likelihood evaluates the
//! observed value against these moments; the simulator draws from them.
//! Using one function for both keeps the generative model and the
//! likelihood formula-identical.
//!
//! Key behaviors
//! -------------
//! - `i = 0`: mean 0, variance `σ²` (stationary start).
//! - `i ≥ 1`: with `ρ = exp(−Δ/φ)`,
//!   `μ = ρ·x_{i−1} + (1 − ρ)·ψ·cᵢ` and
//!   `v = max(σ²(1 − ρ²), σ²·VARIANCE_FLOOR)`.
//! - [`conditional_moments_with_slopes`] also returns the partial
//!   derivatives of `μ` and `v` with respect to `(φ, ψ, γ, σ²)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `times` is strictly increasing, so `ρ ∈ (0, 1)`.
//! - Only `own[i − 1]` and `other[..i]` are read; the simulator may fill
//!   index `i` of both signals after computing both sets of moments.
//! - The returned variance is strictly positive for `σ² > 0`.
//!
//! Testing notes
//! -------------
//! - Unit tests check the stationary start, the OU moments for `ψ = 0`, the
//!   variance floor, and every slope against a central difference.
use crate::{
    granger::core::{kernel::cross_influence_with_slope, params::SignalParams},
    optimization::numerical_stability::VARIANCE_FLOOR,
};

/// Slot of each parameter in a per-signal slope array.
pub const SLOT_PHI: usize = 0;
pub const SLOT_PSI: usize = 1;
pub const SLOT_GAMMA: usize = 2;
pub const SLOT_SIGMA2: usize = 3;

/// Conditional mean and variance at one index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub mean: f64,
    pub var: f64,
}

/// `∂μ` and `∂v` with respect to `(φ, ψ, γ, σ²)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MomentSlopes {
    pub d_mean: [f64; 4],
    pub d_var: [f64; 4],
}

/// Conditional moments of `own[i]` given the past.
///
/// The cross term is skipped entirely when `ψ = 0`.
pub fn conditional_moments(
    p: &SignalParams, times: &[f64], own: &[f64], other: &[f64], i: usize,
) -> Moments {
    if i == 0 {
        return Moments { mean: 0.0, var: p.sigma2 };
    }
    let delta = times[i] - times[i - 1];
    let rho = (-delta / p.phi).exp();
    let one_minus_rho = -(-delta / p.phi).exp_m1();
    let one_minus_rho2 = -(-2.0 * delta / p.phi).exp_m1();

    let cross = if p.psi == 0.0 {
        0.0
    } else {
        p.psi * cross_influence_with_slope(times, other, i, p.gamma).value
    };

    Moments {
        mean: rho * own[i - 1] + one_minus_rho * cross,
        var: (p.sigma2 * one_minus_rho2).max(p.sigma2 * VARIANCE_FLOOR),
    }
}

/// [`conditional_moments`] plus partial derivatives.
///
/// `cross_free` requests the kernel even when `ψ = 0`, since `∂μ/∂ψ`
/// needs `cᵢ` whenever ψ is being estimated.
pub fn conditional_moments_with_slopes(
    p: &SignalParams, times: &[f64], own: &[f64], other: &[f64], i: usize, cross_free: bool,
) -> (Moments, MomentSlopes) {
    let mut slopes = MomentSlopes::default();
    if i == 0 {
        slopes.d_var[SLOT_SIGMA2] = 1.0;
        return (Moments { mean: 0.0, var: p.sigma2 }, slopes);
    }

    let delta = times[i] - times[i - 1];
    let rho = (-delta / p.phi).exp();
    let one_minus_rho = -(-delta / p.phi).exp_m1();
    let one_minus_rho2 = -(-2.0 * delta / p.phi).exp_m1();
    let d_rho = rho * delta / (p.phi * p.phi);

    let (c, dc) = if cross_free || p.psi != 0.0 {
        let ci = cross_influence_with_slope(times, other, i, p.gamma);
        (ci.value, ci.d_gamma)
    } else {
        (0.0, 0.0)
    };

    let mean = rho * own[i - 1] + one_minus_rho * (p.psi * c);
    slopes.d_mean[SLOT_PHI] = d_rho * (own[i - 1] - p.psi * c);
    slopes.d_mean[SLOT_PSI] = one_minus_rho * c;
    slopes.d_mean[SLOT_GAMMA] = one_minus_rho * p.psi * dc;

    let base = p.sigma2 * one_minus_rho2;
    let floor = p.sigma2 * VARIANCE_FLOOR;
    let var = if base > floor {
        slopes.d_var[SLOT_PHI] = -2.0 * p.sigma2 * rho * d_rho;
        slopes.d_var[SLOT_SIGMA2] = one_minus_rho2;
        base
    } else {
        slopes.d_var[SLOT_SIGMA2] = VARIANCE_FLOOR;
        floor
    };

    (Moments { mean, var }, slopes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TIMES: [f64; 5] = [0.0, 2.0, 3.5, 7.0, 12.0];
    const OWN: [f64; 5] = [0.3, -0.1, 0.4, 1.2, -0.7];
    const OTHER: [f64; 5] = [1.0, 0.5, -0.2, 0.8, 0.1];

    fn params() -> SignalParams {
        SignalParams { phi: 3.0, psi: 0.6, gamma: 2.5, sigma2: 0.8 }
    }

    #[test]
    // Purpose
    // -------
    // With ψ = 0 the moments are those of a sampled OU process.
    //
    // Given
    // -----
    // - φ = 3, σ² = 0.8, i = 3 (Δ = 3.5).
    //
    // Expect
    // ------
    // - μ = e^{−Δ/φ}·x₂, v = σ²(1 − e^{−2Δ/φ}); i = 0 gives (0, σ²).
    fn zero_psi_gives_ou_moments() {
        let p = SignalParams { psi: 0.0, gamma: 0.0, ..params() };
        let m0 = conditional_moments(&p, &TIMES, &OWN, &OTHER, 0);
        assert_eq!(m0, Moments { mean: 0.0, var: 0.8 });

        let m = conditional_moments(&p, &TIMES, &OWN, &OTHER, 3);
        let rho = (-3.5_f64 / 3.0).exp();
        assert_abs_diff_eq!(m.mean, rho * OWN[2], epsilon = 1e-14);
        assert_abs_diff_eq!(m.var, 0.8 * (1.0 - rho * rho), epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // A tiny gap relative to φ hits the variance floor.
    //
    // Given
    // -----
    // - Δ = 1e-12, φ = 1e3.
    //
    // Expect
    // ------
    // - v = σ²·VARIANCE_FLOOR > 0.
    fn variance_floor_applies() {
        let p = SignalParams { phi: 1e3, psi: 0.0, gamma: 0.0, sigma2: 2.0 };
        let times = [0.0, 1e-12];
        let m = conditional_moments(&p, &times, &[1.0, 1.0], &[0.0, 0.0], 1);
        assert_eq!(m.var, 2.0 * VARIANCE_FLOOR);
    }

    #[test]
    // Purpose
    // -------
    // The plain and slope versions agree on the moments, and every slope
    // matches a central difference.
    //
    // Given
    // -----
    // - The fixture parameters at i = 4.
    //
    // Expect
    // ------
    // - Agreement to 1e-6 for all four parameters.
    fn slopes_match_central_differences() {
        let p = params();
        let i = 4;
        let (m, slopes) = conditional_moments_with_slopes(&p, &TIMES, &OWN, &OTHER, i, true);
        assert_eq!(m, conditional_moments(&p, &TIMES, &OWN, &OTHER, i));

        let bump = |slot: usize, h: f64| {
            let mut q = p;
            match slot {
                SLOT_PHI => q.phi += h,
                SLOT_PSI => q.psi += h,
                SLOT_GAMMA => q.gamma += h,
                _ => q.sigma2 += h,
            }
            conditional_moments(&q, &TIMES, &OWN, &OTHER, i)
        };
        let h = 1e-6;
        for slot in [SLOT_PHI, SLOT_PSI, SLOT_GAMMA, SLOT_SIGMA2] {
            let (up, down) = (bump(slot, h), bump(slot, -h));
            assert_abs_diff_eq!(
                slopes.d_mean[slot],
                (up.mean - down.mean) / (2.0 * h),
                epsilon = 1e-6
            );
            assert_abs_diff_eq!(slopes.d_var[slot], (up.var - down.var) / (2.0 * h), epsilon = 1e-6);
        }
    }
}
