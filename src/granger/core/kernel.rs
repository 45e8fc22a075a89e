//! Cross-influence kernel.
//!
//! The influence of the other signal at elapsed time `u > 0` is
//!
//! ```text
//! k(u; γ) = (u / γ) · exp(1 − u / γ)
//! ```
//!
//! which is unimodal with peak value 1 at `u = γ`. The cross term at index
//! `i` is the kernel-weighted average of the other signal's past,
//! `cᵢ = Σ_{j<i} wᵢⱼ yⱼ` with `wᵢⱼ ∝ k(tᵢ − tⱼ; γ)`. Weights are normalized
//! in log space after subtracting the largest log-weight. At `γ = 0` all
//! weight sits on `j = i − 1`, the limit of the normalized weights as
//! `γ → 0`.

/// Kernel value `k(u; γ)`; zero for `γ ≤ 0` or `u ≤ 0`.
pub fn kernel_value(u: f64, gamma: f64) -> f64 {
    if gamma <= 0.0 || u <= 0.0 {
        return 0.0;
    }
    let r = u / gamma;
    r * (1.0 - r).exp()
}

/// Cross term and its derivative with respect to `γ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossInfluence {
    pub value: f64,
    pub d_gamma: f64,
}

/// `cᵢ` for index `i`; 0 at `i = 0` (no past).
pub fn cross_influence(times: &[f64], other: &[f64], i: usize, gamma: f64) -> f64 {
    cross_influence_with_slope(times, other, i, gamma).value
}

/// `cᵢ` together with `∂cᵢ/∂γ`.
///
/// With `lⱼ = ln uⱼ − ln γ + 1 − uⱼ/γ` and normalized weights `wⱼ`,
/// `∂cᵢ/∂γ = (Σ wⱼ yⱼ uⱼ − cᵢ Σ wⱼ uⱼ) / γ²`.
pub fn cross_influence_with_slope(
    times: &[f64], other: &[f64], i: usize, gamma: f64,
) -> CrossInfluence {
    if i == 0 {
        return CrossInfluence { value: 0.0, d_gamma: 0.0 };
    }
    if gamma <= 0.0 {
        return CrossInfluence { value: other[i - 1], d_gamma: 0.0 };
    }

    let t_i = times[i];
    let ln_gamma = gamma.ln();
    let log_weight = |j: usize| {
        let u = t_i - times[j];
        u.ln() - ln_gamma + 1.0 - u / gamma
    };
    let max_lw = (0..i).map(log_weight).fold(f64::NEG_INFINITY, f64::max);

    let (mut s, mut s_y, mut s_u, mut s_yu) = (0.0, 0.0, 0.0, 0.0);
    for j in 0..i {
        let u = t_i - times[j];
        let e = (log_weight(j) - max_lw).exp();
        s += e;
        s_y += e * other[j];
        s_u += e * u;
        s_yu += e * other[j] * u;
    }

    let value = s_y / s;
    let d_gamma = (s_yu / s - value * s_u / s) / (gamma * gamma);
    CrossInfluence { value, d_gamma }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TIMES: [f64; 6] = [0.0, 5.0, 10.0, 15.0, 20.0, 30.0];
    const OTHER: [f64; 6] = [1.0, -2.0, 0.5, 3.0, -1.0, 4.0];

    #[test]
    // Purpose
    // -------
    // The kernel is unimodal with peak 1 at u = γ.
    //
    // Given
    // -----
    // - γ = 4 evaluated at 2, 4, 8.
    //
    // Expect
    // ------
    // - k(4) = 1 exceeds both neighbours; degenerate inputs give 0.
    fn kernel_peaks_at_gamma() {
        assert_abs_diff_eq!(kernel_value(4.0, 4.0), 1.0, epsilon = 1e-15);
        assert!(kernel_value(2.0, 4.0) < 1.0);
        assert!(kernel_value(8.0, 4.0) < 1.0);
        assert_eq!(kernel_value(1.0, 0.0), 0.0);
        assert_eq!(kernel_value(0.0, 2.0), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // The log-space cross term equals the direct normalized average.
    //
    // Given
    // -----
    // - i = 5 (t = 30), γ = 12.
    //
    // Expect
    // ------
    // - Same value as Σ k·y / Σ k computed naïvely.
    fn cross_term_matches_direct_average() {
        let i = 5;
        let gamma = 12.0;
        let (num, den) = (0..i).fold((0.0, 0.0), |(n, d), j| {
            let k = kernel_value(TIMES[i] - TIMES[j], gamma);
            (n + k * OTHER[j], d + k)
        });
        assert_abs_diff_eq!(
            cross_influence(&TIMES, &OTHER, i, gamma),
            num / den,
            epsilon = 1e-12
        );
    }

    #[test]
    // Purpose
    // -------
    // Edge cases: no past, γ = 0, and tiny γ.
    //
    // Given
    // -----
    // - i = 0; i = 3 with γ = 0 and γ = 1e-8.
    //
    // Expect
    // ------
    // - 0, then y₂ in both limits.
    fn cross_term_edge_cases() {
        assert_eq!(cross_influence(&TIMES, &OTHER, 0, 3.0), 0.0);
        assert_eq!(cross_influence(&TIMES, &OTHER, 3, 0.0), OTHER[2]);
        assert_abs_diff_eq!(cross_influence(&TIMES, &OTHER, 3, 1e-8), OTHER[2], epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The analytic γ-slope agrees with a central difference.
    //
    // Given
    // -----
    // - i = 5, γ ∈ {3, 9, 25}.
    //
    // Expect
    // ------
    // - Relative agreement to 1e-5.
    fn cross_term_slope_matches_central_difference() {
        for gamma in [3.0, 9.0, 25.0] {
            let h = 1e-5 * gamma;
            let numeric = (cross_influence(&TIMES, &OTHER, 5, gamma + h)
                - cross_influence(&TIMES, &OTHER, 5, gamma - h))
                / (2.0 * h);
            let analytic = cross_influence_with_slope(&TIMES, &OTHER, 5, gamma).d_gamma;
            assert_abs_diff_eq!(analytic, numeric, epsilon = 1e-5 * (1.0 + numeric.abs()));
        }
    }
}
