//! Numerically stable transforms between optimizer space and model space.
//!
//! The optimizer works on unconstrained reals; the bivariate model needs
//! strictly positive decay ranges and variances, non-negative kernel peaks,
//! and cross-impacts strictly inside (−1, 1). The maps below provide those
//! constraints without overflow, together with their derivatives for the
//! analytic gradient.
//!
//! # Provided items
//! - [`safe_softplus`] / [`safe_softplus_inv`]: ℝ ↔ (0, ∞).
//! - [`safe_logistic`]: derivative of softplus.
//! - [`positive_from_unconstrained`] / [`positive_to_unconstrained`]: softplus
//!   with a [`POSITIVE_FLOOR`].
//! - [`bounded_from_unconstrained`] / [`bounded_to_unconstrained`]: scaled
//!   `tanh` onto `(−(1 − PSI_MARGIN), 1 − PSI_MARGIN)`.

/// Distance kept between a cross-impact and the boundary ±1.
pub const PSI_MARGIN: f64 = 1e-6;

/// Smallest value a softplus-mapped parameter may take.
pub const POSITIVE_FLOOR: f64 = 1e-10;

/// Relative floor on the conditional variance, as a fraction of `σ²`.
pub const VARIANCE_FLOOR: f64 = 1e-10;

/// Numerically stable softplus: `ln(1 + exp(x))`.
///
/// For `x > 20` the result equals `x` to double precision.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 {
        x
    } else {
        x.exp().ln_1p()
    }
}

/// Inverse of softplus on `(0, ∞)`: `ln(exp(x) − 1)`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 {
        x
    } else {
        x.exp_m1().ln()
    }
}

/// Logistic function `1 / (1 + exp(−x))`, evaluated without overflow in
/// either tail.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Map an unconstrained coordinate to a strictly positive parameter.
///
/// Returns `(value, d value / d x)`. The derivative is 0 where the floor is
/// active.
pub fn positive_from_unconstrained(x: f64) -> (f64, f64) {
    let value = safe_softplus(x);
    if value < POSITIVE_FLOOR {
        (POSITIVE_FLOOR, 0.0)
    } else {
        (value, safe_logistic(x))
    }
}

/// Inverse of [`positive_from_unconstrained`]; inputs below the floor are
/// lifted to it first.
pub fn positive_to_unconstrained(value: f64) -> f64 {
    safe_softplus_inv(value.max(POSITIVE_FLOOR))
}

/// Map an unconstrained coordinate into `(−(1 − PSI_MARGIN), 1 − PSI_MARGIN)`.
///
/// Returns `(value, d value / d x)`.
pub fn bounded_from_unconstrained(x: f64) -> (f64, f64) {
    let scale = 1.0 - PSI_MARGIN;
    let t = x.tanh();
    (scale * t, scale * (1.0 - t * t))
}

/// Inverse of [`bounded_from_unconstrained`]; inputs are clamped into the
/// open interval first.
pub fn bounded_to_unconstrained(value: f64) -> f64 {
    let scale = 1.0 - PSI_MARGIN;
    let limit = 1.0 - f64::EPSILON;
    (value / scale).clamp(-limit, limit).atanh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    // Purpose
    // -------
    // Softplus and its inverse agree with the naïve formulas on a safe grid
    // and invert each other.
    //
    // Given
    // -----
    // - x ∈ {−5, −1, 0, 0.5, 3, 15}.
    //
    // Expect
    // ------
    // - `safe_softplus(x) ≈ ln(1 + eˣ)` and `safe_softplus_inv(safe_softplus(x)) ≈ x`.
    fn softplus_matches_naive_formula_and_inverts() {
        for x in [-5.0_f64, -1.0, 0.0, 0.5, 3.0, 15.0] {
            let naive = (1.0 + x.exp()).ln();
            assert_abs_diff_eq!(safe_softplus(x), naive, epsilon = 1e-12);
            assert_abs_diff_eq!(safe_softplus_inv(safe_softplus(x)), x, epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // The logistic helper stays finite in both tails.
    //
    // Given
    // -----
    // - x = ±800.
    //
    // Expect
    // ------
    // - 1 and 0, no NaN.
    fn logistic_is_stable_in_tails() {
        assert_abs_diff_eq!(safe_logistic(800.0), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(safe_logistic(-800.0), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(safe_logistic(0.0), 0.5, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Positive map respects its floor and reports the softplus slope.
    //
    // Given
    // -----
    // - x = −50 (floored) and x = 0.3.
    //
    // Expect
    // ------
    // - Floor with zero slope; logistic slope otherwise; round trip.
    fn positive_map_floors_and_round_trips() {
        let (low, dlow) = positive_from_unconstrained(-50.0);
        assert_eq!(low, POSITIVE_FLOOR);
        assert_eq!(dlow, 0.0);

        let (v, dv) = positive_from_unconstrained(0.3);
        assert_abs_diff_eq!(dv, safe_logistic(0.3), epsilon = 1e-15);
        assert_abs_diff_eq!(positive_to_unconstrained(v), 0.3, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // The bounded map never reaches ±1 and its slope matches a finite
    // difference.
    //
    // Given
    // -----
    // - Extreme inputs ±40 and a central difference at x = 0.7.
    //
    // Expect
    // ------
    // - |ψ| < 1, analytic slope ≈ numeric slope, inverse round trip.
    fn bounded_map_stays_inside_unit_interval() {
        assert!(bounded_from_unconstrained(40.0).0 < 1.0);
        assert!(bounded_from_unconstrained(-40.0).0 > -1.0);

        let h = 1e-6;
        let (v, dv) = bounded_from_unconstrained(0.7);
        let numeric =
            (bounded_from_unconstrained(0.7 + h).0 - bounded_from_unconstrained(0.7 - h).0)
                / (2.0 * h);
        assert_abs_diff_eq!(dv, numeric, epsilon = 1e-8);
        assert_abs_diff_eq!(bounded_to_unconstrained(v), 0.7, epsilon = 1e-9);
        assert!(bounded_to_unconstrained(1.0).is_finite());
    }
}
