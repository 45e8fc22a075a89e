//! granger::core::params — the 8-entry parameter vector and its θ-space map.
//!
//! Purpose
//! -------
//! Hold model-space parameters for both signals, validate their domains,
//! and move between the canonical 8-vector, the structured form, and the
//! unconstrained free-coordinate vector the optimizer works on.
//!
//! Key behaviors
//! -------------
//! - Canonical order, grouped per signal:
//!   `(phi_root, psi_root, gamma_root, sigma2_root,
//!     phi_shoot, psi_shoot, gamma_shoot, sigma2_shoot)`.
//! - `psi_root` / `gamma_root` act in the root equation (shoot → root);
//!   `psi_shoot` / `gamma_shoot` act in the shoot equation (root → shoot).
//! - [`GrangerParams::to_theta`] / [`GrangerParams::from_theta`] keep only
//!   the coordinates a [`ModelVariant`] leaves free. Fixed cross pairs are
//!   exactly zero and never reach the optimizer.
//!
//! Invariants & assumptions
//! ------------------------
//! - A validated [`GrangerParams`] has `φ > 0`, `σ² > 0`, `γ ≥ 0`,
//!   `|ψ| < 1`, all finite.
//! - `from_theta` cannot produce an out-of-domain value: φ, γ, σ² go through
//!   a floored softplus and ψ through a scaled `tanh`.
//!
//! Conventions
//! -----------
//! - Per-signal block layout inside θ-space: `φ, [ψ, γ], σ²`, root block
//!   first, with the bracketed pair present only when that direction is
//!   free.
//!
//! Testing notes
//! -------------
//! - Unit tests cover domain validation at the boundaries, round trips
//!   through θ-space for every variant, default starts, and restriction.
use crate::{
    granger::{
        core::{data::GrangerData, variant::ModelVariant},
        errors::{ParamError, ParamResult},
    },
    optimization::{
        loglik_optimizer::Theta,
        numerical_stability::{
            bounded_from_unconstrained, bounded_to_unconstrained, positive_from_unconstrained,
            positive_to_unconstrained,
        },
    },
};
use ndarray::Array1;

/// Length of the full parameter vector.
pub const THETA_LEN: usize = 8;

pub const PHI_ROOT: usize = 0;
pub const PSI_ROOT: usize = 1;
pub const GAMMA_ROOT: usize = 2;
pub const SIGMA2_ROOT: usize = 3;
pub const PHI_SHOOT: usize = 4;
pub const PSI_SHOOT: usize = 5;
pub const GAMMA_SHOOT: usize = 6;
pub const SIGMA2_SHOOT: usize = 7;

/// Fraction of the observed time span used as the default decay range.
pub const DEFAULT_PHI_FRACTION: f64 = 0.1;

/// Lower bound on a default variance start for (near-)constant signals.
pub const MIN_START_VARIANCE: f64 = 1e-8;

/// Which of the two signals a parameter or value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Root,
    Shoot,
}

impl Signal {
    /// Name suffix used in parameter names (`phi_root`, ...).
    pub fn suffix(&self) -> &'static str {
        match self {
            Signal::Root => "root",
            Signal::Shoot => "shoot",
        }
    }

    /// The signal whose past drives this one's cross term.
    pub fn other(&self) -> Signal {
        match self {
            Signal::Root => Signal::Shoot,
            Signal::Shoot => Signal::Root,
        }
    }

    /// Offset of this signal's block in the canonical 8-vector.
    pub fn offset(&self) -> usize {
        match self {
            Signal::Root => PHI_ROOT,
            Signal::Shoot => PHI_SHOOT,
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// Parameters of one signal's conditional equation.
///
/// Fields
/// ------
/// - `phi`: decay range of the signal's dependence on its own past; the
///   lag-`Δ` autoregressive weight is `exp(−Δ/φ)`.
/// - `psi`: intensity and sign of the other signal's impact.
/// - `gamma`: elapsed time at which that impact peaks (0 puts all weight on
///   the most recent observation).
/// - `sigma2`: stationary variance of the signal's own fluctuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParams {
    pub phi: f64,
    pub psi: f64,
    pub gamma: f64,
    pub sigma2: f64,
}

impl SignalParams {
    /// Check all four domains for `signal`.
    ///
    /// # Errors
    /// The first violated domain, in the order φ, ψ, γ, σ².
    pub fn validate(&self, signal: Signal) -> ParamResult<()> {
        if !self.phi.is_finite() || self.phi <= 0.0 {
            return Err(ParamError::InvalidPhi { signal, value: self.phi });
        }
        if !self.psi.is_finite() || self.psi.abs() >= 1.0 {
            return Err(ParamError::InvalidPsi { signal, value: self.psi });
        }
        if !self.gamma.is_finite() || self.gamma < 0.0 {
            return Err(ParamError::InvalidGamma { signal, value: self.gamma });
        }
        if !self.sigma2.is_finite() || self.sigma2 <= 0.0 {
            return Err(ParamError::InvalidSigma2 { signal, value: self.sigma2 });
        }
        Ok(())
    }

    /// Same own-dynamics with the cross term switched off.
    pub fn without_cross(&self) -> Self {
        Self { psi: 0.0, gamma: 0.0, ..*self }
    }

    fn from_block(block: &[f64]) -> Self {
        Self { phi: block[0], psi: block[1], gamma: block[2], sigma2: block[3] }
    }
}

/// Validated parameters for both equations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrangerParams {
    pub root: SignalParams,
    pub shoot: SignalParams,
}

impl GrangerParams {
    /// Build from per-signal blocks, validating both.
    ///
    /// # Errors
    /// [`ParamError`] naming the first out-of-domain parameter.
    pub fn new(root: SignalParams, shoot: SignalParams) -> ParamResult<Self> {
        root.validate(Signal::Root)?;
        shoot.validate(Signal::Shoot)?;
        Ok(Self { root, shoot })
    }

    /// Build from a canonical 8-vector.
    ///
    /// # Errors
    /// - [`ParamError::ThetaLengthMismatch`] if `theta.len() != 8`.
    /// - Domain errors as in [`GrangerParams::new`].
    ///
    /// # Examples
    /// ```rust
    /// use irregular_granger::granger::core::params::GrangerParams;
    ///
    /// let p = GrangerParams::from_slice(&[1.0, 0.99, 10.0, 0.01, 1.0, 0.0, 0.0, 0.1]).unwrap();
    /// assert_eq!(p.root.psi, 0.99);
    /// assert!(GrangerParams::from_slice(&[1.0, 1.0, 10.0, 0.01, 1.0, 0.0, 0.0, 0.1]).is_err());
    /// ```
    pub fn from_slice(theta: &[f64]) -> ParamResult<Self> {
        if theta.len() != THETA_LEN {
            return Err(ParamError::ThetaLengthMismatch {
                expected: THETA_LEN,
                actual: theta.len(),
            });
        }
        Self::new(
            SignalParams::from_block(&theta[PHI_ROOT..PHI_SHOOT]),
            SignalParams::from_block(&theta[PHI_SHOOT..]),
        )
    }

    /// Canonical 8-vector.
    pub fn to_array(&self) -> [f64; THETA_LEN] {
        [
            self.root.phi,
            self.root.psi,
            self.root.gamma,
            self.root.sigma2,
            self.shoot.phi,
            self.shoot.psi,
            self.shoot.gamma,
            self.shoot.sigma2,
        ]
    }

    pub fn signal(&self, signal: Signal) -> &SignalParams {
        match signal {
            Signal::Root => &self.root,
            Signal::Shoot => &self.shoot,
        }
    }

    /// Zero the cross pairs that `variant` keeps fixed.
    pub fn restricted(&self, variant: ModelVariant) -> Self {
        let root = if variant.frees_root_cross() { self.root } else { self.root.without_cross() };
        let shoot =
            if variant.frees_shoot_cross() { self.shoot } else { self.shoot.without_cross() };
        Self { root, shoot }
    }

    /// Copy with both decay ranges multiplied by `factor` (> 0).
    pub fn with_phi_scaled(&self, factor: f64) -> Self {
        let mut out = *self;
        out.root.phi *= factor;
        out.shoot.phi *= factor;
        out
    }

    /// Default starting point derived from the data.
    ///
    /// - `σ²`: sample variance of each signal, floored at
    ///   [`MIN_START_VARIANCE`].
    /// - `φ`: [`DEFAULT_PHI_FRACTION`] of the observed time span.
    /// - `ψ = γ = 0`.
    pub fn default_start(data: &GrangerData) -> Self {
        let phi = (DEFAULT_PHI_FRACTION * data.grid().span()).max(f64::MIN_POSITIVE);
        let signal = |sigma2: f64| SignalParams {
            phi,
            psi: 0.0,
            gamma: 0.0,
            sigma2: sigma2.max(MIN_START_VARIANCE),
        };
        Self {
            root: signal(data.sample_variance(Signal::Root)),
            shoot: signal(data.sample_variance(Signal::Shoot)),
        }
    }

    /// Restrict to `variant` and give every free `γ` a usable start.
    ///
    /// A free `γ` at (or below) zero sits on the edge of its softplus
    /// parameterization with a vanishing slope; it is replaced by the mean
    /// sampling interval.
    pub fn prepared_for(&self, variant: ModelVariant, mean_spacing: f64) -> Self {
        let mut out = self.restricted(variant);
        if variant.frees_root_cross() && out.root.gamma <= 0.0 {
            out.root.gamma = mean_spacing;
        }
        if variant.frees_shoot_cross() && out.shoot.gamma <= 0.0 {
            out.shoot.gamma = mean_spacing;
        }
        out
    }

    /// Free coordinates of `variant`, mapped into unconstrained space.
    pub fn to_theta(&self, variant: ModelVariant) -> Theta {
        let full = self.to_array();
        variant
            .free_indices()
            .into_iter()
            .map(|idx| {
                if is_psi_index(idx) {
                    bounded_to_unconstrained(full[idx])
                } else {
                    positive_to_unconstrained(full[idx])
                }
            })
            .collect()
    }

    /// Inverse of [`GrangerParams::to_theta`].
    ///
    /// # Errors
    /// - [`ParamError::ThetaLengthMismatch`] if `theta.len()` differs from
    ///   `variant.free_count()`.
    /// - [`ParamError::InvalidThetaInput`] for a non-finite coordinate.
    pub fn from_theta(theta: &Theta, variant: ModelVariant) -> ParamResult<Self> {
        Self::from_theta_with_slopes(theta, variant).map(|(params, _)| params)
    }

    /// [`GrangerParams::from_theta`] plus `d(model value)/d(θ coordinate)`
    /// for every canonical index (0 for fixed coordinates).
    pub fn from_theta_with_slopes(
        theta: &Theta, variant: ModelVariant,
    ) -> ParamResult<(Self, [f64; THETA_LEN])> {
        let free = variant.free_indices();
        if theta.len() != free.len() {
            return Err(ParamError::ThetaLengthMismatch {
                expected: free.len(),
                actual: theta.len(),
            });
        }
        let mut full = [0.0; THETA_LEN];
        let mut slopes = [0.0; THETA_LEN];
        for (pos, (&idx, &u)) in free.iter().zip(theta.iter()).enumerate() {
            if !u.is_finite() {
                return Err(ParamError::InvalidThetaInput { index: pos, value: u });
            }
            let (value, slope) = if is_psi_index(idx) {
                bounded_from_unconstrained(u)
            } else {
                positive_from_unconstrained(u)
            };
            full[idx] = value;
            slopes[idx] = slope;
        }
        let params = Self {
            root: SignalParams::from_block(&full[PHI_ROOT..PHI_SHOOT]),
            shoot: SignalParams::from_block(&full[PHI_SHOOT..]),
        };
        Ok((params, slopes))
    }
}

impl From<GrangerParams> for Array1<f64> {
    fn from(params: GrangerParams) -> Self {
        Array1::from(params.to_array().to_vec())
    }
}

fn is_psi_index(idx: usize) -> bool {
    idx == PSI_ROOT || idx == PSI_SHOOT
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn example() -> GrangerParams {
        GrangerParams::from_slice(&[1.0, 0.99, 10.0, 0.01, 1.0, 0.0, 0.0, 0.1])
            .expect("Example parameters should be valid")
    }

    #[test]
    // Purpose
    // -------
    // Domain checks reject the boundary values named by the model.
    //
    // Given
    // -----
    // - ψ = ±1, φ ≤ 0, σ² ≤ 0, γ < 0, NaN, and a 7-vector.
    //
    // Expect
    // ------
    // - The matching `ParamError` variant for each.
    fn from_slice_rejects_out_of_domain_values() {
        let base = example().to_array();
        let with = |idx: usize, v: f64| {
            let mut t = base;
            t[idx] = v;
            GrangerParams::from_slice(&t)
        };

        assert!(matches!(with(PSI_ROOT, 1.0), Err(ParamError::InvalidPsi { .. })));
        assert!(matches!(with(PSI_SHOOT, -1.0), Err(ParamError::InvalidPsi { .. })));
        assert!(matches!(with(PHI_SHOOT, 0.0), Err(ParamError::InvalidPhi { .. })));
        assert!(matches!(with(PHI_ROOT, -2.0), Err(ParamError::InvalidPhi { .. })));
        assert!(matches!(with(SIGMA2_ROOT, 0.0), Err(ParamError::InvalidSigma2 { .. })));
        assert!(matches!(with(GAMMA_SHOOT, -0.5), Err(ParamError::InvalidGamma { .. })));
        assert!(matches!(with(SIGMA2_SHOOT, f64::NAN), Err(ParamError::InvalidSigma2 { .. })));
        assert!(matches!(
            GrangerParams::from_slice(&base[..7]),
            Err(ParamError::ThetaLengthMismatch { expected: 8, actual: 7 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The example vector reads as "shoot drives root".
    //
    // Given
    // -----
    // - θ = (1, 0.99, 10, 0.01, 1, 0, 0, 0.1).
    //
    // Expect
    // ------
    // - ψ_root = 0.99 with γ_root = 10; shoot has no cross term.
    fn example_vector_maps_to_named_fields() {
        let p = example();
        assert_eq!(p.root, SignalParams { phi: 1.0, psi: 0.99, gamma: 10.0, sigma2: 0.01 });
        assert_eq!(p.shoot, SignalParams { phi: 1.0, psi: 0.0, gamma: 0.0, sigma2: 0.1 });
        assert_eq!(p.signal(Signal::Shoot).sigma2, 0.1);
    }

    #[test]
    // Purpose
    // -------
    // θ-space round trips hold for every variant and only free
    // coordinates are carried.
    //
    // Given
    // -----
    // - The example vector with γ_shoot = 3 and ψ_shoot = −0.4.
    //
    // Expect
    // ------
    // - θ lengths 4/6/6/8 and model values recovered; fixed pairs are 0.
    fn theta_round_trip_per_variant() {
        let mut p = example();
        p.shoot.psi = -0.4;
        p.shoot.gamma = 3.0;

        for variant in ModelVariant::ALL {
            let theta = p.to_theta(variant);
            assert_eq!(theta.len(), variant.free_count());

            let back = GrangerParams::from_theta(&theta, variant).expect("Round trip");
            let expected = p.restricted(variant);
            for (a, b) in back.to_array().iter().zip(expected.to_array().iter()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // `from_theta` guards its input.
    //
    // Given
    // -----
    // - A 5-vector for the null variant and a NaN coordinate.
    //
    // Expect
    // ------
    // - Length mismatch and `InvalidThetaInput` with the position.
    fn from_theta_rejects_bad_input() {
        assert!(matches!(
            GrangerParams::from_theta(&array![0.0, 0.0, 0.0, 0.0, 0.0], ModelVariant::Null),
            Err(ParamError::ThetaLengthMismatch { expected: 4, actual: 5 })
        ));
        assert!(matches!(
            GrangerParams::from_theta(&array![0.0, f64::NAN, 0.0, 0.0], ModelVariant::Null),
            Err(ParamError::InvalidThetaInput { index: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Preparing a start gives free γ a positive value and zeroes fixed
    // pairs.
    //
    // Given
    // -----
    // - The example vector prepared for `rtos` with mean spacing 13.
    //
    // Expect
    // ------
    // - Root cross pair zeroed, γ_shoot = 13, ψ_shoot unchanged (0).
    fn prepared_for_sets_free_gamma_and_zeroes_fixed() {
        let prepared = example().prepared_for(ModelVariant::Rtos, 13.0);
        assert_eq!(prepared.root.psi, 0.0);
        assert_eq!(prepared.root.gamma, 0.0);
        assert_eq!(prepared.shoot.gamma, 13.0);
        assert_eq!(prepared.shoot.psi, 0.0);
    }
}
