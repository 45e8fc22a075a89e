//! statistical_tests::granger — bootstrap likelihood-ratio Granger test.
//!
//! Purpose
//! -------
//! Test whether one irregularly sampled signal helps predict the other
//! beyond its own past. The null model has no cross-influence; the
//! alternative frees the root → shoot direction (`rtos`), the shoot → root
//! direction (`stor`), or both (`twodir`).
//!
//! Key behaviors
//! -------------
//! 1. Fit the null and the selected alternative to the observed data. The
//!    alternative starts from the null estimate (ψ = 0 reproduces the null
//!    likelihood) and from the user / default start. Either fit failing to
//!    converge is fatal.
//! 2. `T_obs = max(0, 2(ℓ_alt − ℓ_null))`.
//! 3. Run the parametric bootstrap from the null estimate; the p-value is
//!    the fraction of successful replicates with `T_b ≥ T_obs`.
//! 4. Flag low reliability when fewer than `min_success_fraction` of the
//!    replicates succeed.
//!
//! Invariants & assumptions
//! ------------------------
//! - Signals must already be detrended and standardized by the caller. The
//!   model assumes mean-stationary inputs and gives meaningless results on
//!   raw non-stationary data; stationarity is not checked.
//! - The asymptotic χ²(df) p-value is reported for reference only: γ is
//!   unidentified under the null, so the bootstrap p-value is primary.
//!
//! Conventions
//! -----------
//! - Progress goes to an explicit [`ProgressSink`] when one is passed; else
//!   to [`LogProgress`] when `show_progress` is set; else nowhere.
//!
//! Testing notes
//! -------------
//! - Unit tests here cover validation order and a small end-to-end run;
//!   statistical behaviour (power, null calibration, determinism) is covered
//!   by `tests/integration_granger_pipeline.rs`.
use crate::{
    granger::{
        core::{data::GrangerData, params::GrangerParams, variant::{Alternative, ModelVariant}},
        models::estimator::{fit_from_starts, FitResult},
    },
    statistical_tests::{
        bootstrap::{lr_statistic, BootstrapPlan, BootstrapSample},
        errors::{GrangerTestError, GrangerTestResult},
        options::GrangerOptions,
        progress::{LogProgress, NoProgress, ProgressSink},
    },
};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// GrangerOutcome — result of one bootstrap Granger test.
///
/// Fields
/// ------
/// - `statistic`: observed likelihood-ratio statistic, ≥ 0.
/// - `p_value`: bootstrap p-value in `[0, 1]`.
/// - `asymptotic_p_value`: χ²(df) upper tail of `statistic`.
/// - `df`: free parameters of the alternative minus those of the null.
/// - `null_fit` / `alt_fit`: the observed-data fits.
/// - `bootstrap`: replicate statistics and discard count.
/// - `low_reliability`: fewer than the configured fraction of replicates
///   succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct GrangerOutcome {
    alternative: Alternative,
    statistic: f64,
    p_value: f64,
    asymptotic_p_value: f64,
    df: usize,
    null_fit: FitResult,
    alt_fit: FitResult,
    bootstrap: BootstrapSample,
    low_reliability: bool,
}

impl GrangerOutcome {
    /// Run the test on raw inputs.
    ///
    /// Errors
    /// ------
    /// - `GrangerTestError::InvalidReplicates` / `InvalidReliabilityThreshold`
    ///   for bad options.
    /// - `GrangerTestError::Model` for mismatched lengths, fewer than 10
    ///   points, non-finite values, a constant signal, a bad time grid, or an
    ///   out-of-domain `theta0`.
    /// - `GrangerTestError::InitialFitFailed` when an observed-data fit does
    ///   not converge.
    /// - `GrangerTestError::NoSuccessfulReplicates` when every replicate is
    ///   discarded.
    /// - `GrangerTestError::Aborted` when the sink requests cancellation.
    pub fn granger_test(
        root: &[f64], shoot: &[f64], times: &[f64], opts: &GrangerOptions,
        sink: Option<&dyn ProgressSink>,
    ) -> GrangerTestResult<Self> {
        opts.validate()?;
        let data = GrangerData::from_slices(root, shoot, times)?;
        data.ensure_varying()?;

        let start = opts.theta0.unwrap_or_else(|| GrangerParams::default_start(&data));
        let null_fit = fit_from_starts(&data, ModelVariant::Null, &[start], &opts.fit_opts);
        ensure_converged(&null_fit)?;

        let alt_variant = opts.alternative.variant();
        let alt_fit =
            fit_from_starts(&data, alt_variant, &[null_fit.params, start], &opts.fit_opts);
        ensure_converged(&alt_fit)?;

        let statistic = lr_statistic(null_fit.loglik, alt_fit.loglik);
        let df = opts.alternative.df();
        let asymptotic_p_value =
            ChiSquared::new(df as f64).map_or(f64::NAN, |chi2| chi2.sf(statistic));

        let plan = BootstrapPlan {
            null_params: &null_fit.params,
            grid: data.grid(),
            alternative: opts.alternative,
            fit_opts: &opts.fit_opts,
            seed: opts.seed,
        };
        let bootstrap = match sink {
            Some(sink) => plan.run(opts.replicates, sink)?,
            None if opts.show_progress => plan.run(opts.replicates, &LogProgress)?,
            None => plan.run(opts.replicates, &NoProgress)?,
        };

        let p_value = bootstrap_p_value(&bootstrap, statistic)?;
        let low_reliability = is_low_reliability(&bootstrap, opts.min_success_fraction);

        Ok(Self {
            alternative: opts.alternative,
            statistic,
            p_value,
            asymptotic_p_value,
            df,
            null_fit,
            alt_fit,
            bootstrap,
            low_reliability,
        })
    }

    pub fn alternative(&self) -> Alternative {
        self.alternative
    }

    /// Observed likelihood-ratio statistic.
    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    /// Bootstrap p-value.
    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    pub fn asymptotic_p_value(&self) -> f64 {
        self.asymptotic_p_value
    }

    pub fn df(&self) -> usize {
        self.df
    }

    pub fn null_fit(&self) -> &FitResult {
        &self.null_fit
    }

    pub fn alt_fit(&self) -> &FitResult {
        &self.alt_fit
    }

    pub fn successful_replicates(&self) -> usize {
        self.bootstrap.successful()
    }

    pub fn discarded_replicates(&self) -> usize {
        self.bootstrap.discarded()
    }

    pub fn bootstrap_statistics(&self) -> &[f64] {
        self.bootstrap.statistics()
    }

    pub fn low_reliability(&self) -> bool {
        self.low_reliability
    }
}

/// Run the test with the documented argument list.
///
/// `theta` is an optional canonical 8-vector start, `alternative` one of
/// `"twodir"`, `"rtos"`, `"stor"` (case-insensitive), `replicates ≥ 1`.
///
/// # Examples
/// ```rust,no_run
/// use irregular_granger::{granger::models::simulator::sim_proc, statistical_tests::granger_test};
///
/// let theta = [1.0, 0.99, 10.0, 0.01, 1.0, 0.0, 0.0, 0.1];
/// let times = [0.0, 5.0, 10.0, 15.0, 20.0, 30.0, 45.0, 60.0, 90.0, 120.0];
/// let sim = sim_proc(&theta, &times, 223).unwrap();
/// let root = sim.root.to_vec();
/// let shoot = sim.shoot.to_vec();
///
/// let out = granger_test(&root, &shoot, &times, None, "stor", 100, 123, false).unwrap();
/// assert!((0.0..=1.0).contains(&out.p_value()));
/// ```
#[allow(clippy::too_many_arguments)]
pub fn granger_test(
    root: &[f64], shoot: &[f64], times: &[f64], theta: Option<&[f64]>, alternative: &str,
    replicates: usize, seed: u64, show_progress: bool,
) -> GrangerTestResult<GrangerOutcome> {
    let opts = GrangerOptions::new(alternative, replicates, seed, theta, show_progress)?;
    GrangerOutcome::granger_test(root, shoot, times, &opts, None)
}

/// `#{T_b ≥ T_obs} / successful`, or an error when nothing succeeded.
fn bootstrap_p_value(bootstrap: &BootstrapSample, statistic: f64) -> GrangerTestResult<f64> {
    bootstrap
        .p_value(statistic)
        .ok_or(GrangerTestError::NoSuccessfulReplicates { attempted: bootstrap.attempted() })
}

fn is_low_reliability(bootstrap: &BootstrapSample, min_success_fraction: f64) -> bool {
    let low = bootstrap.success_fraction() < min_success_fraction;
    if low {
        log::warn!(
            "only {} of {} bootstrap replicates converged; p-value is unreliable",
            bootstrap.successful(),
            bootstrap.attempted()
        );
    }
    low
}

fn ensure_converged(fit: &FitResult) -> GrangerTestResult<()> {
    if fit.converged() {
        Ok(())
    } else {
        Err(GrangerTestError::InitialFitFailed {
            variant: fit.variant,
            status: fit.status.to_string(),
        })
    }
}
