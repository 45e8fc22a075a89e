//! irregular_granger — Granger-causality testing for irregularly sampled
//! bivariate time series, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the bootstrap Granger test and the bivariate simulator to Python
//! via the `_irregular_granger` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`granger`, `optimization`,
//!   `statistical_tests`) as the public crate surface.
//! - Define the `GrangerTest` `#[pyclass]`, the `sim_proc` `#[pyfunction]`,
//!   and the `#[pymodule]` initializer for `_irregular_granger`.
//! - Register the `statistical_tests` and `models` submodules under
//!   `irregular_granger` so dotted imports work.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, argument conversion, and error mapping.
//! - Signals must be detrended and standardized before they reach the test.
//!   Nothing here checks stationarity.
//!
//! Conventions
//! -----------
//! - Parameter vectors use the canonical order
//!   `(φ_root, ψ_root, γ_root, σ²_root, φ_shoot, ψ_shoot, γ_shoot, σ²_shoot)`.
//! - Core errors are rich Rust enums internally and become `PyErr` at the
//!   boundary (`ValueError`, `RuntimeError`, or `InterruptedError`).
//!
//! Downstream usage
//! ----------------
//! - Rust code should call [`statistical_tests::granger_test`] or
//!   [`statistical_tests::GrangerOutcome::granger_test`] and
//!   [`granger::sim_proc`] directly and can ignore everything behind the
//!   `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_granger_pipeline.rs`.

pub mod granger;
pub mod optimization;
pub mod statistical_tests;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    granger::models::simulator,
    statistical_tests::{GrangerOptions, GrangerOutcome, GrangerTestError},
    utils::{extract_f64_vec, extract_fit_options, extract_theta, PyProgress},
};

/// GrangerTest — Python-facing wrapper for the bootstrap Granger test.
///
/// Purpose
/// -------
/// Run [`GrangerOutcome::granger_test`] from Python and expose the outcome
/// as read-only properties.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `GrangerTest(root, shoot, times, theta=None, alternative="twodir",
/// replicates=100, seed=123, show_progress=True, progress=None, ...)`:
/// - `root`, `shoot`, `times`: array-likes of equal length ≥ 10; `times`
///   strictly increasing and non-negative.
/// - `theta`: optional 8-vector start for the observed-data fits.
/// - `alternative`: `"twodir"`, `"rtos"`, or `"stor"`.
/// - `replicates`: bootstrap replicates, ≥ 1.
/// - `seed`: master seed of the bootstrap.
/// - `show_progress`: log progress when no `progress` callable is given.
/// - `progress`: optional callable `progress(current, total)`; an exception
///   it raises stops the test and is re-raised.
/// - `tol_grad`, `tol_cost`, `max_iter`, `line_searcher`, `lbfgs_mem`:
///   optional optimizer overrides.
///
/// Notes
/// -----
/// - Ctrl-C between replicates raises `KeyboardInterrupt`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "irregular_granger.statistical_tests")]
pub struct GrangerTest {
    inner: GrangerOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl GrangerTest {
    #[new]
    #[pyo3(
        text_signature = "(root, shoot, times, /, theta=None, alternative='twodir', replicates=100, seed=123, show_progress=True, progress=None, tol_grad=None, tol_cost=None, max_iter=None, line_searcher=None, lbfgs_mem=None)",
        signature = (
            root, shoot, times, theta = None, alternative = "twodir", replicates = 100,
            seed = 123, show_progress = true, progress = None, tol_grad = None, tol_cost = None,
            max_iter = None, line_searcher = None, lbfgs_mem = None
        )
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn granger_test<'py>(
        py: Python<'py>, root: &Bound<'py, PyAny>, shoot: &Bound<'py, PyAny>,
        times: &Bound<'py, PyAny>, theta: Option<&Bound<'py, PyAny>>, alternative: &str,
        replicates: usize, seed: u64, show_progress: bool, progress: Option<Py<PyAny>>,
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
    ) -> PyResult<GrangerTest> {
        let root = extract_f64_vec(py, root, "root")?;
        let shoot = extract_f64_vec(py, shoot, "shoot")?;
        let times = extract_f64_vec(py, times, "times")?;
        let theta = extract_theta(py, theta)?;

        let fit_opts = extract_fit_options(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem)?;
        let opts =
            GrangerOptions::new(alternative, replicates, seed, theta.as_deref(), show_progress)?
                .with_fit_options(fit_opts);

        let sink = PyProgress::new(progress, show_progress);
        match GrangerOutcome::granger_test(&root, &shoot, &times, &opts, Some(&sink)) {
            Ok(inner) => Ok(GrangerTest { inner }),
            Err(err @ GrangerTestError::Aborted { .. }) => {
                Err(sink.take_error().unwrap_or_else(|| err.into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Observed likelihood-ratio statistic.
    #[getter]
    pub fn statistic(&self) -> f64 {
        self.inner.statistic()
    }

    /// Bootstrap p-value.
    #[getter]
    pub fn pvalue(&self) -> f64 {
        self.inner.p_value()
    }

    /// χ²(df) reference p-value; not calibrated, see `pvalue`.
    #[getter]
    pub fn asymptotic_pvalue(&self) -> f64 {
        self.inner.asymptotic_p_value()
    }

    #[getter]
    pub fn df(&self) -> usize {
        self.inner.df()
    }

    #[getter]
    pub fn alternative(&self) -> String {
        self.inner.alternative().to_string()
    }

    #[getter]
    pub fn successful_replicates(&self) -> usize {
        self.inner.successful_replicates()
    }

    #[getter]
    pub fn discarded_replicates(&self) -> usize {
        self.inner.discarded_replicates()
    }

    #[getter]
    pub fn low_reliability(&self) -> bool {
        self.inner.low_reliability()
    }

    #[getter]
    pub fn null_theta(&self) -> Vec<f64> {
        self.inner.null_fit().params.to_array().to_vec()
    }

    #[getter]
    pub fn alt_theta(&self) -> Vec<f64> {
        self.inner.alt_fit().params.to_array().to_vec()
    }

    #[getter]
    pub fn null_loglik(&self) -> f64 {
        self.inner.null_fit().loglik
    }

    #[getter]
    pub fn alt_loglik(&self) -> f64 {
        self.inner.alt_fit().loglik
    }

    #[getter]
    pub fn bootstrap_statistics(&self) -> Vec<f64> {
        self.inner.bootstrap_statistics().to_vec()
    }
}

/// Simulate the bivariate process on `times`; returns `(root, shoot)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (theta, times, seed = 123))]
fn sim_proc<'py>(
    py: Python<'py>, theta: &Bound<'py, PyAny>, times: &Bound<'py, PyAny>, seed: u64,
) -> PyResult<(Vec<f64>, Vec<f64>)> {
    let theta = extract_f64_vec(py, theta, "theta")?;
    let times = extract_f64_vec(py, times, "times")?;
    let sim = simulator::sim_proc(&theta, &times, seed)?;
    Ok((sim.root.to_vec(), sim.shoot.to_vec()))
}

/// _irregular_granger — PyO3 module initializer.
///
/// Creates the `statistical_tests` and `models` submodules, attaches them to
/// the extension module, and registers them in `sys.modules` so that
/// `irregular_granger.statistical_tests` imports resolve.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _irregular_granger<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let statistical_tests_mod = PyModule::new(_py, "statistical_tests")?;
    let models_mod = PyModule::new(_py, "models")?;
    statistical_tests(_py, m, &statistical_tests_mod)?;
    models(_py, m, &models_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("irregular_granger.statistical_tests", statistical_tests_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("irregular_granger.models", models_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn statistical_tests<'py>(
    _py: Python, irregular_granger: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<GrangerTest>()?;
    irregular_granger.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn models<'py>(
    _py: Python, irregular_granger: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(sim_proc, m)?)?;
    irregular_granger.add_submodule(m)?;
    Ok(())
}
