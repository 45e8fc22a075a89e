//! utils — conversion helpers for the Python bindings.
//!
//! Everything here sits behind the `python-bindings` feature and turns
//! loosely typed Python arguments (arrays, sequences, optional keyword
//! arguments, callables) into the validated Rust types used by `granger`
//! and `statistical_tests`.
#[cfg(feature = "python-bindings")]
use std::cell::RefCell;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    granger::{core::options::FitOptions, errors::GrangerError},
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    statistical_tests::progress::{LogProgress, ProgressSink},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Accept a 1-D `numpy.ndarray`, a `pandas.Series`, or any float sequence.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy an array-like argument into an owned vector.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        pyo3::exceptions::PyValueError::new_err(format!(
            "{name} must be a 1-D contiguous float64 array or sequence"
        ))
    })?;
    Ok(slice.to_vec())
}

/// Optional starting vector; `None` and Python `None` both mean "derive".
#[cfg(feature = "python-bindings")]
pub fn extract_theta<'py>(
    py: Python<'py>, theta: Option<&Bound<'py, PyAny>>,
) -> PyResult<Option<Vec<f64>>> {
    match theta {
        Some(obj) if !obj.is_none() => extract_f64_vec(py, obj, "theta").map(Some),
        _ => Ok(None),
    }
}

/// Merge optimizer keyword arguments into the default fit options.
///
/// Unset arguments keep their [`FitOptions::default`] values.
#[cfg(feature = "python-bindings")]
pub fn extract_fit_options(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<FitOptions> {
    use std::str::FromStr;

    let defaults = FitOptions::default();
    if tol_grad.is_none()
        && tol_cost.is_none()
        && max_iter.is_none()
        && line_searcher.is_none()
        && lbfgs_mem.is_none()
    {
        return Ok(defaults);
    }

    let base = defaults.mle_opts.tols;
    // Tolerances::new -> OptResult<Tolerances> -> GrangerError -> PyErr
    let tols = Tolerances::new(
        tol_grad.or(base.tol_grad),
        tol_cost.or(base.tol_cost),
        max_iter.or(base.max_iter),
    )
    .map_err(GrangerError::from)?;

    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(GrangerError::from)?,
        None => defaults.mle_opts.line_searcher,
    };

    let mle_opts = MLEOptions::new(tols, ls, false, lbfgs_mem.or(defaults.mle_opts.lbfgs_mem))
        .map_err(GrangerError::from)?;

    Ok(FitOptions::new(mle_opts, defaults.phi_restart_scales)?)
}

/// Progress sink forwarding `(current, total)` to a Python callable, or to
/// [`LogProgress`] when no callable is given and `show_progress` is set.
///
/// The first exception raised by the callable is kept and turns every later
/// abort poll into `true`; the caller retrieves it with [`Self::take_error`]
/// and re-raises it in place of the generic abort error. A
/// `KeyboardInterrupt` raised while Python signal handlers run is caught the
/// same way.
#[cfg(feature = "python-bindings")]
pub struct PyProgress {
    callback: Option<Py<PyAny>>,
    show_progress: bool,
    error: RefCell<Option<PyErr>>,
}

#[cfg(feature = "python-bindings")]
impl PyProgress {
    pub fn new(callback: Option<Py<PyAny>>, show_progress: bool) -> Self {
        Self { callback, show_progress, error: RefCell::new(None) }
    }

    pub fn take_error(&self) -> Option<PyErr> {
        self.error.borrow_mut().take()
    }

    fn record(&self, err: PyErr) {
        let mut slot = self.error.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
    }
}

#[cfg(feature = "python-bindings")]
impl ProgressSink for PyProgress {
    fn on_replicate(&self, current: usize, total: usize) {
        let Some(callback) = &self.callback else {
            if self.show_progress {
                LogProgress.on_replicate(current, total);
            }
            return;
        };
        if self.error.borrow().is_some() {
            return;
        }
        if let Err(err) = Python::with_gil(|py| callback.call1(py, (current, total))) {
            self.record(err);
        }
    }

    fn should_abort(&self) -> bool {
        if self.error.borrow().is_some() {
            return true;
        }
        if let Err(err) = Python::with_gil(|py| py.check_signals()) {
            self.record(err);
            return true;
        }
        false
    }
}
