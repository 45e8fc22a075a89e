//! statistical_tests::errors — error surface of the bootstrap Granger test.
//!
//! Purpose
//! -------
//! Report every condition that stops a test invocation: malformed inputs
//! (from the model layer), invalid test configuration, a failed fit to the
//! observed data, a bootstrap with no usable replicate, and cancellation.
//!
//! Conventions
//! -----------
//! - Replicate-level non-convergence is *not* an error; it is counted as a
//!   discard inside the bootstrap. Only the observed-data fits are fatal.
//! - Model-layer errors nest unchanged in [`GrangerTestError::Model`].
//! - At the Python boundary validation errors become `ValueError`,
//!   convergence failures `RuntimeError`, and cancellation
//!   `InterruptedError`.
//!
//! Testing notes
//! -------------
//! - Unit tests check payload embedding and the `From` nesting. The PyO3
//!   conversion needs a Python runtime and is exercised from Python.
#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyInterruptedError, PyRuntimeError, PyValueError},
    PyErr,
};

use crate::granger::{
    core::variant::ModelVariant,
    errors::{GrangerError, ParamError},
};

pub type GrangerTestResult<T> = Result<T, GrangerTestError>;

/// Fatal outcomes of a Granger test invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum GrangerTestError {
    /// Invalid signals, grid, parameters, or selector.
    Model(GrangerError),

    /// The bootstrap needs at least one replicate.
    InvalidReplicates { replicates: usize },

    /// Reliability threshold must lie in [0, 1].
    InvalidReliabilityThreshold { value: f64 },

    /// A fit to the observed data did not converge.
    InitialFitFailed { variant: ModelVariant, status: String },

    /// Every bootstrap replicate was discarded.
    NoSuccessfulReplicates { attempted: usize },

    /// The progress sink requested cancellation.
    Aborted { completed: usize, total: usize },
}

impl std::error::Error for GrangerTestError {}

impl std::fmt::Display for GrangerTestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrangerTestError::Model(err) => write!(f, "{err}"),
            GrangerTestError::InvalidReplicates { replicates } => {
                write!(f, "Number of bootstrap replicates must be >= 1, got {replicates}")
            }
            GrangerTestError::InvalidReliabilityThreshold { value } => {
                write!(f, "Minimum success fraction must lie in [0, 1], got {value}")
            }
            GrangerTestError::InitialFitFailed { variant, status } => {
                write!(f, "Fit of the {variant} model to the observed data failed: {status}")
            }
            GrangerTestError::NoSuccessfulReplicates { attempted } => {
                write!(f, "All {attempted} bootstrap replicates were discarded; no p-value")
            }
            GrangerTestError::Aborted { completed, total } => {
                write!(f, "Test aborted after {completed} of {total} bootstrap replicates")
            }
        }
    }
}

impl From<GrangerError> for GrangerTestError {
    fn from(err: GrangerError) -> Self {
        GrangerTestError::Model(err)
    }
}

impl From<ParamError> for GrangerTestError {
    fn from(err: ParamError) -> Self {
        GrangerTestError::Model(GrangerError::Param(err))
    }
}

#[cfg(feature = "python-bindings")]
impl From<GrangerTestError> for PyErr {
    fn from(err: GrangerTestError) -> PyErr {
        match err {
            GrangerTestError::Aborted { .. } => PyInterruptedError::new_err(err.to_string()),
            GrangerTestError::InitialFitFailed { .. }
            | GrangerTestError::NoSuccessfulReplicates { .. } => {
                PyRuntimeError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}
