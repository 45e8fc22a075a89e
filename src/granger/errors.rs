//! granger::errors — validation and parameter errors for the bivariate model.
//!
//! Purpose
//! -------
//! Give the model layer its own error surface: [`GrangerError`] for
//! malformed signals, time grids, selectors, and optimizer configuration,
//! and [`ParamError`] for parameter vectors outside their domain. Both name
//! the offending signal, index, or value so a failed call can be diagnosed
//! without re-running it.
//!
//! Conventions
//! -----------
//! - Everything here is a *validation* failure: fatal for the call, never
//!   retried. Non-convergence of a fit is not an error at this level; it is
//!   reported through `FitResult::status`.
//! - At the Python boundary both enums become `ValueError` with the
//!   `Display` message.
//!
//! Testing notes
//! -------------
//! - Unit tests check that messages embed their payloads and that
//!   `ParamError` nests into `GrangerError` through `From`.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

use crate::{granger::core::params::Signal, optimization::errors::OptError};

/// Result alias for model-layer operations.
pub type GrangerResult<T> = Result<T, GrangerError>;

/// Result alias for parameter construction and mapping.
pub type ParamResult<T> = Result<T, ParamError>;

/// Validation failures for signals, time grids, selectors, and options.
#[derive(Debug, Clone, PartialEq)]
pub enum GrangerError {
    // ---- Input/data validation ----
    /// `root`, `shoot`, and `times` must have the same length.
    LengthMismatch { root: usize, shoot: usize, times: usize },

    /// Too few observations to estimate the full model.
    InsufficientData { len: usize, min: usize },

    /// A signal value is NaN/±inf.
    NonFiniteData { signal: Signal, index: usize, value: f64 },

    /// A signal has zero sample variance and cannot be standardized.
    ConstantSignal { signal: Signal, value: f64 },

    // ---- Time grid ----
    /// The time grid has no points.
    EmptyTimeGrid,

    /// A time point is NaN/±inf.
    NonFiniteTime { index: usize, value: f64 },

    /// Time points must be non-negative.
    NegativeTime { index: usize, value: f64 },

    /// Time points must be strictly increasing.
    NonIncreasingTime { index: usize, previous: f64, value: f64 },

    // ---- Selectors / options ----
    /// Alternative selector is not one of `twodir`, `rtos`, `stor`.
    InvalidAlternative { name: String },

    /// φ rescaling factors for restarts must be finite and > 0.
    InvalidRestartScale { value: f64 },

    /// Optimizer configuration was rejected.
    InvalidOptimizerOptions(OptError),

    // ---- Parameters ----
    /// Parameter vector outside its domain.
    Param(ParamError),
}

impl std::error::Error for GrangerError {}

impl std::fmt::Display for GrangerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrangerError::LengthMismatch { root, shoot, times } => {
                write!(
                    f,
                    "Length mismatch: root has {root}, shoot has {shoot}, times has {times} points"
                )
            }
            GrangerError::InsufficientData { len, min } => {
                write!(f, "Need at least {min} observations to fit the model, got {len}")
            }
            GrangerError::NonFiniteData { signal, index, value } => {
                write!(f, "{signal} value at index {index} is non-finite: {value}")
            }
            GrangerError::ConstantSignal { signal, value } => {
                write!(f, "{signal} signal is constant ({value}); expected standardized data")
            }
            GrangerError::EmptyTimeGrid => write!(f, "Time grid is empty"),
            GrangerError::NonFiniteTime { index, value } => {
                write!(f, "Time point at index {index} is non-finite: {value}")
            }
            GrangerError::NegativeTime { index, value } => {
                write!(f, "Time point at index {index} is negative: {value}")
            }
            GrangerError::NonIncreasingTime { index, previous, value } => {
                write!(
                    f,
                    "Times must be strictly increasing: times[{index}] = {value} follows {previous}"
                )
            }
            GrangerError::InvalidAlternative { name } => {
                write!(f, "Invalid alternative '{name}': expected 'twodir', 'rtos', or 'stor'")
            }
            GrangerError::InvalidRestartScale { value } => {
                write!(f, "Restart scale must be finite and > 0, got {value}")
            }
            GrangerError::InvalidOptimizerOptions(err) => {
                write!(f, "Invalid optimizer options: {err}")
            }
            GrangerError::Param(err) => write!(f, "{err}"),
        }
    }
}

impl From<ParamError> for GrangerError {
    fn from(err: ParamError) -> Self {
        GrangerError::Param(err)
    }
}

impl From<OptError> for GrangerError {
    fn from(err: OptError) -> Self {
        GrangerError::InvalidOptimizerOptions(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<GrangerError> for PyErr {
    fn from(err: GrangerError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Parameter vectors outside the model's domain.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Full parameter vectors have exactly 8 entries.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Unconstrained optimizer input must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    /// Decay range φ must be finite and > 0.
    InvalidPhi { signal: Signal, value: f64 },

    /// Cross-impact ψ must be finite and lie in (−1, 1).
    InvalidPsi { signal: Signal, value: f64 },

    /// Kernel peak γ must be finite and ≥ 0.
    InvalidGamma { signal: Signal, value: f64 },

    /// Residual variance σ² must be finite and > 0.
    InvalidSigma2 { signal: Signal, value: f64 },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, got {actual}")
            }
            ParamError::InvalidThetaInput { index, value } => {
                write!(f, "Theta input at index {index} must be finite, got {value}")
            }
            ParamError::InvalidPhi { signal, value } => {
                write!(f, "phi_{} must be finite and > 0, got {value}", signal.suffix())
            }
            ParamError::InvalidPsi { signal, value } => {
                write!(f, "psi_{} must be finite and in (-1, 1), got {value}", signal.suffix())
            }
            ParamError::InvalidGamma { signal, value } => {
                write!(f, "gamma_{} must be finite and >= 0, got {value}", signal.suffix())
            }
            ParamError::InvalidSigma2 { signal, value } => {
                write!(f, "sigma2_{} must be finite and > 0, got {value}", signal.suffix())
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ParamError> for PyErr {
    fn from(err: ParamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
