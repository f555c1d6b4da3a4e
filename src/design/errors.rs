//! Errors for design-matrix construction (parameter validation, shape
//! checks on binary operations, and data validation).
//!
//! This module defines three error families used across the crate:
//! [`ConfigError`] for invalid parameters (basis orders, filter durations,
//! kernel lengths, thresholds), [`ShapeError`] for row-count and
//! sampling-frequency mismatches in binary operations, and the unified
//! [`DesignError`] that the [`DesignMatrix`](crate::design::DesignMatrix)
//! surface returns when an operation can fail for more than one reason.
//! All implement `Display`/`Error`, and the narrower families convert into
//! [`DesignError`] via `From`.
//!
//! ## Conventions
//! - **Indices are 0-based** throughout.
//! - Operations are all-or-nothing: on error, no partially built matrix is
//!   ever returned.
//! - Parse failures from the I/O layer are normalized into
//!   [`DesignError::Parse`] so that file-driven constructors share the same
//!   error surface as in-memory ones.

use crate::io::errors::ParseError;

/// Result alias for parameter-validation paths that may produce
/// [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result alias for shape-checking paths that may produce [`ShapeError`].
pub type ShapeResult<T> = Result<T, ShapeError>;

/// Crate-wide result alias for design-matrix operations that may produce
/// [`DesignError`].
pub type DesignResult<T> = Result<T, DesignError>;

/// Invalid parameters supplied to a basis generator, kernel constructor, or
/// diagnostic routine.
///
/// Every variant corresponds to a precondition documented on the operation
/// that raises it; none of these arise from well-formed inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    // ---- Container parameters ----
    /// Sampling frequency must be finite and strictly positive.
    InvalidSamplingFreq { value: f64 },

    // ---- Polynomial basis ----
    /// Requested polynomial order exceeds the degrees of freedom available
    /// from the row count (requires `order <= n_rows - 1`).
    OrderExceedsRows { order: usize, n_rows: usize },

    /// Basis generation over an empty row domain is undefined.
    EmptyBasisDomain,

    // ---- Discrete-cosine basis ----
    /// High-pass filter duration must be finite and strictly positive.
    InvalidFilterDuration { value: f64 },

    // ---- Convolution kernels ----
    /// A kernel must contain at least one tap.
    EmptyKernel { name: String },

    /// A kernel tap is NaN/±inf.
    NonFiniteKernelTap { name: String, index: usize, value: f64 },

    /// Kernel length exceeds the series length, so the causal crop would
    /// discard the entire tail response.
    KernelLongerThanSeries { kernel_len: usize, n_rows: usize },

    /// Sampling the response at this rate produced no positive tap, so
    /// convolution would zero out every selected column.
    DegenerateKernel { name: String, sampling_freq: f64 },

    // ---- Collinearity diagnostics ----
    /// Correlation threshold must lie in (0, 1].
    InvalidThreshold { value: f64 },
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidSamplingFreq { value } => {
                write!(f, "Configuration Error: Sampling frequency must be finite and > 0 (got {})", value)
            }
            ConfigError::OrderExceedsRows { order, n_rows } => write!(
                f,
                "Configuration Error: Polynomial order {} exceeds degrees of freedom for {} rows (max {})",
                order,
                n_rows,
                n_rows.saturating_sub(1)
            ),
            ConfigError::EmptyBasisDomain => {
                write!(f, "Configuration Error: Cannot generate basis columns over zero rows")
            }
            ConfigError::InvalidFilterDuration { value } => {
                write!(f, "Configuration Error: Filter duration must be finite and > 0 (got {})", value)
            }
            ConfigError::EmptyKernel { name } => {
                write!(f, "Configuration Error: Kernel '{}' has no taps", name)
            }
            ConfigError::NonFiniteKernelTap { name, index, value } => write!(
                f,
                "Configuration Error: Kernel '{}' has non-finite tap {} at index {}",
                name, value, index
            ),
            ConfigError::KernelLongerThanSeries { kernel_len, n_rows } => write!(
                f,
                "Configuration Error: Kernel length {} exceeds series length {}",
                kernel_len, n_rows
            ),
            ConfigError::DegenerateKernel { name, sampling_freq } => write!(
                f,
                "Configuration Error: Kernel '{}' sampled at {} Hz has no positive tap",
                name, sampling_freq
            ),
            ConfigError::InvalidThreshold { value } => {
                write!(f, "Configuration Error: Correlation threshold must lie in (0, 1] (got {})", value)
            }
        }
    }
}

/// Row-count or sampling-frequency mismatch detected in a binary operation
/// (row-stack, column-join) or during container construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    // ---- Construction ----
    /// A column's length disagrees with the established row count.
    ColumnLengthMismatch { name: String, expected: usize, actual: usize },

    /// The number of supplied names disagrees with the number of columns.
    NameCountMismatch { names: usize, cols: usize },

    // ---- Binary operations ----
    /// Column-join requires both operands to have the same number of rows.
    RowCountMismatch { left: usize, right: usize },

    /// Row-stack and column-join require both operands to share one
    /// sampling frequency.
    SamplingFreqMismatch { left: f64, right: f64 },
}

impl std::error::Error for ShapeError {}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::ColumnLengthMismatch { name, expected, actual } => write!(
                f,
                "Shape Error: Column '{}' has length {}, expected {}",
                name, actual, expected
            ),
            ShapeError::NameCountMismatch { names, cols } => {
                write!(f, "Shape Error: {} names supplied for {} columns", names, cols)
            }
            ShapeError::RowCountMismatch { left, right } => {
                write!(f, "Shape Error: Row counts differ ({} vs {})", left, right)
            }
            ShapeError::SamplingFreqMismatch { left, right } => {
                write!(f, "Shape Error: Sampling frequencies differ ({} Hz vs {} Hz)", left, right)
            }
        }
    }
}

/// Unified error type for the design-matrix surface.
///
/// Covers data validation on construction, column lookup failures, and
/// wraps the narrower [`ConfigError`], [`ShapeError`], and
/// [`ParseError`] families so that composite operations (e.g. reading an
/// onset file and appending a drift basis) report through one type.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignError {
    // ---- Data validation ----
    /// A data value is NaN/±inf.
    NonFiniteData { column: String, row: usize, value: f64 },

    // ---- Column lookup ----
    /// No column with the requested name exists.
    UnknownColumn { name: String },

    /// A column with this name already exists.
    DuplicateColumn { name: String },

    // ---- Wrapped families ----
    Config(ConfigError),
    Shape(ShapeError),
    Parse(ParseError),
}

impl std::error::Error for DesignError {}

impl std::fmt::Display for DesignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignError::NonFiniteData { column, row, value } => write!(
                f,
                "Design Error: Non-finite value {} in column '{}' at row {}",
                value, column, row
            ),
            DesignError::UnknownColumn { name } => {
                write!(f, "Design Error: Unknown column '{}'", name)
            }
            DesignError::DuplicateColumn { name } => {
                write!(f, "Design Error: Column '{}' already exists", name)
            }
            DesignError::Config(err) => write!(f, "{}", err),
            DesignError::Shape(err) => write!(f, "{}", err),
            DesignError::Parse(err) => write!(f, "{}", err),
        }
    }
}

impl From<ConfigError> for DesignError {
    fn from(err: ConfigError) -> Self {
        DesignError::Config(err)
    }
}

impl From<ShapeError> for DesignError {
    fn from(err: ShapeError) -> Self {
        DesignError::Shape(err)
    }
}

impl From<ParseError> for DesignError {
    fn from(err: ParseError) -> Self {
        DesignError::Parse(err)
    }
}
