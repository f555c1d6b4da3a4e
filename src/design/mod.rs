//! design — the design-matrix container, metadata, append engine, and
//! errors.
//!
//! Purpose
//! -------
//! Bundle the central table abstraction of the crate with everything that
//! defines its identity: the [`DesignMatrix`] container itself
//! ([`matrix`]), the per-column tag/run side-table ([`metadata`]), the
//! row-stack / column-join engine ([`append`]), and the error surface
//! ([`errors`]). This is the namespace most consumers should depend on;
//! basis generation, convolution, diagnostics, and file readers plug
//! into it from their own modules.
//!
//! Key behaviors
//! -------------
//! - [`DesignMatrix`] hosts every domain operation as a non-destructive
//!   method: drift bases, HRF convolution, run stacking, covariate
//!   joining, and collinearity cleaning all return new matrices.
//! - [`metadata`] carries the closed tag vocabulary
//!   ([`ColumnTag`]), per-column [`ColumnInfo`], run spans, and the
//!   pattern selector used to mark columns for per-run stacking.
//! - [`append`] implements the run-aware merge semantics: shared columns
//!   concatenate, polynomial/selected columns become zero-filled
//!   run-specific variants.
//! - [`errors`] defines the [`ConfigError`] / [`ShapeError`] /
//!   [`DesignError`] families and their `Result` aliases.
//!
//! Invariants & assumptions
//! ------------------------
//! - Columns and their metadata are created and dropped together; all
//!   columns share one length; names are unique; stored values are
//!   finite; sampling frequencies are finite and positive.
//! - Every operation is a pure transformation: no holder of an input
//!   matrix ever observes mutation, and independently created matrices
//!   share no state, so per-run loading loops can run in parallel
//!   without coordination.
//!
//! Downstream usage
//! ----------------
//! - Typical end-to-end flow:
//!   1. Read onsets via [`crate::io::read_onsets`] (or construct from an
//!      array) to get condition indicators.
//!   2. Convolve with the canonical HRF
//!      ([`DesignMatrix::convolved_with_hrf`]).
//!   3. Append drift regressors ([`DesignMatrix::with_polynomial_drift`],
//!      [`DesignMatrix::with_dct_basis`]).
//!   4. Stack runs ([`DesignMatrix::row_stack`]) and join covariates
//!      ([`DesignMatrix::column_join`]).
//!   5. Clean near-duplicates ([`DesignMatrix::decollinearized`]) and
//!      export via [`DesignMatrix::to_array`] for estimation.

pub mod append;
pub mod errors;
pub mod matrix;
pub mod metadata;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::append::{StackOptions, column_join, row_stack};
pub use self::errors::{
    ConfigError, ConfigResult, DesignError, DesignResult, ShapeError, ShapeResult,
};
pub use self::matrix::{DesignMatrix, HeatmapView};
pub use self::metadata::{ColumnInfo, ColumnSelector, ColumnTag, NamePattern, RunSpan};
