//! fmri_design — design-matrix construction for fMRI regression analysis.
//!
//! Purpose
//! -------
//! Build the regressor table that links an experimental design to a
//! measured time series: binary condition indicators from onset files,
//! polynomial and discrete-cosine drift bases, hemodynamic-response
//! convolution, run-aware stacking of multi-run designs, covariate
//! joining, and collinearity diagnostics — everything that happens
//! between "here are my event timings" and "hand this matrix to the
//! estimator".
//!
//! Key behaviors
//! -------------
//! - A central [`DesignMatrix`](design::DesignMatrix) container carries
//!   observations × named regressors, a sampling frequency, per-column
//!   semantic tags, and a run partition; every transformation returns a
//!   new matrix.
//! - Generators in [`basis`] produce orthogonal Legendre trend columns
//!   and DCT-II high-pass columns; [`response`] convolves condition
//!   columns with validated kernels (canonically the double-gamma HRF);
//!   [`design::append`] merges runs while keeping per-run regressors
//!   separately estimable; [`diagnostics`] removes near-duplicate
//!   columns before estimation; [`io`] parses minimal onset and
//!   covariate files.
//!
//! Invariants & assumptions
//! ------------------------
//! - All stored values are finite; all columns share one length; column
//!   names are unique; sampling frequencies are finite and positive.
//! - Row order is temporally meaningful and is never silently reordered;
//!   the onset reader's sort flag is the only explicit reordering.
//! - All operations are synchronous, single-threaded, pure
//!   transformations bounded by input size; only the file readers touch
//!   the filesystem, with a single bounded read each.
//!
//! Conventions
//! -----------
//! - The crate performs no logging; callers orchestrate reporting.
//!   Errors are surfaced through the per-domain enums in
//!   [`design::errors`] and [`io::errors`].
//! - Estimation itself (ordinary least squares or otherwise) and plot
//!   rendering are external collaborators: the matrix exports a plain
//!   numeric array ([`to_array`](design::DesignMatrix::to_array))
//!   and a render-ready [`HeatmapView`](design::HeatmapView).
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use fmri_design::prelude::*;
//!
//! // Two conditions over a 40-sample run at 1 Hz.
//! let matrix = parse_onsets(
//!     "0 2 faces\n10 2 houses\n20 2 faces\n",
//!     &OnsetOptions::new(1.0, 40),
//! )?;
//!
//! // Convolve with the canonical HRF, then absorb slow drift.
//! let matrix = matrix.convolved_with_hrf()?.with_polynomial_drift(2)?;
//!
//! // Stack a second run; per-run trends stay separately estimable.
//! let stacked = matrix.row_stack(&matrix, &StackOptions::default())?;
//! assert_eq!(stacked.n_rows(), 80);
//!
//! // Check for near-duplicates, then export for estimation.
//! let (clean, report) = stacked.decollinearized(0.95)?;
//! let x = clean.to_array();
//! assert_eq!(x.nrows(), 80);
//! assert_eq!(report.dropped.len() + clean.n_cols(), stacked.n_cols());
//! # Result::<(), fmri_design::design::DesignError>::Ok(())
//! ```
//!
//! Testing notes
//! -------------
//! - Every module carries unit tests for its own semantics and error
//!   branches; `tests/integration_design_pipeline.rs` exercises the full
//!   onset-to-estimator workflow across multiple runs.

pub mod basis;
pub mod design;
pub mod diagnostics;
pub mod io;
pub mod response;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use fmri_design::prelude::*;
//
// to import the main design-matrix surface in a single line, without
// pulling in lower-level internals.

pub mod prelude {
    pub use crate::basis::{DEFAULT_HIGHPASS_SECS, dct_basis, legendre_basis};
    pub use crate::design::{
        ColumnInfo, ColumnSelector, ColumnTag, ConfigError, DesignError, DesignMatrix,
        DesignResult, HeatmapView, RunSpan, ShapeError, StackOptions,
    };
    pub use crate::diagnostics::{CleanReport, DEFAULT_CORR_THRESHOLD, DroppedColumn};
    pub use crate::io::{
        OnsetOptions, OnsetUnit, ParseError, parse_covariates, parse_onsets, read_covariates,
        read_onsets,
    };
    pub use crate::response::{ConvolveOptions, Kernel, KernelBank};
}
