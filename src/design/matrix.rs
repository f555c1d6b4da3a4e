//! design::matrix — the design-matrix container.
//!
//! Purpose
//! -------
//! Provide the central table abstraction of the crate: an ordered set of
//! observations (rows, e.g. scanner TRs) by an ordered set of named
//! regressor columns, with an attached sampling frequency, a per-column
//! metadata side-table, and a run partition of the rows. Every
//! domain operation — drift bases, HRF convolution, run stacking,
//! collinearity cleaning — is hosted here as a method and returns a new
//! matrix; holders of the original never observe mutation.
//!
//! Key behaviors
//! -------------
//! - Construct from a 2-D array ([`DesignMatrix::from_array`]), from named
//!   columns ([`DesignMatrix::from_columns`]), or empty
//!   ([`DesignMatrix::empty`]); file-driven construction lives in
//!   [`io`](crate::io).
//! - Attach and propagate [`ColumnInfo`] atomically with each column:
//!   metadata is created when a column is added and removed when the
//!   column is dropped, never independently.
//! - Append drift regressors ([`with_polynomial_drift`],
//!   [`with_dct_basis`]), convolve condition columns
//!   ([`convolved`], [`convolved_with_hrf`]), stack runs and join
//!   covariates ([`row_stack`], [`column_join`]), and remove near-duplicate
//!   columns ([`decollinearized`]).
//! - Export the numeric content for downstream estimation
//!   ([`to_array`]) and for rendering ([`heatmap`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - All columns have equal length, which equals the row count; the row
//!   count survives even when every column is projected away.
//! - Column names are unique within a matrix.
//! - The sampling frequency is finite and strictly positive.
//! - Row order is temporally meaningful and is never reordered by any
//!   operation in this module; only the onset reader's explicit sort flag
//!   reorders events, and it does so before the matrix is built.
//! - All stored values are finite; constructors validate and reject
//!   NaN/±inf at the door.
//!
//! Conventions
//! -----------
//! - Polynomial columns are named `poly{k}` and tagged
//!   `Polynomial(k)`; cosine columns are named `dct{k}` (k ≥ 1) and
//!   tagged `DctBasis`.
//! - A fresh matrix is one run covering all rows; stacking concatenates
//!   and re-bases run spans.
//! - This container performs no I/O and no logging; callers orchestrate
//!   file loading and reporting.
//!
//! Downstream usage
//! ----------------
//! - The regression consumer takes [`to_array`] output: N rows matching
//!   the observation axis of the dependent data, M named columns, each a
//!   numeric regressor, in the matrix's column order.
//! - The plotting collaborator takes a [`HeatmapView`]: the same numeric
//!   content plus names and color-scale limits.
//!
//! Testing notes
//! -------------
//! - Unit tests here cover construction validation, metadata atomicity,
//!   drift attachment, selection/projection, and the export hooks.
//! - The append, convolution, and cleaning methods are thin delegations;
//!   their semantics are tested in `design::append`,
//!   `response::convolve`, and `diagnostics::collinearity`, and
//!   end-to-end in `tests/integration_design_pipeline.rs`.

use crate::basis::{dct_basis, legendre_basis};
use crate::design::append::{self, StackOptions};
use crate::design::errors::{ConfigError, ConfigResult, DesignError, DesignResult, ShapeError};
use crate::design::metadata::{ColumnInfo, ColumnTag, RunSpan};
use crate::diagnostics::collinearity::{self, CleanReport};
use crate::response::convolve::{self, ConvolveOptions};
use ndarray::{Array1, Array2, Axis};

/// The design-matrix container: observations × named regressor columns,
/// with sampling frequency, per-column metadata, and a run partition.
///
/// See the module documentation for invariants and conventions. All
/// transformation methods take `&self` and return a new matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    columns: Vec<Array1<f64>>,
    info: Vec<ColumnInfo>,
    sampling_freq: f64,
    n_rows: usize,
    runs: Vec<RunSpan>,
}

impl DesignMatrix {
    /// Construct an empty matrix (zero rows, zero columns) at the given
    /// sampling frequency.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidSamplingFreq`] when `sampling_freq` is not
    ///   finite and positive.
    pub fn empty(sampling_freq: f64) -> ConfigResult<DesignMatrix> {
        check_sampling_freq(sampling_freq)?;
        Ok(DesignMatrix {
            columns: Vec::new(),
            info: Vec::new(),
            sampling_freq,
            n_rows: 0,
            runs: Vec::new(),
        })
    }

    /// Construct from a 2-D array (rows = observations, columns =
    /// regressors).
    ///
    /// Parameters
    /// ----------
    /// - `data`: N×M numeric array; all values must be finite.
    /// - `sampling_freq`: Sampling frequency in Hz; finite and `> 0`.
    /// - `names`: Optional column names; when `None`, columns are named
    ///   `col0`, `col1`, …. Supplied names must be unique and match the
    ///   column count.
    ///
    /// Returns
    /// -------
    /// `DesignResult<DesignMatrix>`
    ///   A matrix with untagged columns and a single run covering all
    ///   rows.
    ///
    /// Errors
    /// ------
    /// - [`ConfigError::InvalidSamplingFreq`] for a bad frequency.
    /// - [`ShapeError::NameCountMismatch`] when `names` disagrees with the
    ///   column count.
    /// - [`DesignError::DuplicateColumn`] on repeated names.
    /// - [`DesignError::NonFiniteData`] on NaN/±inf entries.
    pub fn from_array(
        data: Array2<f64>,
        sampling_freq: f64,
        names: Option<Vec<String>>,
    ) -> DesignResult<DesignMatrix> {
        let n_cols = data.ncols();
        let names = match names {
            Some(names) => {
                if names.len() != n_cols {
                    return Err(
                        ShapeError::NameCountMismatch { names: names.len(), cols: n_cols }.into()
                    );
                }
                names
            }
            None => (0..n_cols).map(|i| format!("col{}", i)).collect(),
        };

        let columns = names
            .into_iter()
            .zip(data.axis_iter(Axis(1)))
            .map(|(name, col)| (name, col.to_owned()))
            .collect();
        DesignMatrix::from_columns(columns, sampling_freq)
    }

    /// Construct from named columns.
    ///
    /// All columns must share one length; names must be unique; values
    /// must be finite. Columns carry no tags — callers attach semantics
    /// through the transformation methods or the I/O layer.
    ///
    /// # Errors
    /// As [`DesignMatrix::from_array`], plus
    /// [`ShapeError::ColumnLengthMismatch`] when lengths disagree.
    pub fn from_columns(
        columns: Vec<(String, Array1<f64>)>,
        sampling_freq: f64,
    ) -> DesignResult<DesignMatrix> {
        let mut matrix = DesignMatrix::empty(sampling_freq)?;
        for (name, data) in columns {
            matrix.push_column(ColumnInfo::new(name), data)?;
        }
        Ok(matrix)
    }

    /// Assemble a matrix from pre-validated parts. Callers must uphold
    /// every container invariant; this is the internal constructor used
    /// by the append/convolution/cleaning engines.
    pub(crate) fn from_parts(
        columns: Vec<Array1<f64>>,
        info: Vec<ColumnInfo>,
        sampling_freq: f64,
        n_rows: usize,
        runs: Vec<RunSpan>,
    ) -> DesignMatrix {
        debug_assert_eq!(columns.len(), info.len());
        debug_assert!(columns.iter().all(|c| c.len() == n_rows));
        DesignMatrix { columns, info, sampling_freq, n_rows, runs }
    }

    /// Append one column with its metadata, atomically. The first column
    /// pushed into an empty matrix fixes the row count and establishes a
    /// single run.
    pub(crate) fn push_column(&mut self, info: ColumnInfo, data: Array1<f64>) -> DesignResult<()> {
        if self.column_index(&info.name).is_some() {
            return Err(DesignError::DuplicateColumn { name: info.name });
        }
        if self.columns.is_empty() && self.n_rows == 0 {
            self.n_rows = data.len();
            if self.n_rows > 0 {
                self.runs = vec![RunSpan::new(0, self.n_rows)];
            }
        } else if data.len() != self.n_rows {
            return Err(ShapeError::ColumnLengthMismatch {
                name: info.name,
                expected: self.n_rows,
                actual: data.len(),
            }
            .into());
        }
        for (row, &value) in data.iter().enumerate() {
            if !value.is_finite() {
                return Err(DesignError::NonFiniteData { column: info.name, row, value });
            }
        }
        self.columns.push(data);
        self.info.push(info);
        Ok(())
    }

    /// Overwrite the row count and run partition after an append. Callers
    /// guarantee consistency with the stored columns; the row count
    /// parameter keeps column-free results well-formed.
    pub(crate) fn set_runs(&mut self, n_rows: usize, runs: Vec<RunSpan>) {
        debug_assert!(self.columns.iter().all(|c| c.len() == n_rows));
        self.n_rows = n_rows;
        self.runs = runs;
    }

    // ---- Accessors --------------------------------------------------------

    /// Number of observations (rows).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of regressor columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Whether the matrix holds no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Sampling frequency in Hz.
    pub fn sampling_freq(&self) -> f64 {
        self.sampling_freq
    }

    /// Column names, in matrix order.
    pub fn names(&self) -> Vec<&str> {
        self.info.iter().map(|i| i.name.as_str()).collect()
    }

    /// Index of the named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.info.iter().position(|i| i.name == name)
    }

    /// Data of the named column, if present.
    pub fn column(&self, name: &str) -> Option<&Array1<f64>> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Data of the column at `index`. Panics on out-of-range indices, as
    /// slices do.
    pub fn column_at(&self, index: usize) -> &Array1<f64> {
        &self.columns[index]
    }

    /// Metadata of the named column, if present.
    pub fn info(&self, name: &str) -> Option<&ColumnInfo> {
        self.column_index(name).map(|i| &self.info[i])
    }

    /// Metadata side-table, in matrix order.
    pub fn infos(&self) -> &[ColumnInfo] {
        &self.info
    }

    /// Run partition of the rows. A fresh matrix is a single run; the
    /// list grows through [`row_stack`](DesignMatrix::row_stack).
    pub fn runs(&self) -> &[RunSpan] {
        &self.runs
    }

    /// Names of columns tagged as conditions of interest.
    pub fn condition_names(&self) -> Vec<&str> {
        self.info
            .iter()
            .filter(|i| i.has_tag(ColumnTag::Condition))
            .map(|i| i.name.as_str())
            .collect()
    }

    // ---- Projection -------------------------------------------------------

    /// A new matrix holding only the named columns, in the given order,
    /// with metadata carried along. The row count and run partition are
    /// preserved even when `names` is empty.
    ///
    /// # Errors
    /// - [`DesignError::UnknownColumn`] when any name is absent.
    pub fn select(&self, names: &[&str]) -> DesignResult<DesignMatrix> {
        let mut columns = Vec::with_capacity(names.len());
        let mut info = Vec::with_capacity(names.len());
        for &name in names {
            let idx = self
                .column_index(name)
                .ok_or_else(|| DesignError::UnknownColumn { name: name.to_string() })?;
            columns.push(self.columns[idx].clone());
            info.push(self.info[idx].clone());
        }
        Ok(DesignMatrix::from_parts(
            columns,
            info,
            self.sampling_freq,
            self.n_rows,
            self.runs.clone(),
        ))
    }

    /// A new matrix without the named column; its metadata entry is
    /// removed with it.
    ///
    /// # Errors
    /// - [`DesignError::UnknownColumn`] when the name is absent.
    pub fn drop_column(&self, name: &str) -> DesignResult<DesignMatrix> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DesignError::UnknownColumn { name: name.to_string() })?;
        let mut columns = self.columns.clone();
        let mut info = self.info.clone();
        columns.remove(idx);
        info.remove(idx);
        Ok(DesignMatrix::from_parts(
            columns,
            info,
            self.sampling_freq,
            self.n_rows,
            self.runs.clone(),
        ))
    }

    // ---- Drift bases ------------------------------------------------------

    /// A new matrix with discrete Legendre drift columns of orders
    /// `0..=order` appended, named `poly{k}` and tagged `Polynomial(k)`.
    ///
    /// # Errors
    /// - [`ConfigError::OrderExceedsRows`] /
    ///   [`ConfigError::EmptyBasisDomain`] from the generator.
    /// - [`DesignError::DuplicateColumn`] when a `poly{k}` column already
    ///   exists.
    pub fn with_polynomial_drift(&self, order: usize) -> DesignResult<DesignMatrix> {
        let basis = legendre_basis(self.n_rows, order, true)?;
        let mut matrix = self.clone();
        for (k, column) in basis.into_iter().enumerate() {
            let info = ColumnInfo::new(format!("poly{}", k)).with_tag(ColumnTag::Polynomial(k));
            matrix.push_column(info, column)?;
        }
        Ok(matrix)
    }

    /// Shortcut for an order-0 (intercept-only) drift.
    pub fn with_intercept(&self) -> DesignResult<DesignMatrix> {
        self.with_polynomial_drift(0)
    }

    /// A new matrix with a DCT-II high-pass basis appended, named
    /// `dct{k}` (k ≥ 1) and tagged `DctBasis`. A cutoff long enough to
    /// produce zero columns returns the matrix unchanged (see
    /// [`dct_basis`] for the policy).
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFilterDuration`] and friends from the
    ///   generator; [`DesignError::DuplicateColumn`] on name collisions.
    pub fn with_dct_basis(&self, duration_secs: f64) -> DesignResult<DesignMatrix> {
        let basis = dct_basis(self.n_rows, self.sampling_freq, duration_secs)?;
        let mut matrix = self.clone();
        for (i, column) in basis.into_iter().enumerate() {
            let info = ColumnInfo::new(format!("dct{}", i + 1)).with_tag(ColumnTag::DctBasis);
            matrix.push_column(info, column)?;
        }
        Ok(matrix)
    }

    // ---- Convolution ------------------------------------------------------

    /// A new matrix with every non-polynomial column convolved per
    /// `options` (see [`convolve::convolve_columns`] for the alignment
    /// and cross-product rules).
    pub fn convolved(&self, options: &ConvolveOptions) -> DesignResult<DesignMatrix> {
        convolve::convolve_columns(self, options)
    }

    /// Convolve with the canonical HRF at this matrix's sampling rate.
    pub fn convolved_with_hrf(&self) -> DesignResult<DesignMatrix> {
        self.convolved(&ConvolveOptions::default())
    }

    // ---- Append / stacking ------------------------------------------------

    /// Stack `other` below `self`, keeping polynomial and selected
    /// columns run-specific (see [`append::row_stack`]).
    pub fn row_stack(&self, other: &DesignMatrix, options: &StackOptions) -> DesignResult<DesignMatrix> {
        append::row_stack(self, other, options)
    }

    /// Join the columns of `other` beside `self` (see
    /// [`append::column_join`]).
    pub fn column_join(&self, other: &DesignMatrix) -> DesignResult<DesignMatrix> {
        append::column_join(self, other)
    }

    // ---- Diagnostics ------------------------------------------------------

    /// Remove near-duplicate columns above the absolute-correlation
    /// threshold, earlier columns preferred (see
    /// [`collinearity::decollinearize`]).
    pub fn decollinearized(&self, threshold: f64) -> DesignResult<(DesignMatrix, CleanReport)> {
        collinearity::decollinearize(self, threshold)
    }

    // ---- Export hooks -----------------------------------------------------

    /// The numeric content as an N×M array in matrix column order; this
    /// is the contract consumed by the downstream regression component.
    pub fn to_array(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.n_rows, self.columns.len()));
        for (j, column) in self.columns.iter().enumerate() {
            out.column_mut(j).assign(column);
        }
        out
    }

    /// A render-ready view for the plotting collaborator: numeric content,
    /// column names, and color-scale limits defaulting to the data range.
    pub fn heatmap(&self) -> HeatmapView {
        let values = self.to_array();
        let mut vmin = f64::INFINITY;
        let mut vmax = f64::NEG_INFINITY;
        for &v in values.iter() {
            vmin = vmin.min(v);
            vmax = vmax.max(v);
        }
        if !vmin.is_finite() || !vmax.is_finite() {
            // Empty matrix: pin the scale to a degenerate but valid range.
            vmin = 0.0;
            vmax = 0.0;
        }
        HeatmapView {
            values,
            names: self.info.iter().map(|i| i.name.clone()).collect(),
            vmin,
            vmax,
        }
    }
}

/// Render-ready content for an external heatmap renderer.
///
/// Fields
/// ------
/// - `values`: N×M numeric content in matrix column order.
/// - `names`: Column names, parallel to the value columns.
/// - `vmin` / `vmax`: Color-scale limits; default to the data range and
///   can be overridden via [`HeatmapView::with_limits`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapView {
    pub values: Array2<f64>,
    pub names: Vec<String>,
    pub vmin: f64,
    pub vmax: f64,
}

impl HeatmapView {
    /// Override the color-scale limits.
    pub fn with_limits(mut self, vmin: f64, vmax: f64) -> HeatmapView {
        self.vmin = vmin;
        self.vmax = vmax;
        self
    }
}

/// Shared guard: sampling frequencies must be finite and strictly
/// positive.
pub(crate) fn check_sampling_freq(value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidSamplingFreq { value });
    }
    Ok(())
}
