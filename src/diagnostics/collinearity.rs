//! diagnostics::collinearity — near-duplicate column detection and
//! removal.
//!
//! Purpose
//! -------
//! Diagnose and repair collinearity before a design matrix reaches the
//! estimator. Near-duplicate regressors (absolute Pearson correlation at
//! or above a threshold) make coefficients unidentifiable; this module
//! iteratively removes the later-indexed member of each offending pair,
//! so that columns added earlier — typically conditions of interest —
//! always survive.
//!
//! Key behaviors
//! -------------
//! - Pairs are scanned in index order; on each pass the first pair with
//!   `|r| >= threshold` loses its later column, and scanning restarts
//!   until no pair exceeds the threshold.
//! - Zero-variance columns have undefined correlation; they are excluded
//!   from the scan and *flagged* in the report rather than crashing or
//!   being silently dropped.
//! - Cleaning reports rather than errors on collinear input: the only
//!   error path is a threshold outside (0, 1].
//!
//! Conventions
//! -----------
//! - Pearson correlation uses the sample covariance with matching
//!   denominators, so the choice of n vs n−1 cancels.
//! - Variance is compared against a fixed tolerance (`VAR_TOL`) to decide
//!   degeneracy; correlation of a constant column is undefined, not zero.

use crate::design::errors::{ConfigError, DesignResult};
use crate::design::matrix::DesignMatrix;

/// Variance below this is treated as zero (degenerate column).
const VAR_TOL: f64 = 1e-12;

/// Default absolute-correlation threshold for cleaning.
pub const DEFAULT_CORR_THRESHOLD: f64 = 0.95;

/// One removal performed by the cleaner.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedColumn {
    /// Name of the removed column.
    pub name: String,
    /// Earlier-indexed partner that was kept.
    pub kept: String,
    /// The offending correlation.
    pub correlation: f64,
}

/// Outcome report of a cleaning pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    /// Removed columns, in removal order.
    pub dropped: Vec<DroppedColumn>,
    /// Columns with (near-)zero variance, excluded from the scan and
    /// kept in the matrix.
    pub zero_variance: Vec<String>,
}

impl CleanReport {
    /// Whether the cleaner changed nothing and flagged nothing.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.zero_variance.is_empty()
    }
}

/// Remove near-duplicate columns above the absolute-correlation
/// threshold.
///
/// Parameters
/// ----------
/// - `matrix`: Input design matrix; not modified.
/// - `threshold`: Absolute-correlation cutoff in (0, 1]; see
///   [`DEFAULT_CORR_THRESHOLD`].
///
/// Returns
/// -------
/// `DesignResult<(DesignMatrix, CleanReport)>`
///   The reduced matrix (earlier-indexed columns preferred) and a report
///   of removals and zero-variance flags.
///
/// Errors
/// ------
/// - [`ConfigError::InvalidThreshold`] when `threshold` is not in
///   (0, 1].
pub fn decollinearize(
    matrix: &DesignMatrix,
    threshold: f64,
) -> DesignResult<(DesignMatrix, CleanReport)> {
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        return Err(ConfigError::InvalidThreshold { value: threshold }.into());
    }

    let names = matrix.names();
    let n_cols = names.len();
    let mut report = CleanReport::default();

    // Degenerate columns are excluded from the scan up front.
    let mut scannable: Vec<bool> = Vec::with_capacity(n_cols);
    for i in 0..n_cols {
        let degenerate = variance(matrix.column_at(i)) < VAR_TOL;
        if degenerate {
            report.zero_variance.push(names[i].to_string());
        }
        scannable.push(!degenerate);
    }

    let mut alive: Vec<bool> = vec![true; n_cols];
    loop {
        let offender = find_offending_pair(matrix, &alive, &scannable, threshold);
        match offender {
            Some((keep, drop, correlation)) => {
                alive[drop] = false;
                report.dropped.push(DroppedColumn {
                    name: names[drop].to_string(),
                    kept: names[keep].to_string(),
                    correlation,
                });
            }
            None => break,
        }
    }

    let survivors: Vec<&str> =
        names.iter().enumerate().filter(|(i, _)| alive[*i]).map(|(_, n)| *n).collect();
    let reduced = matrix.select(&survivors)?;
    Ok((reduced, report))
}

/// First surviving pair (i < j) with `|r| >= threshold`, if any.
fn find_offending_pair(
    matrix: &DesignMatrix,
    alive: &[bool],
    scannable: &[bool],
    threshold: f64,
) -> Option<(usize, usize, f64)> {
    let n_cols = alive.len();
    for i in 0..n_cols {
        if !alive[i] || !scannable[i] {
            continue;
        }
        for j in (i + 1)..n_cols {
            if !alive[j] || !scannable[j] {
                continue;
            }
            let r = pearson(matrix.column_at(i), matrix.column_at(j));
            if r.abs() >= threshold {
                return Some((i, j, r));
            }
        }
    }
    None
}

/// Sample variance (divide-by-n); only compared against `VAR_TOL`.
fn variance(x: &ndarray::Array1<f64>) -> f64 {
    let n = x.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let mean = x.sum() / n;
    x.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n
}

/// Pearson correlation of two equal-length, non-degenerate columns.
fn pearson(x: &ndarray::Array1<f64>, y: &ndarray::Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.sum() / n;
    let mean_y = y.sum() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let da = a - mean_x;
        let db = b - mean_y;
        cov += da * db;
        var_x += da * da;
        var_y += db * db;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}
