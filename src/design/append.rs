//! design::append — row-stacking and column-joining of design matrices.
//!
//! Purpose
//! -------
//! Merge two design matrices either vertically (stacking runs or
//! subjects) or horizontally (joining conditions with covariates). The
//! row-stack is the algorithmic core of multi-run workflows: trend and
//! other per-run nuisance regressors must stay separately estimable per
//! run, so they are renamed run-specific and zero-filled outside their
//! owning run, while condition regressors are unified into single shared
//! columns spanning the whole stack.
//!
//! Key behaviors
//! -------------
//! - [`row_stack`]: concatenates rows. Polynomial-tagged columns are
//!   per-run by default; [`StackOptions::unique_cols`] extends per-run
//!   treatment to any named columns (literal, `"x*"` prefix, or `"*x"`
//!   suffix patterns). Everything else is unified by name, zero-filled
//!   where an input lacks the column.
//! - [`column_join`]: concatenates columns; name collisions are resolved
//!   by suffixing both sides with the input position index (`_0` / `_1`).
//! - Both operations are pure: inputs are never mutated.
//!
//! Invariants & assumptions
//! ------------------------
//! - Sampling frequencies must match exactly for either operation;
//!   column-join additionally requires equal row counts.
//! - Row-stacking is idempotent under repeated application with the same
//!   selector: a column that is already per-run (its metadata carries a
//!   run index) is never re-suffixed, so stacking N copies of a matrix
//!   yields exactly N run-specific variants of every selected or
//!   polynomial column.
//! - Result column order after a row-stack: shared columns first (left
//!   input's order, then right-only), then per-run selected columns, then
//!   per-run polynomial columns — grouped by base column, then by run.
//! - No column is ever left ragged or absent: missing data is zero, so
//!   every output column spans the full stacked row range.
//!
//! Conventions
//! -----------
//! - Per-run names are `{base}_run{i}` where `i` indexes the result's run
//!   list. Re-stacked inputs have their run indices re-based and their
//!   suffixes rewritten to stay aligned with the merged list.
//! - A column created per-run *before* any stacking (possible when a
//!   multi-run matrix gains a fresh drift basis) is attributed to its
//!   input's first run.
//! - Column-join keeps the left input's run partition; joining is meant
//!   for same-structure operands (conditions beside covariates of the
//!   same session).
//!
//! Testing notes
//! -------------
//! - Unit tests here cover shared/unique/polynomial classification,
//!   zero-filling, ordering, selector-driven uniqueness, idempotence
//!   across three stacked copies, collision suffixing in joins, and every
//!   shape-error branch.

use crate::design::errors::{DesignResult, ShapeError};
use crate::design::matrix::DesignMatrix;
use crate::design::metadata::{ColumnInfo, ColumnSelector, ColumnTag, RunSpan};
use ndarray::Array1;

/// Per-call configuration for [`row_stack`].
///
/// `unique_cols` selects additional columns (beyond polynomial-tagged
/// ones, which are always per-run) for run-specific treatment. The
/// default selects nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackOptions {
    pub unique_cols: ColumnSelector,
}

impl StackOptions {
    /// Per-run treatment for columns matching the given patterns (see
    /// [`ColumnSelector::new`]).
    pub fn unique<S: AsRef<str>>(patterns: &[S]) -> StackOptions {
        StackOptions { unique_cols: ColumnSelector::new(patterns) }
    }
}

/// Which input a per-run column's data came from.
#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// A per-run output column before zero-filled materialization.
struct PerRunEntry {
    base: String,
    name: String,
    tags: Vec<ColumnTag>,
    run: usize,
    side: Side,
    data: Array1<f64>,
}

/// Stack `right` below `left`.
///
/// Parameters
/// ----------
/// - `left`, `right`: Operands; sampling frequencies must match.
/// - `options`: See [`StackOptions`].
///
/// Returns
/// -------
/// `DesignResult<DesignMatrix>`
///   The stacked matrix with `left.n_rows() + right.n_rows()` rows, the
///   column order documented in the module header, and a run list of
///   `left`'s runs followed by `right`'s runs re-based below them.
///
/// Errors
/// ------
/// - [`ShapeError::SamplingFreqMismatch`] when the frequencies differ.
/// - Name-collision and validation failures from container assembly are
///   surfaced unchanged; they indicate pathological pre-existing names
///   (e.g. a shared column literally named like a per-run variant).
pub fn row_stack(
    left: &DesignMatrix,
    right: &DesignMatrix,
    options: &StackOptions,
) -> DesignResult<DesignMatrix> {
    if left.sampling_freq() != right.sampling_freq() {
        return Err(ShapeError::SamplingFreqMismatch {
            left: left.sampling_freq(),
            right: right.sampling_freq(),
        }
        .into());
    }

    let n_left = left.n_rows();
    let n_right = right.n_rows();
    let n_total = n_left + n_right;
    let run_offset = left.runs().len();

    // Classify each input's columns once, against the same selector.
    let mut shared_names: Vec<String> = Vec::new();
    let mut unique_entries: Vec<PerRunEntry> = Vec::new();
    let mut poly_entries: Vec<PerRunEntry> = Vec::new();

    for (side, matrix, first_run) in
        [(Side::Left, left, 0), (Side::Right, right, run_offset)]
    {
        for (info, data) in matrix.infos().iter().zip(column_iter(matrix)) {
            let per_run = info.run.is_some()
                || info.is_polynomial()
                || options.unique_cols.matches(&info.name);
            if !per_run {
                if !shared_names.iter().any(|n| n == &info.name) {
                    shared_names.push(info.name.clone());
                }
                continue;
            }

            let (base, run, name) = match info.run {
                // Already per-run: re-base the run index and rewrite the
                // suffix so names track the merged run list.
                Some(old_run) => {
                    let base = strip_run_suffix(&info.name, old_run);
                    let run = match side {
                        Side::Left => old_run,
                        Side::Right => old_run + run_offset,
                    };
                    let name = if base == info.name {
                        // No recognized suffix: keep the caller's name.
                        info.name.clone()
                    } else {
                        format!("{}_run{}", base, run)
                    };
                    (base, run, name)
                }
                // Fresh per-run column: attribute to the input's first run.
                None => {
                    let run = first_run;
                    (info.name.clone(), run, format!("{}_run{}", info.name, run))
                }
            };

            let mut tags = info.tags.clone();
            if !tags.contains(&ColumnTag::RunIndex) {
                tags.push(ColumnTag::RunIndex);
            }
            let entry = PerRunEntry {
                base,
                name,
                tags,
                run,
                side,
                data: data.clone(),
            };
            if info.is_polynomial() {
                poly_entries.push(entry);
            } else {
                unique_entries.push(entry);
            }
        }
    }

    let mut result = DesignMatrix::empty(left.sampling_freq())?;

    // Shared columns: unified by name, zero-filled where an input lacks
    // the column.
    for name in &shared_names {
        let mut column = Array1::zeros(n_total);
        if let Some(data) = left.column(name) {
            if left.info(name).map(|i| i.run.is_none()).unwrap_or(false) {
                column.slice_mut(ndarray::s![..n_left]).assign(data);
            }
        }
        if let Some(data) = right.column(name) {
            if right.info(name).map(|i| i.run.is_none()).unwrap_or(false) {
                column.slice_mut(ndarray::s![n_left..]).assign(data);
            }
        }
        let info = left
            .info(name)
            .or_else(|| right.info(name))
            .cloned()
            .unwrap_or_else(|| ColumnInfo::new(name.clone()));
        result.push_column(ColumnInfo { name: name.clone(), tags: info.tags, run: None }, column)?;
    }

    // Per-run columns: selected (non-polynomial) first, then polynomial,
    // each grouped by base column and ordered by run within the group.
    for entries in [unique_entries, poly_entries] {
        for entry in group_by_base(entries) {
            let mut column = Array1::zeros(n_total);
            match entry.side {
                Side::Left => column.slice_mut(ndarray::s![..n_left]).assign(&entry.data),
                Side::Right => column.slice_mut(ndarray::s![n_left..]).assign(&entry.data),
            }
            let info =
                ColumnInfo { name: entry.name, tags: entry.tags, run: Some(entry.run) };
            result.push_column(info, column)?;
        }
    }

    let mut runs: Vec<RunSpan> = left.runs().to_vec();
    runs.extend(right.runs().iter().map(|span| span.shifted(n_left)));
    result.set_runs(n_total, runs);
    Ok(result)
}

/// Join the columns of `right` beside `left`.
///
/// Requires equal row counts and equal sampling frequencies. Columns
/// keep their metadata; a name present in both inputs is renamed on both
/// sides with the input position index (`{name}_0`, `{name}_1`). The
/// result keeps `left`'s run partition.
///
/// # Errors
/// - [`ShapeError::RowCountMismatch`] when row counts differ.
/// - [`ShapeError::SamplingFreqMismatch`] when frequencies differ.
pub fn column_join(left: &DesignMatrix, right: &DesignMatrix) -> DesignResult<DesignMatrix> {
    if left.sampling_freq() != right.sampling_freq() {
        return Err(ShapeError::SamplingFreqMismatch {
            left: left.sampling_freq(),
            right: right.sampling_freq(),
        }
        .into());
    }
    if left.n_rows() != right.n_rows() {
        return Err(
            ShapeError::RowCountMismatch { left: left.n_rows(), right: right.n_rows() }.into()
        );
    }

    let mut result = DesignMatrix::empty(left.sampling_freq())?;
    for (position, matrix, other) in [(0usize, left, right), (1usize, right, left)] {
        for (info, data) in matrix.infos().iter().zip(column_iter(matrix)) {
            let name = if other.column_index(&info.name).is_some() {
                format!("{}_{}", info.name, position)
            } else {
                info.name.clone()
            };
            result.push_column(
                ColumnInfo { name, tags: info.tags.clone(), run: info.run },
                data.clone(),
            )?;
        }
    }
    result.set_runs(left.n_rows(), left.runs().to_vec());
    Ok(result)
}

/// Iterate a matrix's columns in order.
fn column_iter(matrix: &DesignMatrix) -> impl Iterator<Item = &Array1<f64>> {
    (0..matrix.n_cols()).map(move |i| matrix.column_at(i))
}

/// Strip a `_run{i}` suffix matching the column's recorded run index, if
/// present; otherwise return the name unchanged.
fn strip_run_suffix(name: &str, run: usize) -> String {
    let suffix = format!("_run{}", run);
    name.strip_suffix(suffix.as_str()).unwrap_or(name).to_string()
}

/// Order per-run entries by base column (first appearance), then by run.
fn group_by_base(entries: Vec<PerRunEntry>) -> Vec<PerRunEntry> {
    let mut bases: Vec<String> = Vec::new();
    for entry in &entries {
        if !bases.iter().any(|b| b == &entry.base) {
            bases.push(entry.base.clone());
        }
    }
    let mut ordered = Vec::with_capacity(entries.len());
    let mut remaining = entries;
    for base in bases {
        let mut group: Vec<PerRunEntry> = Vec::new();
        let mut rest = Vec::new();
        for entry in remaining {
            if entry.base == base {
                group.push(entry);
            } else {
                rest.push(entry);
            }
        }
        remaining = rest;
        group.sort_by_key(|e| e.run);
        ordered.extend(group);
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::errors::DesignError;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Shared-column unification and zero-filling of one-sided columns.
    // - Per-run renaming and zero-filling for polynomial and selected
    //   columns, including the documented column ordering.
    // - Idempotence across three stacked copies.
    // - Column-join collision suffixing, metadata carriage, and both
    //   shape-error branches.
    // -------------------------------------------------------------------------

    fn run_matrix(values: [f64; 3]) -> DesignMatrix {
        DesignMatrix::from_columns(
            vec![("faces".to_string(), Array1::from_iter(values))],
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn shared_columns_concatenate_and_polynomials_split_per_run() {
        let a = run_matrix([1.0, 0.0, 1.0]).with_intercept().unwrap();
        let b = run_matrix([0.0, 1.0, 0.0]).with_intercept().unwrap();

        let stacked = a.row_stack(&b, &StackOptions::default()).unwrap();

        assert_eq!(stacked.n_rows(), 6);
        assert_eq!(stacked.names(), vec!["faces", "poly0_run0", "poly0_run1"]);
        assert_eq!(
            stacked.column("faces").unwrap(),
            &array![1.0, 0.0, 1.0, 0.0, 1.0, 0.0]
        );

        // Per-run intercepts: own-run values, zero elsewhere.
        let half = 1.0 / 3.0_f64.sqrt();
        let run0 = stacked.column("poly0_run0").unwrap();
        let run1 = stacked.column("poly0_run1").unwrap();
        for t in 0..3 {
            assert!((run0[t] - half).abs() < 1e-12);
            assert_eq!(run0[t + 3], 0.0);
            assert_eq!(run1[t], 0.0);
            assert!((run1[t + 3] - half).abs() < 1e-12);
        }

        // Metadata: per-run columns carry RunIndex and their run.
        let info = stacked.info("poly0_run1").unwrap();
        assert!(info.has_tag(ColumnTag::RunIndex));
        assert!(info.is_polynomial());
        assert_eq!(info.run, Some(1));

        // Runs re-based.
        assert_eq!(stacked.runs(), &[RunSpan::new(0, 3), RunSpan::new(3, 6)]);
    }

    #[test]
    fn selector_extends_per_run_treatment_to_named_columns() {
        let motion = array![0.1, 0.2, 0.3];
        let a = run_matrix([1.0, 0.0, 0.0])
            .column_join(
                &DesignMatrix::from_columns(
                    vec![("motion_x".to_string(), motion.clone())],
                    1.0,
                )
                .unwrap(),
            )
            .unwrap();
        let b = a.clone();

        let stacked = a.row_stack(&b, &StackOptions::unique(&["motion*"])).unwrap();

        // Ordering: shared first, then per-run selected, then per-run
        // polynomial (none here).
        assert_eq!(stacked.names(), vec!["faces", "motion_x_run0", "motion_x_run1"]);
        assert_eq!(
            stacked.column("motion_x_run0").unwrap(),
            &array![0.1, 0.2, 0.3, 0.0, 0.0, 0.0]
        );
        assert_eq!(
            stacked.column("motion_x_run1").unwrap(),
            &array![0.0, 0.0, 0.0, 0.1, 0.2, 0.3]
        );
    }

    #[test]
    fn repeated_stacking_yields_one_variant_per_run() {
        let base = run_matrix([1.0, 0.0, 1.0]).with_intercept().unwrap();
        let opts = StackOptions::default();

        let stacked = base
            .row_stack(&base, &opts)
            .unwrap()
            .row_stack(&base, &opts)
            .unwrap();

        assert_eq!(stacked.n_rows(), 9);
        assert_eq!(stacked.runs().len(), 3);
        assert_eq!(
            stacked.names(),
            vec!["faces", "poly0_run0", "poly0_run1", "poly0_run2"]
        );
        // No double suffixing on the already per-run columns.
        assert!(stacked.names().iter().all(|n| !n.contains("_run0_run")));

        // Shared column has length 3× the original.
        assert_eq!(stacked.column("faces").unwrap().len(), 9);

        // Each per-run variant is non-zero only inside its own run.
        for (i, span) in stacked.runs().iter().enumerate() {
            let column = stacked.column(&format!("poly0_run{}", i)).unwrap();
            for t in 0..9 {
                let inside = t >= span.start && t < span.end;
                assert_eq!(column[t] != 0.0, inside, "run {i}, row {t}");
            }
        }
    }

    #[test]
    fn one_sided_shared_columns_are_zero_filled_not_absent() {
        let a = run_matrix([1.0, 0.0, 1.0]);
        let b = run_matrix([0.0, 1.0, 0.0])
            .column_join(
                &DesignMatrix::from_columns(
                    vec![("houses".to_string(), array![1.0, 0.0, 1.0])],
                    1.0,
                )
                .unwrap(),
            )
            .unwrap();

        let stacked = a.row_stack(&b, &StackOptions::default()).unwrap();
        assert_eq!(stacked.names(), vec!["faces", "houses"]);
        assert_eq!(
            stacked.column("houses").unwrap(),
            &array![0.0, 0.0, 0.0, 1.0, 0.0, 1.0]
        );
    }

    #[test]
    fn mismatched_sampling_frequencies_fail_row_stack() {
        let a = run_matrix([1.0, 0.0, 1.0]);
        let b = DesignMatrix::from_columns(
            vec![("faces".to_string(), array![1.0, 0.0, 1.0])],
            2.0,
        )
        .unwrap();
        match a.row_stack(&b, &StackOptions::default()) {
            Err(DesignError::Shape(ShapeError::SamplingFreqMismatch { left, right })) => {
                assert_eq!((left, right), (1.0, 2.0));
            }
            other => panic!("expected SamplingFreqMismatch, got {other:?}"),
        }
    }

    #[test]
    fn column_join_preserves_both_column_sets_and_suffixes_collisions() {
        let a = run_matrix([1.0, 0.0, 1.0]);
        let b = DesignMatrix::from_columns(
            vec![
                ("faces".to_string(), array![9.0, 9.0, 9.0]),
                ("age".to_string(), array![25.0, 30.0, 35.0]),
            ],
            1.0,
        )
        .unwrap();

        let joined = a.column_join(&b).unwrap();
        assert_eq!(joined.names(), vec!["faces_0", "faces_1", "age"]);
        assert_eq!(joined.column("faces_0").unwrap(), &array![1.0, 0.0, 1.0]);
        assert_eq!(joined.column("faces_1").unwrap(), &array![9.0, 9.0, 9.0]);
        assert_eq!(joined.runs(), a.runs());
    }

    #[test]
    fn column_join_shape_errors() {
        let a = run_matrix([1.0, 0.0, 1.0]);
        let short = DesignMatrix::from_columns(
            vec![("age".to_string(), array![25.0, 30.0])],
            1.0,
        )
        .unwrap();
        match a.column_join(&short) {
            Err(DesignError::Shape(ShapeError::RowCountMismatch { left: 3, right: 2 })) => (),
            other => panic!("expected RowCountMismatch, got {other:?}"),
        }

        let other_freq = DesignMatrix::from_columns(
            vec![("age".to_string(), array![25.0, 30.0, 35.0])],
            4.0,
        )
        .unwrap();
        match a.column_join(&other_freq) {
            Err(DesignError::Shape(ShapeError::SamplingFreqMismatch { .. })) => (),
            other => panic!("expected SamplingFreqMismatch, got {other:?}"),
        }
    }
}
