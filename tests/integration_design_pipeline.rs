//! Integration tests for the design-matrix construction pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end workflow: from onset files on disk, through
//!   HRF convolution and drift bases, to run stacking, covariate joining,
//!   collinearity cleaning, and the final estimator-ready array.
//! - Exercise realistic multi-run regimes (distinct event timings per
//!   run, per-run drift regressors, duplicated and degenerate
//!   covariates) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `io::onset` / `io::covariate`:
//!   - `read_onsets` and `read_covariates` against real temporary files,
//!     in both seconds and samples units.
//! - `response`:
//!   - Canonical-HRF convolution of condition columns with drift
//!     pass-through.
//! - `basis`:
//!   - Polynomial drift appended at read time and the DCT high-pass
//!     basis at the default cutoff.
//! - `design::append`:
//!   - Run stacking with per-run polynomial variants, repeated stacking
//!     across three runs, and covariate joining.
//! - `diagnostics`:
//!   - Duplicate-column removal and zero-variance flagging on the joined
//!     matrix.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of individual building blocks (basis
//!   orthogonality, parser error branches, selector matching) — these
//!   are covered by unit tests in their own modules.
//! - Estimation itself — the crate hands off a numeric array and stops
//!   there.
use std::io::Write;

use approx::assert_relative_eq;
use fmri_design::{
    basis::DEFAULT_HIGHPASS_SECS,
    design::{ColumnTag, DesignMatrix, StackOptions},
    io::{OnsetOptions, OnsetUnit, read_covariates, read_onsets},
};
use tempfile::NamedTempFile;

/// Sampling frequency used throughout: one sample every 2 seconds.
const FS: f64 = 0.5;

/// Rows per run (120 seconds at `FS`).
const RUN_LEN: usize = 60;

/// Purpose
/// -------
/// Persist file content to a named temporary file so the reader APIs can
/// be exercised against a real path.
///
/// Returns
/// -------
/// - The open `NamedTempFile`; keeping it alive keeps the path valid for
///   the duration of the test.
///
/// Invariants
/// ----------
/// - Panics on I/O failure; that is a test-environment error, not a
///   behavior under test.
fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary file creation should succeed");
    file.write_all(content.as_bytes()).expect("writing test content should succeed");
    file
}

/// Purpose
/// -------
/// Build one run's design matrix the way the interactive workflow does:
/// read an onset file, convolve the condition indicators with the
/// canonical HRF, and carry a linear polynomial drift.
///
/// Parameters
/// ----------
/// - `onsets`: Onset-file content, `(onset, duration, label)` lines in
///   seconds.
///
/// Returns
/// -------
/// - A `RUN_LEN`-row matrix with convolved condition columns followed by
///   `poly0` and `poly1`.
///
/// Invariants
/// ----------
/// - Panics if any pipeline stage fails; the error paths are covered by
///   unit tests.
fn run_matrix(onsets: &str) -> DesignMatrix {
    let file = write_temp(onsets);
    read_onsets(file.path(), &OnsetOptions::new(FS, RUN_LEN).with_drift(1))
        .expect("onset file should parse")
        .convolved_with_hrf()
        .expect("canonical HRF should fit a 60-row run")
}

/// Purpose
/// -------
/// Generate a headered covariate table spanning both stacked runs,
/// including a duplicated column and a constant column so the cleaner
/// has real work to do.
///
/// Returns
/// -------
/// - File content with columns `motion_x`, `motion_y`, `motion_x_copy`
///   (identical to `motion_x`), and `head_ok` (constant 1).
fn covariate_content(n_rows: usize) -> String {
    let mut content = String::from("motion_x motion_y motion_x_copy head_ok\n");
    for t in 0..n_rows {
        let x = (0.05 * t as f64).sin();
        let y = 0.1 * ((t * 7 % 13) as f64) - 0.6;
        content.push_str(&format!("{x} {y} {x} 1.0\n"));
    }
    content
}

#[test]
// Purpose
// -------
// Ensure the full public workflow — two onset files through convolution,
// drift, stacking, covariate joining, and cleaning — produces a
// correctly shaped, correctly partitioned estimator array without
// panicking.
//
// Given
// -----
// - Two 60-row runs at 0.5 Hz with different event timings for the same
//   two conditions (`faces`, `houses`), each read from a real file with
//   a linear drift appended and convolved with the canonical HRF.
// - A 120-row covariate table containing a duplicated motion regressor
//   and a constant column.
// - Stacking with default options and cleaning at threshold 0.999.
//
// Expect
// ------
// - The stacked matrix has 120 rows, two run spans, shared condition
//   columns first, and per-run polynomial variants zero-filled outside
//   their own run.
// - Joining the covariates preserves the run partition.
// - The cleaner drops exactly the perfectly correlated pair members
//   (`poly0_run1` against `poly0_run0`, `motion_x_copy` against
//   `motion_x`), flags `head_ok` as zero-variance but keeps it, and the
//   exported array matches the cleaned column count.
fn full_pipeline_from_onset_files_to_estimator_array() {
    let run1 = run_matrix("0 10 faces\n40 10 houses\n80 10 faces\n");
    let run2 = run_matrix("20 10 houses\n60 10 faces\n");

    let stacked = run1.row_stack(&run2, &StackOptions::default()).expect("runs should stack");
    assert_eq!(stacked.n_rows(), 2 * RUN_LEN);
    assert_eq!(stacked.runs().len(), 2);
    assert_eq!(
        stacked.names(),
        vec!["faces", "houses", "poly0_run0", "poly0_run1", "poly1_run0", "poly1_run1"]
    );

    // Conditions stay shared: each run's events show up in its own rows.
    let faces = stacked.column("faces").expect("faces column");
    assert!(faces.slice(ndarray::s![..RUN_LEN]).iter().any(|&v| v > 0.0));
    assert!(faces.slice(ndarray::s![RUN_LEN..]).iter().any(|&v| v > 0.0));
    assert!(stacked.info("faces").expect("faces info").has_tag(ColumnTag::Convolved));

    // Per-run drift: zero outside the owning run, untouched inside.
    let poly0_run0 = stacked.column("poly0_run0").expect("poly0_run0 column");
    assert!(poly0_run0.slice(ndarray::s![RUN_LEN..]).iter().all(|&v| v == 0.0));
    assert!(poly0_run0.slice(ndarray::s![..RUN_LEN]).iter().all(|&v| v > 0.0));
    assert_eq!(stacked.info("poly0_run0").expect("info").run, Some(0));
    assert_eq!(stacked.info("poly0_run1").expect("info").run, Some(1));

    // Join motion covariates read from a second real file.
    let cov_file = write_temp(&covariate_content(2 * RUN_LEN));
    let covariates = read_covariates(cov_file.path(), FS).expect("covariate file should parse");
    let joined = stacked.column_join(&covariates).expect("covariates should join");
    assert_eq!(joined.runs().len(), 2);
    assert_eq!(joined.n_cols(), stacked.n_cols() + 4);

    // Clean: the two exact duplicates go, the constant column is flagged.
    let (clean, report) = joined.decollinearized(0.999).expect("threshold is admissible");

    assert_eq!(report.dropped.len(), 2);
    let poly_drop = &report.dropped[0];
    assert_eq!(poly_drop.name, "poly0_run1");
    assert_eq!(poly_drop.kept, "poly0_run0");
    assert_relative_eq!(poly_drop.correlation, -1.0, epsilon = 1e-9);
    let motion_drop = &report.dropped[1];
    assert_eq!(motion_drop.name, "motion_x_copy");
    assert_eq!(motion_drop.kept, "motion_x");
    assert_relative_eq!(motion_drop.correlation, 1.0, epsilon = 1e-9);

    assert_eq!(report.zero_variance, vec!["head_ok".to_string()]);
    assert!(clean.column("head_ok").is_some(), "flagged columns are kept, not dropped");
    assert_eq!(clean.n_cols(), joined.n_cols() - 2);

    // Export: plain array plus a render-ready heatmap view.
    let x = clean.to_array();
    assert_eq!(x.nrows(), 2 * RUN_LEN);
    assert_eq!(x.ncols(), clean.n_cols());
    assert!(x.iter().all(|v| v.is_finite()));

    let view = clean.heatmap();
    assert_eq!(view.names.len(), clean.n_cols());
    assert_eq!(view.values.dim(), (2 * RUN_LEN, clean.n_cols()));
    assert!(view.vmin <= view.vmax);
}

#[test]
// Purpose
// -------
// Verify that sample-unit onsets, event sorting, and the DCT high-pass
// basis compose with convolution in one pass.
//
// Given
// -----
// - A 60-row run at 0.5 Hz whose onset file is expressed in sample
//   indices, read with the sort flag set.
// - Canonical-HRF convolution followed by the DCT basis at the default
//   180 s cutoff.
//
// Expect
// ------
// - Label order follows sorted onsets (`go` before `nogo`).
// - At 120 s of data and a 180 s cutoff exactly one DCT column is
//   appended, named `dct1`, tagged `DctBasis`, and unit-norm.
// - The DCT column is not convolved.
fn sample_unit_onsets_with_dct_highpass() {
    let file = write_temp("20 5 nogo\n5 5 go\n40 5 go\n");
    let options = OnsetOptions::new(FS, RUN_LEN).unit(OnsetUnit::Samples).sorted();

    let matrix = read_onsets(file.path(), &options)
        .expect("sample-unit onsets should parse")
        .convolved_with_hrf()
        .expect("convolution should succeed")
        .with_dct_basis(DEFAULT_HIGHPASS_SECS)
        .expect("default cutoff is admissible");

    assert_eq!(matrix.names(), vec!["go", "nogo", "dct1"]);

    let dct = matrix.column("dct1").expect("dct1 column");
    assert_relative_eq!(dct.dot(dct), 1.0, epsilon = 1e-10);
    let info = matrix.info("dct1").expect("dct1 info");
    assert!(info.has_tag(ColumnTag::DctBasis));
    assert!(!info.has_tag(ColumnTag::Convolved));
}

#[test]
// Purpose
// -------
// Confirm that stacking is stable under repetition: appending a third
// run to an already stacked matrix re-bases run indices without
// double-suffixing the per-run columns.
//
// Given
// -----
// - Three 60-row runs built from the same onset content (drift order 1,
//   no convolution needed for this property).
// - `((run1 + run2) + run3)` with default stack options.
//
// Expect
// ------
// - 180 rows across three run spans.
// - Per-run polynomials named `poly{k}_run{i}` for i in 0..3, grouped by
//   base order, with no `_run0_run0`-style names.
// - The third run's drift columns are zero everywhere outside rows
//   120..180.
fn repeated_stacking_rebases_run_indices() {
    let onsets = "0 10 faces\n60 10 houses\n";
    let file = write_temp(onsets);
    let options = OnsetOptions::new(FS, RUN_LEN).with_drift(1);
    let run = read_onsets(file.path(), &options).expect("onset file should parse");

    let stacked = run
        .row_stack(&run, &StackOptions::default())
        .expect("first stack")
        .row_stack(&run, &StackOptions::default())
        .expect("second stack");

    assert_eq!(stacked.n_rows(), 3 * RUN_LEN);
    assert_eq!(stacked.runs().len(), 3);
    assert_eq!(
        stacked.names(),
        vec![
            "faces",
            "houses",
            "poly0_run0",
            "poly0_run1",
            "poly0_run2",
            "poly1_run0",
            "poly1_run1",
            "poly1_run2",
        ]
    );

    let third = stacked.column("poly0_run2").expect("poly0_run2 column");
    assert!(third.slice(ndarray::s![..2 * RUN_LEN]).iter().all(|&v| v == 0.0));
    assert!(third.slice(ndarray::s![2 * RUN_LEN..]).iter().all(|&v| v > 0.0));
    assert_eq!(stacked.info("poly0_run2").expect("info").run, Some(2));
}
