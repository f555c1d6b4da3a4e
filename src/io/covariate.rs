//! io::covariate — generic delimited covariate loader.
//!
//! Purpose
//! -------
//! Load a headered, delimited numeric table (motion parameters,
//! physiological traces, behavioral covariates) into an untagged design
//! matrix, ready to be column-joined beside condition regressors. This
//! is the minimal tabular loader the multi-run workflow needs; full
//! dataframe I/O is out of scope for the crate.
//!
//! Conventions
//! -----------
//! - The first non-blank line is the header and provides column names;
//!   every following non-blank line must carry the same field count.
//! - Fields are split on commas and whitespace, like the onset reader.
//! - A header with no data rows yields a valid zero-row matrix.
//! - Resulting columns carry no tags; the caller decides their role.

use crate::design::errors::DesignResult;
use crate::design::matrix::{DesignMatrix, check_sampling_freq};
use crate::io::errors::{ParseError, ParseResult};
use crate::io::onset::split_fields;
use ndarray::Array1;
use std::path::Path;

/// Read a headered covariate file into an untagged design matrix.
///
/// # Errors
/// - [`ParseError::Io`] on read failure, [`ParseError::EmptyFile`] when
///   no header is present, [`ParseError::FieldCountMismatch`] when a row
///   disagrees with the header, and [`ParseError::MalformedLine`] on
///   non-numeric fields.
/// - Configuration errors for a bad sampling frequency.
pub fn read_covariates(
    path: impl AsRef<Path>,
    sampling_freq: f64,
) -> DesignResult<DesignMatrix> {
    let content = std::fs::read_to_string(path).map_err(ParseError::from)?;
    parse_covariates(&content, sampling_freq)
}

/// Parse covariate content from memory; see [`read_covariates`].
pub fn parse_covariates(content: &str, sampling_freq: f64) -> DesignResult<DesignMatrix> {
    check_sampling_freq(sampling_freq)?;
    let (names, rows) = parse_table(content)?;

    let n_rows = rows.len();
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(j, name)| {
            (name, Array1::from_iter(rows.iter().map(|row: &Vec<f64>| row[j])))
        })
        .collect::<Vec<_>>();
    debug_assert!(columns.iter().all(|(_, c)| c.len() == n_rows));
    DesignMatrix::from_columns(columns, sampling_freq)
}

/// Split header and numeric rows, enforcing the header's field count.
fn parse_table(content: &str) -> ParseResult<(Vec<String>, Vec<Vec<f64>>)> {
    let mut names: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let fields = split_fields(raw);
        if fields.is_empty() {
            continue;
        }

        match names.as_ref() {
            None => {
                names = Some(fields.into_iter().map(str::to_string).collect());
            }
            Some(header) => {
                if fields.len() != header.len() {
                    return Err(ParseError::FieldCountMismatch {
                        line: line_no,
                        expected: header.len(),
                        actual: fields.len(),
                    });
                }
                let row = fields
                    .iter()
                    .map(|f| f.parse::<f64>())
                    .collect::<Result<Vec<f64>, _>>()
                    .map_err(|_| ParseError::MalformedLine {
                        line: line_no,
                        content: raw.to_string(),
                    })?;
                rows.push(row);
            }
        }
    }

    match names {
        Some(names) => Ok((names, rows)),
        None => Err(ParseError::EmptyFile),
    }
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
    // - Header-driven naming and numeric row parsing.
    // - The zero-row (header-only) case.
    // - Field-count and numeric error branches.
    // -------------------------------------------------------------------------

    #[test]
    fn headered_table_round_trips() {
        let content = "motion_x motion_y\n0.1 -0.2\n0.3 0.0\n0.2 0.4\n";
        let matrix = parse_covariates(content, 2.0).unwrap();

        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.names(), vec!["motion_x", "motion_y"]);
        assert_eq!(matrix.column("motion_y").unwrap(), &array![-0.2, 0.0, 0.4]);
        assert!(matrix.info("motion_x").unwrap().tags.is_empty());
    }

    #[test]
    fn header_only_file_yields_zero_rows() {
        let matrix = parse_covariates("a b c\n", 1.0).unwrap();
        assert_eq!(matrix.n_rows(), 0);
        assert_eq!(matrix.n_cols(), 3);
    }

    #[test]
    fn row_width_must_match_the_header() {
        match parse_covariates("a b\n1.0 2.0 3.0\n", 1.0) {
            Err(DesignError::Parse(ParseError::FieldCountMismatch {
                line: 2,
                expected: 2,
                actual: 3,
            })) => (),
            other => panic!("expected FieldCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_rows_are_rejected() {
        match parse_covariates("a b\n1.0 fast\n", 1.0) {
            Err(DesignError::Parse(ParseError::MalformedLine { line: 2, .. })) => (),
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn empty_content_is_rejected() {
        match parse_covariates("", 1.0) {
            Err(DesignError::Parse(ParseError::EmptyFile)) => (),
            other => panic!("expected EmptyFile, got {other:?}"),
        }
    }
}
