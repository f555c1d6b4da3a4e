//! io::onset — minimal onset-file reader.
//!
//! Purpose
//! -------
//! Parse experiment timing files into an initial design matrix of binary
//! condition indicators. The accepted format is deliberately minimal —
//! one event per line, either `(onset, label)` or
//! `(onset, duration, label)`, whitespace or comma delimited — richer
//! event formats belong to format-specific parsers outside this crate.
//!
//! Key behaviors
//! -------------
//! - Onsets and durations are read in the caller-specified unit
//!   ([`OnsetUnit::Seconds`] or [`OnsetUnit::Samples`]) and converted to
//!   sample indices against the run's sampling frequency.
//! - Each unique label becomes one indicator column, set to 1 over the
//!   half-open sample range `[onset, onset + duration)` (floor/ceil to
//!   whole samples, minimum one sample) and 0 elsewhere. Two-field
//!   events cover exactly one sample.
//! - Column order follows first label appearance; with the sort flag set,
//!   events are first stably sorted by onset, which also fixes the label
//!   order. This is the only reordering the crate ever performs.
//! - An optional polynomial drift basis can be appended in the same call,
//!   the common first step of the interactive workflow.
//!
//! Conventions
//! -----------
//! - Blank lines are skipped; every data line must carry the same field
//!   count, and field counts other than 2 or 3 are malformed.
//! - Parsing is all-or-nothing: the first malformed or out-of-range line
//!   aborts the read with no partially built matrix.
//! - Resulting columns are tagged `Condition`.

use crate::design::errors::DesignResult;
use crate::design::matrix::{DesignMatrix, check_sampling_freq};
use crate::design::metadata::{ColumnInfo, ColumnTag};
use crate::io::errors::{ParseError, ParseResult};
use ndarray::Array1;
use std::path::Path;

/// Unit in which onsets and durations are expressed in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnsetUnit {
    /// Values are seconds; converted via the sampling frequency.
    Seconds,
    /// Values are already sample indices.
    Samples,
}

/// Per-call configuration for [`read_onsets`].
///
/// Fields
/// ------
/// - `sampling_freq`: Sampling frequency in Hz; finite and `> 0`.
/// - `run_length`: Total run length in rows; every event must fit in
///   `[0, run_length)`.
/// - `unit`: Interpretation of onset/duration values; defaults to
///   seconds.
/// - `sort`: Stably sort events by onset before building columns.
/// - `drift_order`: When set, append a polynomial drift basis of this
///   order to the parsed matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct OnsetOptions {
    pub sampling_freq: f64,
    pub run_length: usize,
    pub unit: OnsetUnit,
    pub sort: bool,
    pub drift_order: Option<usize>,
}

impl OnsetOptions {
    /// Options with the given timing, seconds unit, no sorting, and no
    /// drift.
    pub fn new(sampling_freq: f64, run_length: usize) -> OnsetOptions {
        OnsetOptions { sampling_freq, run_length, unit: OnsetUnit::Seconds, sort: false, drift_order: None }
    }

    pub fn unit(mut self, unit: OnsetUnit) -> OnsetOptions {
        self.unit = unit;
        self
    }

    pub fn sorted(mut self) -> OnsetOptions {
        self.sort = true;
        self
    }

    pub fn with_drift(mut self, order: usize) -> OnsetOptions {
        self.drift_order = Some(order);
        self
    }
}

/// One parsed event, already converted to sample indices.
struct Event {
    start: usize,
    end: usize,
    label: String,
}

/// Read an onset file into a design matrix of condition indicators.
///
/// See the module documentation for the line format and indicator
/// semantics.
///
/// # Errors
/// - [`ParseError`] variants for I/O failures, malformed or ambiguous
///   lines, and out-of-range events.
/// - Configuration errors for a bad sampling frequency or (via
///   `drift_order`) an inadmissible polynomial order.
pub fn read_onsets(path: impl AsRef<Path>, options: &OnsetOptions) -> DesignResult<DesignMatrix> {
    let content = std::fs::read_to_string(path).map_err(ParseError::from)?;
    parse_onsets(&content, options)
}

/// Parse onset-file content from memory; see [`read_onsets`].
pub fn parse_onsets(content: &str, options: &OnsetOptions) -> DesignResult<DesignMatrix> {
    check_sampling_freq(options.sampling_freq)?;

    let mut events = parse_events(content, options)?;
    if options.sort {
        events.sort_by(|a, b| a.start.cmp(&b.start));
    }

    // One indicator column per label, ordered by first appearance.
    let mut labels: Vec<String> = Vec::new();
    for event in &events {
        if !labels.iter().any(|l| l == &event.label) {
            labels.push(event.label.clone());
        }
    }

    let mut matrix = DesignMatrix::empty(options.sampling_freq)?;
    for label in labels {
        let mut column = Array1::zeros(options.run_length);
        for event in events.iter().filter(|e| e.label == label) {
            for t in event.start..event.end {
                column[t] = 1.0;
            }
        }
        matrix.push_column(ColumnInfo::new(label).with_tag(ColumnTag::Condition), column)?;
    }

    match options.drift_order {
        Some(order) => matrix.with_polynomial_drift(order),
        None => Ok(matrix),
    }
}

/// Parse and range-check all events, enforcing a uniform field count.
fn parse_events(content: &str, options: &OnsetOptions) -> ParseResult<Vec<Event>> {
    let mut events = Vec::new();
    let mut field_count: Option<usize> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let fields: Vec<&str> = split_fields(raw);
        if fields.is_empty() {
            continue;
        }

        match field_count {
            None => {
                if fields.len() != 2 && fields.len() != 3 {
                    return Err(ParseError::MalformedLine {
                        line: line_no,
                        content: raw.to_string(),
                    });
                }
                field_count = Some(fields.len());
            }
            Some(expected) if fields.len() != expected => {
                return Err(ParseError::AmbiguousFieldCount {
                    line: line_no,
                    expected,
                    actual: fields.len(),
                });
            }
            Some(_) => {}
        }

        let onset: f64 = fields[0].parse().map_err(|_| ParseError::MalformedLine {
            line: line_no,
            content: raw.to_string(),
        })?;
        let (duration, label) = match fields.len() {
            2 => (None, fields[1]),
            _ => {
                let duration: f64 =
                    fields[1].parse().map_err(|_| ParseError::MalformedLine {
                        line: line_no,
                        content: raw.to_string(),
                    })?;
                (Some(duration), fields[2])
            }
        };

        events.push(to_event(onset, duration, label, line_no, options)?);
    }

    if events.is_empty() {
        return Err(ParseError::EmptyFile);
    }
    Ok(events)
}

/// Convert one raw event to sample indices and range-check it.
fn to_event(
    onset: f64,
    duration: Option<f64>,
    label: &str,
    line: usize,
    options: &OnsetOptions,
) -> ParseResult<Event> {
    let to_samples = |v: f64| match options.unit {
        OnsetUnit::Seconds => v * options.sampling_freq,
        OnsetUnit::Samples => v,
    };

    let onset_s = to_samples(onset);
    let end_s = match duration {
        Some(d) => {
            // NaN slips through pure ordering comparisons, so finiteness
            // is checked explicitly here.
            if !d.is_finite() || d < 0.0 {
                return Err(ParseError::InvalidDuration { line, duration: d });
            }
            onset_s + to_samples(d)
        }
        // Two-field events cover one sample.
        None => onset_s + 1.0,
    };

    if !onset_s.is_finite() || onset_s < 0.0 || end_s > options.run_length as f64 {
        return Err(ParseError::EventOutOfRange {
            line,
            start: onset_s,
            end: end_s,
            run_length: options.run_length,
        });
    }

    let start = onset_s.floor() as usize;
    let mut end = end_s.ceil() as usize;
    if end <= start {
        end = start + 1;
    }
    if end > options.run_length {
        return Err(ParseError::EventOutOfRange {
            line,
            start: onset_s,
            end: end_s,
            run_length: options.run_length,
        });
    }
    Ok(Event { start, end, label: label.to_string() })
}

/// Split a line on commas and whitespace, dropping empty fields.
pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty()).collect()
}
