//! Errors for onset and covariate file parsing.
//!
//! This module defines [`ParseError`], the error type used by the minimal
//! file readers in [`io`](crate::io). It covers I/O failures (normalized to
//! a string payload, since `std::io::Error` is neither `Clone` nor
//! `PartialEq`), malformed lines, inconsistent field counts, and events
//! whose sample range falls outside the run. The alias [`ParseResult<T>`]
//! standardizes the return type across the reader code.
//!
//! ## Conventions
//! - **Line numbers are 1-based** in error payloads, matching what an
//!   editor shows; indices elsewhere in the crate stay 0-based.
//! - Readers stop at the first malformed line; no partially built matrix
//!   is returned.

/// Result alias for parsing paths that may produce [`ParseError`].
pub type ParseResult<T> = Result<T, ParseError>;

/// Unified error type for onset and covariate file parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    // ---- I/O ----
    /// Underlying read failed; carries the `std::io::Error` rendering.
    Io(String),

    // ---- Line structure ----
    /// A field could not be parsed as the expected type.
    MalformedLine { line: usize, content: String },

    /// Data lines mix 2-field and 3-field records, making the format
    /// ambiguous.
    AmbiguousFieldCount { line: usize, expected: usize, actual: usize },

    /// A line's field count disagrees with the header.
    FieldCountMismatch { line: usize, expected: usize, actual: usize },

    /// The file contains no data lines.
    EmptyFile,

    // ---- Event semantics ----
    /// An event's sample range falls outside [0, run_length).
    EventOutOfRange { line: usize, start: f64, end: f64, run_length: usize },

    /// An event's duration is negative or non-finite.
    InvalidDuration { line: usize, duration: f64 },
}

impl std::error::Error for ParseError {}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Io(msg) => write!(f, "Parse Error: I/O failure: {}", msg),
            ParseError::MalformedLine { line, content } => {
                write!(f, "Parse Error: Malformed line {}: '{}'", line, content)
            }
            ParseError::AmbiguousFieldCount { line, expected, actual } => write!(
                f,
                "Parse Error: Line {} has {} fields but earlier lines have {}; onset files must use one field count throughout",
                line, actual, expected
            ),
            ParseError::FieldCountMismatch { line, expected, actual } => write!(
                f,
                "Parse Error: Line {} has {} fields, header declares {}",
                line, actual, expected
            ),
            ParseError::EmptyFile => write!(f, "Parse Error: File contains no data lines"),
            ParseError::EventOutOfRange { line, start, end, run_length } => write!(
                f,
                "Parse Error: Event on line {} covers samples [{}, {}) outside run of length {}",
                line, start, end, run_length
            ),
            ParseError::InvalidDuration { line, duration } => write!(
                f,
                "Parse Error: Event on line {} has invalid duration {} (non-negative finite required)",
                line, duration
            ),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io(err.to_string())
    }
}
