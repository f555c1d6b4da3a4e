//! io — minimal file readers feeding the design-matrix container.
//!
//! Purpose
//! -------
//! Parse the two small text formats the workflow starts from: onset
//! files (event timing, [`onset`]) and headered covariate tables
//! ([`covariate`]). Both perform a single bounded read, validate
//! all-or-nothing, and hand back a ready [`DesignMatrix`]; errors live in
//! [`errors`] as [`ParseError`].
//!
//! Conventions
//! -----------
//! - These are the only components in the crate that touch the
//!   filesystem; everything downstream is a pure transformation.
//! - Format-specific onset parsers beyond the 2/3-column contract are
//!   external collaborators, not part of this crate.
//!
//! [`DesignMatrix`]: crate::design::DesignMatrix
//! [`ParseError`]: crate::io::errors::ParseError

pub mod covariate;
pub mod errors;
pub mod onset;

pub use self::covariate::{parse_covariates, read_covariates};
pub use self::errors::{ParseError, ParseResult};
pub use self::onset::{OnsetOptions, OnsetUnit, parse_onsets, read_onsets};
