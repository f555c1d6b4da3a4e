//! basis — nuisance-regressor generators: polynomial trends and cosine
//! drift.
//!
//! Purpose
//! -------
//! Provide the two drift bases a design matrix carries alongside its
//! condition regressors: discrete Legendre polynomials for low-order
//! scanner trends ([`legendre`]) and a DCT-II high-pass set for slow
//! periodic drift ([`cosine`]). Both are pure generators: they take a row
//! count (plus timing parameters for the cosine set) and return plain
//! `ndarray` columns; tagging and attachment to a container happen in
//! `design::matrix`.
//!
//! Conventions
//! -----------
//! - All columns are unit-norm and mutually orthogonal within their own
//!   family at the sampled points.
//! - Generators never touch column metadata; they return bare columns so
//!   callers decide naming and tags.
//! - Errors are reported through `design::errors::ConfigError`; the
//!   generators perform no I/O and never panic on user input.

pub mod cosine;
pub mod legendre;

pub use self::cosine::{DEFAULT_HIGHPASS_SECS, dct_basis};
pub use self::legendre::legendre_basis;
