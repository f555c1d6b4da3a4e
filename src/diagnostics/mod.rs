//! diagnostics — pre-estimation checks on assembled design matrices.
//!
//! Purpose
//! -------
//! House the checks a design matrix goes through before it is handed to
//! the estimator. Currently this is collinearity detection and repair
//! ([`collinearity`]); the module exists as its own namespace so further
//! diagnostics (condition numbers, leverage screens) have a home.

pub mod collinearity;

pub use self::collinearity::{
    CleanReport, DEFAULT_CORR_THRESHOLD, DroppedColumn, decollinearize,
};
