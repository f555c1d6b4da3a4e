//! response — impulse-response kernels and the convolution engine.
//!
//! Purpose
//! -------
//! Model the mapping from stimulus timing to measured signal: [`hrf`]
//! provides validated kernels (including the canonical double-gamma
//! hemodynamic response), and [`convolve`] applies a kernel bank to the
//! condition columns of a design matrix under a documented causal
//! alignment policy.
//!
//! Conventions
//! -----------
//! - Kernels are sampled sequences tied to a sampling rate at build time;
//!   the convolution engine checks lengths, not rates — callers keep the
//!   rates consistent.
//! - Polynomial drift columns are never convolved.

pub mod convolve;
pub mod hrf;

pub use self::convolve::{ConvolveOptions, convolve_columns};
pub use self::hrf::{HRF_SUPPORT_SECS, Kernel, KernelBank};
