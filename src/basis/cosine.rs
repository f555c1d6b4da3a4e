//! Discrete-cosine high-pass drift basis.
//!
//! This module generates the cosine regressors used to absorb slow
//! physiological and scanner drift below a cutoff period. The basis is the
//! DCT-II family without its constant term: basis `k` (1-based) evaluated
//! at row `t` is
//!
//! ```text
//! f_k(t) = sqrt(2 / N) · cos(π · k · (2t + 1) / (2N))
//! ```
//!
//! Basis count policy:
//! - `K = floor(2 · N · dt / duration)` with `dt = 1 / sampling_freq`, so
//!   only components with period ≥ `duration` are produced.
//! - `K` is additionally capped at `N - 1`, the number of non-constant
//!   DCT-II components that exist on an `N`-point grid.
//! - A positive duration long enough that `K == 0` returns an **empty
//!   basis, not an error**; a non-positive or non-finite duration is a
//!   configuration error.

use crate::design::errors::{ConfigError, ConfigResult};
use ndarray::Array1;

/// Default high-pass cutoff, in seconds.
pub const DEFAULT_HIGHPASS_SECS: f64 = 180.0;

/// Generate the discrete-cosine drift basis.
///
/// Parameters
/// ----------
/// - `n_rows`: Number of rows (time points); must be `> 0`.
/// - `sampling_freq`: Sampling frequency in Hz; must be finite and `> 0`.
/// - `duration_secs`: High-pass cutoff period in seconds; must be finite
///   and `> 0`. See [`DEFAULT_HIGHPASS_SECS`].
///
/// Returns
/// -------
/// `ConfigResult<Vec<Array1<f64>>>`
///   `K` cosine columns ordered by increasing frequency (`k = 1..=K`),
///   each of length `n_rows`. `K` may be zero for long cutoffs; that is a
///   valid, empty basis.
///
/// Errors
/// ------
/// - [`ConfigError::EmptyBasisDomain`] when `n_rows == 0`.
/// - [`ConfigError::InvalidSamplingFreq`] when `sampling_freq` is not
///   finite and positive.
/// - [`ConfigError::InvalidFilterDuration`] when `duration_secs` is not
///   finite and positive.
pub fn dct_basis(
    n_rows: usize,
    sampling_freq: f64,
    duration_secs: f64,
) -> ConfigResult<Vec<Array1<f64>>> {
    if n_rows == 0 {
        return Err(ConfigError::EmptyBasisDomain);
    }
    if !sampling_freq.is_finite() || sampling_freq <= 0.0 {
        return Err(ConfigError::InvalidSamplingFreq { value: sampling_freq });
    }
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(ConfigError::InvalidFilterDuration { value: duration_secs });
    }

    let n = n_rows as f64;
    let dt = 1.0 / sampling_freq;
    let count = ((2.0 * n * dt / duration_secs).floor() as usize).min(n_rows - 1);

    let scale = (2.0 / n).sqrt();
    let mut basis = Vec::with_capacity(count);
    for k in 1..=count {
        let kf = k as f64;
        basis.push(Array1::from_iter((0..n_rows).map(|t| {
            scale * (std::f64::consts::PI * kf * (2.0 * (t as f64) + 1.0) / (2.0 * n)).cos()
        })));
    }
    Ok(basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-10;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The count formula K = floor(2·N·dt / duration) and its N-1 cap.
    // - The zero-column policy for long cutoffs.
    // - Orthonormality of the DCT-II columns.
    // - Error branches for bad duration and sampling frequency.
    // -------------------------------------------------------------------------

    #[test]
    fn count_follows_the_documented_formula() {
        // N = 100, dt = 2s, duration = 100s: K = floor(2·100·2/100) = 4.
        let basis = dct_basis(100, 0.5, 100.0).unwrap();
        assert_eq!(basis.len(), 4);
        assert!(basis.iter().all(|c| c.len() == 100));
    }

    #[test]
    fn long_cutoff_yields_empty_basis_without_error() {
        // N = 10, dt = 1s, duration = 180s: K = floor(20/180) = 0.
        let basis = dct_basis(10, 1.0, DEFAULT_HIGHPASS_SECS).unwrap();
        assert!(basis.is_empty());
    }

    #[test]
    fn count_is_capped_at_n_minus_one() {
        // A very short cutoff would ask for more components than exist.
        let basis = dct_basis(8, 1.0, 0.1).unwrap();
        assert_eq!(basis.len(), 7);
    }

    #[test]
    fn columns_are_orthonormal() {
        let basis = dct_basis(50, 1.0, 20.0).unwrap();
        assert!(basis.len() >= 2);
        for (i, a) in basis.iter().enumerate() {
            for (j, b) in basis.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(a.dot(b), expected, epsilon = TOL);
            }
        }
    }

    #[test]
    fn columns_are_orthogonal_to_the_constant() {
        // DCT-II components k >= 1 sum to zero over the grid, so cosine
        // drift never competes with an intercept regressor.
        let basis = dct_basis(64, 2.0, 16.0).unwrap();
        for column in &basis {
            assert_relative_eq!(column.sum(), 0.0, epsilon = TOL);
        }
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            match dct_basis(10, 1.0, bad) {
                Err(ConfigError::InvalidFilterDuration { .. }) => (),
                other => panic!("expected InvalidFilterDuration for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn bad_sampling_frequency_is_rejected() {
        match dct_basis(10, 0.0, 180.0) {
            Err(ConfigError::InvalidSamplingFreq { value }) => assert_eq!(value, 0.0),
            other => panic!("expected InvalidSamplingFreq, got {other:?}"),
        }
    }

    #[test]
    fn zero_rows_is_rejected() {
        match dct_basis(0, 1.0, 180.0) {
            Err(ConfigError::EmptyBasisDomain) => (),
            other => panic!("expected EmptyBasisDomain, got {other:?}"),
        }
    }
}
