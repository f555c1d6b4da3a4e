//! Discrete Legendre polynomial trend basis.
//!
//! This module generates the polynomial drift regressors used to absorb
//! slow scanner trends. Rather than sampling the continuous Legendre
//! polynomials (which are only approximately orthogonal once evaluated at
//! a finite grid), the basis is built by Gram–Schmidt orthogonalization of
//! the monomials `1, x, x², …` evaluated at `n_rows` points linearly
//! spaced on [-1, 1]. The result is orthogonal *at the sampled points*:
//! distinct orders have exactly zero dot product (up to floating-point
//! rounding), and every column is normalized to unit Euclidean norm.
//!
//! Conventions:
//! - Order 0 is the constant (intercept) column, `1/√N` at every row.
//! - `order` must satisfy `order <= n_rows - 1`; beyond that the monomials
//!   are linearly dependent on the grid and the basis is not identifiable.

use crate::design::errors::{ConfigError, ConfigResult};
use ndarray::Array1;

/// Generate the discrete Legendre basis at `n_rows` points on [-1, 1].
///
/// Parameters
/// ----------
/// - `n_rows`: Number of sample points (rows); must be `> 0`.
/// - `order`: Maximum polynomial order `k`; must satisfy
///   `k <= n_rows - 1`.
/// - `all_orders`: When `true`, return orders `0..=k` (`k + 1` columns,
///   low order first); when `false`, return only the order-`k` column.
///
/// Returns
/// -------
/// `ConfigResult<Vec<Array1<f64>>>`
///   Unit-norm columns, mutually orthogonal at the sampled points. The
///   i-th returned column has order `i` when `all_orders` is set.
///
/// Errors
/// ------
/// - [`ConfigError::EmptyBasisDomain`] when `n_rows == 0`.
/// - [`ConfigError::OrderExceedsRows`] when `order > n_rows - 1`.
pub fn legendre_basis(
    n_rows: usize,
    order: usize,
    all_orders: bool,
) -> ConfigResult<Vec<Array1<f64>>> {
    if n_rows == 0 {
        return Err(ConfigError::EmptyBasisDomain);
    }
    if order > n_rows - 1 {
        return Err(ConfigError::OrderExceedsRows { order, n_rows });
    }

    let x = symmetric_grid(n_rows);
    let mut basis: Vec<Array1<f64>> = Vec::with_capacity(order + 1);

    for k in 0..=order {
        // Monomial x^k, then modified Gram–Schmidt against all lower orders.
        let mut column = x.mapv(|v| v.powi(k as i32));
        for lower in &basis {
            let proj = column.dot(lower);
            column.zip_mut_with(lower, |c, &l| *c -= proj * l);
        }
        let norm = column.dot(&column).sqrt();
        // Monomials on n_rows distinct points are linearly independent up to
        // degree n_rows - 1, so the residual norm is bounded away from zero
        // for every admissible order.
        column.mapv_inplace(|v| v / norm);
        basis.push(column);
    }

    if all_orders { Ok(basis) } else { Ok(basis.split_off(order)) }
}

/// `n` points linearly spaced on [-1, 1]; a single point sits at 0.
fn symmetric_grid(n: usize) -> Array1<f64> {
    if n == 1 {
        return Array1::zeros(1);
    }
    let step = 2.0 / ((n - 1) as f64);
    Array1::from_iter((0..n).map(|i| -1.0 + step * (i as f64)))
}
