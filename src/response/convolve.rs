//! response::convolve — kernel convolution of design-matrix columns.
//!
//! Purpose
//! -------
//! Turn condition indicator columns into predicted response regressors by
//! linear convolution with one or more impulse-response kernels
//! (canonically the HRF). Drift columns must not be convolved, so
//! polynomial-tagged columns always pass through untouched.
//!
//! Key behaviors
//! -------------
//! - Every column NOT tagged polynomial — optionally restricted to an
//!   explicit selection — is convolved with every kernel in the bank
//!   (cross product: one output column per input column × kernel).
//! - Alignment policy: **full linear convolution cropped to the first
//!   `n_rows` samples**. The output is left-aligned and causal: sample
//!   `t` of the output depends only on input samples at or before `t`,
//!   and an impulse at sample `i` reproduces kernel tap `j` at sample
//!   `i + j`.
//! - Output columns keep the input length, gain the `Convolved` tag, and
//!   are renamed `{col}_{kernel}` when the bank holds more than one
//!   kernel (with a single kernel the original name is kept).
//!
//! Conventions
//! -----------
//! - A kernel longer than the series is rejected: the crop would discard
//!   the entire tail response, which almost always indicates a
//!   mismatched sampling rate.
//! - Column order is preserved; the outputs for one input column sit
//!   where that column sat, kernel order within.

use crate::design::errors::{ConfigError, DesignError, DesignResult};
use crate::design::matrix::DesignMatrix;
use crate::design::metadata::{ColumnInfo, ColumnTag};
use crate::response::hrf::KernelBank;
use ndarray::Array1;

/// Per-call configuration for [`convolve_columns`].
///
/// Fields
/// ------
/// - `kernels`: Kernel bank to apply; `None` means the canonical HRF
///   sampled at the matrix's rate.
/// - `columns`: Restrict convolution to these columns; `None` means all
///   columns. Polynomial-tagged columns pass through either way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvolveOptions {
    pub kernels: Option<KernelBank>,
    pub columns: Option<Vec<String>>,
}

impl ConvolveOptions {
    /// Convolve all non-polynomial columns with the given bank.
    pub fn with_kernels(kernels: KernelBank) -> ConvolveOptions {
        ConvolveOptions { kernels: Some(kernels), columns: None }
    }

    /// Restrict convolution to the named columns.
    pub fn for_columns<S: Into<String>>(mut self, columns: Vec<S>) -> ConvolveOptions {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}

/// Convolve the selected columns of `matrix` with the kernel bank.
///
/// See the module documentation for the alignment policy and naming
/// rules.
///
/// # Errors
/// - [`ConfigError::KernelLongerThanSeries`] when any kernel has more
///   taps than the matrix has rows.
/// - [`DesignError::UnknownColumn`] when an explicit selection names an
///   absent column.
/// - Kernel-construction errors from [`KernelBank::canonical`] when the
///   default bank is requested.
pub fn convolve_columns(
    matrix: &DesignMatrix,
    options: &ConvolveOptions,
) -> DesignResult<DesignMatrix> {
    let bank = match &options.kernels {
        Some(bank) => bank.clone(),
        None => KernelBank::canonical(matrix.sampling_freq())?,
    };

    let n_rows = matrix.n_rows();
    for kernel in bank.kernels() {
        if kernel.len() > n_rows {
            return Err(ConfigError::KernelLongerThanSeries {
                kernel_len: kernel.len(),
                n_rows,
            }
            .into());
        }
    }

    if let Some(columns) = &options.columns {
        for name in columns {
            if matrix.column_index(name).is_none() {
                return Err(DesignError::UnknownColumn { name: name.clone() });
            }
        }
    }

    let multi_kernel = bank.len() > 1;
    let mut result = DesignMatrix::empty(matrix.sampling_freq())?;
    for (idx, info) in matrix.infos().iter().enumerate() {
        let data = matrix.column_at(idx);
        let selected = options
            .columns
            .as_ref()
            .map(|cols| cols.iter().any(|c| c == &info.name))
            .unwrap_or(true);

        if !selected || info.is_polynomial() {
            result.push_column(info.clone(), data.clone())?;
            continue;
        }

        for kernel in bank.kernels() {
            let name = if multi_kernel {
                format!("{}_{}", info.name, kernel.name())
            } else {
                info.name.clone()
            };
            let mut tags = info.tags.clone();
            if !tags.contains(&ColumnTag::Convolved) {
                tags.push(ColumnTag::Convolved);
            }
            let convolved = causal_convolve(data, kernel.taps());
            result.push_column(ColumnInfo { name, tags, run: info.run }, convolved)?;
        }
    }

    result.set_runs(n_rows, matrix.runs().to_vec());
    Ok(result)
}

/// Full linear convolution cropped to the input length (left-aligned).
fn causal_convolve(signal: &Array1<f64>, kernel: &Array1<f64>) -> Array1<f64> {
    let n = signal.len();
    let l = kernel.len();
    let mut out = Array1::zeros(n);
    for t in 0..n {
        let mut acc = 0.0;
        let j_max = l.min(t + 1);
        for j in 0..j_max {
            acc += kernel[j] * signal[t - j];
        }
        out[t] = acc;
    }
    out
}
