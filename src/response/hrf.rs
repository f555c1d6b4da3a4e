//! Impulse-response kernels and the canonical hemodynamic response.
//!
//! This module provides:
//! - A [`Kernel`] type: a named, validated 1-D impulse response.
//! - A [`KernelBank`]: an ordered set of kernels applied as a cross
//!   product by the convolution engine (one output column per input
//!   column × kernel).
//! - [`Kernel::hrf`], the canonical double-gamma hemodynamic response
//!   function sampled at a given rate.
//!
//! Conventions:
//! - The canonical HRF is the SPM-style difference of two gamma densities:
//!   peak shape 6, undershoot shape 16, both unit rate (seconds), with the
//!   undershoot scaled by 1/6. It is sampled on a 32 s support and
//!   peak-normalized so the maximum tap is 1.
//! - Kernel taps are dimensionless weights; timing is fixed by the
//!   sampling frequency used when the kernel was built, and callers are
//!   responsible for matching it to the matrix they convolve.

use crate::design::errors::{ConfigError, ConfigResult};
use ndarray::Array1;
use statrs::function::gamma::gamma;

/// Support of the canonical HRF, in seconds.
pub const HRF_SUPPORT_SECS: f64 = 32.0;

const HRF_PEAK_SHAPE: f64 = 6.0;
const HRF_UNDERSHOOT_SHAPE: f64 = 16.0;
const HRF_UNDERSHOOT_RATIO: f64 = 1.0 / 6.0;

/// A named 1-D impulse-response kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    name: String,
    taps: Array1<f64>,
}

impl Kernel {
    /// Construct a kernel from raw taps.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyKernel`] when `taps` is empty.
    /// - [`ConfigError::NonFiniteKernelTap`] when any tap is NaN/±inf.
    pub fn new(name: impl Into<String>, taps: Array1<f64>) -> ConfigResult<Kernel> {
        let name = name.into();
        if taps.is_empty() {
            return Err(ConfigError::EmptyKernel { name });
        }
        for (index, &value) in taps.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteKernelTap { name, index, value });
            }
        }
        Ok(Kernel { name, taps })
    }

    /// The canonical double-gamma hemodynamic response sampled at
    /// `sampling_freq` Hz.
    ///
    /// The kernel covers [`HRF_SUPPORT_SECS`] seconds and is
    /// peak-normalized so its maximum tap equals 1.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidSamplingFreq`] when `sampling_freq` is not
    ///   finite and positive.
    /// - [`ConfigError::DegenerateKernel`] when the rate is so low that no
    ///   sampled tap lands on the positive lobe of the response; such a
    ///   kernel would convolve every column to zeros.
    pub fn hrf(sampling_freq: f64) -> ConfigResult<Kernel> {
        if !sampling_freq.is_finite() || sampling_freq <= 0.0 {
            return Err(ConfigError::InvalidSamplingFreq { value: sampling_freq });
        }

        let dt = 1.0 / sampling_freq;
        let n_taps = ((HRF_SUPPORT_SECS * sampling_freq).ceil() as usize).max(1);
        let mut taps = Array1::from_iter((0..n_taps).map(|i| {
            let t = (i as f64) * dt;
            gamma_density(t, HRF_PEAK_SHAPE, 1.0)
                - HRF_UNDERSHOOT_RATIO * gamma_density(t, HRF_UNDERSHOOT_SHAPE, 1.0)
        }));

        let peak = taps.iter().cloned().fold(f64::MIN, f64::max);
        if peak <= 0.0 {
            return Err(ConfigError::DegenerateKernel {
                name: String::from("hrf"),
                sampling_freq,
            });
        }
        taps.mapv_inplace(|v| v / peak);

        Kernel::new("hrf", taps)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn taps(&self) -> &Array1<f64> {
        &self.taps
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

/// Gamma density with shape `a` and rate `b`, zero for `t <= 0`.
fn gamma_density(t: f64, a: f64, b: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    b.powf(a) * t.powf(a - 1.0) * (-b * t).exp() / gamma(a)
}

/// An ordered set of kernels applied as a cross product.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelBank {
    kernels: Vec<Kernel>,
}

impl KernelBank {
    /// A bank holding a single kernel.
    pub fn single(kernel: Kernel) -> KernelBank {
        KernelBank { kernels: vec![kernel] }
    }

    /// A bank holding several kernels, applied in order.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyKernel`] when `kernels` is empty; an empty
    ///   bank would silently convolve nothing.
    pub fn new(kernels: Vec<Kernel>) -> ConfigResult<KernelBank> {
        if kernels.is_empty() {
            return Err(ConfigError::EmptyKernel { name: String::from("<bank>") });
        }
        Ok(KernelBank { kernels })
    }

    /// The canonical single-HRF bank at the given rate.
    pub fn canonical(sampling_freq: f64) -> ConfigResult<KernelBank> {
        Ok(KernelBank::single(Kernel::hrf(sampling_freq)?))
    }

    pub fn kernels(&self) -> &[Kernel] {
        &self.kernels
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}
