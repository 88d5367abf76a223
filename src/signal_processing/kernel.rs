//! Kernel synthesis and post-processing primitives.
//!
//! The design recipes in [`super::catalog`] chain these in a fixed order:
//! synthesize the truncated ideal lowpass, taper it, normalize it to unity
//! DC gain, and optionally invert it or convolve two prototypes together.
//! Every step works in place on a caller-owned tap slice.

use crate::constants::{KERNEL_SUM_EPSILON, MAX_NORMALIZED_CUTOFF, MIN_NORMALIZED_CUTOFF};
use crate::error::{FilterError, Result};
use std::f32::consts::PI;

/// Check that `fc` is a usable normalized cutoff, i.e. in (0, 0.5].
pub fn validate_cutoff(fc: f32) -> Result<()> {
    if !fc.is_finite() || fc <= MIN_NORMALIZED_CUTOFF || fc > MAX_NORMALIZED_CUTOFF {
        return Err(FilterError::InvalidCutoff(format!(
            "{} is outside ({}, {}]",
            fc, MIN_NORMALIZED_CUTOFF, MAX_NORMALIZED_CUTOFF
        )));
    }
    Ok(())
}

/// Fill `kernel` with the truncated ideal lowpass impulse response.
///
/// Tap `i` sits at offset `c = i - len/2` from the center and is set to
/// `sin(2*pi*fc*c) / c`; the center tap takes the limit `2*pi*fc`. The result
/// is neither windowed nor normalized.
///
/// # Errors
/// `FilterError::InvalidCutoff` when `fc` is not in (0, 0.5], and
/// `FilterError::InvalidLength` for an empty kernel.
pub fn compute_fir_lowpass(kernel: &mut [f32], fc: f32) -> Result<()> {
    validate_cutoff(fc)?;
    if kernel.is_empty() {
        return Err(FilterError::InvalidLength(0));
    }

    let center = kernel.len() / 2;
    let omega = 2.0 * PI * fc;

    for (i, tap) in kernel.iter_mut().enumerate() {
        *tap = if i == center {
            omega
        } else {
            let c = i as f32 - center as f32;
            (omega * c).sin() / c
        };
    }
    Ok(())
}

/// Scale `kernel` so its taps sum to one (unity DC gain).
///
/// # Errors
/// `FilterError::DegenerateKernel` if the tap sum is zero or not finite. The
/// kernel is left untouched in that case.
pub fn normalize_fir(kernel: &mut [f32]) -> Result<()> {
    let sum: f32 = kernel.iter().sum();
    if !sum.is_finite() || sum.abs() < KERNEL_SUM_EPSILON {
        return Err(FilterError::DegenerateKernel(format!(
            "tap sum {} cannot be normalized",
            sum
        )));
    }

    for tap in kernel.iter_mut() {
        *tap /= sum;
    }
    Ok(())
}

/// Turn a normalized, symmetric, odd-length lowpass into its highpass
/// complement (`delta - lowpass`).
///
/// The unit impulse is added at the center tap `(len - 1) / 2`, which keeps
/// the result linear-phase with the same group delay as the lowpass.
///
/// # Errors
/// `FilterError::InvalidLength` for an empty or even-length kernel, which has
/// no center tap.
pub fn reverse_fir(kernel: &mut [f32]) -> Result<()> {
    let length = kernel.len();
    if length.is_multiple_of(2) {
        return Err(FilterError::InvalidLength(length));
    }

    for tap in kernel.iter_mut() {
        *tap = -*tap;
    }
    kernel[(length - 1) / 2] += 1.0;
    Ok(())
}

/// Full linear convolution of `a` and `b` into `product`.
///
/// `product` must hold exactly `a.len() + b.len() - 1` values; it is zeroed
/// before accumulation.
///
/// # Errors
/// `FilterError::KernelLengthMismatch` if `product` has the wrong length.
pub fn compute_convolution(product: &mut [f32], a: &[f32], b: &[f32]) -> Result<()> {
    let expected = convolution_length(a.len(), b.len());
    if product.len() != expected {
        return Err(FilterError::KernelLengthMismatch {
            expected,
            actual: product.len(),
        });
    }

    product.fill(0.0);
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            product[i + j] += x * y;
        }
    }
    Ok(())
}

/// Allocating form of [`compute_convolution`].
pub fn convolve(a: &[f32], b: &[f32]) -> Result<Vec<f32>> {
    let mut product = vec![0.0; convolution_length(a.len(), b.len())];
    compute_convolution(&mut product, a, b)?;
    Ok(product)
}

/// Length of the full convolution of sequences of `len_a` and `len_b` taps.
///
/// Zero when either input is empty.
pub fn convolution_length(len_a: usize, len_b: usize) -> usize {
    if len_a == 0 || len_b == 0 {
        0
    } else {
        len_a + len_b - 1
    }
}
