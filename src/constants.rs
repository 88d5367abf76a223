//! Numeric constants for filter design stability
//!
//! These thresholds guard the design steps that divide by a computed
//! quantity, so a pathological parameter set fails loudly instead of
//! producing non-finite taps.

/// Smallest tap-sum magnitude accepted by normalization.
/// Kernels whose raw sum falls below this are rejected as degenerate.
pub const KERNEL_SUM_EPSILON: f32 = 1e-12;

/// Lower bound (exclusive) for a normalized cutoff frequency.
pub const MIN_NORMALIZED_CUTOFF: f32 = 0.0;

/// Upper bound (inclusive) for a normalized cutoff frequency (Nyquist).
pub const MAX_NORMALIZED_CUTOFF: f32 = 0.5;

/// Minimum number of taps a tapered window is defined for (M = len - 1 != 0).
pub const MIN_WINDOWED_LENGTH: usize = 2;
