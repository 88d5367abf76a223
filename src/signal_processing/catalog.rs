//! Filter design recipes.
//!
//! Each recipe allocates a [`FilterBuilder`], fills the kernel with the
//! primitives from [`super::kernel`] and [`super::window`], and finalizes.
//! Lengths are given as a half length `h`, producing odd `2h + 1` tap
//! kernels with a center tap.

use crate::constants::MIN_WINDOWED_LENGTH;
use crate::error::{FilterError, Result};
use crate::signal_processing::kernel::{
    compute_convolution, compute_fir_lowpass, normalize_fir, reverse_fir, validate_cutoff,
};
use crate::signal_processing::{BlockFilter, FilterBuilder, Window, apply_window};
use serde::{Deserialize, Serialize};

/// Filter class and its design parameters
///
/// Cutoffs are normalized frequencies (fraction of the sampling rate) in
/// (0, 0.5].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterKind {
    /// Moving average over `length` samples
    Mean { length: usize },
    /// Windowed-sinc lowpass
    Lowpass {
        cutoff: f32,
        half_length: usize,
        #[serde(default)]
        window: Window,
    },
    /// Spectrally inverted windowed-sinc lowpass
    Highpass {
        cutoff: f32,
        half_length: usize,
        #[serde(default)]
        window: Window,
    },
    /// Lowpass prototype at `lowpass_cutoff` convolved with a highpass
    /// prototype at `highpass_cutoff`; passes
    /// `[highpass_cutoff, lowpass_cutoff]`
    Bandpass {
        lowpass_cutoff: f32,
        highpass_cutoff: f32,
        half_length: usize,
        #[serde(default)]
        window: Window,
    },
}

impl FilterKind {
    /// Number of taps the designed kernel will have.
    ///
    /// # Errors
    /// `FilterError::InvalidLength` when `2 * half_length + 1` overflows.
    pub fn kernel_length(&self) -> Result<usize> {
        match *self {
            FilterKind::Mean { length } => Ok(length),
            FilterKind::Lowpass { half_length, .. }
            | FilterKind::Highpass { half_length, .. }
            | FilterKind::Bandpass { half_length, .. } => windowed_length(half_length),
        }
    }

    /// Check the parameters without allocating anything.
    pub fn validate(&self) -> Result<()> {
        match *self {
            FilterKind::Mean { length } => {
                if length == 0 {
                    return Err(FilterError::InvalidLength(length));
                }
            }
            FilterKind::Lowpass {
                cutoff,
                half_length,
                window,
            }
            | FilterKind::Highpass {
                cutoff,
                half_length,
                window,
            } => {
                validate_cutoff(cutoff)?;
                validate_windowed_length(windowed_length(half_length)?, window)?;
            }
            FilterKind::Bandpass {
                lowpass_cutoff,
                highpass_cutoff,
                half_length,
                window,
            } => {
                validate_cutoff(lowpass_cutoff)?;
                validate_cutoff(highpass_cutoff)?;
                let prototype = bandpass_prototype_length(half_length)?;
                validate_windowed_length(prototype, window)?;
            }
        }
        Ok(())
    }

    /// Design the kernel and build a filter for `channels` interleaved
    /// channels.
    pub fn design(&self, channels: usize) -> Result<BlockFilter> {
        match *self {
            FilterKind::Mean { length } => mean_filter(length, channels),
            FilterKind::Lowpass {
                cutoff,
                half_length,
                window,
            } => lowpass_filter(cutoff, half_length, channels, window),
            FilterKind::Highpass {
                cutoff,
                half_length,
                window,
            } => highpass_filter(cutoff, half_length, channels, window),
            FilterKind::Bandpass {
                lowpass_cutoff,
                highpass_cutoff,
                half_length,
                window,
            } => bandpass_filter(lowpass_cutoff, highpass_cutoff, half_length, channels, window),
        }
    }
}

/// Tap count `2 * half_length + 1` of a windowed design.
///
/// # Errors
/// `FilterError::InvalidLength` carrying `half_length` when the tap count
/// does not fit in `usize`.
pub fn windowed_length(half_length: usize) -> Result<usize> {
    half_length
        .checked_mul(2)
        .and_then(|n| n.checked_add(1))
        .ok_or(FilterError::InvalidLength(half_length))
}

fn validate_windowed_length(length: usize, window: Window) -> Result<()> {
    if window != Window::Rectangular && length < MIN_WINDOWED_LENGTH {
        return Err(FilterError::KernelTooShort(length));
    }
    Ok(())
}

/// Prototype length for the bandpass composition, `2 * (h / 2) + 1`.
///
/// Convolving two prototypes gives `2p - 1` taps, which only equals the
/// `2h + 1` tap instance for even `h`.
///
/// # Errors
/// `FilterError::InvalidLength` when `2h + 1` overflows, and
/// `FilterError::KernelLengthMismatch` when the two lengths disagree.
pub fn bandpass_prototype_length(half_length: usize) -> Result<usize> {
    let expected = windowed_length(half_length)?;
    // prototype <= h + 1, so 2p - 1 <= 2h + 1 cannot overflow past here
    let prototype = windowed_length(half_length / 2)?;
    let composed = 2 * prototype - 1;
    if composed != expected {
        return Err(FilterError::KernelLengthMismatch {
            expected,
            actual: composed,
        });
    }
    Ok(prototype)
}

/// Zeroed scratch kernel, reserved fallibly like the builder's.
fn try_prototype(length: usize) -> Result<Vec<f32>> {
    let mut taps = Vec::new();
    taps.try_reserve_exact(length)
        .map_err(|_| FilterError::Allocation {
            what: "bandpass prototype",
            requested: length,
        })?;
    taps.resize(length, 0.0);
    Ok(taps)
}

/// Moving average: `length` taps of `1 / length`.
pub fn mean_filter(length: usize, channels: usize) -> Result<BlockFilter> {
    let mut builder = FilterBuilder::allocate(length, channels)?;
    builder.kernel_mut().fill(1.0 / length as f32);

    log::debug!("Designed mean filter: {} taps", length);
    builder.finalize()
}

fn design_lowpass(kernel: &mut [f32], cutoff: f32, window: Window) -> Result<()> {
    compute_fir_lowpass(kernel, cutoff)?;
    apply_window(kernel, window)?;
    normalize_fir(kernel)
}

fn design_highpass(kernel: &mut [f32], cutoff: f32, window: Window) -> Result<()> {
    design_lowpass(kernel, cutoff, window)?;
    reverse_fir(kernel)
}

/// Windowed-sinc lowpass of `2 * half_length + 1` taps.
pub fn lowpass_filter(
    cutoff: f32,
    half_length: usize,
    channels: usize,
    window: Window,
) -> Result<BlockFilter> {
    let kind = FilterKind::Lowpass {
        cutoff,
        half_length,
        window,
    };
    kind.validate()?;

    let mut builder = FilterBuilder::allocate(kind.kernel_length()?, channels)?;
    design_lowpass(builder.kernel_mut(), cutoff, window)?;

    log::debug!(
        "Designed lowpass: fc={}, {} taps, {:?} window",
        cutoff,
        builder.num_taps(),
        window
    );
    builder.finalize()
}

/// Windowed-sinc highpass of `2 * half_length + 1` taps.
pub fn highpass_filter(
    cutoff: f32,
    half_length: usize,
    channels: usize,
    window: Window,
) -> Result<BlockFilter> {
    let kind = FilterKind::Highpass {
        cutoff,
        half_length,
        window,
    };
    kind.validate()?;

    let mut builder = FilterBuilder::allocate(kind.kernel_length()?, channels)?;
    design_highpass(builder.kernel_mut(), cutoff, window)?;

    log::debug!(
        "Designed highpass: fc={}, {} taps, {:?} window",
        cutoff,
        builder.num_taps(),
        window
    );
    builder.finalize()
}

/// Bandpass of `2 * half_length + 1` taps.
///
/// Built as the convolution of a lowpass prototype at `lowpass_cutoff` and a
/// highpass prototype at `highpass_cutoff`, each `2 * (half_length / 2) + 1`
/// taps. The band `[highpass_cutoff, lowpass_cutoff]` passes; when
/// `lowpass_cutoff <= highpass_cutoff` the two stopbands overlap and nothing
/// does. See [`passband_filter`] to give the band edges in ascending order.
///
/// # Errors
/// `FilterError::KernelLengthMismatch` for odd `half_length`, where the
/// composed kernel would not fill the instance. Checked before allocating.
pub fn bandpass_filter(
    lowpass_cutoff: f32,
    highpass_cutoff: f32,
    half_length: usize,
    channels: usize,
    window: Window,
) -> Result<BlockFilter> {
    let kind = FilterKind::Bandpass {
        lowpass_cutoff,
        highpass_cutoff,
        half_length,
        window,
    };
    kind.validate()?;
    let prototype = bandpass_prototype_length(half_length)?;

    let mut builder = FilterBuilder::allocate(kind.kernel_length()?, channels)?;

    let mut low_stage = try_prototype(prototype)?;
    design_lowpass(&mut low_stage, lowpass_cutoff, window)?;

    let mut high_stage = try_prototype(prototype)?;
    design_highpass(&mut high_stage, highpass_cutoff, window)?;

    compute_convolution(builder.kernel_mut(), &low_stage, &high_stage)?;

    log::debug!(
        "Designed bandpass: lowpass fc={}, highpass fc={}, {} taps from {}-tap prototypes, {:?} window",
        lowpass_cutoff,
        highpass_cutoff,
        builder.num_taps(),
        prototype,
        window
    );
    builder.finalize()
}

/// Bandpass passing `[low_edge, high_edge]`.
///
/// Same kernel as [`bandpass_filter`] with the lowpass prototype at
/// `high_edge` and the highpass prototype at `low_edge`.
///
/// # Errors
/// `FilterError::InvalidCutoff` if `low_edge >= high_edge`, otherwise as
/// [`bandpass_filter`].
pub fn passband_filter(
    low_edge: f32,
    high_edge: f32,
    half_length: usize,
    channels: usize,
    window: Window,
) -> Result<BlockFilter> {
    if low_edge.partial_cmp(&high_edge) != Some(std::cmp::Ordering::Less) {
        return Err(FilterError::InvalidCutoff(format!(
            "passband [{}, {}] is empty",
            low_edge, high_edge
        )));
    }
    bandpass_filter(high_edge, low_edge, half_length, channels, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_processing::magnitude_db;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_filter_taps() {
        let filter = mean_filter(4, 1).unwrap();
        assert_eq!(filter.taps(), &[0.25, 0.25, 0.25, 0.25]);
    }

    #[test]
    fn test_mean_filter_impulse() {
        let mut filter = mean_filter(4, 1).unwrap();
        let output = filter.process(&[1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(output, vec![0.25, 0.25, 0.25, 0.25, 0.0]);
    }

    #[test]
    fn test_lowpass_is_palindromic_and_normalized() {
        for window in [Window::Rectangular, Window::Hamming, Window::Blackman] {
            let filter = lowpass_filter(0.15, 12, 1, window).unwrap();
            let taps = filter.taps();
            assert_eq!(taps.len(), 25);
            for i in 0..taps.len() {
                assert_abs_diff_eq!(taps[i], taps[taps.len() - 1 - i], epsilon = 1e-6);
            }
            let sum: f32 = taps.iter().sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_highpass_has_zero_dc_gain() {
        let filter = highpass_filter(0.2, 10, 2, Window::Blackman).unwrap();
        let sum: f32 = filter.taps().iter().sum();
        assert_abs_diff_eq!(sum, 0.0, epsilon = 1e-5);
        assert_eq!(filter.channels(), 2);
    }

    #[test]
    fn test_bandpass_length_for_even_half_length() {
        let filter = bandpass_filter(0.2, 0.05, 16, 1, Window::Hamming).unwrap();
        assert_eq!(filter.num_taps(), 33);
        assert_eq!(bandpass_prototype_length(16).unwrap(), 17);
    }

    #[test]
    fn test_bandpass_rejects_odd_half_length() {
        assert_eq!(
            bandpass_filter(0.2, 0.05, 15, 1, Window::Hamming).unwrap_err(),
            FilterError::KernelLengthMismatch {
                expected: 31,
                actual: 29
            }
        );
    }

    #[test]
    fn test_bandpass_lowpass_cutoff_first_passes_band() {
        let filter = bandpass_filter(0.3, 0.1, 32, 1, Window::Hamming).unwrap();
        let taps = filter.taps();

        assert!(magnitude_db(taps, 0.2).abs() < 1.0, "center: {} dB", magnitude_db(taps, 0.2));
        assert!(magnitude_db(taps, 0.0) < -40.0);
        assert!(magnitude_db(taps, 0.5) < -40.0);
    }

    #[test]
    fn test_bandpass_accepts_either_cutoff_order() {
        assert!(bandpass_filter(0.1, 0.3, 32, 1, Window::Hamming).is_ok());
    }

    #[test]
    fn test_passband_filter_orders_edges() {
        let a = passband_filter(0.1, 0.3, 32, 2, Window::Blackman).unwrap();
        let b = bandpass_filter(0.3, 0.1, 32, 2, Window::Blackman).unwrap();
        assert_eq!(a.taps(), b.taps());
        assert_eq!(a.channels(), 2);

        assert!(matches!(
            passband_filter(0.3, 0.1, 32, 1, Window::Hamming),
            Err(FilterError::InvalidCutoff(_))
        ));
        assert!(passband_filter(0.2, 0.2, 32, 1, Window::Hamming).is_err());
    }

    #[test]
    fn test_bandpass_zero_half_length_needs_rectangular() {
        assert_eq!(
            bandpass_filter(0.2, 0.1, 0, 1, Window::Hamming).unwrap_err(),
            FilterError::KernelTooShort(1)
        );
    }

    #[test]
    fn test_overflowing_half_length_is_rejected() {
        let half_length = usize::MAX / 2 + 1;
        assert_eq!(
            windowed_length(half_length),
            Err(FilterError::InvalidLength(half_length))
        );
        assert_eq!(windowed_length(usize::MAX / 2), Ok(usize::MAX));

        for window in [Window::Rectangular, Window::Hamming] {
            assert_eq!(
                lowpass_filter(0.1, half_length, 1, window).unwrap_err(),
                FilterError::InvalidLength(half_length)
            );
            assert_eq!(
                highpass_filter(0.1, half_length, 1, window).unwrap_err(),
                FilterError::InvalidLength(half_length)
            );
            assert_eq!(
                bandpass_filter(0.3, 0.1, half_length, 1, window).unwrap_err(),
                FilterError::InvalidLength(half_length)
            );
        }

        let kind = FilterKind::Lowpass {
            cutoff: 0.1,
            half_length,
            window: Window::Rectangular,
        };
        assert!(kind.kernel_length().is_err());
        assert!(kind.validate().is_err());
        assert_eq!(
            bandpass_prototype_length(usize::MAX),
            Err(FilterError::InvalidLength(usize::MAX))
        );
    }

    #[test]
    fn test_largest_half_length_fails_allocation_not_arithmetic() {
        assert!(matches!(
            lowpass_filter(0.1, usize::MAX / 2, 1, Window::Rectangular),
            Err(FilterError::Allocation { what: "kernel", .. })
        ));
    }

    #[test]
    fn test_zero_half_length_lowpass_is_unit_gain() {
        let filter = lowpass_filter(0.25, 0, 1, Window::Rectangular).unwrap();
        assert_eq!(filter.taps(), &[1.0]);
        assert!(lowpass_filter(0.25, 0, 1, Window::Hamming).is_err());
    }

    #[test]
    fn test_invalid_cutoff_is_rejected_before_allocation() {
        assert!(matches!(
            lowpass_filter(0.0, 8, 1, Window::Hamming),
            Err(FilterError::InvalidCutoff(_))
        ));
        assert!(matches!(
            highpass_filter(0.75, 8, 1, Window::Hamming),
            Err(FilterError::InvalidCutoff(_))
        ));
    }

    #[test]
    fn test_kind_design_matches_free_functions() {
        let kind = FilterKind::Highpass {
            cutoff: 0.1,
            half_length: 8,
            window: Window::Hamming,
        };
        assert_eq!(kind.kernel_length(), Ok(17));
        let a = kind.design(3).unwrap();
        let b = highpass_filter(0.1, 8, 3, Window::Hamming).unwrap();
        assert_eq!(a.taps(), b.taps());
        assert_eq!(a.channels(), 3);
    }

    #[test]
    fn test_kind_parses_from_toml() {
        let kind: FilterKind = toml::from_str(
            r#"
            type = "bandpass"
            lowpass_cutoff = 0.2
            highpass_cutoff = 0.05
            half_length = 20
            window = "blackman"
            "#,
        )
        .unwrap();
        assert_eq!(
            kind,
            FilterKind::Bandpass {
                lowpass_cutoff: 0.2,
                highpass_cutoff: 0.05,
                half_length: 20,
                window: Window::Blackman
            }
        );

        let kind: FilterKind = toml::from_str("type = \"mean\"\nlength = 8").unwrap();
        assert_eq!(kind, FilterKind::Mean { length: 8 });
    }
}
