use crate::constants::MIN_WINDOWED_LENGTH;
use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Taper applied to a truncated ideal kernel
///
/// Tapering trades transition-band width for stopband attenuation:
/// Rectangular keeps the raw truncation, Hamming and Blackman progressively
/// suppress the sidelobes caused by cutting the sinc off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    /// No taper (w = 1)
    Rectangular,
    /// Raised cosine, 0.54 + 0.46 cos(.)
    #[default]
    Hamming,
    /// Three-term cosine sum, 0.42 + 0.5 cos(.) + 0.08 cos(2 .)
    Blackman,
}

impl Window {
    /// Weight of tap `index` in a kernel of `length` taps.
    ///
    /// Rectangular is 1 at any length. Tapered windows are defined for
    /// `length >= 2` and return 1 below that; [`apply_window`] rejects the
    /// short case instead.
    pub fn weight(self, index: usize, length: usize) -> f32 {
        if self == Window::Rectangular || length < MIN_WINDOWED_LENGTH {
            return 1.0;
        }

        let m = (length - 1) as f32;
        let x = index as f32 / m - 0.5;
        match self {
            Window::Rectangular => 1.0,
            Window::Hamming => 0.54 + 0.46 * (2.0 * PI * x).cos(),
            Window::Blackman => 0.42 + 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos(),
        }
    }
}

/// Scale every tap of `kernel` in place by the window weight.
///
/// # Errors
/// Returns `FilterError::KernelTooShort` for a tapered window on a kernel
/// with fewer than two taps.
pub fn apply_window(kernel: &mut [f32], window: Window) -> Result<()> {
    if window == Window::Rectangular {
        return Ok(());
    }

    let length = kernel.len();
    if length < MIN_WINDOWED_LENGTH {
        return Err(FilterError::KernelTooShort(length));
    }

    for (i, tap) in kernel.iter_mut().enumerate() {
        *tap *= window.weight(i, length);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rectangular_is_identity() {
        let original = vec![0.3f32, -1.25, 7.0, 0.0, 1e-7];
        let mut kernel = original.clone();
        apply_window(&mut kernel, Window::Rectangular).unwrap();
        assert_eq!(kernel, original);
    }

    #[test]
    fn test_rectangular_accepts_single_tap() {
        let mut kernel = vec![2.0f32];
        assert!(apply_window(&mut kernel, Window::Rectangular).is_ok());
        assert_eq!(kernel, vec![2.0]);
    }

    #[test]
    fn test_tapered_window_rejects_single_tap() {
        let mut kernel = vec![1.0f32];
        assert_eq!(
            apply_window(&mut kernel, Window::Hamming),
            Err(FilterError::KernelTooShort(1))
        );
        assert_eq!(
            apply_window(&mut kernel, Window::Blackman),
            Err(FilterError::KernelTooShort(1))
        );
        assert_eq!(kernel, vec![1.0]);
    }

    #[test]
    fn test_weight_of_degenerate_lengths() {
        for window in [Window::Rectangular, Window::Hamming, Window::Blackman] {
            assert_eq!(window.weight(0, 0), 1.0);
            assert_eq!(window.weight(0, 1), 1.0);
        }
        assert_eq!(Window::Rectangular.weight(3, 7), 1.0);
    }

    #[test]
    fn test_hamming_endpoints_and_center() {
        let length = 9;
        assert_abs_diff_eq!(Window::Hamming.weight(0, length), 0.08, epsilon = 1e-6);
        assert_abs_diff_eq!(Window::Hamming.weight(4, length), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Window::Hamming.weight(8, length), 0.08, epsilon = 1e-6);
    }

    #[test]
    fn test_blackman_endpoints_and_center() {
        let length = 11;
        assert_abs_diff_eq!(Window::Blackman.weight(0, length), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Window::Blackman.weight(5, length), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Window::Blackman.weight(10, length), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_windows_are_symmetric() {
        let length = 15;
        for window in [Window::Hamming, Window::Blackman] {
            for i in 0..length {
                assert_abs_diff_eq!(
                    window.weight(i, length),
                    window.weight(length - 1 - i, length),
                    epsilon = 1e-6
                );
            }
        }
    }

    #[test]
    fn test_apply_window_scales_taps() {
        let mut kernel = vec![2.0f32; 5];
        apply_window(&mut kernel, Window::Hamming).unwrap();
        for (i, &tap) in kernel.iter().enumerate() {
            assert_abs_diff_eq!(tap, 2.0 * Window::Hamming.weight(i, 5), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_window_parses_lowercase() {
        #[derive(Deserialize)]
        struct Holder {
            window: Window,
        }
        let holder: Holder = toml::from_str("window = \"blackman\"").unwrap();
        assert_eq!(holder.window, Window::Blackman);
    }
}
