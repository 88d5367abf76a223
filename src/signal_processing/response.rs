use std::f64::consts::PI;

/// Magnitude of the kernel's frequency response at normalized frequency `f`
/// (fraction of the sampling rate), evaluated directly from the taps.
pub fn magnitude_at(taps: &[f32], f: f32) -> f32 {
    let omega = 2.0 * PI * f as f64;
    let (re, im) = taps
        .iter()
        .enumerate()
        .fold((0.0f64, 0.0f64), |(re, im), (n, &tap)| {
            let phase = omega * n as f64;
            (re + tap as f64 * phase.cos(), im - tap as f64 * phase.sin())
        });
    (re * re + im * im).sqrt() as f32
}

/// [`magnitude_at`] in decibels, floored at -240 dB.
pub fn magnitude_db(taps: &[f32], f: f32) -> f32 {
    20.0 * magnitude_at(taps, f).max(1e-12).log10()
}

/// Magnitude response in dB at `points` evenly spaced frequencies from DC to
/// Nyquist inclusive.
pub fn response_db(taps: &[f32], points: usize) -> Vec<(f32, f32)> {
    match points {
        0 => Vec::new(),
        1 => vec![(0.0, magnitude_db(taps, 0.0))],
        _ => (0..points)
            .map(|i| {
                let f = 0.5 * i as f32 / (points - 1) as f32;
                (f, magnitude_db(taps, f))
            })
            .collect(),
    }
}
