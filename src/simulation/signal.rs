use std::f32::consts::PI;

/// Interleaved unit impulse: frame `at` holds 1.0 on every channel, all other
/// samples are zero.
pub fn impulse(frames: usize, channels: usize, at: usize) -> Vec<f32> {
    let mut samples = vec![0.0; frames * channels];
    if at < frames {
        samples[at * channels..(at + 1) * channels].fill(1.0);
    }
    samples
}

/// Interleaved sine waves, one normalized frequency per channel.
///
/// Frequencies are fractions of the sampling rate; the channel count is
/// `freqs.len()`.
pub fn sine_interleaved(frames: usize, freqs: &[f32], amplitude: f32) -> Vec<f32> {
    let mut samples = Vec::with_capacity(frames * freqs.len());
    for n in 0..frames {
        for &f in freqs {
            samples.push(amplitude * (2.0 * PI * f * n as f32).sin());
        }
    }
    samples
}
