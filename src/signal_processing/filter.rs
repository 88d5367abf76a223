use crate::error::{FilterError, Result};

/// Common trait for block filters over interleaved multi-channel frames
///
/// Implemented by BlockFilter.
pub trait Filter {
    /// Interleaved channels per frame
    fn channels(&self) -> usize;

    /// Filter one block of whole frames into `output` (same length as `input`)
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) -> Result<usize>;

    /// Return to the initial, all-zero-past state
    fn reset(&mut self);
}

/// Run `samples` through `filter` in consecutive blocks of `block_frames`
/// frames (the last block may be shorter) and collect the output.
///
/// This is how a caller with a fixed delivery size drives a filter; the
/// result does not depend on `block_frames`.
pub fn filter_in_blocks<F: Filter + ?Sized>(
    filter: &mut F,
    samples: &[f32],
    block_frames: usize,
) -> Result<Vec<f32>> {
    if block_frames == 0 {
        return Err(FilterError::BlockShape("block size must be at least one frame".to_string()));
    }

    let block_len = block_frames * filter.channels();
    let mut output = vec![0.0; samples.len()];
    for (input, out) in samples.chunks(block_len).zip(output.chunks_mut(block_len)) {
        filter.process_block(input, out)?;
    }
    Ok(output)
}
