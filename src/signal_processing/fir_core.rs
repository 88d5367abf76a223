use crate::error::{FilterError, Result};
use crate::signal_processing::{Filter, OverlapBuffer};

/// Streaming multi-channel FIR filter
///
/// Owns the finalized kernel and one overlap history per channel. Blocks are
/// interleaved frames (`frame * channels + channel`) and may arrive in any
/// size: the history carries the last `taps - 1` input frames across calls,
/// so splitting a stream into blocks never changes the output.
///
/// Built through [`crate::signal_processing::FilterBuilder`] or one of the
/// catalog recipes. Dropping the filter releases kernel and history.
#[derive(Debug, Clone)]
pub struct BlockFilter {
    taps: Vec<f32>,
    history: OverlapBuffer,
    channels: usize,
    scratch: Vec<f32>,
}

impl BlockFilter {
    pub(crate) fn from_parts(taps: Vec<f32>, history: OverlapBuffer) -> Self {
        let channels = history.channels();
        debug_assert_eq!(history.capacity() + 1, taps.len());
        Self {
            taps,
            history,
            channels,
            scratch: Vec::new(),
        }
    }

    /// Filter one interleaved block into `output`, returning the number of
    /// frames processed.
    ///
    /// Every output sample is the convolution of the kernel with the stream
    /// looking backward from that frame; samples before the block come from
    /// the overlap history, samples before the first block are zero.
    /// `output` is fully overwritten and the history advances past `input`.
    ///
    /// # Errors
    /// `FilterError::BlockShape` if `input` is not a whole number of frames or
    /// `output` differs in length from `input`. The history is unchanged on
    /// error.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) -> Result<usize> {
        let channels = self.channels;
        if !input.len().is_multiple_of(channels) {
            return Err(FilterError::BlockShape(format!(
                "{} samples is not a whole number of {}-channel frames",
                input.len(),
                channels
            )));
        }
        if output.len() != input.len() {
            return Err(FilterError::BlockShape(format!(
                "output holds {} samples, input holds {}",
                output.len(),
                input.len()
            )));
        }

        let frames = input.len() / channels;
        let past = self.taps.len() - 1;

        output.fill(0.0);
        for (f, out) in output.chunks_exact_mut(channels).enumerate() {
            for (k, &tap) in self.taps.iter().enumerate() {
                let source = if k <= f {
                    let start = (f - k) * channels;
                    &input[start..start + channels]
                } else {
                    // k - f frames before this block, history index counts from oldest
                    self.history.frame(past + f - k)
                };
                for (o, &x) in out.iter_mut().zip(source) {
                    *o += tap * x;
                }
            }
        }

        self.history.push_block(input)?;
        log::trace!("Filtered {} frames x {} channels", frames, channels);
        Ok(frames)
    }

    /// Filter a block and return the result in a new buffer.
    pub fn process(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let mut output = vec![0.0; input.len()];
        self.process_block(input, &mut output)?;
        Ok(output)
    }

    /// Filter a block in place.
    ///
    /// Uses an internal scratch copy of the input that only grows when a
    /// larger block than any seen before arrives.
    pub fn process_in_place(&mut self, buffer: &mut [f32]) -> Result<usize> {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        scratch.extend_from_slice(buffer);
        let result = self.process_block(&scratch, buffer);
        self.scratch = scratch;
        result
    }

    /// Forget the stream: the next block sees an all-zero past again.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Get the number of taps (filter length)
    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    /// Number of interleaved channels per frame
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Get the group delay in samples (half the filter length for linear phase)
    pub fn group_delay_samples(&self) -> usize {
        (self.taps.len() - 1) / 2
    }

    /// Get access to the tap coefficients
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// Retained input frames, oldest first, interleaved.
    pub fn history(&self) -> Vec<f32> {
        self.history.to_vec()
    }
}

impl Filter for BlockFilter {
    fn channels(&self) -> usize {
        BlockFilter::channels(self)
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) -> Result<usize> {
        BlockFilter::process_block(self, input, output)
    }

    fn reset(&mut self) {
        BlockFilter::reset(self)
    }
}
