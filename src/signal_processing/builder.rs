use crate::error::{FilterError, Result};
use crate::signal_processing::{BlockFilter, OverlapBuffer};

/// First phase of filter construction
///
/// `allocate` reserves the kernel and the zeroed overlap history up front,
/// the recipe then fills the kernel through [`FilterBuilder::kernel_mut`],
/// and [`FilterBuilder::finalize`] checks the taps and hands back a
/// [`BlockFilter`] whose kernel can no longer be mutated.
#[derive(Debug)]
pub struct FilterBuilder {
    taps: Vec<f32>,
    history: OverlapBuffer,
}

impl FilterBuilder {
    /// Reserve a `length`-tap kernel and `(length - 1) * channels` history
    /// values, both zero-filled.
    ///
    /// # Errors
    /// `FilterError::InvalidLength` / `FilterError::InvalidChannels` for zero
    /// sizes, `FilterError::Allocation` if either reservation fails. A failed
    /// attempt releases whatever it had already acquired.
    pub fn allocate(length: usize, channels: usize) -> Result<Self> {
        if length == 0 {
            return Err(FilterError::InvalidLength(length));
        }
        if channels == 0 {
            return Err(FilterError::InvalidChannels(channels));
        }

        let mut taps = Vec::new();
        taps.try_reserve_exact(length)
            .map_err(|_| FilterError::Allocation {
                what: "kernel",
                requested: length,
            })?;
        taps.resize(length, 0.0);

        let history = OverlapBuffer::try_new(length - 1, channels)?;

        log::debug!(
            "Allocated filter: {} taps, {} channels, {} history frames",
            length,
            channels,
            length - 1
        );

        Ok(Self { taps, history })
    }

    /// Allocate and copy an already designed kernel.
    pub fn with_kernel(taps: &[f32], channels: usize) -> Result<Self> {
        let mut builder = Self::allocate(taps.len(), channels)?;
        builder.taps.copy_from_slice(taps);
        Ok(builder)
    }

    /// Writable kernel, zero until a recipe fills it.
    pub fn kernel_mut(&mut self) -> &mut [f32] {
        &mut self.taps
    }

    pub fn kernel(&self) -> &[f32] {
        &self.taps
    }

    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    pub fn channels(&self) -> usize {
        self.history.channels()
    }

    /// Seal the kernel and produce the streaming filter.
    ///
    /// # Errors
    /// `FilterError::DegenerateKernel` if any tap is NaN or infinite.
    pub fn finalize(self) -> Result<BlockFilter> {
        if let Some(index) = self.taps.iter().position(|tap| !tap.is_finite()) {
            return Err(FilterError::DegenerateKernel(format!(
                "tap {} is {}",
                index, self.taps[index]
            )));
        }
        Ok(BlockFilter::from_parts(self.taps, self.history))
    }
}
