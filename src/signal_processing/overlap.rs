use crate::error::{FilterError, Result};

/// Per-channel history of the most recent input frames
///
/// Holds exactly `capacity` frames of `channels` interleaved values in a
/// flat arena. `head` is the slot of the oldest retained frame; logical frame
/// `j` (0 = oldest) lives in slot `(head + j) % capacity`. Pushing a frame
/// overwrites the oldest one and advances `head`, which drops the oldest
/// frame and appends the newest without moving any data.
#[derive(Debug, Clone)]
pub struct OverlapBuffer {
    data: Vec<f32>,
    capacity: usize,
    channels: usize,
    head: usize,
}

impl OverlapBuffer {
    /// Allocate a zero-filled history of `capacity` frames.
    ///
    /// # Errors
    /// `FilterError::InvalidChannels` for zero channels, and
    /// `FilterError::Allocation` when the size overflows or the allocator
    /// refuses the request. Nothing is retained on failure.
    pub fn try_new(capacity: usize, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(FilterError::InvalidChannels(channels));
        }
        let len = capacity
            .checked_mul(channels)
            .ok_or(FilterError::Allocation {
                what: "overlap history",
                requested: usize::MAX,
            })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| FilterError::Allocation {
                what: "overlap history",
                requested: len,
            })?;
        data.resize(len, 0.0);

        Ok(Self {
            data,
            capacity,
            channels,
            head: 0,
        })
    }

    /// Number of frames retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Logical frame `j`, oldest first.
    #[inline]
    pub fn frame(&self, j: usize) -> &[f32] {
        debug_assert!(j < self.capacity);
        let mut slot = self.head + j;
        if slot >= self.capacity {
            slot -= self.capacity;
        }
        let start = slot * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Advance the history past an interleaved block of whole frames.
    ///
    /// A block of at least `capacity` frames replaces the history with its
    /// trailing frames. A shorter block drops that many of the oldest frames
    /// and appends all of its own.
    pub fn push_block(&mut self, block: &[f32]) -> Result<()> {
        if !block.len().is_multiple_of(self.channels) {
            return Err(FilterError::BlockShape(format!(
                "{} samples is not a whole number of {}-channel frames",
                block.len(),
                self.channels
            )));
        }
        if self.capacity == 0 {
            return Ok(());
        }

        let frames = block.len() / self.channels;
        if frames >= self.capacity {
            let tail = (frames - self.capacity) * self.channels;
            self.data.copy_from_slice(&block[tail..]);
            self.head = 0;
        } else {
            for frame in block.chunks_exact(self.channels) {
                let start = self.head * self.channels;
                self.data[start..start + self.channels].copy_from_slice(frame);
                self.head += 1;
                if self.head == self.capacity {
                    self.head = 0;
                }
            }
        }
        Ok(())
    }

    /// Restore the all-zero past.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
        self.head = 0;
    }

    /// Copy the history out in chronological order.
    pub fn to_vec(&self) -> Vec<f32> {
        (0..self.capacity)
            .flat_map(|j| self.frame(j).iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_zeroed() {
        let history = OverlapBuffer::try_new(3, 2).unwrap();
        assert_eq!(history.to_vec(), vec![0.0; 6]);
    }

    #[test]
    fn test_long_block_replaces_history() {
        let mut history = OverlapBuffer::try_new(3, 1).unwrap();
        history.push_block(&[1.0, 2.0]).unwrap();
        history.push_block(&[3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
        assert_eq!(history.to_vec(), vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_exact_capacity_block_replaces_history() {
        let mut history = OverlapBuffer::try_new(2, 2).unwrap();
        history.push_block(&[1.0, 10.0, 2.0, 20.0]).unwrap();
        assert_eq!(history.to_vec(), vec![1.0, 10.0, 2.0, 20.0]);
    }

    #[test]
    fn test_short_blocks_shift_history() {
        let mut history = OverlapBuffer::try_new(4, 1).unwrap();
        history.push_block(&[1.0]).unwrap();
        assert_eq!(history.to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
        history.push_block(&[2.0, 3.0]).unwrap();
        assert_eq!(history.to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
        history.push_block(&[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(history.to_vec(), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_channels_stay_separate() {
        let mut history = OverlapBuffer::try_new(2, 3).unwrap();
        history.push_block(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(history.frame(0), &[0.0, 0.0, 0.0]);
        assert_eq!(history.frame(1), &[1.0, 2.0, 3.0]);
        history.push_block(&[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(history.frame(0), &[1.0, 2.0, 3.0]);
        assert_eq!(history.frame(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_zero_capacity_ignores_input() {
        let mut history = OverlapBuffer::try_new(0, 2).unwrap();
        history.push_block(&[1.0, 2.0]).unwrap();
        assert!(history.to_vec().is_empty());
    }

    #[test]
    fn test_rejects_partial_frames() {
        let mut history = OverlapBuffer::try_new(2, 2).unwrap();
        assert!(matches!(
            history.push_block(&[1.0, 2.0, 3.0]),
            Err(FilterError::BlockShape(_))
        ));
    }

    #[test]
    fn test_clear_restores_zero_past() {
        let mut history = OverlapBuffer::try_new(2, 1).unwrap();
        history.push_block(&[7.0]).unwrap();
        history.clear();
        assert_eq!(history.to_vec(), vec![0.0, 0.0]);
        history.push_block(&[8.0]).unwrap();
        assert_eq!(history.to_vec(), vec![0.0, 8.0]);
    }

    #[test]
    fn test_overflowing_size_fails() {
        assert!(matches!(
            OverlapBuffer::try_new(usize::MAX / 2, 4),
            Err(FilterError::Allocation { .. })
        ));
    }
}
