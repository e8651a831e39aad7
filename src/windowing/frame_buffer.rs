/// Linear output buffer with an explicit window of valid, not yet emitted samples.
///
/// Samples are read from `start` and appended after `start + len`. Instead of wrapping around, the
/// valid region is slid back to the front with [`FrameBuffer::compact`]. All storage is allocated
/// up front; nothing here allocates after construction.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    data: Vec<f32>,
    start: usize,
    len: usize,
}

impl FrameBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0.; capacity],
            start: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Read cursor.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of valid samples from the read cursor on.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Zero-fills the buffer and moves the cursor home, leaving `silence` zeros queued for output.
    pub fn reset(&mut self, silence: usize) {
        debug_assert!(silence <= self.capacity());
        self.data.iter_mut().for_each(|sample| *sample = 0.);
        self.start = 0;
        self.len = silence;
    }

    /// Writes `samples` into the first free slots after the valid window.
    pub fn append(&mut self, samples: &[f32]) {
        let end = self.start + self.len;
        debug_assert!(
            end + samples.len() <= self.capacity(),
            "frame buffer overflow"
        );
        self.data[end..end + samples.len()].copy_from_slice(samples);
        self.len += samples.len();
    }

    /// Takes the next valid sample.
    pub fn pop_front(&mut self) -> f32 {
        debug_assert!(!self.is_empty(), "frame buffer underflow");
        let sample = self.data[self.start];
        self.start += 1;
        self.len -= 1;
        sample
    }

    /// Slides the valid window back to offset zero.
    pub fn compact(&mut self) {
        let (start, len) = (self.start, self.len);
        self.data.copy_within(start..start + len, 0);
        self.start = 0;
    }

    /// The valid, unread samples.
    pub fn pending(&self) -> &[f32] {
        &self.data[self.start..self.start + self.len]
    }
}
