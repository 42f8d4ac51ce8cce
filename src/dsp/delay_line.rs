//! Delay line storage
//!
//! A zero-filled float history addressed through a [`RingIndex`]. The
//! cursor is owned by the effect, not the line, so several lines can share
//! one cursor (the reverb taps do). Reading and writing never move the
//! cursor; the owner calls `advance()` once per sample.

use super::ring_index::RingIndex;

/// Magnitudes below this are stored as exact zero
const DENORMAL_FLOOR: f32 = 1.0e-30;

/// Fixed-length circular history of processed samples
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Box<[f32]>,
}

impl DelayLine {
    /// Allocate `len` slots of silence
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)].into_boxed_slice(),
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; a line holds at least one slot
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// A cursor sized for this line
    pub fn cursor(&self) -> RingIndex {
        RingIndex::new(self.buffer.len())
    }

    /// Read the sample written `delay` steps before the cursor
    ///
    /// A delay of 0 would address the slot about to be overwritten, which
    /// still holds history from a full revolution ago. It is floored to 1,
    /// the most recently written sample. Delays longer than the line are
    /// capped at `len - 1`.
    #[inline]
    pub fn read(&self, cursor: &RingIndex, delay: usize) -> f32 {
        debug_assert_eq!(cursor.len(), self.buffer.len());
        let delay = delay.max(1).min(self.buffer.len() - 1);
        self.buffer[cursor.behind(delay)]
    }

    /// Store `sample` at the cursor
    #[inline]
    pub fn write(&mut self, cursor: &RingIndex, sample: f32) {
        debug_assert_eq!(cursor.len(), self.buffer.len());
        self.buffer[cursor.pos()] = if sample.abs() < DENORMAL_FLOOR {
            0.0
        } else {
            sample
        };
    }

    /// Zero the whole history
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_back() {
        let mut line = DelayLine::new(100);
        let mut cursor = line.cursor();

        line.write(&cursor, 0.75);
        cursor.advance();

        assert_eq!(line.read(&cursor, 1), 0.75);
        assert_eq!(line.read(&cursor, 2), 0.0);
    }

    #[test]
    fn test_zero_delay_reads_previous_sample() {
        let mut line = DelayLine::new(8);
        let mut cursor = line.cursor();
        for i in 1..=3 {
            line.write(&cursor, i as f32);
            cursor.advance();
        }
        assert_eq!(line.read(&cursor, 0), 3.0);
        assert_eq!(line.read(&cursor, 0), line.read(&cursor, 1));
    }

    #[test]
    fn test_wrapping() {
        let mut line = DelayLine::new(4);
        let mut cursor = line.cursor();
        for i in 0..6 {
            line.write(&cursor, i as f32);
            cursor.advance();
        }
        // Holds [4, 5, 2, 3], cursor at 2
        assert_eq!(line.read(&cursor, 1), 5.0);
        assert_eq!(line.read(&cursor, 3), 3.0);
    }

    #[test]
    fn test_overlong_delay_is_capped() {
        let mut line = DelayLine::new(4);
        let mut cursor = line.cursor();
        for i in 1..=4 {
            line.write(&cursor, i as f32);
            cursor.advance();
        }
        assert_eq!(line.read(&cursor, 50), line.read(&cursor, 3));
    }

    #[test]
    fn test_denormals_flushed() {
        let mut line = DelayLine::new(4);
        let mut cursor = line.cursor();
        line.write(&cursor, 1.0e-35);
        cursor.advance();
        assert_eq!(line.read(&cursor, 1), 0.0);
    }

    #[test]
    fn test_clear() {
        let mut line = DelayLine::new(10);
        let cursor = line.cursor();
        line.write(&cursor, 0.5);
        line.clear();
        assert_eq!(line.read(&cursor, 9), 0.0);
    }
}
