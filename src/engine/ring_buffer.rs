//! Inter-thread sample queue
//!
//! A fixed-capacity FIFO shared by the capture context (producer) and the
//! render context (consumer). Both sides take a single lock for the length
//! of one `O(n)` copy. Requests are full-or-nothing: a write that does not
//! fit and a read that is not fully available are rejected without touching
//! the queue, so neither side ever waits on the other.

use num_traits::Zero;
use parking_lot::Mutex;

use crate::dsp::RingIndex;
use crate::error::{Result, RtfxError};

/// Point-in-time view of the queue cursors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingStatus {
    /// Next write slot
    pub head: usize,
    /// Next read slot
    pub tail: usize,
    /// Occupied slots
    pub count: usize,
    /// Total slots
    pub capacity: usize,
}

struct RingState<T> {
    storage: Box<[T]>,
    head: RingIndex,
    tail: RingIndex,
    count: usize,
}

impl<T> RingState<T> {
    #[inline]
    fn check_invariants(&self) {
        let capacity = self.storage.len();
        debug_assert!(self.count <= capacity);
        debug_assert_eq!(self.head.distance_from(&self.tail), self.count % capacity);
    }
}

/// Lock-protected circular sample queue
pub struct RingBuffer<T> {
    state: Mutex<RingState<T>>,
    capacity: usize,
}

impl<T: Copy + Zero> RingBuffer<T> {
    /// Create a zero-filled queue holding up to `capacity` samples
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(RtfxError::invalid_parameter(
                "ring_capacity",
                capacity,
                "at least 1 sample",
            ));
        }

        Ok(Self {
            state: Mutex::new(RingState {
                storage: vec![T::zero(); capacity].into_boxed_slice(),
                head: RingIndex::new(capacity),
                tail: RingIndex::new(capacity),
                count: 0,
            }),
            capacity,
        })
    }

    /// Append all of `data`, or nothing
    ///
    /// # Errors
    /// `BufferFull` if fewer than `data.len()` slots are free. The queue is
    /// left unchanged.
    pub fn write(&self, data: &[T]) -> Result<()> {
        let n = data.len();
        let mut state = self.state.lock();

        let free = self.capacity - state.count;
        if n > free {
            return Err(RtfxError::BufferFull { requested: n, free });
        }

        // At most two contiguous segments: up to the end, then from slot 0
        let start = state.head.pos();
        let first = n.min(self.capacity - start);
        state.storage[start..start + first].copy_from_slice(&data[..first]);
        state.storage[..n - first].copy_from_slice(&data[first..]);

        state.head.advance_by(n);
        state.count += n;
        state.check_invariants();
        Ok(())
    }

    /// Remove exactly `out.len()` samples into `out`, or nothing
    ///
    /// # Errors
    /// `BufferUnderrun` if fewer than `out.len()` samples are queued. The
    /// queue and `out` are left unchanged; the caller substitutes silence.
    pub fn read_into(&self, out: &mut [T]) -> Result<()> {
        let n = out.len();
        let mut state = self.state.lock();

        if n > state.count {
            return Err(RtfxError::BufferUnderrun {
                requested: n,
                available: state.count,
            });
        }

        let start = state.tail.pos();
        let first = n.min(self.capacity - start);
        out[..first].copy_from_slice(&state.storage[start..start + first]);
        out[first..].copy_from_slice(&state.storage[..n - first]);

        state.tail.advance_by(n);
        state.count -= n;
        state.check_invariants();
        Ok(())
    }

    /// Remove `n` samples into a new vector
    ///
    /// Allocates; meant for tests and non-real-time consumers.
    pub fn read(&self, n: usize) -> Result<Vec<T>> {
        let mut out = vec![T::zero(); n];
        self.read_into(&mut out)?;
        Ok(out)
    }

    /// Drop everything queued and rewind both cursors
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.head.reset();
        state.tail.reset();
        state.count = 0;
    }
}

impl<T> RingBuffer<T> {
    /// Total slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Occupied slots
    pub fn len(&self) -> usize {
        self.state.lock().count
    }

    /// True when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unoccupied slots
    pub fn free(&self) -> usize {
        self.capacity - self.len()
    }

    /// Cursor positions and fill level, read under the lock
    pub fn status(&self) -> RingStatus {
        let state = self.state.lock();
        RingStatus {
            head: state.head.pos(),
            tail: state.tail.pos(),
            count: state.count,
            capacity: self.capacity,
        }
    }
}

impl<T> std::fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.status();
        f.debug_struct("RingBuffer")
            .field("head", &status.head)
            .field("tail", &status.tail)
            .field("count", &status.count)
            .field("capacity", &status.capacity)
            .finish()
    }
}
