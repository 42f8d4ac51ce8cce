//! Wrap-around cursor arithmetic
//!
//! Every circular structure in the crate (the inter-thread sample queue,
//! the echo history and each reverb tap) addresses its storage through a
//! `RingIndex`, so the modulo logic lives in exactly one place.

/// A cursor into a circular buffer of fixed length
///
/// The position is always in `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingIndex {
    pos: usize,
    len: usize,
}

impl RingIndex {
    /// Create a cursor at position 0 for a buffer of `len` slots
    ///
    /// A zero length is treated as one slot.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0, "ring length must be non-zero");
        Self {
            pos: 0,
            len: len.max(1),
        }
    }

    /// Current position
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Number of slots in the ring
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a ring has at least one slot
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Step forward one slot
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
        if self.pos == self.len {
            self.pos = 0;
        }
    }

    /// Step forward `n` slots
    #[inline]
    pub fn advance_by(&mut self, n: usize) {
        self.pos = (self.pos + n % self.len) % self.len;
    }

    /// Slot `offset` positions behind the cursor
    ///
    /// An offset of 0 (or any multiple of `len`) is the cursor slot itself.
    #[inline]
    pub fn behind(&self, offset: usize) -> usize {
        (self.pos + self.len - offset % self.len) % self.len
    }

    /// Number of slots from `other` forward to `self`
    #[inline]
    pub fn distance_from(&self, other: &RingIndex) -> usize {
        debug_assert_eq!(self.len, other.len);
        (self.pos + self.len - other.pos) % self.len
    }

    /// Move back to slot 0
    pub fn reset(&mut self) {
        self.pos = 0;
    }
}
