//! LSB-first bit accumulator over the most recently pulled chunk.
//!
//! The buffer never pulls on its own.  [`fill`](BitBuffer::fill) moves bytes
//! from the chunk into `hold` only while the decoder is short of the bits it
//! asked for, and reports `false` when the chunk runs dry; the engine then
//! pulls and hands the next chunk to [`feed`](BitBuffer::feed).  Bits are
//! peeked first and consumed only once a whole code (with its extra bits) is
//! available, so a suspended decode always restarts from a code boundary.

/// Bit accumulator owned by the engine, so copies carry it along.
#[derive(Debug, Clone, Default)]
pub(crate) struct BitBuffer {
    /// Copy of the most recent pulled chunk; `pos` is the next unread byte.
    chunk: Vec<u8>,
    pos: usize,
    hold: u64,
    bits: u32,
    total_in: u64,
}

impl BitBuffer {
    pub(crate) const fn new() -> Self {
        Self {
            chunk: Vec::new(),
            pos: 0,
            hold: 0,
            bits: 0,
            total_in: 0,
        }
    }

    /// Drop all buffered input and the byte count.
    pub(crate) fn clear(&mut self) {
        self.chunk.clear();
        self.pos = 0;
        self.hold = 0;
        self.bits = 0;
        self.total_in = 0;
    }

    /// Compressed bytes moved into the accumulator or copied out of the chunk.
    #[inline]
    pub(crate) fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Replace the drained chunk with a freshly pulled one.
    pub(crate) fn feed(&mut self, chunk: &[u8]) {
        debug_assert_eq!(self.pos, self.chunk.len(), "feed with unread input");
        self.chunk.clear();
        self.chunk.extend_from_slice(chunk);
        self.pos = 0;
    }

    /// Load bytes until `hold` has at least `n` bits (`n <= 56`).  `false`
    /// when the chunk ran out first; whatever was loaded stays loaded.
    #[inline]
    pub(crate) fn fill(&mut self, n: u32) -> bool {
        debug_assert!(n <= 56);
        while self.bits < n {
            match self.chunk.get(self.pos) {
                Some(&b) => {
                    self.hold |= (b as u64) << self.bits;
                    self.pos += 1;
                    self.bits += 8;
                    self.total_in += 1;
                }
                None => return false,
            }
        }
        true
    }

    /// The `n` bits starting `at` bits into `hold`, without consuming them.
    #[inline]
    pub(crate) fn peek(&self, at: u32, n: u32) -> u32 {
        debug_assert!(at + n <= self.bits);
        ((self.hold >> at) & ((1u64 << n) - 1)) as u32
    }

    /// Discard `n` bits already loaded.
    #[inline]
    pub(crate) fn consume(&mut self, n: u32) {
        debug_assert!(n <= self.bits);
        self.hold >>= n;
        self.bits -= n;
    }

    /// Peek then consume `n` loaded bits.
    #[inline]
    pub(crate) fn take(&mut self, n: u32) -> u32 {
        let v = self.peek(0, n);
        self.consume(n);
        v
    }

    /// Discard bits up to the next byte boundary.
    pub(crate) fn align_to_byte(&mut self) {
        let drop = self.bits & 7;
        self.consume(drop);
    }

    /// `true` when a whole byte is buffered in the accumulator.
    #[inline]
    pub(crate) fn has_held_byte(&self) -> bool {
        self.bits >= 8
    }

    /// Borrow up to `max` raw bytes straight from the chunk; empty when the
    /// chunk is drained.
    ///
    /// Only valid on a byte boundary with the accumulator drained.
    pub(crate) fn take_bytes(&mut self, max: usize) -> &[u8] {
        debug_assert_eq!(self.bits, 0, "raw copy with bits still held");
        let n = max.min(self.chunk.len() - self.pos);
        let start = self.pos;
        self.pos += n;
        self.total_in += n as u64;
        &self.chunk[start..start + n]
    }

    /// Input that was pulled but not needed: whole bytes left in the
    /// accumulator followed by the unread tail of the chunk.
    pub(crate) fn unused(&self) -> Vec<u8> {
        let mut hold = self.hold >> (self.bits & 7);
        let mut whole = self.bits / 8;
        let mut out = Vec::with_capacity(whole as usize + self.chunk.len() - self.pos);
        while whole > 0 {
            out.push(hold as u8);
            hold >>= 8;
            whole -= 1;
        }
        out.extend_from_slice(&self.chunk[self.pos..]);
        out
    }
}
