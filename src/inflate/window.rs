//! Sliding window: decode history and output staging in one ring buffer.
//!
//! Decoded bytes are written at `next`.  Everything between `flushed` and
//! `next` has been decoded but not yet pushed; the window is pushed to the
//! sink whenever `next` reaches the end and once more when the stream ends.
//! `have` counts how many bytes behind `next` hold valid history, which is
//! what bounds back-reference distances.

use super::types::{window_size, Corruption, InflateError};
use crate::stream::ByteSink;

/// Window memory: the caller's buffer, or a private copy made by `copy`.
enum Storage<'w> {
    Borrowed(&'w mut [u8]),
    Owned(Box<[u8]>),
}

impl Storage<'_> {
    #[inline]
    fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Borrowed(b) => &b[..],
            Storage::Owned(b) => &b[..],
        }
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Storage::Borrowed(b) => &mut b[..],
            Storage::Owned(b) => &mut b[..],
        }
    }
}

/// Fixed-size history window of `1 << bits` bytes.
pub struct SlidingWindow<'w> {
    storage: Storage<'w>,
    bits: i32,
    /// `size - 1`; `size` is a power of two.
    mask: usize,
    next: usize,
    flushed: usize,
    have: usize,
    /// Bytes decoded through this window (dictionary bytes excluded).
    produced: u64,
}

impl<'w> SlidingWindow<'w> {
    /// Wrap the first `1 << bits` bytes of `buf`.
    pub fn borrowed(buf: &'w mut [u8], bits: i32) -> Result<Self, InflateError> {
        let size = window_size(bits).ok_or(InflateError::InvalidWindowBits(bits))?;
        if buf.len() < size {
            return Err(InflateError::WindowTooSmall {
                needed: size,
                actual: buf.len(),
            });
        }
        Ok(Self::from_storage(Storage::Borrowed(&mut buf[..size]), bits))
    }

    fn from_storage(storage: Storage<'w>, bits: i32) -> Self {
        let size = storage.as_slice().len();
        Self {
            storage,
            bits,
            mask: size - 1,
            next: 0,
            flushed: 0,
            have: 0,
            produced: 0,
        }
    }

    /// Window size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.mask + 1
    }

    /// Base-two logarithm of the size.
    #[inline]
    pub fn bits(&self) -> i32 {
        self.bits
    }

    /// Valid history bytes available to back-references.
    #[inline]
    pub fn history(&self) -> usize {
        self.have
    }

    /// Decoded bytes not yet pushed.
    #[inline]
    pub fn pending(&self) -> usize {
        self.next - self.flushed
    }

    /// Bytes decoded through this window since the last reset.
    #[inline]
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Raw window memory.
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_slice()
    }

    /// Forget history and pending output; the memory itself is left as is.
    pub fn reset(&mut self) {
        self.next = 0;
        self.flushed = 0;
        self.have = 0;
        self.produced = 0;
    }

    /// Append `dict` (its last `size` bytes) to the history without making it
    /// part of the output.
    pub fn preload(&mut self, dict: &[u8]) {
        let size = self.size();
        let tail = &dict[dict.len().saturating_sub(size)..];
        let mut rest = tail;
        while !rest.is_empty() {
            let n = rest.len().min(size - self.next);
            self.storage.as_mut_slice()[self.next..self.next + n].copy_from_slice(&rest[..n]);
            self.next = (self.next + n) & self.mask;
            rest = &rest[n..];
        }
        self.have = (self.have + tail.len()).min(size);
        self.flushed = self.next;
    }

    /// `true` once `next` has reached the end; the window must be pushed
    /// before anything more is written.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.next == self.size()
    }

    /// Room left before the window fills.
    #[inline]
    pub fn space(&self) -> usize {
        self.size() - self.next
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.next += n;
        self.produced += n as u64;
        self.have = (self.have + n).min(self.size());
    }

    /// Emit one literal.  The window must not be full.
    #[inline]
    pub fn put(&mut self, byte: u8) {
        let at = self.next;
        self.storage.as_mut_slice()[at] = byte;
        self.advance(1);
    }

    /// Emit as much of `data` as fits before the window fills; returns the
    /// number of bytes taken.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.space());
        let at = self.next;
        self.storage.as_mut_slice()[at..at + n].copy_from_slice(&data[..n]);
        self.advance(n);
        n
    }

    /// Emit up to `len` bytes copied from `dist` bytes behind the write
    /// position, stopping when the window fills; returns the number copied.
    ///
    /// Each step copies at most `dist` bytes so that source and destination
    /// never overlap in stream order, which keeps short-distance repeats
    /// (`dist < len`) correct.
    pub fn copy_match(&mut self, dist: usize, len: usize) -> Result<usize, InflateError> {
        if dist == 0 || dist > self.have {
            return Err(Corruption::DistanceTooFarBack.into());
        }
        let size = self.size();
        let want = len.min(self.space());
        let mut done = 0;
        while done < want {
            let from = (self.next + size - dist) & self.mask;
            let n = (want - done).min(dist).min(size - from);
            let at = self.next;
            self.storage.as_mut_slice().copy_within(from..from + n, at);
            self.advance(n);
            done += n;
        }
        Ok(done)
    }

    /// Decoded bytes not yet pushed.
    pub fn pending_bytes(&self) -> &[u8] {
        &self.storage.as_slice()[self.flushed..self.next]
    }

    /// Record that [`pending_bytes`](Self::pending_bytes) reached the sink;
    /// a full window starts over at the front.
    pub fn mark_flushed(&mut self) {
        if self.is_full() {
            self.next = 0;
        }
        self.flushed = self.next;
    }

    /// Push everything decoded since the last flush.
    pub fn flush<K: ByteSink + ?Sized>(&mut self, sink: &mut K) -> Result<(), InflateError> {
        if self.next > self.flushed {
            sink.push(self.pending_bytes())?;
        }
        self.mark_flushed();
        Ok(())
    }

    fn clone_state<'b>(&self, storage: Storage<'b>) -> SlidingWindow<'b> {
        SlidingWindow {
            storage,
            bits: self.bits,
            mask: self.mask,
            next: self.next,
            flushed: self.flushed,
            have: self.have,
            produced: self.produced,
        }
    }

    /// Deep copy into freshly allocated memory.
    pub fn to_owned_window(&self) -> SlidingWindow<'static> {
        let copy: Box<[u8]> = self.storage.as_slice().into();
        self.clone_state(Storage::Owned(copy))
    }

    /// Deep copy into `buf`, which must be at least as large as this window.
    pub fn copy_into<'b>(&self, buf: &'b mut [u8]) -> Result<SlidingWindow<'b>, InflateError> {
        let size = self.size();
        if buf.len() < size {
            return Err(InflateError::WindowTooSmall {
                needed: size,
                actual: buf.len(),
            });
        }
        let dst = &mut buf[..size];
        dst.copy_from_slice(self.storage.as_slice());
        Ok(self.clone_state(Storage::Borrowed(dst)))
    }
}

impl std::fmt::Debug for SlidingWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlidingWindow")
            .field("size", &self.size())
            .field("owned", &matches!(self.storage, Storage::Owned(_)))
            .field("next", &self.next)
            .field("flushed", &self.flushed)
            .field("have", &self.have)
            .field("produced", &self.produced)
            .finish()
    }
}
