//! Pull side of the pipeline: where the engine gets compressed bytes from.
//!
//! A [`ByteSource`] hands out *everything* it currently has in one call and
//! considers it consumed; the engine keeps its own read position inside the
//! returned chunk and only pulls again once that chunk is exhausted.  An empty
//! chunk means end of input.

use std::io::{self, Read};

use crate::config::READER_BUFFER_SIZE;

/// Supplier of compressed input.
pub trait ByteSource {
    /// Return all remaining unread bytes and mark them consumed.
    ///
    /// An empty slice signals end of input.  The slice stays valid until the
    /// next call to `pull`.
    fn pull(&mut self) -> &[u8];
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn pull(&mut self) -> &[u8] {
        (**self).pull()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    #[inline]
    fn pull(&mut self) -> &[u8] {
        (**self).pull()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputCursor: borrowed slice + offset
// ─────────────────────────────────────────────────────────────────────────────

/// Bounded cursor over a borrowed input buffer.
///
/// The first `pull` returns the whole unread remainder and moves the offset to
/// the end; later pulls return an empty slice.  `remaining()` never increases.
#[derive(Debug, Clone)]
pub struct InputCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> InputCursor<'a> {
    /// Cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes not yet handed out.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Bytes handed out so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.offset
    }

    /// Original input length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when the underlying buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteSource for InputCursor<'_> {
    fn pull(&mut self) -> &[u8] {
        let rest = &self.data[self.offset..];
        self.offset = self.data.len();
        rest
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ReaderSource: any io::Read
// ─────────────────────────────────────────────────────────────────────────────

/// Source backed by an [`io::Read`], refilling an internal buffer per pull.
///
/// Read errors other than `Interrupted` are parked in the source and reported
/// to the engine as end of input; the caller retrieves them with
/// [`take_error`](Self::take_error) after `run` returns.
pub struct ReaderSource<R> {
    reader: R,
    buf: Box<[u8]>,
    total: u64,
    error: Option<io::Error>,
}

impl<R: Read> ReaderSource<R> {
    /// Source with the default buffer size.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(READER_BUFFER_SIZE, reader)
    }

    /// Source with a `capacity`-byte refill buffer (at least one byte).
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            total: 0,
            error: None,
        }
    }

    /// Total bytes read from the underlying reader.
    pub fn total_read(&self) -> u64 {
        self.total
    }

    /// The read error that ended input early, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Recover the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn pull(&mut self) -> &[u8] {
        if self.error.is_some() {
            return &[];
        }
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => {
                    self.total += n as u64;
                    return &self.buf[..n];
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.error = Some(e);
                    return &[];
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BoundedSource: caps the total handed out
// ─────────────────────────────────────────────────────────────────────────────

/// Adapter that hands out at most `limit` bytes in total, then reports end of
/// input.  Wrapping an untrusted or endless source in it bounds a run.
#[derive(Debug)]
pub struct BoundedSource<S> {
    inner: S,
    remaining: u64,
}

impl<S: ByteSource> BoundedSource<S> {
    /// Wrap `inner`, allowing `limit` bytes through.
    pub fn new(inner: S, limit: u64) -> Self {
        Self { inner, remaining: limit }
    }

    /// Budget left.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Recover the wrapped source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteSource> ByteSource for BoundedSource<S> {
    fn pull(&mut self) -> &[u8] {
        if self.remaining == 0 {
            return &[];
        }
        let chunk = self.inner.pull();
        let n = (chunk.len() as u64).min(self.remaining) as usize;
        self.remaining -= n as u64;
        &chunk[..n]
    }
}
