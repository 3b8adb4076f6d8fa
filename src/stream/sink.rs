//! Push side of the pipeline: where decoded bytes go.
//!
//! The engine calls [`ByteSink::push`] with a run of decoded bytes whenever
//! its window fills and once more at stream end.  This is the only place
//! decompressed data becomes visible to the caller.

use std::io::Write;

use crate::inflate::types::SinkError;

/// Receiver of decompressed output.
pub trait ByteSink {
    /// Accept all of `data` or refuse it without side effects.
    fn push(&mut self, data: &[u8]) -> Result<(), SinkError>;
}

impl<K: ByteSink + ?Sized> ByteSink for &mut K {
    #[inline]
    fn push(&mut self, data: &[u8]) -> Result<(), SinkError> {
        (**self).push(data)
    }
}

impl<K: ByteSink + ?Sized> ByteSink for Box<K> {
    #[inline]
    fn push(&mut self, data: &[u8]) -> Result<(), SinkError> {
        (**self).push(data)
    }
}

/// Growable sink: appends everything.
impl ByteSink for Vec<u8> {
    fn push(&mut self, data: &[u8]) -> Result<(), SinkError> {
        self.extend_from_slice(data);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OutputSink: borrowed fixed buffer + write cursor
// ─────────────────────────────────────────────────────────────────────────────

/// Bounded sink writing into a caller-owned buffer.
///
/// A push that would pass the end of the buffer fails with
/// [`SinkError::CapacityExceeded`] and leaves both the buffer and the cursor
/// untouched.
#[derive(Debug)]
pub struct OutputSink<'a> {
    dst: &'a mut [u8],
    cursor: usize,
}

impl<'a> OutputSink<'a> {
    /// Sink writing from the start of `dst`.
    pub fn new(dst: &'a mut [u8]) -> Self {
        Self { dst, cursor: 0 }
    }

    /// Bytes written so far.
    #[inline]
    pub fn written(&self) -> usize {
        self.cursor
    }

    /// Total buffer size.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.dst.len()
    }

    /// Free space left.
    #[inline]
    pub fn available(&self) -> usize {
        self.dst.len() - self.cursor
    }

    /// The filled prefix of the buffer.
    pub fn filled(&self) -> &[u8] {
        &self.dst[..self.cursor]
    }
}

impl ByteSink for OutputSink<'_> {
    fn push(&mut self, data: &[u8]) -> Result<(), SinkError> {
        let available = self.available();
        if data.len() > available {
            return Err(SinkError::CapacityExceeded {
                requested: data.len(),
                available,
            });
        }
        let end = self.cursor + data.len();
        self.dst[self.cursor..end].copy_from_slice(data);
        self.cursor = end;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WriterSink: any io::Write
// ─────────────────────────────────────────────────────────────────────────────

/// Sink forwarding every push to an [`io::Write`](std::io::Write).
pub struct WriterSink<W> {
    writer: W,
    written: u64,
}

impl<W: Write> WriterSink<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Bytes forwarded so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Mutable access to the writer (e.g. to flush it).
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ByteSink for WriterSink<W> {
    fn push(&mut self, data: &[u8]) -> Result<(), SinkError> {
        self.writer
            .write_all(data)
            .map_err(|e| SinkError::Io(e.kind()))?;
        self.written += data.len() as u64;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// NullSink: count and discard
// ─────────────────────────────────────────────────────────────────────────────

/// Sink that discards output and counts it; used to verify a stream without
/// keeping the result.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink {
    /// Bytes discarded so far.
    pub count: u64,
}

impl ByteSink for NullSink {
    fn push(&mut self, data: &[u8]) -> Result<(), SinkError> {
        self.count += data.len() as u64;
        Ok(())
    }
}
