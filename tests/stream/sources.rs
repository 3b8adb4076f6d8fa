// Input side: cursors, reader-backed sources and the byte cap.

use std::io::{self, Read};

use infback::{BoundedSource, ByteSource, InputCursor, ReaderSource};

#[test]
fn cursor_offset_only_moves_forward() {
    let data: Vec<u8> = (0..=255).collect();
    let mut cursor = InputCursor::new(&data);
    let mut last = cursor.remaining();
    for _ in 0..4 {
        cursor.pull();
        assert!(cursor.remaining() <= last);
        last = cursor.remaining();
    }
    assert_eq!(cursor.consumed(), cursor.len());
}

#[test]
fn cursor_clone_is_independent() {
    let data = *b"xyz";
    let mut a = InputCursor::new(&data);
    let mut b = a.clone();
    assert_eq!(a.pull(), b"xyz");
    assert_eq!(b.remaining(), 3);
    assert_eq!(b.pull(), b"xyz");
}

/// Reader that yields its data a few bytes at a time, interrupting once.
struct Choppy {
    data: Vec<u8>,
    interrupted: bool,
}

impl Read for Choppy {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.interrupted {
            self.interrupted = true;
            return Err(io::Error::new(io::ErrorKind::Interrupted, "again"));
        }
        let n = buf.len().min(self.data.len()).min(3);
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data.drain(..n);
        Ok(n)
    }
}

#[test]
fn reader_source_retries_interrupted_reads() {
    let mut src = ReaderSource::new(Choppy { data: b"abcdefg".to_vec(), interrupted: false });
    let mut collected = Vec::new();
    loop {
        let chunk = src.pull();
        if chunk.is_empty() {
            break;
        }
        collected.extend_from_slice(chunk);
    }
    assert_eq!(collected, b"abcdefg");
    assert_eq!(src.total_read(), 7);
    assert!(src.take_error().is_none());
}

#[test]
fn bounded_source_splits_budget_across_pulls() {
    let data = [1u8; 10];
    let mut src = BoundedSource::new(ReaderSource::with_capacity(4, &data[..]), 7);
    assert_eq!(src.pull().len(), 4);
    assert_eq!(src.remaining(), 3);
    assert_eq!(src.pull().len(), 3);
    assert!(src.pull().is_empty());
    assert_eq!(src.into_inner().total_read(), 8);
}

#[test]
fn boxed_source_forwards() {
    let data = *b"boxed";
    let mut src: Box<dyn ByteSource + '_> = Box::new(InputCursor::new(&data));
    assert_eq!(src.pull(), b"boxed");
    assert!(src.pull().is_empty());
}
