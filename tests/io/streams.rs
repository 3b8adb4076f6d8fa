// Reader-to-writer decoding and the engine-to-io error mapping.

use std::io::{self, Cursor, Write};

use flate2::write::DeflateEncoder;
use flate2::Compression;
use infback::io::{decompress_stream, test_stream, DecompressStats};

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

#[test]
fn large_stream_through_reader_and_writer() {
    let data: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8 ^ (i >> 11) as u8).collect();
    let compressed = deflate(&data);
    let mut out = Vec::new();
    let stats = decompress_stream(Cursor::new(&compressed), &mut out, 15).unwrap();
    assert_eq!(out, data);
    assert_eq!(
        stats,
        DecompressStats {
            bytes_in: compressed.len() as u64,
            bytes_out: data.len() as u64,
            trailing: 0,
        }
    );
}

#[test]
fn test_stream_discards_output() {
    let compressed = deflate(b"verify me");
    let stats = test_stream(&compressed[..], 15).unwrap();
    assert_eq!(stats.bytes_out, 9);
}

#[test]
fn truncated_stream_is_unexpected_eof() {
    let compressed = deflate(&[42u8; 10_000]);
    let err = test_stream(&compressed[..compressed.len() - 2], 15).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}

/// Writer that accepts a few bytes, then fails.
struct Fragile(usize);

impl Write for Fragile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.0 == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"));
        }
        let n = buf.len().min(self.0);
        self.0 -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn writer_failure_keeps_its_kind() {
    let compressed = deflate(&[7u8; 100_000]);
    let err = decompress_stream(&compressed[..], Fragile(1000), 15).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WriteZero);
}

#[test]
fn small_window_on_far_references_is_invalid_data() {
    let mut data: Vec<u8> = (0..2000u32)
        .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
        .collect();
    data.extend_from_within(..2000);
    let compressed = deflate(&data);
    let err = test_stream(&compressed[..], 8).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}
