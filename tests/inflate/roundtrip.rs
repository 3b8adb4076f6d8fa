// Round trips against a reference compressor, across window sizes, input
// lengths, block types and source shapes.

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;
use infback::{
    decompress, decompress_to_vec, BoundedSource, ByteSource, InflateBack, InflateError,
    InputCursor, OutputSink, ReaderSource, WriterSink,
};

fn deflate_with(data: &[u8], level: Compression) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), level);
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn deflate(data: &[u8]) -> Vec<u8> {
    deflate_with(data, Compression::default())
}

/// Deterministic pseudo-random bytes (xorshift), compressible only a little.
fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut x = seed | 1;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            (x >> 24) as u8
        })
        .collect()
}

/// Text with long-range repeats, so back-references reach far back.
fn text(len: usize) -> Vec<u8> {
    let words = ["alpha ", "beta ", "gamma ", "delta\n", "epsilon ", "zeta "];
    let mut out = Vec::with_capacity(len);
    let mut i = 0usize;
    while out.len() < len {
        out.extend_from_slice(words[(i * 7 + i / 5) % words.len()].as_bytes());
        i += 1;
    }
    out.truncate(len);
    out
}

fn inflate_exact(compressed: &[u8], expected_len: usize, bits: i32) -> Vec<u8> {
    let mut out = vec![0u8; expected_len];
    let n = decompress(compressed, &mut out, bits).unwrap();
    assert_eq!(n, expected_len);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Lengths around the window size
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_round_trips() {
    let compressed = deflate(b"");
    assert_eq!(inflate_exact(&compressed, 0, 15), b"");
    assert_eq!(inflate_exact(&compressed, 0, 8), b"");
}

#[test]
fn single_byte_round_trips() {
    let compressed = deflate(b"x");
    assert_eq!(inflate_exact(&compressed, 1, 15), b"x");
    assert_eq!(inflate_exact(&compressed, 1, 8), b"x");
}

#[test]
fn lengths_straddling_full_window() {
    let size = 1usize << 15;
    for len in [size - 1, size, size + 1, 3 * size + 17] {
        let data = text(len);
        let compressed = deflate(&data);
        assert_eq!(inflate_exact(&compressed, len, 15), data, "length {}", len);
    }
}

#[test]
fn small_windows_with_stored_blocks() {
    // Stored blocks carry no back-references, so any window can decode them.
    for bits in 8..=15 {
        let size = 1usize << bits;
        for len in [size - 1, size, size + 1, 4 * size + 3] {
            let data = noise(len, bits as u32);
            let compressed = deflate_with(&data, Compression::none());
            assert_eq!(inflate_exact(&compressed, len, bits), data, "bits {} length {}", bits, len);
        }
    }
}

#[test]
fn every_compression_level() {
    let data = text(100_000);
    for level in 0..=9 {
        let compressed = deflate_with(&data, Compression::new(level));
        assert_eq!(decompress_to_vec(&compressed, 15).unwrap(), data, "level {}", level);
    }
}

#[test]
fn incompressible_data() {
    let data = noise(70_000, 0xBEEF);
    let compressed = deflate_with(&data, Compression::best());
    assert_eq!(decompress_to_vec(&compressed, 15).unwrap(), data);
}

#[test]
fn long_runs_use_overlapping_matches() {
    let mut data = vec![0u8; 50_000];
    data.extend(std::iter::repeat(b'r').take(50_000));
    let compressed = deflate(&data);
    assert!(compressed.len() < 1000);
    assert_eq!(decompress_to_vec(&compressed, 15).unwrap(), data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Sink sizing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn roomy_sink_reports_actual_length() {
    let data = text(5000);
    let compressed = deflate(&data);
    let mut out = vec![0u8; 8000];
    let n = decompress(&compressed, &mut out, 15).unwrap();
    assert_eq!(n, 5000);
    assert_eq!(&out[..n], &data[..]);
}

#[test]
fn short_sink_fails_on_large_stream() {
    let data = text(5000);
    let compressed = deflate(&data);
    let mut out = vec![0u8; 4999];
    assert!(matches!(decompress(&compressed, &mut out, 15), Err(InflateError::Sink(_))));
}

#[test]
fn window_too_small_for_stream_distances() {
    // Long-range repeats at distances well over 256 bytes.
    let block = noise(1000, 7);
    let data = [block.clone(), block].concat();
    let compressed = deflate(&data);
    assert_eq!(decompress_to_vec(&compressed, 15).unwrap(), data);
    assert!(matches!(
        decompress_to_vec(&compressed, 8),
        Err(InflateError::Corrupt(infback::Corruption::DistanceTooFarBack))
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Source shapes
// ─────────────────────────────────────────────────────────────────────────────

/// Source handing out one byte per pull.
struct Trickle<'a>(&'a [u8]);

impl ByteSource for Trickle<'_> {
    fn pull(&mut self) -> &[u8] {
        let n = self.0.len().min(1);
        let (head, tail) = self.0.split_at(n);
        self.0 = tail;
        head
    }
}

fn run_with<S: ByteSource>(mut source: S, bits: i32) -> Result<Vec<u8>, InflateError> {
    let mut window = vec![0u8; 1 << bits];
    let mut engine = InflateBack::with_window(&mut window, bits)?;
    let mut out = Vec::new();
    let r = engine.run(&mut source, &mut out);
    engine.end();
    r.map(|()| out)
}

#[test]
fn one_byte_pulls_decode_the_same() {
    let data = text(40_000);
    let compressed = deflate(&data);
    assert_eq!(run_with(Trickle(&compressed), 15).unwrap(), data);

    let stored = deflate_with(&data[..3000], Compression::none());
    assert_eq!(run_with(Trickle(&stored), 9).unwrap(), &data[..3000]);
}

#[test]
fn reader_source_with_small_buffer() {
    let data = text(20_000);
    let compressed = deflate(&data);
    let source = ReaderSource::with_capacity(13, &compressed[..]);
    assert_eq!(run_with(source, 15).unwrap(), data);
}

#[test]
fn bounded_source_cuts_the_stream_short() {
    let data = text(20_000);
    let compressed = deflate(&data);
    let limit = compressed.len() as u64 / 2;
    let source = BoundedSource::new(InputCursor::new(&compressed), limit);
    assert_eq!(run_with(source, 15), Err(InflateError::PrematureEnd));

    let whole = BoundedSource::new(InputCursor::new(&compressed), compressed.len() as u64);
    assert_eq!(run_with(whole, 15).unwrap(), data);
}

#[test]
fn writer_sink_collects_output() {
    let data = text(70_000);
    let compressed = deflate(&data);
    let mut window = vec![0u8; 1 << 15];
    let mut engine = InflateBack::with_window(&mut window, 15).unwrap();
    let mut sink = WriterSink::new(Vec::new());
    engine.run(&mut InputCursor::new(&compressed), &mut sink).unwrap();
    assert_eq!(sink.written(), data.len() as u64);
    assert_eq!(sink.into_inner(), data);
}

#[test]
fn reset_engine_decodes_a_second_stream() {
    let first = text(3000);
    let second = noise(3000, 3);
    let mut window = vec![0u8; 1 << 15];
    let mut engine = InflateBack::with_window(&mut window, 15).unwrap();

    let mut buf = vec![0u8; 3000];
    let mut sink = OutputSink::new(&mut buf);
    engine.run(&mut InputCursor::new(&deflate(&first)), &mut sink).unwrap();
    assert_eq!(sink.filled(), &first[..]);

    engine.reset().unwrap();
    let mut sink = OutputSink::new(&mut buf);
    engine.run(&mut InputCursor::new(&deflate(&second)), &mut sink).unwrap();
    assert_eq!(sink.filled(), &second[..]);
    engine.end();
}
