// e2e/roundtrip.rs: end-to-end round trips through every public entry point.
//
// Data is compressed with flate2 and decoded through the one-shot helpers,
// the engine with each sink kind, the stream API, and the copy path, so a
// regression in any layer shows up as a byte mismatch here.

use std::io::{Cursor, Write};

use flate2::write::DeflateEncoder;
use flate2::Compression;
use infback::io::decompress_stream;
use infback::{
    decompress, decompress_to_vec, InflateBack, InputCursor, NullSink, OutputSink, WriterSink,
};

fn deflate(data: &[u8], level: u32) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::new(level));
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn corpus() -> Vec<(&'static str, Vec<u8>)> {
    let mut rng = 0x2545_F491u32;
    let random: Vec<u8> = (0..100_000)
        .map(|_| {
            rng ^= rng << 13;
            rng ^= rng >> 17;
            rng ^= rng << 5;
            rng as u8
        })
        .collect();
    let prose = "It was the best of times, it was the worst of times, "
        .repeat(2000)
        .into_bytes();
    let mut mixed = Vec::new();
    for i in 0..200u32 {
        mixed.extend_from_slice(&prose[(i as usize * 37) % 1000..][..300]);
        mixed.extend_from_slice(&random[i as usize * 100..][..100]);
    }
    vec![
        ("empty", Vec::new()),
        ("one byte", vec![0xA5]),
        ("zeros", vec![0; 65_537]),
        ("random", random),
        ("prose", prose),
        ("mixed", mixed),
    ]
}

// ── 1. One-shot helpers ──────────────────────────────────────────────────────

#[test]
fn one_shot_exact_buffer_all_levels() {
    for (name, data) in corpus() {
        for level in [0, 1, 6, 9] {
            let compressed = deflate(&data, level);
            let mut out = vec![0u8; data.len()];
            let n = decompress(&compressed, &mut out, 15)
                .unwrap_or_else(|e| panic!("{} level {}: {}", name, level, e));
            assert_eq!(n, data.len());
            assert!(out == data, "{} level {}: mismatch", name, level);
        }
    }
}

#[test]
fn one_shot_into_vec() {
    for (name, data) in corpus() {
        let compressed = deflate(&data, 6);
        assert!(decompress_to_vec(&compressed, 15).unwrap() == data, "{}", name);
    }
}

// ── 2. Engine with each sink ─────────────────────────────────────────────────

#[test]
fn engine_reuse_across_corpus() {
    let mut window = vec![0u8; 1 << 15];
    let mut engine = InflateBack::with_window(&mut window, 15).unwrap();
    for (name, data) in corpus() {
        let compressed = deflate(&data, 6);

        let mut out = vec![0u8; data.len()];
        let mut sink = OutputSink::new(&mut out);
        engine.run(&mut InputCursor::new(&compressed), &mut sink).unwrap();
        assert_eq!(sink.written(), data.len(), "{}", name);
        assert!(out == data, "{}", name);
        engine.reset().unwrap();

        let mut counter = NullSink::default();
        engine.run(&mut InputCursor::new(&compressed), &mut counter).unwrap();
        assert_eq!(counter.count, data.len() as u64, "{}", name);
        engine.reset().unwrap();

        let mut writer = WriterSink::new(Vec::new());
        engine.run(&mut InputCursor::new(&compressed), &mut writer).unwrap();
        assert!(writer.into_inner() == data, "{}", name);
        engine.reset().unwrap();
    }
    engine.end();
}

// ── 3. Stream API ────────────────────────────────────────────────────────────

#[test]
fn stream_api_matches_one_shot() {
    for (name, data) in corpus() {
        let compressed = deflate(&data, 9);
        let mut out = Vec::new();
        let stats = decompress_stream(Cursor::new(&compressed), &mut out, 15).unwrap();
        assert!(out == data, "{}", name);
        assert_eq!(stats.bytes_in, compressed.len() as u64, "{}", name);
    }
}

// ── 4. Copies mid-life ───────────────────────────────────────────────────────

#[test]
fn copies_decode_in_any_order() {
    let corpus = corpus();
    let (_, prose) = &corpus[4];
    let compressed = deflate(prose, 6);

    let mut window = vec![0u8; 1 << 15];
    let original = InflateBack::with_window(&mut window, 15).unwrap();
    let mut copies: Vec<InflateBack<'static>> = (0..4).map(|_| original.copy().unwrap()).collect();

    for copy in copies.iter_mut().rev() {
        let mut out = Vec::new();
        copy.run(&mut InputCursor::new(&compressed), &mut out).unwrap();
        assert!(&out == prose);
        copy.end();
    }
}
