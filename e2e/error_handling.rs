// e2e/error_handling.rs: error classes as seen by each layer.
//
// Every malformed input must come back as an error of the right class, never
// a panic, and the engine must stay usable (after `reset` or `end`/`init`).

use std::io::{self, Write};

use flate2::write::DeflateEncoder;
use flate2::Compression;
use infback::io::test_stream;
use infback::{
    decompress, decompress_to_vec, Corruption, EngineState, InflateBack, InflateError,
    InputCursor, NullSink, SinkError,
};

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn sample() -> Vec<u8> {
    (0..20_000u32).map(|i| b"deflate"[(i % 7) as usize] ^ (i / 700) as u8).collect()
}

// ── 1. Every truncation point ─────────────────────────────────────────────────

#[test]
fn every_prefix_is_premature_end() {
    let compressed = deflate(&sample());
    for cut in 0..compressed.len() {
        let r = decompress_to_vec(&compressed[..cut], 15);
        assert_eq!(r, Err(InflateError::PrematureEnd), "cut at {}", cut);
    }
}

// ── 2. Bit flips never panic ──────────────────────────────────────────────────

#[test]
fn single_bit_flips_fail_cleanly_or_decode() {
    let data = sample();
    let compressed = deflate(&data);
    for byte in 0..compressed.len().min(64) {
        for bit in 0..8 {
            let mut damaged = compressed.clone();
            damaged[byte] ^= 1 << bit;
            let mut sink = NullSink::default();
            let mut window = vec![0u8; 1 << 15];
            let mut engine = InflateBack::with_window(&mut window, 15).unwrap();
            match engine.run(&mut InputCursor::new(&damaged), &mut sink) {
                Ok(()) => assert_eq!(engine.state(), EngineState::Finished),
                Err(e) => {
                    assert!(!e.is_setup_error(), "{}", e);
                    assert_eq!(engine.state(), EngineState::Failed);
                }
            }
            engine.end();
        }
    }
}

// ── 3. Garbage input ──────────────────────────────────────────────────────────

#[test]
fn garbage_prefixes() {
    assert_eq!(
        decompress_to_vec(&[0xFF; 16], 15),
        Err(InflateError::Corrupt(Corruption::InvalidBlockType))
    );
    // Stored block whose NLEN is not the complement of LEN.
    assert_eq!(
        decompress_to_vec(&[0x00, 0x10, 0x00, 0x10, 0x00], 15),
        Err(InflateError::Corrupt(Corruption::StoredLengthMismatch))
    );
}

// ── 4. Sink failures ──────────────────────────────────────────────────────────

#[test]
fn every_short_capacity_is_a_sink_error() {
    let data = b"short output buffers must never be overrun".repeat(3);
    let compressed = deflate(&data);
    for cap in 0..data.len() {
        let mut out = vec![0u8; cap];
        match decompress(&compressed, &mut out, 15) {
            Err(InflateError::Sink(SinkError::CapacityExceeded { requested, available })) => {
                assert!(requested > available);
                assert!(available <= cap);
            }
            other => panic!("capacity {}: {:?}", cap, other),
        }
    }
}

// ── 5. Recovery ───────────────────────────────────────────────────────────────

#[test]
fn engine_recovers_after_reset() {
    let good = deflate(b"recovered");
    let mut window = vec![0u8; 1 << 15];
    let mut engine = InflateBack::with_window(&mut window, 15).unwrap();

    assert!(engine.run(&mut InputCursor::new(&[0x07]), &mut NullSink::default()).is_err());
    assert_eq!(engine.state(), EngineState::Failed);
    assert!(matches!(
        engine.run(&mut InputCursor::new(&good), &mut NullSink::default()),
        Err(InflateError::BadState(EngineState::Failed))
    ));

    engine.reset().unwrap();
    let mut out = Vec::new();
    engine.run(&mut InputCursor::new(&good), &mut out).unwrap();
    assert_eq!(out, b"recovered");
    engine.end();
}

// ── 6. IO layer classes ───────────────────────────────────────────────────────

#[test]
fn io_layer_error_kinds() {
    let compressed = deflate(&sample());
    let cut = &compressed[..compressed.len() / 2];
    assert_eq!(test_stream(cut, 15).unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    assert_eq!(test_stream(&[0xFFu8][..], 15).unwrap_err().kind(), io::ErrorKind::InvalidData);
    assert_eq!(test_stream(&compressed[..], 3).unwrap_err().kind(), io::ErrorKind::InvalidInput);
}
