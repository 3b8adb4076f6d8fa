// Hand-built streams for every corruption class, plus a few near misses that
// must still decode.

use infback::{decompress_to_vec, Corruption, InflateBack, InflateError, InputCursor};

use super::bitwriter::BitWriter;

fn inflate(data: &[u8]) -> Result<Vec<u8>, InflateError> {
    decompress_to_vec(data, 15)
}

fn corrupt(data: &[u8]) -> Corruption {
    match inflate(data) {
        Err(InflateError::Corrupt(c)) => c,
        other => panic!("expected corruption, got {:?}", other),
    }
}

/// Dynamic block header whose code-length code has two one-bit symbols:
/// length 0 (code `0`) and length 8 (code `1`).
fn dynamic_zero_eight(hlit: u32, hdist: u32) -> BitWriter {
    let mut w = BitWriter::new();
    w.header(true, 2).bits(hlit, 5).bits(hdist, 5).bits(1, 4);
    // Order 16, 17, 18, 0, 8.
    for len in [0, 0, 0, 1, 1] {
        w.bits(len, 3);
    }
    w
}

fn put_lengths(w: &mut BitWriter, lens: &[u8]) {
    for &len in lens {
        match len {
            0 => w.code(0, 1),
            8 => w.code(1, 1),
            _ => unreachable!(),
        };
    }
}

/// Literal/length lengths: 0..=254 and 256 at 8 bits, 255 unused.
fn full_literal_lengths() -> Vec<u8> {
    let mut lens = vec![8u8; 255];
    lens.push(0);
    lens.push(8);
    lens
}

// ── Block framing ─────────────────────────────────────────────────────────────

#[test]
fn reserved_block_type() {
    let data = BitWriter::new().header(true, 3).finish();
    assert_eq!(corrupt(&data), Corruption::InvalidBlockType);
}

#[test]
fn stored_length_complement_mismatch() {
    assert_eq!(corrupt(&[0x01, 0x05, 0x00, 0x00, 0x00]), Corruption::StoredLengthMismatch);
}

#[test]
fn empty_stored_block_is_valid() {
    assert_eq!(inflate(&[0x01, 0x00, 0x00, 0xFF, 0xFF]), Ok(Vec::new()));
}

#[test]
fn empty_input_is_premature_end() {
    assert_eq!(inflate(&[]), Err(InflateError::PrematureEnd));
}

#[test]
fn non_final_block_then_nothing_is_premature_end() {
    // An empty fixed block without BFINAL: the decoder wants another header.
    let data = BitWriter::new().header(false, 1).code(0, 7).finish();
    assert_eq!(inflate(&data), Err(InflateError::PrematureEnd));
}

// ── Dynamic headers ───────────────────────────────────────────────────────────

#[test]
fn too_many_literal_length_symbols() {
    let data = BitWriter::new().header(true, 2).bits(30, 5).bits(0, 5).bits(0, 4).finish();
    assert_eq!(corrupt(&data), Corruption::TooManySymbols);
}

#[test]
fn too_many_distance_symbols() {
    let data = BitWriter::new().header(true, 2).bits(0, 5).bits(30, 5).bits(0, 4).finish();
    assert_eq!(corrupt(&data), Corruption::TooManySymbols);
}

#[test]
fn empty_code_length_code() {
    let mut w = BitWriter::new();
    w.header(true, 2).bits(0, 5).bits(0, 5).bits(0, 4);
    for _ in 0..4 {
        w.bits(0, 3);
    }
    assert_eq!(corrupt(&w.finish()), Corruption::InvalidCodeLengthsSet);
}

#[test]
fn over_subscribed_code_length_code() {
    let mut w = BitWriter::new();
    w.header(true, 2).bits(0, 5).bits(0, 5).bits(0, 4);
    // 16, 17, 18 at one bit each: three one-bit codes.
    for len in [1, 1, 1, 0] {
        w.bits(len, 3);
    }
    assert_eq!(corrupt(&w.finish()), Corruption::InvalidCodeLengthsSet);
}

/// Code-length code: length 0 is `0`, repeat-previous (16) is `1`.
fn dynamic_zero_repeat() -> BitWriter {
    let mut w = BitWriter::new();
    w.header(true, 2).bits(0, 5).bits(0, 5).bits(0, 4);
    for len in [1, 0, 0, 1] {
        w.bits(len, 3);
    }
    w
}

#[test]
fn repeat_with_no_previous_length() {
    let mut w = dynamic_zero_repeat();
    w.code(1, 1).bits(0, 2);
    assert_eq!(corrupt(&w.finish()), Corruption::InvalidBitLengthRepeat);
}

#[test]
fn repeat_running_past_the_table() {
    let mut w = dynamic_zero_repeat();
    for _ in 0..257 {
        w.code(0, 1);
    }
    // One slot left, repeat of three.
    w.code(1, 1).bits(0, 2);
    assert_eq!(corrupt(&w.finish()), Corruption::InvalidBitLengthRepeat);
}

#[test]
fn missing_end_of_block_code() {
    let mut w = dynamic_zero_eight(0, 0);
    put_lengths(&mut w, &[0; 258]);
    assert_eq!(corrupt(&w.finish()), Corruption::MissingEndOfBlock);
}

#[test]
fn incomplete_literal_length_code() {
    let mut w = dynamic_zero_eight(0, 0);
    let mut lens = vec![0u8; 256];
    lens.push(8);
    lens.push(0);
    put_lengths(&mut w, &lens);
    assert_eq!(corrupt(&w.finish()), Corruption::InvalidLiteralLengthsSet);
}

#[test]
fn incomplete_distance_code() {
    let mut w = dynamic_zero_eight(0, 1);
    let mut lens = full_literal_lengths();
    lens.extend_from_slice(&[8, 8]);
    put_lengths(&mut w, &lens);
    assert_eq!(corrupt(&w.finish()), Corruption::InvalidDistancesSet);
}

#[test]
fn literal_only_dynamic_block_decodes() {
    let mut w = dynamic_zero_eight(0, 0);
    let mut lens = full_literal_lengths();
    lens.push(0);
    put_lengths(&mut w, &lens);
    // 'A' then end-of-block (symbol 256 holds the last 8-bit code).
    w.code(b'A' as u32, 8).code(255, 8);
    assert_eq!(inflate(&w.finish()), Ok(b"A".to_vec()));
}

// ── Symbols ───────────────────────────────────────────────────────────────────

#[test]
fn reserved_literal_length_symbol() {
    // Fixed code 11000110 is symbol 286.
    let data = BitWriter::new().header(true, 1).code(0b1100_0110, 8).finish();
    assert_eq!(corrupt(&data), Corruption::InvalidLiteralLengthCode);
}

#[test]
fn reserved_distance_symbol() {
    // Length symbol 257 (3 bytes), then distance symbol 30.
    let data = BitWriter::new()
        .header(true, 1)
        .code(0b000_0001, 7)
        .code(30, 5)
        .finish();
    assert_eq!(corrupt(&data), Corruption::InvalidDistanceCode);
}

#[test]
fn distance_beyond_history_keeps_earlier_output() {
    // Literal 'a', then length 3 at distance 2 with only one byte of history.
    let data = BitWriter::new()
        .header(true, 1)
        .code(0x30 + b'a' as u32, 8)
        .code(0b000_0001, 7)
        .code(1, 5)
        .finish();

    let mut window = vec![0u8; 1 << 15];
    let mut engine = InflateBack::with_window(&mut window, 15).unwrap();
    let mut out = Vec::new();
    assert_eq!(
        engine.run(&mut InputCursor::new(&data), &mut out),
        Err(InflateError::Corrupt(Corruption::DistanceTooFarBack))
    );
    assert_eq!(out, b"a");
    engine.end();
}

#[test]
fn error_codes_follow_the_taxonomy() {
    assert_eq!(InflateError::Corrupt(Corruption::InvalidBlockType).code(), -3);
    assert_eq!(InflateError::PrematureEnd.code(), -5);
    assert_eq!(InflateError::InvalidWindowBits(3).code(), -2);
    assert!(InflateError::InvalidWindowBits(3).is_setup_error());
    assert!(!InflateError::PrematureEnd.is_setup_error());
}
