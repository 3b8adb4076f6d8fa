// e2e/abi.rs: the exported C surface, called the way C code would call it.
//
// Built only with `--features c-abi`.  Handles start zeroed, buffers are
// described with `infback_input_desc` / `infback_output_desc`, and the
// reference pull/push callbacks move the bytes.

use std::io::Write;
use std::ptr;
use std::slice;

use flate2::write::DeflateEncoder;
use flate2::Compression;
use infback::abi::{
    infback_engine, infback_engine_copy, infback_engine_end, infback_engine_init,
    infback_engine_run, infback_input_desc, infback_input_pull, infback_output_desc,
    infback_output_push,
};
use libc::{c_int, c_uchar, c_uint, c_void};

fn deflate(data: &[u8]) -> Vec<u8> {
    deflate_with(data, Compression::default())
}

fn deflate_with(data: &[u8], level: Compression) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), level);
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn input_desc(data: &[u8]) -> infback_input_desc {
    infback_input_desc { data: data.as_ptr(), len: data.len(), offset: 0 }
}

fn output_desc(buf: &mut [u8]) -> infback_output_desc {
    infback_output_desc { data: buf.as_mut_ptr(), capacity: buf.len(), written: 0 }
}

unsafe fn run(
    strm: &mut infback_engine,
    input: &mut infback_input_desc,
    output: &mut infback_output_desc,
) -> c_int {
    infback_engine_run(
        strm,
        Some(infback_input_pull),
        input as *mut _ as *mut c_void,
        Some(infback_output_push),
        output as *mut _ as *mut c_void,
    )
}

const ABC: &[u8] = b"abcabcabcabcabcabc";

// ── 1. Small-window scenarios ────────────────────────────────────────────────

#[test]
fn exact_capacity_succeeds() {
    let compressed = deflate(ABC);
    let mut window = [0u8; 256];
    let mut out = [0u8; 18];
    let mut strm = infback_engine::default();
    unsafe {
        assert_eq!(infback_engine_init(&mut strm, 8, window.as_mut_ptr()), 0);
        let mut input = input_desc(&compressed);
        let mut output = output_desc(&mut out);
        assert_eq!(run(&mut strm, &mut input, &mut output), 1);
        assert_eq!(output.written, ABC.len());
        assert_eq!(input.offset, compressed.len());
        assert_eq!(infback_engine_end(&mut strm), 0);
    }
    assert_eq!(&out, ABC);
}

#[test]
fn one_byte_short_is_output_error() {
    let compressed = deflate(ABC);
    let mut window = [0u8; 256];
    let mut out = [0u8; 17];
    let mut strm = infback_engine::default();
    unsafe {
        assert_eq!(infback_engine_init(&mut strm, 8, window.as_mut_ptr()), 0);
        let mut input = input_desc(&compressed);
        let mut output = output_desc(&mut out);
        assert_eq!(run(&mut strm, &mut input, &mut output), -6);
        assert_eq!(output.written, 0);
        infback_engine_end(&mut strm);
    }
}

#[test]
fn truncated_input_is_input_error() {
    let compressed = deflate(ABC);
    let mut window = [0u8; 256];
    let mut out = [0u8; 64];
    let mut strm = infback_engine::default();
    unsafe {
        assert_eq!(infback_engine_init(&mut strm, 8, window.as_mut_ptr()), 0);
        let mut input = input_desc(&compressed[..compressed.len() - 1]);
        let mut output = output_desc(&mut out);
        assert_eq!(run(&mut strm, &mut input, &mut output), -5);
        infback_engine_end(&mut strm);
    }
}

#[test]
fn corrupt_input_is_data_error() {
    let mut window = [0u8; 256];
    let mut out = [0u8; 8];
    let mut strm = infback_engine::default();
    unsafe {
        assert_eq!(infback_engine_init(&mut strm, 8, window.as_mut_ptr()), 0);
        let mut input = input_desc(&[0x07]);
        let mut output = output_desc(&mut out);
        assert_eq!(run(&mut strm, &mut input, &mut output), -3);
        infback_engine_end(&mut strm);
    }
}

// ── 2. Lifecycle ─────────────────────────────────────────────────────────────

#[test]
fn setup_errors() {
    let mut window = [0u8; 1 << 15];
    let mut strm = infback_engine::default();
    unsafe {
        assert_eq!(infback_engine_init(ptr::null_mut(), 15, window.as_mut_ptr()), -2);
        assert_eq!(infback_engine_init(&mut strm, 15, ptr::null_mut()), -2);
        assert_eq!(infback_engine_init(&mut strm, 7, window.as_mut_ptr()), -2);
        assert_eq!(infback_engine_init(&mut strm, 16, window.as_mut_ptr()), -2);

        assert_eq!(infback_engine_init(&mut strm, 15, window.as_mut_ptr()), 0);
        // Already initialized.
        assert_eq!(infback_engine_init(&mut strm, 15, window.as_mut_ptr()), -2);
        // Missing callbacks.
        assert_eq!(
            infback_engine_run(&mut strm, None, ptr::null_mut(), None, ptr::null_mut()),
            -2
        );
        assert_eq!(infback_engine_end(&mut strm), 0);
    }
}

#[test]
fn end_is_idempotent() {
    let mut window = [0u8; 512];
    let mut strm = infback_engine::default();
    unsafe {
        assert_eq!(infback_engine_end(&mut strm), 0);
        assert_eq!(infback_engine_init(&mut strm, 9, window.as_mut_ptr()), 0);
        assert_eq!(infback_engine_end(&mut strm), 0);
        assert_eq!(infback_engine_end(&mut strm), 0);
        assert_eq!(infback_engine_end(ptr::null_mut()), -2);
        // Ended handles can be initialized again.
        assert_eq!(infback_engine_init(&mut strm, 9, window.as_mut_ptr()), 0);
        assert_eq!(infback_engine_end(&mut strm), 0);
    }
}

#[test]
fn run_after_finish_is_state_error() {
    let compressed = deflate(b"once");
    let mut window = [0u8; 256];
    let mut out = [0u8; 16];
    let mut strm = infback_engine::default();
    unsafe {
        infback_engine_init(&mut strm, 8, window.as_mut_ptr());
        let mut input = input_desc(&compressed);
        let mut output = output_desc(&mut out);
        assert_eq!(run(&mut strm, &mut input, &mut output), 1);
        let mut input = input_desc(&compressed);
        assert_eq!(run(&mut strm, &mut input, &mut output), -2);
        infback_engine_end(&mut strm);
    }
}

// ── 3. Copies ────────────────────────────────────────────────────────────────

#[test]
fn copy_runs_independently_of_source() {
    let first = deflate(b"original engine output");
    let second = deflate(b"copied engine output");
    let mut window = [0u8; 1 << 15];
    let mut strm = infback_engine::default();
    let mut copy = infback_engine::default();
    let mut out_a = [0u8; 64];
    let mut out_b = [0u8; 64];
    unsafe {
        assert_eq!(infback_engine_init(&mut strm, 15, window.as_mut_ptr()), 0);
        assert_eq!(infback_engine_copy(&mut copy, &strm), 0);
        // A live destination is refused.
        assert_eq!(infback_engine_copy(&mut copy, &strm), -2);

        let mut in_a = input_desc(&first);
        let mut o_a = output_desc(&mut out_a);
        assert_eq!(run(&mut strm, &mut in_a, &mut o_a), 1);
        assert_eq!(infback_engine_end(&mut strm), 0);

        let mut in_b = input_desc(&second);
        let mut o_b = output_desc(&mut out_b);
        assert_eq!(run(&mut copy, &mut in_b, &mut o_b), 1);
        assert_eq!(o_b.written, 20);
        assert_eq!(infback_engine_end(&mut copy), 0);
    }
    assert_eq!(&out_a[..22], b"original engine output");
    assert_eq!(&out_b[..20], b"copied engine output");
}

/// Pull callback handing out at most 100 bytes per call.
unsafe extern "C" fn pull_100(state: *mut c_void, out_ptr: *mut *const c_uchar) -> c_uint {
    let desc = &mut *(state as *mut infback_input_desc);
    let n = (desc.len - desc.offset).min(100);
    *out_ptr = desc.data.add(desc.offset);
    desc.offset += n;
    n as c_uint
}

/// Push callback appending to a `Vec<u8>`.
unsafe extern "C" fn push_vec(state: *mut c_void, data: *mut c_uchar, len: c_uint) -> c_int {
    let out = &mut *(state as *mut Vec<u8>);
    out.extend_from_slice(slice::from_raw_parts(data, len as usize));
    0
}

/// Output collector that copies the engine it serves on its third push.
struct CopyOnThirdPush {
    strm: *const infback_engine,
    input: *const infback_input_desc,
    out: Vec<u8>,
    pushes: usize,
    copy: infback_engine,
    copy_status: c_int,
    out_at_copy: usize,
    input_at_copy: usize,
}

unsafe extern "C" fn push_and_copy(state: *mut c_void, data: *mut c_uchar, len: c_uint) -> c_int {
    let sink = &mut *(state as *mut CopyOnThirdPush);
    sink.pushes += 1;
    if sink.pushes == 3 {
        sink.copy_status = infback_engine_copy(&mut sink.copy, sink.strm);
        sink.out_at_copy = sink.out.len();
        sink.input_at_copy = (*sink.input).offset;
    }
    sink.out.extend_from_slice(slice::from_raw_parts(data, len as usize));
    0
}

fn copy_mid_run_matches_original(compressed: &[u8], expected: &[u8]) {
    let mut window = [0u8; 256];
    let mut strm = infback_engine::default();
    let strm_ptr: *mut infback_engine = &mut strm;
    let mut input = input_desc(compressed);
    let input_ptr: *mut infback_input_desc = &mut input;
    let mut sink = CopyOnThirdPush {
        strm: strm_ptr,
        input: input_ptr,
        out: Vec::new(),
        pushes: 0,
        copy: infback_engine::default(),
        copy_status: -99,
        out_at_copy: 0,
        input_at_copy: 0,
    };
    let mut rest: Vec<u8> = Vec::new();
    unsafe {
        assert_eq!(infback_engine_init(strm_ptr, 8, window.as_mut_ptr()), 0);
        let rc = infback_engine_run(
            strm_ptr,
            Some(pull_100),
            input_ptr as *mut c_void,
            Some(push_and_copy),
            &mut sink as *mut _ as *mut c_void,
        );
        assert_eq!(rc, 1);
        assert_eq!(infback_engine_end(strm_ptr), 0);
        assert_eq!(sink.copy_status, 0);

        // The copy continues with the input its original had not pulled yet.
        let tail = &compressed[sink.input_at_copy..];
        let mut copy_input = input_desc(tail);
        let rc = infback_engine_run(
            &mut sink.copy,
            Some(pull_100),
            &mut copy_input as *mut _ as *mut c_void,
            Some(push_vec),
            &mut rest as *mut _ as *mut c_void,
        );
        assert_eq!(rc, 1);
        assert_eq!(infback_engine_end(&mut sink.copy), 0);
    }
    assert_eq!(sink.out, expected);
    assert!(sink.out_at_copy > 0);
    // The copy re-pushes the window that was being pushed, then the rest.
    assert_eq!(rest, &expected[sink.out_at_copy..]);
}

#[test]
fn copy_taken_inside_push_finishes_stored_stream() {
    let data: Vec<u8> = (0..2000u32).map(|i| (i * 7 % 251) as u8).collect();
    copy_mid_run_matches_original(&deflate_with(&data, Compression::none()), &data);
}

#[test]
fn copy_taken_inside_push_finishes_dynamic_stream() {
    let data: Vec<u8> = b"copied mid-stream, resumed independently; "
        .iter()
        .cycle()
        .take(5000)
        .enumerate()
        .map(|(i, &b)| if i % 97 == 0 { b'#' } else { b })
        .collect();
    copy_mid_run_matches_original(&deflate(&data), &data);
}

// ── 4. Reference callbacks ───────────────────────────────────────────────────

#[test]
fn input_pull_hands_out_remainder_once() {
    let data = [1u8, 2, 3];
    let mut desc = input_desc(&data);
    let mut chunk: *const c_uchar = ptr::null();
    unsafe {
        let state = &mut desc as *mut _ as *mut c_void;
        assert_eq!(infback_input_pull(state, &mut chunk), 3);
        assert_eq!(*chunk, 1);
        assert_eq!(infback_input_pull(state, &mut chunk), 0);
        assert_eq!(infback_input_pull(ptr::null_mut(), &mut chunk), 0);
    }
    assert_eq!(desc.offset, 3);
}

#[test]
fn output_push_refuses_overflow_without_copying() {
    let mut buf = [0u8; 4];
    let mut desc = output_desc(&mut buf);
    let mut data = *b"xyz";
    unsafe {
        let state = &mut desc as *mut _ as *mut c_void;
        assert_eq!(infback_output_push(state, data.as_mut_ptr(), 3 as c_uint), 0);
        assert_eq!(infback_output_push(state, data.as_mut_ptr(), 2), 1);
        assert_eq!(infback_output_push(state, data.as_mut_ptr(), 0), 0);
    }
    assert_eq!(desc.written, 3);
    assert_eq!(buf, [b'x', b'y', b'z', 0]);
}
