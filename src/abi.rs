//! C-ABI shims: export the engine lifecycle and the reference callbacks.
//!
//! Enabled with:
//!   cargo build --release --features c-abi
//!
//! The produced `target/release/libinfback.a` exposes `infback_engine_init`,
//! `infback_engine_run`, `infback_engine_end` and `infback_engine_copy`, plus
//! `infback_input_pull` / `infback_output_push`, which implement the pull and
//! push callbacks over the `infback_input_desc` / `infback_output_desc`
//! descriptors.
//!
//! An `infback_engine` must be zero-initialized before the first
//! `infback_engine_init`, and every successful init (or copy) must be paired
//! with `infback_engine_end`.  The window passed to init must stay valid and
//! unaliased until then.
//!
//! While `infback_engine_run` is suspended in a callback, no Rust reference
//! to the engine is live, so the callback may pass the same handle to
//! `infback_engine_copy`.  Ending or re-running that handle from a callback
//! is not allowed.

#![allow(non_camel_case_types)]

use std::ptr;
use std::slice;

use libc::{c_int, c_uchar, c_uint, c_void, size_t};

use crate::inflate::engine::Demand;
use crate::inflate::types::{STATUS_OK, STATUS_PARAM_ERROR, STATUS_STREAM_END};
use crate::inflate::{window_size, InflateBack, InflateError, SinkError};
use crate::stream::{ByteSink, ByteSource};

// ─── types ───────────────────────────────────────────────────────────────────

/// `unsigned (*)(void *state, const unsigned char **out_ptr)`
///
/// Stores a pointer to the next chunk in `*out_ptr` and returns its length;
/// `0` means end of input.
pub type infback_pull_fn =
    Option<unsafe extern "C" fn(state: *mut c_void, out_ptr: *mut *const c_uchar) -> c_uint>;

/// `int (*)(void *state, unsigned char *data, unsigned len)`
///
/// Consumes `len` decoded bytes; any non-zero return aborts the run.
pub type infback_push_fn =
    Option<unsafe extern "C" fn(state: *mut c_void, data: *mut c_uchar, len: c_uint) -> c_int>;

/// Opaque engine handle.  Zero-initialize before use.
#[repr(C)]
pub struct infback_engine {
    inner: *mut c_void,
}

impl Default for infback_engine {
    fn default() -> Self {
        Self { inner: ptr::null_mut() }
    }
}

/// Bounded input cursor for [`infback_input_pull`].
#[repr(C)]
pub struct infback_input_desc {
    pub data: *const c_uchar,
    pub len: size_t,
    pub offset: size_t,
}

/// Bounded output cursor for [`infback_output_push`].
#[repr(C)]
pub struct infback_output_desc {
    pub data: *mut c_uchar,
    pub capacity: size_t,
    pub written: size_t,
}

// ─── helpers ─────────────────────────────────────────────────────────────────

type Engine = InflateBack<'static>;

#[inline(always)]
unsafe fn engine_ptr(strm: *mut infback_engine) -> *mut Engine {
    if strm.is_null() {
        return ptr::null_mut();
    }
    (*strm).inner as *mut Engine
}

/// [`ByteSource`] over a foreign pull callback.
struct ForeignSource {
    pull: unsafe extern "C" fn(*mut c_void, *mut *const c_uchar) -> c_uint,
    state: *mut c_void,
}

impl ByteSource for ForeignSource {
    fn pull(&mut self) -> &[u8] {
        let mut chunk: *const c_uchar = ptr::null();
        // SAFETY: the caller of `infback_engine_run` vouches for the callback
        // and for the chunk staying valid until the next pull.
        unsafe {
            let n = (self.pull)(self.state, &mut chunk);
            if n == 0 || chunk.is_null() {
                return &[];
            }
            slice::from_raw_parts(chunk, n as usize)
        }
    }
}

/// [`ByteSink`] over a foreign push callback.
struct ForeignSink {
    push: unsafe extern "C" fn(*mut c_void, *mut c_uchar, c_uint) -> c_int,
    state: *mut c_void,
}

impl ByteSink for ForeignSink {
    fn push(&mut self, data: &[u8]) -> Result<(), SinkError> {
        // Windows are at most 32 KiB, so a push always fits in `unsigned`.
        let status =
            unsafe { (self.push)(self.state, data.as_ptr() as *mut c_uchar, data.len() as c_uint) };
        if status == 0 {
            Ok(())
        } else {
            Err(SinkError::Rejected(status))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// infback_engine_init
//
// int infback_engine_init(infback_engine *strm, int window_bits,
//                         unsigned char *window);
//
// `window` must hold at least 1 << window_bits bytes.  Returns 0, or -2 on a
// null argument, bad window_bits, or an engine that was not ended.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn infback_engine_init(
    strm: *mut infback_engine,
    window_bits: c_int,
    window: *mut c_uchar,
) -> c_int {
    if strm.is_null() || window.is_null() || !(*strm).inner.is_null() {
        return STATUS_PARAM_ERROR;
    }
    let size = match window_size(window_bits) {
        Some(n) => n,
        None => return STATUS_PARAM_ERROR,
    };
    let window = slice::from_raw_parts_mut(window, size);
    match Engine::with_window(window, window_bits) {
        Ok(engine) => {
            (*strm).inner = Box::into_raw(Box::new(engine)) as *mut c_void;
            STATUS_OK
        }
        Err(e) => e.code(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// infback_engine_run
//
// int infback_engine_run(infback_engine *strm,
//                        infback_pull_fn pull, void *pull_state,
//                        infback_push_fn push, void *push_state);
//
// Returns 1 once the stream has been decoded and pushed in full, else the
// negative status of the failure (-2 state, -3 data, -5 input, -6 output).
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn infback_engine_run(
    strm: *mut infback_engine,
    pull: infback_pull_fn,
    pull_state: *mut c_void,
    push: infback_push_fn,
    push_state: *mut c_void,
) -> c_int {
    let engine = engine_ptr(strm);
    let (pull, push) = match (engine.is_null(), pull, push) {
        (false, Some(pl), Some(ps)) => (pl, ps),
        _ => return STATUS_PARAM_ERROR,
    };
    if let Err(e) = (*engine).begin() {
        return e.code();
    }
    let mut source = ForeignSource { pull, state: pull_state };
    let mut sink = ForeignSink { push, state: push_state };
    let result = drive(engine, &mut source, &mut sink);
    match (*engine).finish(result) {
        Ok(()) => STATUS_STREAM_END,
        Err(e) => e.code(),
    }
}

/// The pull/push loop of `InflateBack::run`, holding the engine only through
/// `engine` so that no reference to it is live while a callback runs.
unsafe fn drive(
    engine: *mut Engine,
    source: &mut ForeignSource,
    sink: &mut ForeignSink,
) -> Result<(), InflateError> {
    loop {
        let demand = match (*engine).advance() {
            Ok(d) => d,
            Err(e) => {
                let _ = push_pending(engine, sink);
                return Err(e);
            }
        };
        match demand {
            Demand::Input => {
                let chunk = source.pull();
                if chunk.is_empty() {
                    let _ = push_pending(engine, sink);
                    return Err(InflateError::PrematureEnd);
                }
                (*engine).feed(chunk);
            }
            Demand::Output => push_pending(engine, sink)?,
            Demand::Done => return push_pending(engine, sink),
        }
    }
}

unsafe fn push_pending(engine: *mut Engine, sink: &mut ForeignSink) -> Result<(), InflateError> {
    let (data, len) = {
        let pending = (*engine).pending_output();
        (pending.as_ptr(), pending.len())
    };
    if len > 0 {
        // The window is only read until `output_pushed`; a copy made by the
        // callback reads it too.
        sink.push(slice::from_raw_parts(data, len))?;
    }
    (*engine).output_pushed();
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// infback_engine_end
//
// int infback_engine_end(infback_engine *strm);
//
// Releases the engine.  Calling it again, or on a zeroed handle, is a no-op.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn infback_engine_end(strm: *mut infback_engine) -> c_int {
    if strm.is_null() {
        return STATUS_PARAM_ERROR;
    }
    let inner = (*strm).inner as *mut Engine;
    if !inner.is_null() {
        let mut engine = Box::from_raw(inner);
        engine.end();
        (*strm).inner = ptr::null_mut();
    }
    STATUS_OK
}

// ─────────────────────────────────────────────────────────────────────────────
// infback_engine_copy
//
// int infback_engine_copy(infback_engine *dest, const infback_engine *source);
//
// `dest` must be zeroed or ended; it receives its own window.  `source` may
// be an engine whose run is suspended in a callback: the copy then resumes
// from the same position when it is run.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn infback_engine_copy(
    dest: *mut infback_engine,
    source: *const infback_engine,
) -> c_int {
    if dest.is_null() || source.is_null() || !(*dest).inner.is_null() {
        return STATUS_PARAM_ERROR;
    }
    let engine = (*source).inner as *const Engine;
    if engine.is_null() {
        return STATUS_PARAM_ERROR;
    }
    match (*engine).copy() {
        Ok(copy) => {
            (*dest).inner = Box::into_raw(Box::new(copy)) as *mut c_void;
            STATUS_OK
        }
        Err(e) => e.code(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// infback_input_pull: reference pull callback
//
// `state` points at an infback_input_desc; hands out everything left in one
// chunk (capped at UINT_MAX) and advances the offset.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn infback_input_pull(
    state: *mut c_void,
    out_ptr: *mut *const c_uchar,
) -> c_uint {
    let desc = match (state as *mut infback_input_desc).as_mut() {
        Some(d) => d,
        None => return 0,
    };
    if out_ptr.is_null() || desc.data.is_null() || desc.offset >= desc.len {
        return 0;
    }
    let n = (desc.len - desc.offset).min(c_uint::MAX as size_t);
    *out_ptr = desc.data.add(desc.offset);
    desc.offset += n;
    n as c_uint
}

// ─────────────────────────────────────────────────────────────────────────────
// infback_output_push: reference push callback
//
// `state` points at an infback_output_desc.  Returns 1 without copying when
// `len` bytes do not fit in the remaining capacity.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn infback_output_push(
    state: *mut c_void,
    data: *mut c_uchar,
    len: c_uint,
) -> c_int {
    let desc = match (state as *mut infback_output_desc).as_mut() {
        Some(d) => d,
        None => return 1,
    };
    let len = len as size_t;
    let fits = desc
        .written
        .checked_add(len)
        .map_or(false, |end| end <= desc.capacity);
    if !fits || (len > 0 && (data.is_null() || desc.data.is_null())) {
        return 1;
    }
    if len > 0 {
        ptr::copy_nonoverlapping(data, desc.data.add(desc.written), len);
    }
    desc.written += len;
    0
}
