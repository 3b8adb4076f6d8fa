//! One-shot helpers around the engine lifecycle.
//!
//! Each helper allocates a window, initializes an engine on it, wires the
//! caller's buffers up as source and sink, runs to completion, and calls
//! [`InflateBack::end`] on every engine it initialized, whether decoding
//! succeeded or not.

use rayon::prelude::*;

use crate::config::effective_workers;
use crate::inflate::{window_size, InflateBack, InflateError};
use crate::stream::{InputCursor, OutputSink};

fn alloc_window(window_bits: i32) -> Result<Vec<u8>, InflateError> {
    let size = window_size(window_bits).ok_or(InflateError::InvalidWindowBits(window_bits))?;
    Ok(vec![0u8; size])
}

/// Decompress the raw DEFLATE stream in `src` into `dst`.
///
/// Returns the number of bytes written.  `dst` must hold the whole output:
/// a short buffer fails with [`InflateError::Sink`].
pub fn decompress(src: &[u8], dst: &mut [u8], window_bits: i32) -> Result<usize, InflateError> {
    let mut window = alloc_window(window_bits)?;
    let mut engine = InflateBack::with_window(&mut window, window_bits)?;
    let mut input = InputCursor::new(src);
    let mut output = OutputSink::new(dst);
    let result = engine.run(&mut input, &mut output);
    engine.end();
    result.map(|()| output.written())
}

/// Decompress `src` into a freshly allocated vector.
pub fn decompress_to_vec(src: &[u8], window_bits: i32) -> Result<Vec<u8>, InflateError> {
    let mut window = alloc_window(window_bits)?;
    let mut engine = InflateBack::with_window(&mut window, window_bits)?;
    let mut out = Vec::new();
    let result = engine.run(&mut InputCursor::new(src), &mut out);
    engine.end();
    result.map(|()| out)
}

/// Decompress `src` twice: once with a fresh engine into `first`, and once
/// with a copy taken before the run into `second`.
///
/// Returns the byte counts written to each buffer.  Both engines are ended
/// even if one of the runs fails; the first failure is returned.
pub fn decompress_with_copy(
    src: &[u8],
    first: &mut [u8],
    second: &mut [u8],
    window_bits: i32,
) -> Result<(usize, usize), InflateError> {
    let mut window = alloc_window(window_bits)?;
    let mut engine = InflateBack::with_window(&mut window, window_bits)?;
    let mut copy = match engine.copy() {
        Ok(c) => c,
        Err(e) => {
            engine.end();
            return Err(e);
        }
    };

    let mut sink_a = OutputSink::new(first);
    let result_a = engine.run(&mut InputCursor::new(src), &mut sink_a);
    engine.end();

    let mut sink_b = OutputSink::new(second);
    let result_b = copy.run(&mut InputCursor::new(src), &mut sink_b);
    copy.end();

    result_a?;
    result_b?;
    Ok((sink_a.written(), sink_b.written()))
}

/// Decompress many independent streams concurrently.
///
/// Each stream gets its own engine, window and sink; nothing is shared.
/// `workers == 0` means one worker per logical core.  Results come back in
/// input order.
pub fn decompress_parallel<T>(
    streams: &[T],
    window_bits: i32,
    workers: usize,
) -> Vec<Result<Vec<u8>, InflateError>>
where
    T: AsRef<[u8]> + Sync,
{
    let decode_all = || {
        streams
            .par_iter()
            .map(|s| decompress_to_vec(s.as_ref(), window_bits))
            .collect()
    };
    match rayon::ThreadPoolBuilder::new()
        .num_threads(effective_workers(workers))
        .build()
    {
        Ok(pool) => pool.install(decode_all),
        // Fall back to rayon's global pool.
        Err(_) => decode_all(),
    }
}
