//! File-level decompression.
//!
//! - [`decompress_stream`]: decodes one raw DEFLATE stream from any
//!   `Read` into any `Write` through the inflate engine.
//! - [`decompress_filename`]: decompresses a single source/destination pair.
//! - [`decompress_multiple_filenames`]: decompresses a list of sources,
//!   deriving each destination with [`output_filename`], optionally on a
//!   worker pool.
//!
//! Engine errors are converted to `io::Error` at this boundary:
//! corruption becomes `InvalidData`, premature end of input `UnexpectedEof`
//! (unless the reader itself failed, in which case its error is returned),
//! and a writer failure keeps the writer's error kind.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use crate::displaylevel;
use crate::inflate::{window_size, InflateBack, InflateError, SinkError};
use crate::io::file_io::{open_dst_file, open_src_file, output_filename, NUL_MARK, STDOUT_MARK};
use crate::io::prefs::Prefs;
use crate::stream::{ByteSink, NullSink, ReaderSource, WriterSink};
use crate::util::copy_file_times;

/// Byte counts for one decoded stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecompressStats {
    /// Compressed bytes consumed by the decoder.
    pub bytes_in: u64,
    /// Decompressed bytes produced.
    pub bytes_out: u64,
    /// Bytes read past the end of the stream and ignored.
    pub trailing: u64,
}

fn inflate_to_io_error(e: InflateError) -> io::Error {
    let kind = match e {
        InflateError::Sink(SinkError::Io(kind)) => kind,
        InflateError::Sink(_) => io::ErrorKind::WriteZero,
        InflateError::Corrupt(_) => io::ErrorKind::InvalidData,
        InflateError::PrematureEnd => io::ErrorKind::UnexpectedEof,
        InflateError::InvalidWindowBits(_)
        | InflateError::WindowTooSmall { .. }
        | InflateError::BadState(_) => io::ErrorKind::InvalidInput,
    };
    io::Error::new(kind, e)
}

/// Run one engine over `source` into `sink`.
fn run_engine<R: Read, K: ByteSink>(
    source: &mut ReaderSource<R>,
    sink: &mut K,
    window_bits: i32,
) -> io::Result<DecompressStats> {
    let size = window_size(window_bits)
        .ok_or_else(|| inflate_to_io_error(InflateError::InvalidWindowBits(window_bits)))?;
    let mut window = vec![0u8; size];
    let mut engine =
        InflateBack::with_window(&mut window, window_bits).map_err(inflate_to_io_error)?;
    let result = engine.run(source, sink);
    let stats = DecompressStats {
        bytes_in: engine.total_in(),
        bytes_out: engine.total_out(),
        trailing: engine.unused_input().len() as u64,
    };
    engine.end();

    match result {
        Ok(()) => Ok(stats),
        Err(InflateError::PrematureEnd) => match source.take_error() {
            Some(read_err) => Err(read_err),
            None => Err(inflate_to_io_error(InflateError::PrematureEnd)),
        },
        Err(e) => Err(inflate_to_io_error(e)),
    }
}

/// Decode one raw DEFLATE stream from `src` into `dst`.
///
/// `dst` is flushed before returning.  Input after the end of the stream is
/// not an error; its length is reported in [`DecompressStats::trailing`] for
/// the part that was already read.
pub fn decompress_stream<R: Read, W: Write>(
    src: R,
    dst: W,
    window_bits: i32,
) -> io::Result<DecompressStats> {
    let mut source = ReaderSource::new(src);
    let mut sink = WriterSink::new(dst);
    let stats = run_engine(&mut source, &mut sink, window_bits)?;
    sink.get_mut().flush()?;
    Ok(stats)
}

/// Decode one raw DEFLATE stream from `src`, discarding the output.
pub fn test_stream<R: Read>(src: R, window_bits: i32) -> io::Result<DecompressStats> {
    let mut source = ReaderSource::new(src);
    let mut sink = NullSink::default();
    run_engine(&mut source, &mut sink, window_bits)
}

/// Decompress `src_path` into `dst_path`.
///
/// Either path may be a sentinel (`"stdin"`, `"stdout"`, the null device).
/// In test mode the output is decoded and discarded and `dst_path` is ignored.
/// A partially written output file is removed when decoding fails.
pub fn decompress_filename(
    src_path: &str,
    dst_path: &str,
    prefs: &Prefs,
) -> io::Result<DecompressStats> {
    let start = Instant::now();
    let src = open_src_file(src_path)?;

    let stats = if prefs.test_mode {
        test_stream(src, prefs.window_bits)?
    } else {
        let dst = open_dst_file(dst_path, prefs)?;
        let is_file = dst.is_file;
        match decompress_stream(src, dst, prefs.window_bits) {
            Ok(stats) => {
                if is_file && prefs.keep_file_times {
                    // Best effort: the data is already safely written.
                    let _ = copy_file_times(Path::new(src_path), Path::new(dst_path));
                }
                stats
            }
            Err(e) => {
                if is_file {
                    let _ = fs::remove_file(dst_path);
                }
                return Err(e);
            }
        }
    };

    if stats.trailing > 0 {
        displaylevel!(2, "{}: {} trailing bytes ignored\n", src_path, stats.trailing);
    }
    let elapsed = start.elapsed().as_secs_f64();
    if prefs.test_mode {
        displaylevel!(2, "{:<30}: OK ({} bytes)\n", src_path, stats.bytes_out);
    } else {
        displaylevel!(
            2,
            "{:<30}: decoded {} bytes into {}\n",
            src_path,
            stats.bytes_out,
            dst_path
        );
    }
    if elapsed > 0.0 {
        displaylevel!(
            4,
            "{}: {} -> {} bytes in {:.3} s ({:.1} MB/s)\n",
            src_path,
            stats.bytes_in,
            stats.bytes_out,
            elapsed,
            stats.bytes_out as f64 / elapsed / 1_000_000.0
        );
    }
    Ok(stats)
}

/// Decompress every file in `srcs`.
///
/// With `to_stdout` each output goes to standard output in order; otherwise
/// each goes to [`output_filename`] of its input, and independent files are
/// processed on up to `prefs.nb_workers` threads.  Returns the number of files
/// that failed; each failure has already been reported on stderr.
pub fn decompress_multiple_filenames(srcs: &[String], to_stdout: bool, prefs: &Prefs) -> usize {
    let decode_one = |src: &String| -> bool {
        let dst = if prefs.test_mode {
            NUL_MARK.to_owned()
        } else if to_stdout {
            STDOUT_MARK.to_owned()
        } else {
            output_filename(src)
        };
        match decompress_filename(src, &dst, prefs) {
            Ok(_) => false,
            Err(e) => {
                displaylevel!(1, "infback: {}: {}\n", src, e);
                true
            }
        }
    };

    let serial = to_stdout || prefs.nb_workers <= 1 || srcs.len() <= 1;
    if serial {
        return srcs.iter().filter(|&s| decode_one(s)).count();
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(prefs.nb_workers)
        .build();
    match pool {
        Ok(pool) => pool.install(|| srcs.par_iter().filter(|&s| decode_one(s)).count()),
        Err(_) => srcs.iter().filter(|&s| decode_one(s)).count(),
    }
}
