//! File I/O primitives for the decompression pipeline.
//!
//! - [`open_src_file`]: resolves a path string to a `Box<dyn Read>`,
//!   handling the `"stdin"` sentinel and rejecting directories.
//! - [`open_dst_file`]: resolves a path string to a [`DstFile`], handling the
//!   `"stdout"` and null-device sentinels and enforcing the overwrite policy.
//! - [`output_filename`]: derives the output name for an input file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::config::{DEFLATE_EXTENSION, OUT_EXTENSION};
use crate::displaylevel;
use crate::io::prefs::Prefs;
use crate::util::is_directory;

// ---------------------------------------------------------------------------
// Sentinel strings
// ---------------------------------------------------------------------------

/// Sentinel: read from standard input.
pub const STDIN_MARK: &str = "stdin";

/// Sentinel: write to standard output.
pub const STDOUT_MARK: &str = "stdout";

/// Sentinel: discard output.
#[cfg(windows)]
pub const NUL_MARK: &str = "nul";
#[cfg(not(windows))]
pub const NUL_MARK: &str = "/dev/null";

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// Output name for `input`: `x.deflate` becomes `x`; anything else gets
/// `.out` appended.
pub fn output_filename(input: &str) -> String {
    match input.strip_suffix(DEFLATE_EXTENSION) {
        Some(stem) if !stem.is_empty() && !stem.ends_with(&['/', '\\'][..]) => stem.to_owned(),
        _ => format!("{}{}", input, OUT_EXTENSION),
    }
}

// ---------------------------------------------------------------------------
// Source file
// ---------------------------------------------------------------------------

/// Opens a source for reading.
///
/// - `"stdin"` returns standard input.
/// - A directory is an [`io::ErrorKind::InvalidInput`] error.
/// - Anything else is opened and wrapped in a [`BufReader`].
pub fn open_src_file(path: &str) -> io::Result<Box<dyn Read>> {
    if path == STDIN_MARK {
        displaylevel!(4, "Using stdin for input\n");
        return Ok(Box::new(io::stdin().lock()));
    }

    if is_directory(Path::new(path)) {
        displaylevel!(1, "infback: {} is a directory -- ignored\n", path);
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: is a directory", path),
        ));
    }

    let f = File::open(path)?;
    Ok(Box::new(BufReader::new(f)))
}

// ---------------------------------------------------------------------------
// Destination file
// ---------------------------------------------------------------------------

/// A write-capable destination produced by [`open_dst_file`].
pub struct DstFile {
    inner: Box<dyn Write>,
    /// `true` for standard output.
    pub is_stdout: bool,
    /// `true` for a regular file created on disk (removed again on failure).
    pub is_file: bool,
}

impl Write for DstFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Opens a destination for writing.
///
/// - `"stdout"` → standard output.
/// - [`NUL_MARK`] → [`io::sink`]; nothing is created.
///
/// An existing regular path is refused with [`io::ErrorKind::AlreadyExists`]
/// unless `prefs.overwrite` is set.
pub fn open_dst_file(path: &str, prefs: &Prefs) -> io::Result<DstFile> {
    if path == STDOUT_MARK {
        displaylevel!(4, "Using stdout for output\n");
        return Ok(DstFile {
            inner: Box::new(BufWriter::new(io::stdout())),
            is_stdout: true,
            is_file: false,
        });
    }

    if path == NUL_MARK {
        return Ok(DstFile {
            inner: Box::new(io::sink()),
            is_stdout: false,
            is_file: false,
        });
    }

    if !prefs.overwrite && Path::new(path).exists() {
        displaylevel!(1, "{} already exists; not overwritten  \n", path);
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{}: already exists; not overwritten", path),
        ));
    }

    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    Ok(DstFile {
        inner: Box::new(BufWriter::new(f)),
        is_stdout: false,
        is_file: true,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
