//! Public API surface for file-level decompression.
//!
//! This module assembles the I/O sub-modules and re-exports the symbols
//! consumed by the CLI and library users.

pub mod decompress;
pub mod file_io;
pub mod prefs;

pub use prefs::Prefs;

// ── Special I/O sentinels ─────────────────────────────────────────────────────
pub use file_io::{NUL_MARK, STDIN_MARK, STDOUT_MARK};

// ── Naming ────────────────────────────────────────────────────────────────────
pub use file_io::output_filename;

// ── Decompression ─────────────────────────────────────────────────────────────
pub use decompress::{
    decompress_filename, decompress_multiple_filenames, decompress_stream, test_stream,
    DecompressStats,
};
