// config.rs: Compile-time configuration constants.
//
// Runtime overrides come from the environment (see `cli::op_mode`) and then
// from command-line flags; these values are the fallbacks underneath both.

use crate::inflate::types::{MAX_WINDOW_BITS, MIN_WINDOW_BITS};

// Default window size exponent (32 KiB window).
// Large enough for any stream produced by a standard DEFLATE compressor.
// Can be overridden by the INFBACK_WINDOW_BITS environment variable,
// or by the -w# command-line flag.
pub const WINDOW_BITS_DEFAULT: i32 = MAX_WINDOW_BITS;

// Accepted range for the window size exponent, re-exported for the CLI.
pub const WINDOW_BITS_MIN: i32 = MIN_WINDOW_BITS;
pub const WINDOW_BITS_MAX: i32 = MAX_WINDOW_BITS;

// Bytes requested from a `std::io::Read` per pull.
pub const READER_BUFFER_SIZE: usize = 64 * 1024;

// Default number of files decompressed concurrently.
// 0 = one worker per logical core.
// Can be overridden by the INFBACK_NBWORKERS environment variable,
// or by the -j# command-line flag.
pub const NB_WORKERS_DEFAULT: usize = 0;

// Upper bound on the worker count selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Environment variable names.
pub const ENV_WINDOW_BITS: &str = "INFBACK_WINDOW_BITS";
pub const ENV_NBWORKERS: &str = "INFBACK_NBWORKERS";

// Suffix recognised (and stripped) on compressed input files.
pub const DEFLATE_EXTENSION: &str = ".deflate";

// Suffix appended to output names when the input lacks DEFLATE_EXTENSION.
pub const OUT_EXTENSION: &str = ".out";

/// Resolve a requested worker count: `0` means one per logical core, and the
/// result is clamped to `1..=NB_WORKERS_MAX`.
pub fn effective_workers(requested: usize) -> usize {
    let n = if requested == 0 { num_cpus::get() } else { requested };
    n.clamp(1, NB_WORKERS_MAX)
}
