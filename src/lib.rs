// infback: push-mode streaming inflate engine

pub mod config;
pub mod stream;
pub mod inflate;
pub mod driver;
pub mod util;
pub mod io;
pub mod cli;
#[cfg(feature = "c-abi")]
pub mod abi;

// ── Version constants ─────────────────────────────────────────────────────────
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 3;
pub const VERSION_RELEASE: u32 = 0;
pub const VERSION_NUMBER: u32 = VERSION_MAJOR * 100 * 100 + VERSION_MINOR * 100 + VERSION_RELEASE;
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the runtime version number.
pub fn version_number() -> u32 {
    VERSION_NUMBER
}

/// Returns the runtime version string.
pub fn version_string() -> &'static str {
    VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use driver::{decompress, decompress_parallel, decompress_to_vec, decompress_with_copy};
pub use inflate::{
    Corruption, EngineState, InflateBack, InflateError, SinkError, SlidingWindow,
    MAX_WINDOW_BITS, MIN_WINDOW_BITS,
};
pub use stream::{
    BoundedSource, ByteSink, ByteSource, InputCursor, NullSink, OutputSink, ReaderSource,
    WriterSink,
};
