//! DEFLATE constants, engine states, and error types.
//!
//! Covers:
//! - Window-size limits (`MIN_WINDOW_BITS` … `MAX_WINDOW_BITS`)
//! - RFC 1951 length/distance base and extra-bit tables
//! - [`EngineState`]: the lifecycle of an [`InflateBack`](super::InflateBack)
//! - [`Corruption`], [`SinkError`], [`InflateError`] with `Display` + `Error`
//!   impls, and the integer status codes exposed through the C ABI

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Window limits
// ─────────────────────────────────────────────────────────────────────────────

/// Smallest supported window: 2^8 = 256 bytes.
pub const MIN_WINDOW_BITS: i32 = 8;

/// Largest supported window: 2^15 = 32 KiB, the DEFLATE maximum distance.
pub const MAX_WINDOW_BITS: i32 = 15;

/// Largest back-reference distance the format can express.
pub const MAX_DISTANCE: usize = 1 << MAX_WINDOW_BITS;

/// Window size in bytes for `window_bits`, or `None` when out of range.
#[inline]
pub fn window_size(window_bits: i32) -> Option<usize> {
    if (MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&window_bits) {
        Some(1usize << window_bits)
    } else {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Code-space limits (RFC 1951 §3.2.5 – §3.2.7)
// ─────────────────────────────────────────────────────────────────────────────

/// Longest Huffman code in any DEFLATE table.
pub const MAX_CODE_BITS: usize = 15;

/// Literal/length alphabet size (0–285, plus two reserved symbols).
pub const MAX_LIT_LEN_CODES: usize = 288;

/// Distance alphabet size (0–29, plus two reserved symbols).
pub const MAX_DIST_CODES: usize = 32;

/// Code-length alphabet size.
pub const CODE_LEN_CODES: usize = 19;

/// End-of-block symbol in the literal/length alphabet.
pub const END_OF_BLOCK: u16 = 256;

/// Order in which code-length code lengths are transmitted.
pub const CODE_LENGTH_ORDER: [usize; CODE_LEN_CODES] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Base match length for length symbols 257–285.
pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits following each length symbol.
pub const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base distance for distance symbols 0–29.
pub const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits following each distance symbol.
pub const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

// ─────────────────────────────────────────────────────────────────────────────
// Status codes (C ABI)
// ─────────────────────────────────────────────────────────────────────────────

/// Operation succeeded.
pub const STATUS_OK: i32 = 0;
/// `run` decoded the final end-of-block marker.
pub const STATUS_STREAM_END: i32 = 1;
/// Bad parameter or lifecycle misuse.
pub const STATUS_PARAM_ERROR: i32 = -2;
/// The compressed stream is corrupt.
pub const STATUS_DATA_ERROR: i32 = -3;
/// Input ran out before the final block ended.
pub const STATUS_INPUT_ERROR: i32 = -5;
/// The output sink refused a push.
pub const STATUS_OUTPUT_ERROR: i32 = -6;

// ─────────────────────────────────────────────────────────────────────────────
// Engine lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle of an inflate engine.
///
/// ```text
/// Uninitialized ──init──▶ Ready ──run──▶ Running ──▶ Finished | Failed
///       ▲                                                  │
///       └────────────────────────── end ───────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// No window attached; only `init` and `end` are meaningful.
    #[default]
    Uninitialized,
    /// Window attached, decode state reset, waiting for `run`.
    Ready,
    /// Inside `run`, or a copy taken there that resumes on its next `run`.
    Running,
    /// The final block's end-of-block marker has been decoded.
    Finished,
    /// `run` stopped on an error; only `end` or `reset` apply.
    Failed,
}

impl EngineState {
    /// Lower-case name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Ready => "ready",
            EngineState::Running => "running",
            EngineState::Finished => "finished",
            EngineState::Failed => "failed",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error types
// ─────────────────────────────────────────────────────────────────────────────

/// Specific defect found in a corrupt DEFLATE stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    /// Block header carried the reserved type `11`.
    InvalidBlockType,
    /// Stored block `LEN` is not the one's complement of `NLEN`.
    StoredLengthMismatch,
    /// Dynamic header declared more than 286 literal/length or 30 distance codes.
    TooManySymbols,
    /// Code-length code lengths are over-subscribed or incomplete.
    InvalidCodeLengthsSet,
    /// A repeat instruction had nothing to repeat or ran past the table.
    InvalidBitLengthRepeat,
    /// The literal/length table has no end-of-block code.
    MissingEndOfBlock,
    /// Literal/length code lengths do not form a valid prefix code.
    InvalidLiteralLengthsSet,
    /// Distance code lengths do not form a valid prefix code.
    InvalidDistancesSet,
    /// A literal/length code did not decode, or decoded to 286/287.
    InvalidLiteralLengthCode,
    /// A distance code did not decode, or decoded to 30/31.
    InvalidDistanceCode,
    /// A back-reference reaches before the start of the available history.
    DistanceTooFarBack,
}

impl Corruption {
    /// Human-readable description of the defect.
    pub fn message(&self) -> &'static str {
        match self {
            Corruption::InvalidBlockType => "invalid block type",
            Corruption::StoredLengthMismatch => "invalid stored block lengths",
            Corruption::TooManySymbols => "too many length or distance symbols",
            Corruption::InvalidCodeLengthsSet => "invalid code lengths set",
            Corruption::InvalidBitLengthRepeat => "invalid bit length repeat",
            Corruption::MissingEndOfBlock => "invalid code -- missing end-of-block",
            Corruption::InvalidLiteralLengthsSet => "invalid literal/lengths set",
            Corruption::InvalidDistancesSet => "invalid distances set",
            Corruption::InvalidLiteralLengthCode => "invalid literal/length code",
            Corruption::InvalidDistanceCode => "invalid distance code",
            Corruption::DistanceTooFarBack => "invalid distance too far back",
        }
    }
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Failure reported by a [`ByteSink`](crate::stream::ByteSink).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// The push would run past the destination's capacity; nothing was copied.
    CapacityExceeded {
        /// Bytes the engine tried to push.
        requested: usize,
        /// Bytes still free in the destination.
        available: usize,
    },
    /// The underlying writer failed.
    Io(std::io::ErrorKind),
    /// A foreign push callback returned this non-zero status.
    Rejected(i32),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::CapacityExceeded { requested, available } => write!(
                f,
                "output buffer full: {} bytes pushed, {} bytes available",
                requested, available
            ),
            SinkError::Io(kind) => write!(f, "output write failed: {}", kind),
            SinkError::Rejected(status) => write!(f, "output callback returned {}", status),
        }
    }
}

impl std::error::Error for SinkError {}

/// Errors returned by the inflate engine.
///
/// Setup errors (`InvalidWindowBits`, `WindowTooSmall`, `BadState`), sink
/// errors, stream corruption, and premature end of input are all distinct so
/// that callers (and the C ABI) can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateError {
    /// `window_bits` outside `[MIN_WINDOW_BITS, MAX_WINDOW_BITS]`.
    InvalidWindowBits(i32),
    /// The supplied window is shorter than `1 << window_bits`.
    WindowTooSmall {
        /// Required window length.
        needed: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// The operation is not valid in the engine's current state.
    BadState(EngineState),
    /// The sink refused decoded output.
    Sink(SinkError),
    /// The compressed stream is malformed.
    Corrupt(Corruption),
    /// The source ran dry while the decoder still needed bits.
    PrematureEnd,
}

impl InflateError {
    /// Integer status code used across the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            InflateError::InvalidWindowBits(_)
            | InflateError::WindowTooSmall { .. }
            | InflateError::BadState(_) => STATUS_PARAM_ERROR,
            InflateError::Sink(_) => STATUS_OUTPUT_ERROR,
            InflateError::Corrupt(_) => STATUS_DATA_ERROR,
            InflateError::PrematureEnd => STATUS_INPUT_ERROR,
        }
    }

    /// `true` for errors raised before any input was consumed.
    pub fn is_setup_error(&self) -> bool {
        self.code() == STATUS_PARAM_ERROR
    }
}

impl fmt::Display for InflateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InflateError::InvalidWindowBits(bits) => write!(
                f,
                "invalid window bits {}: must be {}-{}",
                bits, MIN_WINDOW_BITS, MAX_WINDOW_BITS
            ),
            InflateError::WindowTooSmall { needed, actual } => write!(
                f,
                "window too small: need {} bytes, got {}",
                needed, actual
            ),
            InflateError::BadState(state) => write!(f, "operation not valid while {}", state),
            InflateError::Sink(e) => write!(f, "{}", e),
            InflateError::Corrupt(c) => write!(f, "corrupt stream: {}", c),
            InflateError::PrematureEnd => f.write_str("unexpected end of compressed input"),
        }
    }
}

impl std::error::Error for InflateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InflateError::Sink(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Corruption> for InflateError {
    fn from(c: Corruption) -> Self {
        InflateError::Corrupt(c)
    }
}

impl From<SinkError> for InflateError {
    fn from(e: SinkError) -> Self {
        InflateError::Sink(e)
    }
}
