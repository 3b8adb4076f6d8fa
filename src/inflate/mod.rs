//! Raw DEFLATE (RFC 1951) decoding.
//!
//! | Submodule  | Responsibility |
//! |------------|----------------|
//! | [`types`]  | Format constants, [`EngineState`], and the error taxonomy. |
//! | `bits`     | LSB-first bit accumulator over the current pulled chunk. |
//! | `huffman`  | Canonical Huffman tables and the fixed tables of §3.2.6. |
//! | [`window`] | [`SlidingWindow`]: history ring that doubles as the output staging area. |
//! | [`engine`] | [`InflateBack`]: lifecycle and the resumable block decoder. |

pub mod types;
mod bits;
mod huffman;
pub mod window;
pub mod engine;

pub use engine::InflateBack;
pub use types::{
    window_size, Corruption, EngineState, InflateError, SinkError, MAX_WINDOW_BITS,
    MIN_WINDOW_BITS,
};
pub use window::SlidingWindow;
