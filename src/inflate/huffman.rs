//! Canonical Huffman decoding tables (RFC 1951 §3.2.2).
//!
//! A table is stored as the number of codes of each length plus the symbols
//! sorted by code.  Decoding walks the code one bit at a time, comparing
//! against the first code of each length, so a table needs no more memory
//! than its alphabet.  Decoding only peeks: the caller consumes the code's
//! bits once everything it needs for the current step is buffered.

use std::sync::OnceLock;

use super::bits::BitBuffer;
use super::types::{MAX_CODE_BITS, MAX_DIST_CODES, MAX_LIT_LEN_CODES};

/// Which alphabet a table encodes; decides whether an incomplete code is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableKind {
    /// Code-length codes of a dynamic header: must be complete.
    CodeLengths,
    /// Literal/length codes.
    LiteralLengths,
    /// Distance codes.
    Distances,
}

/// Reasons a set of code lengths cannot form a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuildError {
    /// More codes of some length than the code space allows.
    OverSubscribed,
    /// Unused code space where the alphabet does not allow it.
    Incomplete,
}

/// Outcome of peeking one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Peek {
    /// A symbol and the length of its code in bits.
    Symbol(u16, u32),
    /// Fifteen bits fall in unused code space.
    Invalid,
    /// The buffered input ends inside the code.
    Short,
}

/// Decoding table for one alphabet.
#[derive(Debug, Clone)]
pub(crate) struct Huffman {
    /// `count[len]` = number of symbols with a `len`-bit code.
    count: [u16; MAX_CODE_BITS + 1],
    /// Symbols ordered by code.
    symbol: [u16; MAX_LIT_LEN_CODES],
}

impl Huffman {
    /// Build a table from per-symbol code lengths (0 = symbol unused).
    ///
    /// Over-subscribed lengths are always rejected.  An incomplete code is
    /// accepted only for literal/length and distance tables holding a single
    /// one-bit code, or no codes at all; decoding into the unused space then
    /// fails at decode time.
    pub(crate) fn build(lengths: &[u8], kind: TableKind) -> Result<Self, BuildError> {
        debug_assert!(lengths.len() <= MAX_LIT_LEN_CODES);
        let mut count = [0u16; MAX_CODE_BITS + 1];
        for &len in lengths {
            count[len as usize] += 1;
        }

        let used = lengths.len() - count[0] as usize;
        if used == 0 && kind == TableKind::CodeLengths {
            return Err(BuildError::Incomplete);
        }

        let mut left: i32 = 1;
        let mut max_len = 0;
        for len in 1..=MAX_CODE_BITS {
            left <<= 1;
            left -= count[len] as i32;
            if left < 0 {
                return Err(BuildError::OverSubscribed);
            }
            if count[len] != 0 {
                max_len = len;
            }
        }
        if left > 0 && used != 0 && (kind == TableKind::CodeLengths || max_len != 1) {
            return Err(BuildError::Incomplete);
        }

        let mut offs = [0u16; MAX_CODE_BITS + 2];
        for len in 1..=MAX_CODE_BITS {
            offs[len + 1] = offs[len] + count[len];
        }
        let mut symbol = [0u16; MAX_LIT_LEN_CODES];
        for (sym, &len) in lengths.iter().enumerate() {
            if len != 0 {
                symbol[offs[len as usize] as usize] = sym as u16;
                offs[len as usize] += 1;
            }
        }

        count[0] = 0;
        Ok(Self { count, symbol })
    }

    /// Peek the code starting `skip` bits into the buffer.
    ///
    /// Loads more bytes from the current chunk as the code grows; nothing is
    /// consumed.  [`Peek::Invalid`] is left to the caller to turn into the
    /// alphabet-specific corruption error.
    pub(crate) fn peek(&self, input: &mut BitBuffer, skip: u32) -> Peek {
        let mut code: i32 = 0;
        let mut first: i32 = 0;
        let mut index: i32 = 0;
        for len in 1..=MAX_CODE_BITS as u32 {
            if !input.fill(skip + len) {
                return Peek::Short;
            }
            code |= input.peek(skip + len - 1, 1) as i32;
            let count = self.count[len as usize] as i32;
            if code - count < first {
                return Peek::Symbol(self.symbol[(index + (code - first)) as usize], len);
            }
            index += count;
            first += count;
            first <<= 1;
            code <<= 1;
        }
        Peek::Invalid
    }
}

/// Table with no codes; placeholder until a dynamic header supplies one.
pub(crate) const EMPTY: Huffman = Huffman {
    count: [0; MAX_CODE_BITS + 1],
    symbol: [0; MAX_LIT_LEN_CODES],
};

/// Fixed literal/length and distance tables (RFC 1951 §3.2.6), built once.
pub(crate) fn fixed_tables() -> &'static (Huffman, Huffman) {
    static FIXED: OnceLock<(Huffman, Huffman)> = OnceLock::new();
    FIXED.get_or_init(|| {
        let mut lengths = [0u8; MAX_LIT_LEN_CODES];
        lengths[..144].fill(8);
        lengths[144..256].fill(9);
        lengths[256..280].fill(7);
        lengths[280..].fill(8);
        // Both sets are complete codes, so construction cannot fail.
        let lit = match Huffman::build(&lengths, TableKind::LiteralLengths) {
            Ok(t) => t,
            Err(e) => unreachable!("fixed literal table: {:?}", e),
        };
        let dist = match Huffman::build(&[5u8; MAX_DIST_CODES], TableKind::Distances) {
            Ok(t) => t,
            Err(e) => unreachable!("fixed distance table: {:?}", e),
        };
        (lit, dist)
    })
}
