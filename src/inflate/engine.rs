//! The inflate engine: lifecycle plus the block decoder it drives.
//!
//! [`InflateBack`] owns the whole decode state and borrows a caller-supplied
//! window for `'w`.  One call to [`run`](InflateBack::run) decodes an entire
//! raw DEFLATE stream: it pulls compressed bytes from a [`ByteSource`] as the
//! bit accumulator runs dry and pushes decoded bytes to a [`ByteSink`]
//! each time the window fills, then once more after the final block.
//!
//! The decoder itself is a step machine.  [`advance`](InflateBack::advance)
//! decodes until it needs input, needs the window pushed, or reaches the end
//! of the stream, and it invokes no callbacks.  Between two steps every bit
//! of decode state (block mode, pending match, dynamic header progress, bit
//! accumulator, unread input) lives in the engine, so a copy taken while a
//! run is suspended in `pull` or `push` resumes from the same position.
//!
//! # Error behaviour
//!
//! Every failure leaves the engine `Failed` and is reported as an
//! [`InflateError`]; nothing panics on malformed input.  When decoding stops
//! on corruption or premature end of input, output decoded up to that point
//! is still pushed (best effort) before the error is returned.  A sink
//! failure is returned as is, without a retry.

use super::bits::BitBuffer;
use super::huffman::{fixed_tables, Huffman, Peek, TableKind, EMPTY};
use super::types::{
    Corruption, EngineState, InflateError, CODE_LENGTH_ORDER, CODE_LEN_CODES, DISTANCE_BASE,
    DISTANCE_EXTRA, END_OF_BLOCK, LENGTH_BASE, LENGTH_EXTRA, MAX_DIST_CODES, MAX_LIT_LEN_CODES,
};
use super::window::SlidingWindow;
use crate::stream::{ByteSink, ByteSource};

// ─────────────────────────────────────────────────────────────────────────────
// Decode state
// ─────────────────────────────────────────────────────────────────────────────

/// What the decoder needs before it can take another step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Demand {
    /// The current chunk is used up; pull another one.
    Input,
    /// The window is full; push its pending bytes.
    Output,
    /// The final block has ended; push what is pending and stop.
    Done,
}

/// Position of the block decoder between two steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Expecting BFINAL and BTYPE.
    Header,
    /// Byte-aligned LEN and NLEN of a stored block.
    StoredLengths,
    /// Raw bytes of a stored block.
    Stored { left: usize },
    /// HLIT, HDIST and HCLEN of a dynamic block.
    DynamicCounts,
    /// Three-bit lengths of the code-length code.
    CodeLengthLengths,
    /// Literal/length and distance code lengths.
    CodeLengths,
    /// Literal/length symbols of a fixed or dynamic block.
    Codes,
    /// A back-reference still being copied.
    Match { len: usize, dist: usize },
    /// Final end-of-block seen.
    Done,
}

/// Tables of the Huffman block being decoded.
#[derive(Debug, Clone)]
enum Tables {
    Fixed,
    Dynamic(Box<(Huffman, Huffman)>),
}

impl Tables {
    fn get(&self) -> (&Huffman, &Huffman) {
        match self {
            Tables::Fixed => {
                let (lit, dist) = fixed_tables();
                (lit, dist)
            }
            Tables::Dynamic(pair) => (&pair.0, &pair.1),
        }
    }
}

/// Progress through a dynamic block header.
#[derive(Debug, Clone)]
struct DynamicHeader {
    nlen: usize,
    ndist: usize,
    ncode: usize,
    /// Lengths read so far in the current stage.
    have: usize,
    code_lengths: [u8; CODE_LEN_CODES],
    codes: Huffman,
    lengths: [u8; MAX_LIT_LEN_CODES + MAX_DIST_CODES],
}

impl DynamicHeader {
    const fn new() -> Self {
        Self {
            nlen: 0,
            ndist: 0,
            ncode: 0,
            have: 0,
            code_lengths: [0; CODE_LEN_CODES],
            codes: EMPTY,
            lengths: [0; MAX_LIT_LEN_CODES + MAX_DIST_CODES],
        }
    }

    /// HLIT, HDIST, HCLEN.  `Ok(false)` means more input is needed.
    fn read_counts(&mut self, input: &mut BitBuffer) -> Result<bool, InflateError> {
        if !input.fill(14) {
            return Ok(false);
        }
        let nlen = input.take(5) as usize + 257;
        let ndist = input.take(5) as usize + 1;
        let ncode = input.take(4) as usize + 4;
        if nlen > 286 || ndist > 30 {
            return Err(Corruption::TooManySymbols.into());
        }
        *self = Self::new();
        self.nlen = nlen;
        self.ndist = ndist;
        self.ncode = ncode;
        Ok(true)
    }

    /// Lengths of the code-length code, then the code itself.
    fn read_code_length_code(&mut self, input: &mut BitBuffer) -> Result<bool, InflateError> {
        while self.have < self.ncode {
            if !input.fill(3) {
                return Ok(false);
            }
            self.code_lengths[CODE_LENGTH_ORDER[self.have]] = input.take(3) as u8;
            self.have += 1;
        }
        self.codes = Huffman::build(&self.code_lengths, TableKind::CodeLengths)
            .map_err(|_| Corruption::InvalidCodeLengthsSet)?;
        self.have = 0;
        Ok(true)
    }

    /// Literal/length and distance code lengths, run-length coded.
    fn read_lengths(&mut self, input: &mut BitBuffer) -> Result<bool, InflateError> {
        let total = self.nlen + self.ndist;
        while self.have < total {
            let (symbol, used) = match self.codes.peek(input, 0) {
                Peek::Symbol(s, n) => (s, n),
                Peek::Short => return Ok(false),
                Peek::Invalid => return Err(Corruption::InvalidCodeLengthsSet.into()),
            };
            if symbol < 16 {
                input.consume(used);
                self.lengths[self.have] = symbol as u8;
                self.have += 1;
                continue;
            }
            let (value, extra, base) = match symbol {
                16 => {
                    if self.have == 0 {
                        return Err(Corruption::InvalidBitLengthRepeat.into());
                    }
                    (self.lengths[self.have - 1], 2, 3)
                }
                17 => (0, 3, 3),
                _ => (0, 7, 11),
            };
            if !input.fill(used + extra) {
                return Ok(false);
            }
            let repeat = base + input.peek(used, extra) as usize;
            input.consume(used + extra);
            if self.have + repeat > total {
                return Err(Corruption::InvalidBitLengthRepeat.into());
            }
            self.lengths[self.have..self.have + repeat].fill(value);
            self.have += repeat;
        }
        Ok(true)
    }

    /// Build the block's literal/length and distance tables.
    fn tables(&self) -> Result<Tables, InflateError> {
        if self.lengths[END_OF_BLOCK as usize] == 0 {
            return Err(Corruption::MissingEndOfBlock.into());
        }
        let total = self.nlen + self.ndist;
        let lit = Huffman::build(&self.lengths[..self.nlen], TableKind::LiteralLengths)
            .map_err(|_| Corruption::InvalidLiteralLengthsSet)?;
        let dist = Huffman::build(&self.lengths[self.nlen..total], TableKind::Distances)
            .map_err(|_| Corruption::InvalidDistancesSet)?;
        Ok(Tables::Dynamic(Box::new((lit, dist))))
    }
}

/// One decoded literal/length code, with everything that follows it.
enum Code {
    Literal(u8),
    EndOfBlock,
    Match { len: usize, dist: usize },
}

/// Decode the next code of a Huffman block.
///
/// A back-reference is taken as a unit: length code, length extra bits,
/// distance code and distance extra bits are all peeked before any of them
/// is consumed.  `Ok(None)` means more input is needed.
fn next_code(
    input: &mut BitBuffer,
    lit: &Huffman,
    dist: &Huffman,
) -> Result<Option<Code>, InflateError> {
    let (symbol, used) = match lit.peek(input, 0) {
        Peek::Symbol(s, n) => (s, n),
        Peek::Short => return Ok(None),
        Peek::Invalid => return Err(Corruption::InvalidLiteralLengthCode.into()),
    };
    if symbol < END_OF_BLOCK {
        input.consume(used);
        return Ok(Some(Code::Literal(symbol as u8)));
    }
    if symbol == END_OF_BLOCK {
        input.consume(used);
        return Ok(Some(Code::EndOfBlock));
    }

    let slot = (symbol - 257) as usize;
    if slot >= LENGTH_BASE.len() {
        return Err(Corruption::InvalidLiteralLengthCode.into());
    }
    let extra = LENGTH_EXTRA[slot] as u32;
    if !input.fill(used + extra) {
        return Ok(None);
    }
    let len = LENGTH_BASE[slot] as usize + input.peek(used, extra) as usize;
    let mut at = used + extra;

    let (dsym, dused) = match dist.peek(input, at) {
        Peek::Symbol(s, n) => (s as usize, n),
        Peek::Short => return Ok(None),
        Peek::Invalid => return Err(Corruption::InvalidDistanceCode.into()),
    };
    if dsym >= DISTANCE_BASE.len() {
        return Err(Corruption::InvalidDistanceCode.into());
    }
    at += dused;
    let dextra = DISTANCE_EXTRA[dsym] as u32;
    if !input.fill(at + dextra) {
        return Ok(None);
    }
    let distance = DISTANCE_BASE[dsym] as usize + input.peek(at, dextra) as usize;
    input.consume(at + dextra);
    Ok(Some(Code::Match { len, dist: distance }))
}

// ─────────────────────────────────────────────────────────────────────────────
// InflateBack
// ─────────────────────────────────────────────────────────────────────────────

/// Push-mode DEFLATE decompressor.
///
/// ```
/// use infback::{InflateBack, InputCursor, OutputSink};
///
/// // Fixed-Huffman block holding the literal "a".
/// let compressed = [0x4b, 0x04, 0x00];
/// let mut window = vec![0u8; 256];
/// let mut out = [0u8; 8];
///
/// let mut engine = InflateBack::new();
/// engine.init(&mut window, 8).unwrap();
/// let mut sink = OutputSink::new(&mut out);
/// engine.run(&mut InputCursor::new(&compressed), &mut sink).unwrap();
/// assert_eq!(sink.filled(), b"a");
/// engine.end();
/// ```
#[derive(Debug)]
pub struct InflateBack<'w> {
    state: EngineState,
    /// Inside `run`; a `Running` engine that is not active is a copy
    /// waiting to resume.
    active: bool,
    window: Option<SlidingWindow<'w>>,
    input: BitBuffer,
    mode: Mode,
    last: bool,
    tables: Tables,
    header: DynamicHeader,
    unused: Vec<u8>,
}

impl Default for InflateBack<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'w> InflateBack<'w> {
    /// An engine with no window attached.
    pub const fn new() -> Self {
        Self {
            state: EngineState::Uninitialized,
            active: false,
            window: None,
            input: BitBuffer::new(),
            mode: Mode::Header,
            last: false,
            tables: Tables::Fixed,
            header: DynamicHeader::new(),
            unused: Vec::new(),
        }
    }

    /// Shorthand for [`new`](Self::new) followed by [`init`](Self::init).
    pub fn with_window(window: &'w mut [u8], window_bits: i32) -> Result<Self, InflateError> {
        let mut engine = Self::new();
        engine.init(window, window_bits)?;
        Ok(engine)
    }

    /// Attach `window` (its first `1 << window_bits` bytes) and move to `Ready`.
    ///
    /// `window_bits` must lie in `8..=15`.  On error the engine stays
    /// `Uninitialized`.  An engine that is already initialized must be
    /// [`end`](Self::end)ed first.
    pub fn init(&mut self, window: &'w mut [u8], window_bits: i32) -> Result<(), InflateError> {
        if self.state != EngineState::Uninitialized {
            return Err(InflateError::BadState(self.state));
        }
        let window = SlidingWindow::borrowed(window, window_bits)?;
        self.window = Some(window);
        self.clear_decode_state();
        self.state = EngineState::Ready;
        Ok(())
    }

    /// Decode one complete raw DEFLATE stream from `source` into `sink`.
    ///
    /// Valid in `Ready`, or in `Running` for a copy taken mid-run, which
    /// resumes where the original stood.  Returns `Ok(())` once the final
    /// block's end-of-block code has been decoded and all output pushed; the
    /// engine is then `Finished`.  Any error leaves it `Failed`.
    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> Result<(), InflateError>
    where
        S: ByteSource + ?Sized,
        K: ByteSink + ?Sized,
    {
        self.begin()?;
        let result = self.drive(source, sink);
        self.finish(result)
    }

    fn drive<S, K>(&mut self, source: &mut S, sink: &mut K) -> Result<(), InflateError>
    where
        S: ByteSource + ?Sized,
        K: ByteSink + ?Sized,
    {
        loop {
            let demand = match self.advance() {
                Ok(d) => d,
                Err(e) => {
                    // Best effort: hand over what was decoded before the failure.
                    let _ = self.push_pending(sink);
                    return Err(e);
                }
            };
            match demand {
                Demand::Input => {
                    let chunk = source.pull();
                    if chunk.is_empty() {
                        let _ = self.push_pending(sink);
                        return Err(InflateError::PrematureEnd);
                    }
                    self.input.feed(chunk);
                }
                Demand::Output => self.push_pending(sink)?,
                Demand::Done => return self.push_pending(sink),
            }
        }
    }

    fn push_pending<K: ByteSink + ?Sized>(&mut self, sink: &mut K) -> Result<(), InflateError> {
        match self.window.as_mut() {
            Some(window) => window.flush(sink),
            None => Ok(()),
        }
    }

    /// Enter `Running` for one run.
    pub(crate) fn begin(&mut self) -> Result<(), InflateError> {
        match self.state {
            EngineState::Ready => {}
            EngineState::Running if !self.active => {}
            state => return Err(InflateError::BadState(state)),
        }
        if self.window.is_none() {
            return Err(InflateError::BadState(EngineState::Uninitialized));
        }
        self.state = EngineState::Running;
        self.active = true;
        Ok(())
    }

    /// Leave `Running` with the outcome of the run.
    pub(crate) fn finish(&mut self, result: Result<(), InflateError>) -> Result<(), InflateError> {
        self.active = false;
        match result {
            Ok(()) => {
                self.unused = self.input.unused();
                self.state = EngineState::Finished;
            }
            Err(_) => self.state = EngineState::Failed,
        }
        result
    }

    /// Hand a freshly pulled, non-empty chunk to the bit accumulator.
    pub(crate) fn feed(&mut self, chunk: &[u8]) {
        self.input.feed(chunk);
    }

    /// Decoded bytes waiting to be pushed.
    pub(crate) fn pending_output(&self) -> &[u8] {
        self.window.as_ref().map_or(&[], |w| w.pending_bytes())
    }

    /// Record that [`pending_output`](Self::pending_output) was pushed.
    pub(crate) fn output_pushed(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.mark_flushed();
        }
    }

    /// Decode until input runs out, the window fills, or the stream ends.
    pub(crate) fn advance(&mut self) -> Result<Demand, InflateError> {
        let window = match self.window.as_mut() {
            Some(w) => w,
            None => return Err(InflateError::BadState(EngineState::Uninitialized)),
        };
        let input = &mut self.input;
        loop {
            if window.is_full() {
                return Ok(Demand::Output);
            }
            let end_of_block = if self.last { Mode::Done } else { Mode::Header };
            match self.mode {
                Mode::Header => {
                    if !input.fill(3) {
                        return Ok(Demand::Input);
                    }
                    self.last = input.take(1) == 1;
                    self.mode = match input.take(2) {
                        0 => {
                            input.align_to_byte();
                            Mode::StoredLengths
                        }
                        1 => {
                            self.tables = Tables::Fixed;
                            Mode::Codes
                        }
                        2 => Mode::DynamicCounts,
                        _ => return Err(Corruption::InvalidBlockType.into()),
                    };
                }
                Mode::StoredLengths => {
                    if !input.fill(32) {
                        return Ok(Demand::Input);
                    }
                    let len = input.take(16);
                    let nlen = input.take(16);
                    if len != (!nlen & 0xFFFF) {
                        return Err(Corruption::StoredLengthMismatch.into());
                    }
                    self.mode = Mode::Stored { left: len as usize };
                }
                Mode::Stored { left: 0 } => self.mode = end_of_block,
                Mode::Stored { left } => {
                    let n = if input.has_held_byte() {
                        window.put(input.take(8) as u8);
                        1
                    } else {
                        let chunk = input.take_bytes(left.min(window.space()));
                        if chunk.is_empty() {
                            return Ok(Demand::Input);
                        }
                        window.write(chunk)
                    };
                    self.mode = Mode::Stored { left: left - n };
                }
                Mode::DynamicCounts => {
                    if !self.header.read_counts(input)? {
                        return Ok(Demand::Input);
                    }
                    self.mode = Mode::CodeLengthLengths;
                }
                Mode::CodeLengthLengths => {
                    if !self.header.read_code_length_code(input)? {
                        return Ok(Demand::Input);
                    }
                    self.mode = Mode::CodeLengths;
                }
                Mode::CodeLengths => {
                    if !self.header.read_lengths(input)? {
                        return Ok(Demand::Input);
                    }
                    self.tables = self.header.tables()?;
                    self.mode = Mode::Codes;
                }
                Mode::Codes => {
                    let (lit, dists) = self.tables.get();
                    match next_code(input, lit, dists)? {
                        None => return Ok(Demand::Input),
                        Some(Code::Literal(byte)) => window.put(byte),
                        Some(Code::EndOfBlock) => self.mode = end_of_block,
                        Some(Code::Match { len, dist }) => {
                            if dist > window.history() {
                                return Err(Corruption::DistanceTooFarBack.into());
                            }
                            self.mode = Mode::Match { len, dist };
                        }
                    }
                }
                Mode::Match { len, dist } => {
                    let n = window.copy_match(dist, len)?;
                    self.mode = if n == len {
                        Mode::Codes
                    } else {
                        Mode::Match { len: len - n, dist }
                    };
                }
                Mode::Done => return Ok(Demand::Done),
            }
        }
    }

    /// Release the window and return to `Uninitialized`.  Safe to call in any
    /// state, any number of times.
    pub fn end(&mut self) {
        self.window = None;
        self.clear_decode_state();
        self.state = EngineState::Uninitialized;
    }

    /// Return an initialized engine to `Ready`, discarding history, counters
    /// and any preloaded dictionary.  The window stays attached.
    pub fn reset(&mut self) -> Result<(), InflateError> {
        let window = self
            .window
            .as_mut()
            .ok_or(InflateError::BadState(EngineState::Uninitialized))?;
        window.reset();
        self.clear_decode_state();
        self.state = EngineState::Ready;
        Ok(())
    }

    /// Preload `dict` as history for the coming stream.  Only the last
    /// window-size bytes are kept; none of it is pushed as output.
    pub fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), InflateError> {
        if self.state != EngineState::Ready {
            return Err(InflateError::BadState(self.state));
        }
        if let Some(window) = self.window.as_mut() {
            window.preload(dict);
        }
        Ok(())
    }

    /// Independent copy with its own heap-allocated window.
    ///
    /// Valid in `Ready` or `Running`.  History, pending output, the bit
    /// accumulator, the block decoder's position and the counters are all
    /// duplicated, so the copy and the original can each run to completion
    /// without affecting one another.  A copy of a `Running` engine resumes
    /// from the copied position on its next [`run`](Self::run).
    pub fn copy(&self) -> Result<InflateBack<'static>, InflateError> {
        let window = self.copyable_window()?;
        Ok(self.clone_with(window.to_owned_window()))
    }

    /// Like [`copy`](Self::copy), but the copy's window lives in `buf`.
    pub fn copy_into<'b>(&self, buf: &'b mut [u8]) -> Result<InflateBack<'b>, InflateError> {
        let window = self.copyable_window()?;
        Ok(self.clone_with(window.copy_into(buf)?))
    }

    fn copyable_window(&self) -> Result<&SlidingWindow<'w>, InflateError> {
        match (self.state, self.window.as_ref()) {
            (EngineState::Ready | EngineState::Running, Some(w)) => Ok(w),
            _ => Err(InflateError::BadState(self.state)),
        }
    }

    fn clone_with<'b>(&self, window: SlidingWindow<'b>) -> InflateBack<'b> {
        InflateBack {
            state: self.state,
            active: false,
            window: Some(window),
            input: self.input.clone(),
            mode: self.mode,
            last: self.last,
            tables: self.tables.clone(),
            header: self.header.clone(),
            unused: self.unused.clone(),
        }
    }

    fn clear_decode_state(&mut self) {
        self.active = false;
        self.input.clear();
        self.mode = Mode::Header;
        self.last = false;
        self.tables = Tables::Fixed;
        self.unused.clear();
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Attached window's size exponent, if any.
    pub fn window_bits(&self) -> Option<i32> {
        self.window.as_ref().map(|w| w.bits())
    }

    /// The attached window, if any.
    pub fn window(&self) -> Option<&SlidingWindow<'w>> {
        self.window.as_ref()
    }

    /// Compressed bytes consumed.
    #[inline]
    pub fn total_in(&self) -> u64 {
        self.input.total_in()
    }

    /// Decompressed bytes produced.
    #[inline]
    pub fn total_out(&self) -> u64 {
        self.window.as_ref().map_or(0, |w| w.produced())
    }

    /// Input pulled from the source but lying past the end of the stream.
    pub fn unused_input(&self) -> &[u8] {
        &self.unused
    }
}
