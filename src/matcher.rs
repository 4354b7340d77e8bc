//! The matcher core: a sliding buffer over an unbounded byte source, the
//! position tracker, match state, the four-discipline match protocol, and
//! the lexer-action primitives built on top of them.
//!
//! A matcher owns its buffer exclusively and is not internally
//! synchronized; two matchers may share one compiled engine by reference.

use log::{debug, trace};

use crate::engine::{Context, Discipline, Engine, Verdict, EMPTY_SPLIT};
use crate::error::ScourError;
use crate::iter::Matches;
use crate::options::Options;
use crate::source::Source;

/// Buffer growth quantum; a fresh buffer holds `2 * BLOCK` bytes.
pub const BLOCK: usize = 4096;

/// The byte logically preceding the cursor, used for line-anchor and
/// word-boundary decisions. Escapes the 0..=255 range with sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prev {
    /// The cursor is at absolute offset 0, begin of input.
    Bob,
    Byte(u8),
    /// Not tracked, typically after repositioning.
    Unknown,
    /// The last consume attempt read past the end of input.
    Eof,
}

/// Owns-or-borrows a compiled engine.
enum Binding<'p, E> {
    Owned(E),
    Borrowed(&'p E),
}

impl<E> Binding<'_, E> {
    fn get(&self) -> &E {
        match self {
            Self::Owned(e) => e,
            Self::Borrowed(e) => e,
        }
    }
}

/// A pattern matcher over a streaming byte source.
///
/// The matcher feeds the source through a bounded sliding buffer, keeps
/// enough left-context for an engine to consult preceding bytes, and
/// exposes the current match as a contiguous zero-copy view. All accessor
/// values are determined by the most recent match step and stay constant
/// until the next mutating call.
pub struct Matcher<'a, E> {
    binding: Binding<'a, E>,
    src: Box<dyn Source + 'a>,
    opts: Options,
    /// Buffer storage; capacity is `buf.len()`, logical occupancy `[0, end)`.
    buf: Vec<u8>,
    /// Start of the current match in `buf`.
    txt: usize,
    /// Length of the current match.
    len: usize,
    /// Accept ordinal of the current match, 0 for no match.
    accept: usize,
    /// Next position to assign to `txt` when a match step begins.
    cur: usize,
    /// Read position; equals `cur` between match steps.
    pos: usize,
    /// End of the buffered input.
    end: usize,
    /// Refill block size; 0 reads all free capacity, 1 is interactive.
    block: usize,
    got: Prev,
    /// The logical byte at `buf[pos]`, surviving the NUL sentinel that a
    /// match installs there. `None` when `pos == end`.
    held: Option<u8>,
    /// Line number of `buf[0]`, 1-based.
    line: usize,
    /// Column of `buf[0]`, 0-based and byte-oriented.
    col: usize,
    /// Absolute offset of `buf[0]` in the input.
    offset: usize,
    eof: bool,
    /// Memoized result of the full-input discipline.
    full: Option<usize>,
    /// The single permitted empty find-match at EOF has been delivered.
    nulled: bool,
    /// The final empty split has been delivered.
    split_ended: bool,
}

impl<'a, E: Engine> Matcher<'a, E> {
    /// Compile `pattern` and build a matcher over `src`. The compiled
    /// engine is owned by this matcher.
    pub fn new(pattern: &str, src: impl Source + 'a) -> Result<Self, ScourError> {
        Ok(Self::with_parts(
            Binding::Owned(E::compile(pattern)?),
            Box::new(src),
            Options::default(),
        ))
    }

    /// Compile a list of alternatives; matches report the 1-based index of
    /// the alternative that matched.
    pub fn from_alternatives(patterns: &[&str], src: impl Source + 'a) -> Result<Self, ScourError> {
        Ok(Self::with_parts(
            Binding::Owned(E::compile_alternatives(patterns)?),
            Box::new(src),
            Options::default(),
        ))
    }

    /// Build a matcher that borrows an engine compiled elsewhere. Any
    /// number of matchers may share one engine this way.
    pub fn from_engine(engine: &'a E, src: impl Source + 'a) -> Self {
        Self::with_parts(Binding::Borrowed(engine), Box::new(src), Options::default())
    }

    fn with_parts(binding: Binding<'a, E>, src: Box<dyn Source + 'a>, opts: Options) -> Self {
        let mut matcher = Self {
            binding,
            src,
            opts,
            buf: vec![0; 2 * BLOCK],
            txt: 0,
            len: 0,
            accept: 0,
            cur: 0,
            pos: 0,
            end: 0,
            block: 0,
            got: Prev::Bob,
            held: None,
            line: 1,
            col: 0,
            offset: 0,
            eof: false,
            full: None,
            nulled: false,
            split_ended: false,
        };
        matcher.reset();
        matcher
    }

    /// A new matcher over `src` that borrows this matcher's compiled
    /// pattern; the compilation is never deep-copied.
    pub fn fork<'s>(&'s self, src: impl Source + 's) -> Matcher<'s, E>
    where
        'a: 's,
    {
        Matcher::with_parts(Binding::Borrowed(self.pattern()), Box::new(src), self.opts)
    }

    /// The compiled engine this matcher runs.
    pub fn pattern(&self) -> &E {
        self.binding.get()
    }

    /// Borrow an engine compiled elsewhere, releasing a previously owned one.
    pub fn set_pattern(&mut self, engine: &'a E) {
        self.binding = Binding::Borrowed(engine);
        self.full = None;
    }

    /// Compile `pattern` and own the result, releasing a previously owned one.
    pub fn set_pattern_source(&mut self, pattern: &str) -> Result<(), ScourError> {
        self.binding = Binding::Owned(E::compile(pattern)?);
        self.full = None;
        Ok(())
    }

    /// Replace the input source and reset the matcher.
    pub fn set_input(&mut self, src: impl Source + 'a) {
        self.src = Box::new(src);
        self.reset();
    }

    /// Reset all match state and position bookkeeping to the initial state.
    /// The input source is kept; options are kept.
    pub fn reset(&mut self) {
        trace!("reset");
        self.buf[0] = 0;
        self.txt = 0;
        self.len = 0;
        self.accept = 0;
        self.cur = 0;
        self.pos = 0;
        self.end = 0;
        self.block = 0;
        self.got = Prev::Bob;
        self.held = None;
        self.line = 1;
        self.col = 0;
        self.offset = 0;
        self.eof = false;
        self.full = None;
        self.nulled = false;
        self.split_ended = false;
    }

    /// Reset with a fresh option string (see [`Options::parse`]).
    pub fn reset_with(&mut self, options: &str) {
        self.opts = Options::parse(options);
        self.reset();
    }

    pub fn options(&self) -> Options {
        self.opts
    }

    // ------------------------------------------------------------------
    // Match disciplines
    // ------------------------------------------------------------------

    /// Match the pattern starting exactly at the cursor. Returns the accept
    /// ordinal, 0 when no prefix of the remaining input matches.
    pub fn scan(&mut self) -> usize {
        self.step(Discipline::Scan)
    }

    /// Search forward from the cursor. Skipped bytes go unreported. Returns
    /// the accept ordinal, 0 when the rest of the input holds no match.
    pub fn find(&mut self) -> usize {
        self.step(Discipline::Find)
    }

    /// Deliver the span from the cursor up to the next pattern match and
    /// consume the match. At end of input, one final empty span is
    /// delivered with accept [`EMPTY_SPLIT`], then 0 forever.
    pub fn split(&mut self) -> usize {
        self.step(Discipline::Split)
    }

    /// True (nonzero) when the entire input matches the pattern. The
    /// verdict is memoized: repeat calls return it without touching the
    /// source again.
    pub fn matches(&mut self) -> usize {
        if let Some(memo) = self.full {
            return memo;
        }
        if !self.at_bob() {
            return 0;
        }
        let accept = self.step(Discipline::Full);
        let accept = if accept != 0 && self.at_end() { accept } else { 0 };
        self.full = Some(accept);
        accept
    }

    /// Lazy sequence of tokenizer steps; ends at the first failed scan.
    pub fn scan_iter(&mut self) -> Matches<'_, 'a, E> {
        Matches::new(self, Discipline::Scan)
    }

    /// Lazy sequence of forward searches; ends when no match remains.
    pub fn find_iter(&mut self) -> Matches<'_, 'a, E> {
        Matches::new(self, Discipline::Find)
    }

    /// Lazy sequence of split spans, ending after the final empty split.
    pub fn split_iter(&mut self) -> Matches<'_, 'a, E> {
        Matches::new(self, Discipline::Split)
    }

    /// One match step under `disc`: drive the engine over the buffered
    /// window, refilling on demand, then commit the resulting span and
    /// cursor state. Returns the accept ordinal, 0 for no match.
    pub(crate) fn step(&mut self, disc: Discipline) -> usize {
        trace!("match step {disc:?} cur {} end {}", self.cur, self.end);
        self.unseal();
        self.accept = 0;
        self.len = 0;
        self.pos = self.cur;
        self.txt = self.cur;
        self.held = if self.pos < self.end {
            Some(self.buf[self.pos])
        } else {
            None
        };

        if disc == Discipline::Split && self.split_ended {
            return 0;
        }

        let mut at = self.cur;
        loop {
            let ctx = Context {
                at_bol: self.bol_at(at),
                at_bob: self.offset + at == 0,
                eof: self.eof,
                opts: self.opts,
            };
            let verdict = self
                .binding
                .get()
                .search(&self.buf[..self.end], at, ctx, disc);

            // Empty matches need care before committing: a find skips them
            // mid-input and admits one at EOF only under option N; a split
            // ignores a zero-width delimiter that would make no progress.
            let verdict = match (disc, verdict) {
                (Discipline::Find, Verdict::Hit { start, end, .. }) if start == end => {
                    if start < self.end {
                        at = start + 1;
                        continue;
                    }
                    if self.opts.nullable && !self.nulled {
                        verdict
                    } else {
                        Verdict::Miss
                    }
                }
                (Discipline::Split, Verdict::Hit { start, end, .. })
                    if start == end && end <= self.cur =>
                {
                    if start < self.end {
                        at = start + 1;
                        continue;
                    }
                    Verdict::Miss
                }
                (_, v) => v,
            };

            match verdict {
                Verdict::More if !self.eof => {
                    self.fill();
                }
                Verdict::Hit { start, end, accept } => {
                    debug_assert!(accept != 0, "engines must report nonzero accept ordinals");
                    if disc == Discipline::Split {
                        // span runs from the cursor up to the delimiter
                        self.len = start - self.cur;
                        self.accept = accept;
                    } else {
                        self.txt = start;
                        self.len = end - start;
                        self.accept = accept;
                        if disc == Discipline::Find && self.len == 0 {
                            self.nulled = true;
                        }
                    }
                    self.set_current(end);
                    self.seal();
                    break;
                }
                Verdict::Miss | Verdict::More => {
                    if disc == Discipline::Split {
                        // no further delimiter: the tail, then one final
                        // empty span
                        if self.cur < self.end {
                            self.len = self.end - self.cur;
                            self.accept = 1;
                        } else {
                            self.len = 0;
                            self.accept = EMPTY_SPLIT;
                            self.split_ended = true;
                        }
                        self.set_current(self.end);
                        self.seal();
                    }
                    break;
                }
            }
        }
        trace!("match step -> accept {}", self.accept);
        self.accept
    }

    // ------------------------------------------------------------------
    // Match accessors
    // ------------------------------------------------------------------

    /// Accept ordinal of the current match: 0 for no match, [`EMPTY_SPLIT`]
    /// for the final empty split, otherwise an engine-defined positive
    /// ordinal.
    pub fn accept(&self) -> usize {
        self.accept
    }

    /// The current match as a contiguous zero-copy view into the buffer.
    pub fn text(&self) -> &[u8] {
        &self.buf[self.txt..self.txt + self.len]
    }

    /// The current match as UTF-8, when it is valid UTF-8.
    pub fn text_str(&self) -> Option<&str> {
        std::str::from_utf8(self.text()).ok()
    }

    /// Length of the current match in bytes.
    pub fn size(&self) -> usize {
        self.len
    }

    /// Accept ordinal and an owned copy of the match bytes, for tokenizing
    /// into containers.
    pub fn pair(&self) -> (usize, Vec<u8>) {
        (self.accept, self.text().to_vec())
    }

    /// Absolute offset of the first byte of the match.
    pub fn first(&self) -> usize {
        self.offset + self.txt
    }

    /// Absolute offset one past the last byte of the match.
    pub fn last(&self) -> usize {
        self.first() + self.len
    }

    /// Line number of the match start, 1-based.
    pub fn lineno(&self) -> usize {
        self.line + memchr::memchr_iter(b'\n', &self.buf[..self.txt]).count()
    }

    /// Column of the match start, 0-based and byte-oriented.
    pub fn columno(&self) -> usize {
        match memchr::memrchr(b'\n', &self.buf[..self.txt]) {
            Some(nl) => self.txt - nl - 1,
            None => self.col + self.txt,
        }
    }

    // ------------------------------------------------------------------
    // Lexer-action primitives
    // ------------------------------------------------------------------

    /// Look at the next byte without consuming it, refilling if needed.
    /// `None` is end of input.
    pub fn peek(&mut self) -> Option<u8> {
        if self.pos < self.end {
            return self.held;
        }
        if self.fill() {
            self.held
        } else {
            None
        }
    }

    /// Consume the next byte from the buffer, refilling if needed.
    pub fn get(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.unseal();
        self.pos += 1;
        self.held = if self.pos < self.end {
            Some(self.buf[self.pos])
        } else {
            None
        };
        Some(byte)
    }

    /// Consume one byte past the current match, keeping the match view
    /// intact. Advances the cursor so the next match starts after the
    /// consumed byte.
    pub fn input(&mut self) -> Option<u8> {
        trace!("input at pos {} end {}", self.pos, self.end);
        let byte = self.get();
        self.got = match byte {
            Some(b) => Prev::Byte(b),
            None => Prev::Eof,
        };
        self.cur = self.pos;
        byte
    }

    /// Push a byte back at the cursor, invalidating the current match.
    /// At the buffer origin the buffered input shifts right to make room,
    /// growing if needed.
    pub fn unput(&mut self, byte: u8) {
        trace!("unput");
        self.unseal();
        if self.pos > 0 {
            self.pos -= 1;
        } else {
            self.txt = 0;
            self.len = 0;
            if self.end == self.buf.len() {
                self.grow(BLOCK);
            }
            self.buf.copy_within(0..self.end, 1);
            self.end += 1;
        }
        self.buf[self.pos] = byte;
        self.held = Some(byte);
        self.txt = self.pos;
        self.len = 0;
        self.cur = self.pos;
    }

    /// Mark that the next match should extend the current one: the cursor
    /// rewinds to the match start, so the next accepted span starts there.
    pub fn more(&mut self) {
        self.cur = self.txt;
    }

    /// Truncate the current match to `n` bytes and reposition so the next
    /// match starts right after the truncated text. A no-op when `n` is
    /// not smaller than the current size.
    pub fn less(&mut self, n: usize) {
        if n < self.len {
            self.unseal();
            self.pos = self.txt + n;
            self.cur = self.pos;
            self.len = n;
            self.seal();
        }
    }

    /// Drain the source into the buffer (honoring `wrap`), expose the whole
    /// remainder as the match view, and leave the matcher at end of input.
    pub fn rest(&mut self) -> &[u8] {
        debug!("rest");
        self.unseal();
        if self.pos > 0 {
            self.txt = self.pos;
            self.absorb();
            self.end -= self.pos;
            self.buf.copy_within(self.pos..self.pos + self.end, 0);
        }
        self.txt = 0;
        while !self.eof {
            self.grow(BLOCK);
            self.pos = self.end;
            let free = self.free_block();
            let n = self.src.read(&mut self.buf[self.end..self.end + free]);
            self.end += n;
            if self.pos == self.end && !self.src.wrap() {
                self.eof = true;
            }
        }
        self.len = self.end;
        self.set_current(self.end);
        self.seal();
        debug!("rest -> {} bytes", self.len);
        &self.buf[..self.len]
    }

    /// Discard the buffered remainder by skipping the read position to the
    /// end of the window.
    pub fn flush(&mut self) {
        trace!("flush");
        self.pos = self.end;
        self.held = None;
    }

    /// Refill block size: 1 for interactive input, 0 to slurp the whole
    /// input up front (only when the source size is known and nothing has
    /// been read yet; returns false otherwise). Sizes above [`BLOCK`] are
    /// clamped.
    pub fn buffer(&mut self, block: usize) -> bool {
        let block = block.min(BLOCK);
        debug!("buffer({block})");
        self.block = block;
        if block == 0 {
            if !self.at_bob() {
                return false;
            }
            let n = self.src.len_hint();
            if n == 0 {
                return false;
            }
            self.grow(n);
            let mut total = 0;
            while total < n {
                let k = self.src.read(&mut self.buf[self.end..]);
                if k == 0 {
                    break;
                }
                self.end += k;
                total += k;
            }
            if total != n {
                return false;
            }
            self.eof = true;
        }
        true
    }

    /// Read one byte at a time, for interactive input.
    pub fn interactive(&mut self) {
        self.buffer(1);
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    /// At the start of the input; nothing consumed yet.
    pub fn at_bob(&self) -> bool {
        self.got == Prev::Bob
    }

    /// At the beginning of a line.
    pub fn at_bol(&self) -> bool {
        self.got == Prev::Byte(b'\n')
    }

    /// Force the begin-of-line state, or clear a newline anchor.
    pub fn set_bol(&mut self, bol: bool) {
        if bol {
            self.got = Prev::Byte(b'\n');
        } else if self.at_bol() {
            self.got = Prev::Unknown;
        }
    }

    /// A read attempt would produce end of input. May refill to find out.
    pub fn at_end(&mut self) -> bool {
        self.pos == self.end && (self.eof || self.peek().is_none())
    }

    /// End of input was reached; no read attempt is needed to know.
    pub fn hit_end(&self) -> bool {
        self.pos == self.end && self.eof
    }

    /// Force (or clear) the end-of-input state; forcing it also flushes
    /// the buffered remainder.
    pub fn set_end(&mut self, eof: bool) {
        if eof {
            self.flush();
        }
        self.eof = eof;
    }

    // ------------------------------------------------------------------
    // Buffer internals
    // ------------------------------------------------------------------

    /// Whether a search origin sits at the beginning of a line.
    fn bol_at(&self, at: usize) -> bool {
        if at > 0 {
            self.buf[at - 1] == b'\n'
        } else {
            matches!(self.got, Prev::Bob | Prev::Byte(b'\n'))
        }
    }

    /// Bytes to request from the source for one refill.
    fn free_block(&self) -> usize {
        let free = self.buf.len() - self.end;
        if self.block == 0 {
            free
        } else {
            self.block.min(free)
        }
    }

    /// Read the next block from the source into the buffer, growing first
    /// when the buffer is full. Returns false when end of input is reached
    /// instead; `eof` is latched once `wrap` refuses.
    fn fill(&mut self) -> bool {
        if self.eof {
            return false;
        }
        if self.end == self.buf.len() {
            self.grow(BLOCK);
        }
        loop {
            let free = self.free_block();
            let n = self.src.read(&mut self.buf[self.end..self.end + free]);
            if n > 0 {
                self.end += n;
                if self.pos < self.end && self.held.is_none() {
                    self.held = Some(self.buf[self.pos]);
                }
                return true;
            }
            trace!("fill: source dry");
            if !self.src.wrap() {
                self.eof = true;
                return false;
            }
        }
    }

    /// Ensure at least `need` free bytes past `end`: close the dead gap
    /// before the match start by shifting, or double the capacity. Either
    /// way the tracker absorbs the dropped prefix and every position keeps
    /// referring to the same logical byte.
    fn grow(&mut self, need: usize) -> bool {
        if self.buf.len() - self.end >= need {
            return false;
        }
        let gap = self.txt;
        if gap >= need {
            trace!("shift buffer to close gap of {gap}");
            self.absorb();
            self.cur -= gap;
            self.pos -= gap;
            self.end -= gap;
            self.buf.copy_within(gap..gap + self.end, 0);
            self.txt = 0;
        } else {
            let target = self.end - gap + need;
            let mut newmax = self.buf.len();
            while newmax < target {
                newmax *= 2;
            }
            if newmax > self.buf.len() {
                trace!("expand buffer from {} to {newmax}", self.buf.len());
                self.absorb();
                self.cur -= gap;
                self.pos -= gap;
                self.end -= gap;
                let mut newbuf = vec![0; newmax];
                newbuf[..self.end].copy_from_slice(&self.buf[gap..gap + self.end]);
                self.buf = newbuf;
                self.txt = 0;
            }
        }
        true
    }

    /// Fold the `[0, txt)` prefix into the line/column/offset tracker
    /// before a shift drops it.
    fn absorb(&mut self) {
        let prefix = &self.buf[..self.txt];
        match memchr::memrchr(b'\n', prefix) {
            Some(last) => {
                self.line += memchr::memchr_iter(b'\n', prefix).count();
                self.col = self.txt - last - 1;
            }
            None => self.col += self.txt,
        }
        self.offset += self.txt;
    }

    /// Reposition the cursor and read position, refreshing the
    /// previous-byte slot and the held byte.
    fn set_current(&mut self, loc: usize) {
        debug_assert!(loc <= self.end);
        self.pos = loc;
        self.cur = loc;
        self.got = if loc > 0 {
            Prev::Byte(self.buf[loc - 1])
        } else {
            Prev::Unknown
        };
        self.held = if loc < self.end {
            Some(self.buf[loc])
        } else {
            None
        };
    }

    /// Install the NUL sentinel at `pos`, caching the displaced byte, so
    /// the match view reads as a NUL-terminated byte string.
    fn seal(&mut self) {
        if self.pos == self.buf.len() {
            self.grow(1);
        }
        self.held = if self.pos < self.end {
            Some(self.buf[self.pos])
        } else {
            None
        };
        self.buf[self.pos] = 0;
    }

    /// Restore the byte displaced by the NUL sentinel. Restoring does not
    /// disturb a previously returned match view: views are length-bounded
    /// slices.
    fn unseal(&mut self) {
        if self.pos < self.end {
            if let Some(byte) = self.held {
                self.buf[self.pos] = byte;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ByteSource;

    /// A bare-bones engine matching one fixed literal, enough to exercise
    /// the core without a regex implementation behind it.
    struct LiteralEngine(Vec<u8>);

    impl Engine for LiteralEngine {
        fn compile(pattern: &str) -> Result<Self, ScourError> {
            Ok(Self(pattern.as_bytes().to_vec()))
        }

        fn search(&self, window: &[u8], at: usize, ctx: Context, disc: Discipline) -> Verdict {
            let lit = &self.0;
            let rem = &window[at..];
            match disc {
                Discipline::Scan => {
                    if rem.len() >= lit.len() {
                        if rem.starts_with(lit) {
                            Verdict::Hit {
                                start: at,
                                end: at + lit.len(),
                                accept: 1,
                            }
                        } else {
                            Verdict::Miss
                        }
                    } else if !ctx.eof && lit.starts_with(rem) {
                        Verdict::More
                    } else {
                        Verdict::Miss
                    }
                }
                Discipline::Find | Discipline::Split => {
                    match memchr::memmem::find(rem, lit) {
                        Some(i) => Verdict::Hit {
                            start: at + i,
                            end: at + i + lit.len(),
                            accept: 1,
                        },
                        None if !ctx.eof => Verdict::More,
                        None => Verdict::Miss,
                    }
                }
                Discipline::Full => {
                    if !ctx.eof {
                        Verdict::More
                    } else if rem == lit.as_slice() {
                        Verdict::Hit {
                            start: at,
                            end: window.len(),
                            accept: 1,
                        }
                    } else {
                        Verdict::Miss
                    }
                }
            }
        }
    }

    fn literal<'a>(pattern: &str, input: &'a str) -> Matcher<'a, LiteralEngine> {
        Matcher::new(pattern, ByteSource::from(input)).unwrap()
    }

    #[test]
    fn sentinel_installed_and_held_byte_survives() {
        let mut m = literal("ab", "abcd");
        assert_eq!(m.scan(), 1);
        assert_eq!(m.text(), b"ab");
        // the NUL sentinel terminates the view, the displaced byte is cached
        assert_eq!(m.buf[m.txt + m.len], 0);
        assert_eq!(m.held, Some(b'c'));
        m.unseal();
        assert_eq!(m.buf[2], b'c');
        m.seal();
    }

    #[test]
    fn grow_keeps_the_logical_bytes() {
        let long = "a".repeat(3 * BLOCK);
        let mut m = literal(&long, &long);
        assert_eq!(m.scan(), 1);
        assert_eq!(m.size(), 3 * BLOCK);
        assert_eq!(m.first(), 0);
        assert!(m.text().iter().all(|&b| b == b'a'));
        assert!(m.buf.len() > 2 * BLOCK, "the buffer must have doubled");
    }

    #[test]
    fn rest_absorbs_dropped_prefix_into_the_tracker() {
        let mut m = literal("ab\ncd ", "ab\ncd ef");
        assert_eq!(m.scan(), 1);
        let tail = m.rest().to_vec();
        assert_eq!(tail, b"ef");
        assert_eq!(m.first(), 6);
        assert_eq!(m.lineno(), 2);
        assert_eq!(m.columno(), 3);
        assert!(m.hit_end());
    }

    #[test]
    fn rest_at_eof_is_empty() {
        let mut m = literal("xyz", "xyz");
        assert_eq!(m.scan(), 1);
        assert_eq!(m.rest(), b"");
        let again = m.rest().to_vec();
        assert_eq!(again, b"");
        assert!(m.hit_end());
    }

    #[test]
    fn unput_at_origin_shifts_right() {
        let mut m = literal("x", "bc");
        m.unput(b'a');
        assert_eq!(m.peek(), Some(b'a'));
        assert_eq!(m.get(), Some(b'a'));
        assert_eq!(m.get(), Some(b'b'));
        assert_eq!(m.get(), Some(b'c'));
        assert_eq!(m.get(), None);
    }

    #[test]
    fn unput_invalidates_the_match() {
        let mut m = literal("ab", "abcd");
        assert_eq!(m.scan(), 1);
        m.unput(b'Z');
        assert_eq!(m.size(), 0);
        assert_eq!(m.text(), b"");
        assert_eq!(m.get(), Some(b'Z'));
        assert_eq!(m.get(), Some(b'c'));
    }

    #[test]
    fn less_truncates_and_reseals() {
        let mut m = literal("hello", "helloworld");
        assert_eq!(m.scan(), 1);
        m.less(3);
        assert_eq!(m.text(), b"hel");
        assert_eq!(m.size(), 3);
        assert_eq!(m.pos, 3);
        assert_eq!(m.buf[3], 0);
        assert_eq!(m.held, Some(b'l'));
        // less(size()) is a no-op
        m.less(3);
        assert_eq!(m.text(), b"hel");
    }

    #[test]
    fn more_rewinds_the_cursor_to_the_match_start() {
        let mut m = literal("ab", "abab");
        assert_eq!(m.scan(), 1);
        let start = m.first();
        m.more();
        assert_eq!(m.scan(), 1);
        assert_eq!(m.first(), start);
    }

    #[test]
    fn flush_skips_the_buffered_remainder() {
        let mut m = literal("ab", "abcd");
        assert_eq!(m.scan(), 1);
        m.flush();
        assert_eq!(m.pos, m.end);
        m.set_end(true);
        assert!(m.hit_end());
    }

    #[test]
    fn predicates_and_bol_forcing() {
        let mut m = literal("a", "a\nb");
        assert!(m.at_bob());
        assert!(!m.at_bol());
        assert_eq!(m.scan(), 1);
        assert!(!m.at_bob());
        m.set_bol(true);
        assert!(m.at_bol());
        m.set_bol(false);
        assert!(!m.at_bol());
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let mut m = literal("ab", "abcd");
        assert_eq!(m.scan(), 1);
        m.reset();
        assert!(m.at_bob());
        assert_eq!(m.accept(), 0);
        assert_eq!(m.size(), 0);
        assert_eq!(m.first(), 0);
        assert_eq!(m.lineno(), 1);
        assert_eq!(m.columno(), 0);
        // reset is idempotent: a second reset changes nothing observable
        m.reset();
        assert!(m.at_bob());
        assert_eq!(m.end, 0);
    }

    #[test]
    fn full_match_via_trait_engine() {
        let mut m = literal("abc", "abc");
        assert_eq!(m.matches(), 1);
        assert_eq!(m.matches(), 1);
        let mut m = literal("abc", "abx");
        assert_eq!(m.matches(), 0);
    }
}
