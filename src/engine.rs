//! The engine capability: one search primitive the matcher core drives.
//!
//! The core owns the buffer, the refill loop, and all state commits; an
//! engine only inspects a window of buffered bytes and reports where a
//! match would start and end. Returning [`Verdict::More`] hands control
//! back to the core, which appends input and retries, so engines never
//! perform I/O themselves.

use crate::error::ScourError;
use crate::options::Options;

/// Accept value reported for the final empty split at end of input.
/// Distinct from every ordinary engine accept ordinal.
pub const EMPTY_SPLIT: usize = usize::MAX;

/// The kind of match to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Match starting exactly at the cursor, the classical tokenizer step.
    Scan,
    /// Search forward from the cursor; skipped bytes go unreported.
    Find,
    /// Deliver the span up to the next match; the match itself is consumed.
    Split,
    /// Succeed only if the entire remaining input matches.
    Full,
}

/// Anchor context at the search origin, plus the matcher options for
/// engine-specific concerns (the `A` option, tab width).
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// The search origin sits at the beginning of a line.
    pub at_bol: bool,
    /// The search origin is absolute offset 0 of the input.
    pub at_bob: bool,
    /// No bytes will ever be appended past the window.
    pub eof: bool,
    pub opts: Options,
}

/// What one search attempt produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A match at `[start, end)` in the window, with the engine's nonzero
    /// accept ordinal.
    Hit {
        start: usize,
        end: usize,
        accept: usize,
    },
    /// No match, and more input cannot change that.
    Miss,
    /// The answer could change once more input is appended to the window.
    /// Only meaningful while the context says end of input is not reached.
    More,
}

/// A compiled pattern plus the logic to run it over a byte window.
pub trait Engine: Sized {
    /// Compile a single pattern expression. Matches report accept ordinal 1.
    fn compile(pattern: &str) -> Result<Self, ScourError>;

    /// Compile a list of alternatives; a match reports the 1-based index of
    /// the alternative that matched. The default collapses the list into
    /// one expression, losing the per-alternative ordinals.
    fn compile_alternatives(patterns: &[&str]) -> Result<Self, ScourError> {
        Self::compile(&patterns.join("|"))
    }

    /// Search `window[at..]` under the given discipline. `Scan` and `Full`
    /// must anchor at `at`; `Find` and `Split` search forward from it.
    fn search(&self, window: &[u8], at: usize, ctx: Context, disc: Discipline) -> Verdict;
}
