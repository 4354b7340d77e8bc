//! A concrete engine over `regex-automata`'s meta regex.

use regex_automata::meta::Regex;
use regex_automata::{Anchored, Input};

use crate::engine::{Context, Discipline, Engine, Verdict};
use crate::error::ScourError;

/// Pattern engine backed by [`regex_automata::meta::Regex`].
///
/// Accept ordinals: [`Engine::compile`] reports 1 for every match;
/// [`Engine::compile_alternatives`] reports the 1-based index of the
/// alternative that matched. Anchors are window-relative: `^` and `\A`
/// refer to the buffered window the core hands over, which starts no
/// later than the current match start.
#[derive(Debug)]
pub struct RegexEngine {
    /// Leftmost-first searcher for scan, find, and split.
    re: Regex,
    /// The same alternatives, each wrapped in `(?:…)\z`, so the full-input
    /// discipline cannot settle for a shorter alternative.
    full: Regex,
}

impl RegexEngine {
    fn build(patterns: &[&str]) -> Result<Self, ScourError> {
        let err = |reason: regex_automata::meta::BuildError| ScourError::Pattern {
            pattern: patterns.join("|"),
            reason: reason.to_string(),
        };
        let re = Regex::new_many(patterns).map_err(&err)?;
        let full: Vec<String> = patterns.iter().map(|p| format!("(?:{p})\\z")).collect();
        let full = Regex::new_many(&full).map_err(&err)?;
        Ok(Self { re, full })
    }
}

impl Engine for RegexEngine {
    fn compile(pattern: &str) -> Result<Self, ScourError> {
        Self::build(&[pattern])
    }

    fn compile_alternatives(patterns: &[&str]) -> Result<Self, ScourError> {
        Self::build(patterns)
    }

    fn search(&self, window: &[u8], at: usize, ctx: Context, disc: Discipline) -> Verdict {
        if disc == Discipline::Full && !ctx.eof {
            // the whole remaining input is needed before an answer is final
            return Verdict::More;
        }
        let (re, anchored) = match disc {
            Discipline::Scan => (&self.re, Anchored::Yes),
            Discipline::Full => (&self.full, Anchored::Yes),
            Discipline::Find | Discipline::Split => (&self.re, Anchored::No),
        };
        let input = Input::new(window).range(at..).anchored(anchored);
        match re.search(&input) {
            // a match reaching the window end may still extend
            Some(m) if m.end() == window.len() && !ctx.eof => Verdict::More,
            Some(m) => Verdict::Hit {
                start: m.start(),
                end: m.end(),
                accept: m.pattern().as_usize() + 1,
            },
            // TODO: distinguish a dead DFA state from running out of window,
            // so a scan that can never succeed stops asking for more input
            None if !ctx.eof => Verdict::More,
            None => Verdict::Miss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn ctx(eof: bool) -> Context {
        Context {
            at_bol: true,
            at_bob: true,
            eof,
            opts: Options::default(),
        }
    }

    #[test]
    fn scan_is_anchored() {
        let e = RegexEngine::compile("[0-9]+").unwrap();
        assert_eq!(
            e.search(b"42x", 0, ctx(true), Discipline::Scan),
            Verdict::Hit {
                start: 0,
                end: 2,
                accept: 1
            }
        );
        assert_eq!(e.search(b"x42", 0, ctx(true), Discipline::Scan), Verdict::Miss);
    }

    #[test]
    fn find_skips_ahead() {
        let e = RegexEngine::compile("[0-9]+").unwrap();
        assert_eq!(
            e.search(b"ab42cd", 0, ctx(true), Discipline::Find),
            Verdict::Hit {
                start: 2,
                end: 4,
                accept: 1
            }
        );
    }

    #[test]
    fn match_touching_the_window_end_wants_more() {
        let e = RegexEngine::compile("[0-9]+").unwrap();
        assert_eq!(e.search(b"x42", 0, ctx(false), Discipline::Find), Verdict::More);
        assert_eq!(
            e.search(b"x42", 0, ctx(true), Discipline::Find),
            Verdict::Hit {
                start: 1,
                end: 3,
                accept: 1
            }
        );
    }

    #[test]
    fn alternatives_report_their_ordinal() {
        let e = RegexEngine::compile_alternatives(&["[a-z]+", "[0-9]+"]).unwrap();
        assert_eq!(
            e.search(b"42", 0, ctx(true), Discipline::Scan),
            Verdict::Hit {
                start: 0,
                end: 2,
                accept: 2
            }
        );
    }

    #[test]
    fn full_requires_the_entire_input() {
        let e = RegexEngine::compile("a|ab").unwrap();
        // leftmost-first alone would settle for "a"; the \z wrapper cannot
        assert_eq!(
            e.search(b"ab", 0, ctx(true), Discipline::Full),
            Verdict::Hit {
                start: 0,
                end: 2,
                accept: 1
            }
        );
        assert_eq!(e.search(b"ax", 0, ctx(true), Discipline::Full), Verdict::Miss);
        assert_eq!(e.search(b"ab", 0, ctx(false), Discipline::Full), Verdict::More);
    }

    #[test]
    fn bad_pattern_reports_a_compile_error() {
        let err = RegexEngine::compile("[").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid pattern"), "unexpected message: {msg}");
    }
}
