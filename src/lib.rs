#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,      // accessor-heavy API; annotating every getter is noise
    clippy::missing_errors_doc,      // the single error type is documented where it lives
    clippy::missing_panics_doc,      // allocation failure is the only panic in this layer
    clippy::cast_possible_truncation, // file sizes as usize, we target 64-bit
    clippy::module_name_repetitions, // Rust naming conventions
)]

//! Streaming input-buffer and match-iteration core for pattern matching
//! engines.
//!
//! A [`Matcher`] feeds an unbounded byte sequence (memory, file, or an
//! interactive stream) through a bounded sliding buffer, keeps enough
//! left-context for an engine to consult preceding bytes, and exposes each
//! match as a contiguous zero-copy view with line/column/offset
//! accounting. Four disciplines share one surface: [`Matcher::scan`]
//! tokenizes from the cursor, [`Matcher::find`] searches forward,
//! [`Matcher::split`] inverts matching to deliver the text between
//! matches, and [`Matcher::matches`] tests the whole input. The
//! lexer-action primitives (`input`, `unput`, `more`, `less`, `rest`, …)
//! mutate buffer and match state the way scanner generators expect.
//!
//! The engine is pluggable through the [`Engine`] trait; [`RegexEngine`]
//! binds `regex-automata`. Compiled engines can be shared across matchers
//! by reference.
//!
//! ```
//! use scour::{ByteSource, Matcher, RegexEngine};
//! use streaming_iterator::StreamingIterator;
//!
//! let mut m: Matcher<RegexEngine> =
//!     Matcher::from_alternatives(&["[a-z]+", "[0-9]+", r"\s+"], ByteSource::from("ab 12"))
//!         .unwrap();
//! let mut tokens = Vec::new();
//! let mut steps = m.scan_iter();
//! while let Some(m) = steps.next() {
//!     tokens.push((m.accept(), m.text().to_vec()));
//! }
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0], (1, b"ab".to_vec()));
//! ```

mod engine;
mod error;
mod iter;
mod matcher;
mod options;
mod regex;
mod source;

pub use engine::{Context, Discipline, Engine, Verdict, EMPTY_SPLIT};
pub use error::ScourError;
pub use iter::Matches;
pub use matcher::{Matcher, Prev, BLOCK};
pub use options::Options;
pub use regex::RegexEngine;
pub use source::{ByteSource, ChainSource, ReadSource, Source};
