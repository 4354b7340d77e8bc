//! Lazy match sequences over a matcher.
//!
//! Each step borrows the matcher itself, so the usual `Iterator` trait
//! cannot express it; `StreamingIterator` can. Accessors on the yielded
//! matcher (`accept`, `text`, `first`, `lineno`, …) describe the match
//! the step produced.

use streaming_iterator::StreamingIterator;

use crate::engine::{Discipline, Engine};
use crate::matcher::Matcher;

/// A forward sequence of matches under one discipline. Construction
/// resets the matcher; every `advance` performs one match step and the
/// first zero accept ends the sequence.
pub struct Matches<'m, 'a, E> {
    matcher: &'m mut Matcher<'a, E>,
    discipline: Discipline,
    done: bool,
}

impl<'m, 'a, E: Engine> Matches<'m, 'a, E> {
    pub(crate) fn new(matcher: &'m mut Matcher<'a, E>, discipline: Discipline) -> Self {
        matcher.reset();
        Self {
            matcher,
            discipline,
            done: false,
        }
    }
}

impl<'a, E: Engine> StreamingIterator for Matches<'_, 'a, E> {
    type Item = Matcher<'a, E>;

    fn advance(&mut self) {
        if !self.done && self.matcher.step(self.discipline) == 0 {
            self.done = true;
        }
    }

    fn get(&self) -> Option<&Self::Item> {
        if self.done {
            None
        } else {
            Some(self.matcher)
        }
    }
}
