//! Multi-pattern exact byte search.
//!
//! An [`Automaton`] is built once from an ordered list of patterns and can
//! then scan any number of haystacks in a single pass each, reporting every
//! occurrence of every pattern as a [`Hit`].
//!
//! ```
//! let automaton = scout::build(["The", "Th", "he"]).unwrap();
//! let hits = scout::scan(&automaton, b"The Man Of Steel");
//! let pairs: Vec<(usize, usize)> = hits.iter().map(|h| (h.pattern, h.start)).collect();
//! assert_eq!(pairs, vec![(1, 0), (0, 0), (2, 1)]);
//! ```

#[macro_use]
mod macros;

pub mod ahocorasick;
pub mod builder;
mod error;

pub use ahocorasick::{Automaton, Hits};
pub use builder::{Builder, TransitionKind};
pub use error::BuildError;

/// Identifier of an automaton state.
pub type StateId = u32;

/// Position of a pattern in the list given to the builder.
pub type PatternIndex = usize;

/// The empty-prefix state every scan starts from.
pub const ROOT: StateId = 0;

/// One occurrence of a pattern in a haystack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hit {
    /// Index of the matched pattern.
    pub pattern: PatternIndex,
    /// Offset of the first matched byte.
    pub start: usize,
}

impl Hit {
    pub fn new(pattern: PatternIndex, start: usize) -> Self {
        return Self { pattern, start };
    }
}

impl From<(PatternIndex, usize)> for Hit {
    fn from((pattern, start): (PatternIndex, usize)) -> Self {
        Hit::new(pattern, start)
    }
}

/// Build an automaton with the default configuration.
///
/// Shorthand for `Builder::new().build(patterns)`.
pub fn build<I, P>(patterns: I) -> Result<Automaton, BuildError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    Builder::new().build(patterns)
}

/// Collect every hit of `automaton` in `haystack`.
pub fn scan(automaton: &Automaton, haystack: &[u8]) -> Vec<Hit> {
    automaton.find_all(haystack)
}
