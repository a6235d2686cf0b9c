use std::{
    fmt,
    iter::FusedIterator,
    mem,
    ops::Range,
};

use crate::{
    BuildError,
    Builder,
    Hit,
    PatternIndex,
    StateId,
    TransitionKind,
    ROOT,
};

/// An immutable Aho-Corasick automaton over bytes.
///
/// Built once by a [`Builder`], then shared freely: scanning never mutates
/// it, so one automaton can serve any number of concurrent scans.
#[derive(Clone)]
pub struct Automaton {
    pub(crate) kind: TransitionKind,
    pub(crate) table: Table,
    /// Merged output lists of all states, back to back.
    pub(crate) matches: Box<[u32]>,
    /// State `s` owns `matches[match_starts[s]..match_starts[s + 1]]`.
    pub(crate) match_starts: Box<[usize]>,
    pub(crate) pattern_lens: Box<[usize]>,
}

#[derive(Clone)]
pub(crate) enum Table {
    /// Row `s` is `table[s * 256..(s + 1) * 256]`.
    Dense(Box<[StateId]>),
    Sparse(Vec<SparseState>),
}

#[derive(Clone)]
pub(crate) struct SparseState {
    /// Trie edges sorted by byte.
    pub(crate) edges: Box<[(u8, StateId)]>,
    pub(crate) fail: StateId,
}

impl Automaton {
    /// Build an automaton with the default configuration.
    pub fn new<I, P>(patterns: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        Builder::new().build(patterns)
    }

    /// Lazily report every hit in `haystack`.
    ///
    /// Hits come in order of their last byte. Hits ending on the same byte
    /// come in the order of the entered state's output list: patterns that
    /// end exactly at that state first, by ascending index, then those
    /// inherited from its longest proper suffix.
    pub fn scan<'a, 'h>(&'a self, haystack: &'h [u8]) -> Hits<'a, 'h> {
        Hits { automaton: self, haystack, pos: 0, state: ROOT, next_match: 0, end_match: 0 }
    }

    /// Collect every hit in `haystack`.
    pub fn find_all(&self, haystack: &[u8]) -> Vec<Hit> {
        self.scan(haystack).collect()
    }

    /// Return true if any pattern occurs in `haystack`. Stops at the first hit.
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        if self.matches.is_empty() {
            return false;
        }
        self.scan(haystack).next().is_some()
    }

    /// Return the state entered from `id` on `byte`.
    ///
    /// The transition function is total: every state has a successor for
    /// every byte.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a state of this automaton.
    #[inline]
    pub fn next_state(&self, mut id: StateId, byte: u8) -> StateId {
        match &self.table {
            Table::Dense(table) => table[(id as usize) << 8 | byte as usize],
            Table::Sparse(states) => loop {
                let state = &states[id as usize];
                if let Ok(i) = state.edges.binary_search_by_key(&byte, |&(b, _)| b) {
                    return state.edges[i].1;
                }
                if id == ROOT {
                    return ROOT;
                }
                id = state.fail;
            },
        }
    }

    /// Return the patterns recognized on entering state `id`, in the order
    /// they are reported.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a state of this automaton.
    pub fn matches_at(&self, id: StateId) -> impl ExactSizeIterator<Item = PatternIndex> + '_ {
        self.matches[self.match_range(id)].iter().map(|&p| p as PatternIndex)
    }

    /// Return the byte range of `hit` within the haystack it came from.
    ///
    /// # Panics
    ///
    /// Panics if `hit` names a pattern this automaton does not have.
    pub fn hit_span(&self, hit: &Hit) -> Range<usize> {
        hit.start..hit.start + self.pattern_lens[hit.pattern]
    }

    pub fn state_count(&self) -> usize {
        self.match_starts.len() - 1
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_lens.len()
    }

    /// Return the length of the pattern at `index`, if there is one.
    pub fn pattern_len(&self, index: PatternIndex) -> Option<usize> {
        self.pattern_lens.get(index).copied()
    }

    pub fn transition_kind(&self) -> TransitionKind {
        self.kind
    }

    /// Heap memory used by this automaton, in bytes.
    pub fn memory_usage(&self) -> usize {
        let table = match &self.table {
            Table::Dense(table) => table.len() * mem::size_of::<StateId>(),
            Table::Sparse(states) => {
                states.len() * mem::size_of::<SparseState>()
                    + states
                        .iter()
                        .map(|s| s.edges.len() * mem::size_of::<(u8, StateId)>())
                        .sum::<usize>()
            }
        };
        table
            + self.matches.len() * mem::size_of::<u32>()
            + self.match_starts.len() * mem::size_of::<usize>()
            + self.pattern_lens.len() * mem::size_of::<usize>()
    }

    #[inline]
    fn match_range(&self, id: StateId) -> Range<usize> {
        self.match_starts[id as usize]..self.match_starts[id as usize + 1]
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("kind", &self.kind)
            .field("states", &self.state_count())
            .field("patterns", &self.pattern_count())
            .field("memory_usage", &self.memory_usage())
            .finish()
    }
}

/// Lazy iterator over the hits of one scan, created by [`Automaton::scan`].
///
/// Each byte of the haystack is read once. Dropping the iterator stops the
/// scan.
#[derive(Clone, Debug)]
pub struct Hits<'a, 'h> {
    automaton: &'a Automaton,
    haystack: &'h [u8],
    /// Index of the next byte to read.
    pos: usize,
    /// State entered on the byte at `pos - 1`.
    state: StateId,
    /// Unreported part of `state`'s output list.
    next_match: usize,
    end_match: usize,
}

impl<'a, 'h> Iterator for Hits<'a, 'h> {
    type Item = Hit;

    fn next(&mut self) -> Option<Hit> {
        loop {
            if self.next_match < self.end_match {
                let pattern = self.automaton.matches[self.next_match] as PatternIndex;
                self.next_match += 1;
                // `pos` is one past the last matched byte.
                let start = self.pos - self.automaton.pattern_lens[pattern];
                return Some(Hit { pattern, start });
            }
            let &byte = self.haystack.get(self.pos)?;
            self.state = self.automaton.next_state(self.state, byte);
            self.pos += 1;
            let range = self.automaton.match_range(self.state);
            self.next_match = range.start;
            self.end_match = range.end;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.end_match - self.next_match, None)
    }
}

impl<'a, 'h> FusedIterator for Hits<'a, 'h> {}
