use std::collections::VecDeque;

use crate::{
    ahocorasick::{Automaton, SparseState, Table},
    BuildError,
    StateId,
    ROOT,
};

/// How an automaton stores its transition function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// A full 256-entry row per state. Every scan step is a single lookup,
    /// at the cost of `states * 256` table entries.
    #[default]
    Dense,
    /// Only the trie edges plus a failure link per state. Scan steps follow
    /// failure links until an edge is found, so a step is no longer O(1),
    /// but memory is proportional to the number of trie edges.
    ///
    /// Hits and their order are identical to [`TransitionKind::Dense`].
    Sparse,
}

/// Configuration for building an [`Automaton`].
///
/// A builder can be reused to build any number of automatons.
///
/// ```
/// use scout::{Builder, TransitionKind};
///
/// let automaton = Builder::new()
///     .transition_kind(TransitionKind::Sparse)
///     .build(["erman", "Superman"])
///     .unwrap();
/// assert!(automaton.is_match(b"The Man Of Steel: Superman"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder {
    kind: TransitionKind,
}

impl Builder {
    pub fn new() -> Self {
        Builder::default()
    }

    /// Choose the transition table representation. Defaults to
    /// [`TransitionKind::Dense`].
    pub fn transition_kind(&mut self, kind: TransitionKind) -> &mut Builder {
        self.kind = kind;
        self
    }

    /// Build an automaton from an ordered list of patterns.
    ///
    /// Each pattern is identified by its position in `patterns`. Duplicate
    /// patterns keep their own index and are both reported. Zero-length
    /// patterns are rejected with [`BuildError::EmptyPattern`].
    pub fn build<I, P>(&self, patterns: I) -> Result<Automaton, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        debug!("building {:?} automaton", self.kind);
        let automaton = Compiler::new(self).compile(patterns)?;
        debug!(
            "automaton built, <states: {:?}, patterns: {:?}, size: {:?}>",
            automaton.state_count(),
            automaton.pattern_count(),
            automaton.memory_usage(),
        );
        Ok(automaton)
    }
}

fn state_id(index: usize) -> Result<StateId, BuildError> {
    StateId::try_from(index).map_err(|_| BuildError::state_id_overflow())
}

fn pattern_id(index: usize) -> Result<u32, BuildError> {
    u32::try_from(index).map_err(|_| BuildError::pattern_id_overflow())
}

/// Trie node used while building.
#[derive(Clone, Debug)]
struct State {
    /// Trie edges sorted by byte.
    edges: Vec<(u8, StateId)>,
    /// Longest strict suffix of this state's prefix that is also in the trie.
    fail: StateId,
    /// Own matches first, then everything inherited through `fail`.
    matches: Vec<u32>,
    /// Distance from ROOT.
    depth: usize,
}

impl State {
    fn new(depth: usize) -> Self {
        return Self { edges: Vec::new(), fail: ROOT, matches: Vec::new(), depth };
    }

    fn edge(&self, byte: u8) -> Option<StateId> {
        self.edges
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|i| self.edges[i].1)
    }
}

/// Mutable construction context, local to a single build. It is consumed by
/// `compile`, which freezes it into an immutable `Automaton`.
struct Compiler<'b> {
    builder: &'b Builder,
    states: Vec<State>,
    pattern_lens: Vec<usize>,
}

impl<'b> Compiler<'b> {
    fn new(builder: &'b Builder) -> Self {
        Compiler { builder, states: vec![State::new(0)], pattern_lens: Vec::new() }
    }

    fn compile<I, P>(mut self, patterns: I) -> Result<Automaton, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        self.build_trie(patterns)?;
        let table = match self.builder.kind {
            TransitionKind::Dense => Table::Dense(self.fill_dense()),
            TransitionKind::Sparse => {
                self.fill_sparse();
                Table::Sparse(self.sparse_states())
            }
        };
        Ok(self.freeze(table))
    }

    //>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>
    // Trie
    //<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<

    /// Insert every pattern, creating a chain of states ending in a state
    /// that records the pattern as its own match.
    fn build_trie<I, P>(&mut self, patterns: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        for (index, pattern) in patterns.into_iter().enumerate() {
            let bytes = pattern.as_ref();
            if bytes.is_empty() {
                return Err(BuildError::EmptyPattern { index });
            }
            let id = pattern_id(index)?;

            let mut current = ROOT;
            for (depth, &byte) in bytes.iter().enumerate() {
                let node = &self.states[current as usize];
                current = match node.edges.binary_search_by_key(&byte, |&(b, _)| b) {
                    Ok(i) => node.edges[i].1,
                    Err(i) => {
                        let next = self.add_state(depth + 1)?;
                        self.states[current as usize].edges.insert(i, (byte, next));
                        next
                    }
                };
            }

            trace!("pattern {} ends at state {}", index, current);
            self.states[current as usize].matches.push(id);
            self.pattern_lens.push(bytes.len());
        }
        Ok(())
    }

    /// Add a state and return its id.
    fn add_state(&mut self, depth: usize) -> Result<StateId, BuildError> {
        let id = state_id(self.states.len())?;
        self.states.push(State::new(depth));
        Ok(id)
    }

    //>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>
    // Failure links
    //<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<

    /// Compute failure links, merge outputs and complete the transition
    /// function into a flat `states * 256` table.
    ///
    /// States are visited in BFS order, so when a state is visited its
    /// failure link already has a complete row and a fully merged output.
    /// A state's row is its failure link's row with its own trie edges
    /// written over it. ROOT has no failure link and loops to itself on
    /// every byte without an edge.
    fn fill_dense(&mut self) -> Box<[StateId]> {
        let mut table = vec![ROOT; self.states.len() * 256];
        let mut queue: VecDeque<StateId> = VecDeque::new();

        for i in 0..self.states[ROOT as usize].edges.len() {
            let (byte, child) = self.states[ROOT as usize].edges[i];
            table[byte as usize] = child;
            self.states[child as usize].fail = ROOT;
            queue.push_back(child);
        }

        while let Some(id) = queue.pop_front() {
            let row = id as usize * 256;
            let fail_row = self.states[id as usize].fail as usize * 256;
            table.copy_within(fail_row..fail_row + 256, row);

            for i in 0..self.states[id as usize].edges.len() {
                let (byte, child) = self.states[id as usize].edges[i];
                table[row + byte as usize] = child;
                let fail = table[fail_row + byte as usize];
                self.link(child, fail);
                queue.push_back(child);
            }
        }
        table.into_boxed_slice()
    }

    /// Compute failure links and merge outputs without completing the
    /// transition function. Each failure link is found by chasing the
    /// parent's failure chain until an edge on the same byte exists.
    fn fill_sparse(&mut self) {
        let mut queue: VecDeque<StateId> = VecDeque::new();

        for i in 0..self.states[ROOT as usize].edges.len() {
            let child = self.states[ROOT as usize].edges[i].1;
            self.states[child as usize].fail = ROOT;
            queue.push_back(child);
        }

        while let Some(id) = queue.pop_front() {
            let parent_fail = self.states[id as usize].fail;
            for i in 0..self.states[id as usize].edges.len() {
                let (byte, child) = self.states[id as usize].edges[i];
                let fail = self.follow(parent_fail, byte);
                self.link(child, fail);
                queue.push_back(child);
            }
        }
    }

    /// Transition from `id` on `byte`, following failure links until an
    /// edge exists. Only valid for states whose failure chain is resolved.
    fn follow(&self, mut id: StateId, byte: u8) -> StateId {
        loop {
            let state = &self.states[id as usize];
            if let Some(next) = state.edge(byte) {
                return next;
            }
            if id == ROOT {
                return ROOT;
            }
            id = state.fail;
        }
    }

    /// Set the failure link of `id` and append the link's merged output to
    /// the matches of `id`.
    fn link(&mut self, id: StateId, fail: StateId) {
        debug_assert!(self.states[fail as usize].depth < self.states[id as usize].depth);
        self.states[id as usize].fail = fail;
        if self.states[fail as usize].matches.is_empty() {
            return;
        }
        // fail is always shallower than id and so never the same state.
        let (fail, node) = if fail < id {
            let (left, right) = self.states.split_at_mut(id as usize);
            (&left[fail as usize], &mut right[0])
        } else {
            let (left, right) = self.states.split_at_mut(fail as usize);
            (&right[0], &mut left[id as usize])
        };
        node.matches.extend_from_slice(&fail.matches);
    }

    //>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>
    // Freeze
    //<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<

    fn sparse_states(&self) -> Vec<SparseState> {
        self.states
            .iter()
            .map(|state| SparseState {
                edges: state.edges.clone().into_boxed_slice(),
                fail: state.fail,
            })
            .collect()
    }

    /// Flatten the per-state outputs and hand everything to the automaton.
    fn freeze(self, table: Table) -> Automaton {
        let total = self.states.iter().map(|s| s.matches.len()).sum();
        let mut matches = Vec::with_capacity(total);
        let mut match_starts = Vec::with_capacity(self.states.len() + 1);
        for state in self.states.iter() {
            match_starts.push(matches.len());
            matches.extend_from_slice(&state.matches);
        }
        match_starts.push(matches.len());

        Automaton {
            kind: self.builder.kind,
            table,
            matches: matches.into_boxed_slice(),
            match_starts: match_starts.into_boxed_slice(),
            pattern_lens: self.pattern_lens.into_boxed_slice(),
        }
    }
}
