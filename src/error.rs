use thiserror::Error;

use crate::StateId;

/// Error returned when an automaton cannot be built.
///
/// Pattern content never causes an error. Only the shape of the pattern list
/// can: empty patterns, or more states or patterns than can be addressed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Pattern at `index` has zero length.
    #[error("pattern {index} is empty")]
    EmptyPattern { index: usize },
    /// The trie needs more states than a [`StateId`] can address.
    #[error("automaton exceeds the maximum of {max} states")]
    StateIdOverflow { max: u64 },
    /// More patterns than fit in a state's output list.
    #[error("pattern list exceeds the maximum of {max} patterns")]
    PatternIdOverflow { max: u64 },
}

impl BuildError {
    pub(crate) fn state_id_overflow() -> Self {
        BuildError::StateIdOverflow { max: u64::from(StateId::MAX) + 1 }
    }

    pub(crate) fn pattern_id_overflow() -> Self {
        BuildError::PatternIdOverflow { max: u64::from(u32::MAX) + 1 }
    }
}
