//! Property-based tests for scanning, checked against a naive search.

use proptest::prelude::*;
use scout::{Builder, Hit, TransitionKind};

// Small alphabet so patterns overlap and nest often.
fn pattern_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c', 0x00, 0xff]), 1..=5)
}

fn patterns_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(pattern_strategy(), 0..=8)
}

fn haystack_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c', b'd', 0x00, 0xff]), 0..=64)
}

// Helper: every (pattern, start) occurrence, found by brute force.
fn naive_hits(patterns: &[Vec<u8>], haystack: &[u8]) -> Vec<Hit> {
    let mut hits = Vec::new();
    for (index, pattern) in patterns.iter().enumerate() {
        for start in 0..haystack.len() {
            if haystack[start..].starts_with(pattern) {
                hits.push(Hit::new(index, start));
            }
        }
    }
    hits.sort();
    hits
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: the automaton reports exactly the occurrences a naive
    /// search finds, each once.
    #[test]
    fn prop_sound_and_complete(patterns in patterns_strategy(), haystack in haystack_strategy()) {
        let automaton = scout::build(&patterns).unwrap();
        let mut hits = scout::scan(&automaton, &haystack);
        for hit in hits.iter() {
            let span = automaton.hit_span(hit);
            prop_assert_eq!(&haystack[span], patterns[hit.pattern].as_slice());
        }
        hits.sort();
        prop_assert_eq!(hits, naive_hits(&patterns, &haystack));
    }

    /// Property: hits come in non-decreasing order of their end.
    #[test]
    fn prop_ordered_by_end(patterns in patterns_strategy(), haystack in haystack_strategy()) {
        let automaton = scout::build(&patterns).unwrap();
        let ends: Vec<usize> = automaton.scan(&haystack).map(|h| automaton.hit_span(&h).end).collect();
        prop_assert!(ends.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Property: among hits sharing an end, longer matches come first,
    /// except that patterns with the same bytes keep their index order.
    #[test]
    fn prop_ties_follow_suffix_chain(patterns in patterns_strategy(), haystack in haystack_strategy()) {
        let automaton = scout::build(&patterns).unwrap();
        let hits = automaton.find_all(&haystack);
        for w in hits.windows(2) {
            let (a, b) = (automaton.hit_span(&w[0]), automaton.hit_span(&w[1]));
            if a.end == b.end {
                prop_assert!(a.start < b.start || (a.start == b.start && w[0].pattern < w[1].pattern));
            }
        }
    }

    /// Property: dense and sparse tables give identical output.
    #[test]
    fn prop_dense_matches_sparse(patterns in patterns_strategy(), haystack in haystack_strategy()) {
        let dense = Builder::new().transition_kind(TransitionKind::Dense).build(&patterns).unwrap();
        let sparse = Builder::new().transition_kind(TransitionKind::Sparse).build(&patterns).unwrap();
        prop_assert_eq!(dense.state_count(), sparse.state_count());
        prop_assert_eq!(dense.find_all(&haystack), sparse.find_all(&haystack));
    }

    /// Property: scanning twice gives the same hits.
    #[test]
    fn prop_idempotent(patterns in patterns_strategy(), haystack in haystack_strategy()) {
        let automaton = scout::build(&patterns).unwrap();
        prop_assert_eq!(automaton.find_all(&haystack), automaton.find_all(&haystack));
    }

    /// Property: any empty pattern is rejected with its index.
    #[test]
    fn prop_empty_pattern_rejected(mut patterns in patterns_strategy(), at in any::<prop::sample::Index>()) {
        let index = at.index(patterns.len() + 1);
        patterns.insert(index, Vec::new());
        prop_assert_eq!(
            scout::build(&patterns).unwrap_err(),
            scout::BuildError::EmptyPattern { index }
        );
    }
}

#[test]
fn empty_pattern_list_never_matches() {
    let automaton = scout::build(Vec::<Vec<u8>>::new()).unwrap();
    assert_eq!(automaton.state_count(), 1);
    let all_bytes: Vec<u8> = (0..=255u8).collect();
    assert!(scout::scan(&automaton, &all_bytes).is_empty());
}
