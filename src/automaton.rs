//! Compiled Aho-Corasick automaton
//!
//! An [`Automaton`] is produced by [`AcBuilder`](crate::AcBuilder) and is
//! immutable afterwards. It stores:
//! - a state arena (failure link, depth and accepted pattern ids per state)
//! - one flat transition table with 256 entries per state
//! - the original patterns, used to report what matched
//!
//! The transition table is total: every state has a next state for every
//! byte value, so a scan performs exactly one table lookup per input byte.

use memchr::{memchr, memchr2, memchr3};
use serde::Serialize;
use std::mem;

/// Number of entries in a state's transition table
pub const ALPHABET_LEN: usize = 256;

/// Identifier of a state in an [`Automaton`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    /// The root state. Every automaton has exactly one.
    pub const ROOT: StateId = StateId(0);

    pub(crate) fn new(index: u32) -> Self {
        StateId(index)
    }

    /// Index into the state arena
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// A single automaton state
#[derive(Debug, Clone)]
pub struct State {
    pub(crate) fail: StateId,
    pub(crate) depth: u32,
    /// Patterns ending exactly on this state's trie path, in insertion
    /// order. With suffix inheritance enabled, followed by the ones
    /// inherited along the failure chain (longest first).
    pub(crate) pattern_ids: Vec<usize>,
}

impl State {
    /// Failure link of this state
    pub fn fail(&self) -> StateId {
        self.fail
    }

    /// Trie depth (length of the path spelled from the root)
    pub fn depth(&self) -> usize {
        self.depth as usize
    }

    /// Pattern ids accepted when the scan reaches this state
    pub fn pattern_ids(&self) -> &[usize] {
        &self.pattern_ids
    }

    /// True if reaching this state reports a match
    pub fn is_accepting(&self) -> bool {
        !self.pattern_ids.is_empty()
    }
}

/// The first pattern found by a scan
///
/// For the empty pattern, `start() == end()` is the offset at which the scan
/// fell back to the root, not the earliest position where an empty string
/// occurs (which would always be 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pattern: usize,
    start: usize,
    end: usize,
}

impl Match {
    /// Index of the pattern in the list given to the builder
    pub fn pattern(&self) -> usize {
        self.pattern
    }

    /// Offset of the first byte of the occurrence
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset one past the last byte of the occurrence
    pub fn end(&self) -> usize {
        self.end
    }

    /// Length of the occurrence in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a match of the empty pattern. Its offsets mark where the scan
    /// returned to the root.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Automaton statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutomatonStats {
    /// Number of patterns the automaton was built from
    pub pattern_count: usize,
    /// Number of states, root included
    pub state_count: usize,
    /// Number of states that report a match
    pub accepting_state_count: usize,
    /// Depth of the deepest state
    pub max_depth: usize,
    /// Heap usage in bytes: allocated capacity of the state arena, the
    /// transition table, the per-state pattern id lists and the stored
    /// patterns. Allocator overhead is not counted.
    pub memory_usage: usize,
}

/// Bytes that take the root somewhere other than itself, when there are few
/// enough of them to search with memchr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prefilter {
    One(u8),
    Two(u8, u8),
    Three(u8, u8, u8),
}

impl Prefilter {
    /// Offset of the next byte that can leave the root
    fn next_candidate(self, haystack: &[u8]) -> Option<usize> {
        match self {
            Prefilter::One(a) => memchr(a, haystack),
            Prefilter::Two(a, b) => memchr2(a, b, haystack),
            Prefilter::Three(a, b, c) => memchr3(a, b, c, haystack),
        }
    }
}

/// Immutable, total Aho-Corasick automaton
///
/// Scans take `&self` and keep their position on the stack, so one automaton
/// can be shared across threads (e.g. behind an `Arc`) without locking.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
    /// `states.len() * ALPHABET_LEN` entries, row-major by state
    transitions: Vec<StateId>,
    patterns: Vec<Vec<u8>>,
    prefilter: Option<Prefilter>,
}

impl Automaton {
    pub(crate) fn from_parts(
        states: Vec<State>,
        transitions: Vec<StateId>,
        patterns: Vec<Vec<u8>>,
        use_prefilter: bool,
    ) -> Self {
        let mut automaton = Self {
            states,
            transitions,
            patterns,
            prefilter: None,
        };
        if use_prefilter {
            automaton.prefilter = automaton.root_prefilter();
        }
        automaton
    }

    /// Choose a prefilter from the root's outgoing bytes.
    ///
    /// Only valid while the root does not accept: skipped bytes keep the scan
    /// at the root, which must not report anything.
    fn root_prefilter(&self) -> Option<Prefilter> {
        if self.states[StateId::ROOT.as_usize()].is_accepting() {
            return None;
        }
        let mut bytes = Vec::with_capacity(4);
        for byte in 0..=u8::MAX {
            if self.next_state(StateId::ROOT, byte) != StateId::ROOT {
                bytes.push(byte);
                if bytes.len() > 3 {
                    return None;
                }
            }
        }
        match *bytes.as_slice() {
            [a] => Some(Prefilter::One(a)),
            [a, b] => Some(Prefilter::Two(a, b)),
            [a, b, c] => Some(Prefilter::Three(a, b, c)),
            _ => None,
        }
    }

    /// Find the first pattern occurring in `haystack`.
    ///
    /// The scan stops at the first state that accepts a pattern and reports
    /// that state's first pattern id. By default a state accepts only the
    /// patterns spelled by its own trie path, so a pattern that is a proper
    /// suffix of a longer partial match (`"bc"` while in the `"abc"` state
    /// of `"abcd"`) is not reported there. With
    /// [`inherit_suffix_matches`](crate::BuildConfig::inherit_suffix_matches)
    /// the scan stops at the first position where any pattern ends, the one
    /// starting earliest winning.
    pub fn find(&self, haystack: &[u8]) -> Option<Match> {
        let mut state = StateId::ROOT;
        let mut at = 0;

        while at < haystack.len() {
            if state == StateId::ROOT {
                if let Some(prefilter) = self.prefilter {
                    match prefilter.next_candidate(&haystack[at..]) {
                        Some(skip) => at += skip,
                        None => return None,
                    }
                }
            }

            state = self.next_state(state, haystack[at]);
            at += 1;

            if let Some(&pattern) = self.states[state.as_usize()].pattern_ids.first() {
                return Some(Match {
                    pattern,
                    start: at - self.patterns[pattern].len(),
                    end: at,
                });
            }
        }

        None
    }

    /// Bytes of the first pattern occurring in `haystack`
    pub fn find_pattern(&self, haystack: &[u8]) -> Option<&[u8]> {
        self.find(haystack).map(|m| self.pattern(m.pattern()))
    }

    /// True if any pattern occurs in `haystack`
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        self.find(haystack).is_some()
    }

    /// Transition from `state` on `byte`. Defined for every state and byte.
    #[inline]
    pub fn next_state(&self, state: StateId, byte: u8) -> StateId {
        self.transitions[state.as_usize() * ALPHABET_LEN + usize::from(byte)]
    }

    /// Failure link of `state`
    pub fn failure(&self, state: StateId) -> StateId {
        self.states[state.as_usize()].fail
    }

    /// The state with the given id, if it exists
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.as_usize())
    }

    /// Iterate over all state ids, root first
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len()).map(|i| StateId::new(i as u32))
    }

    /// Number of states, root included
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Pattern bytes by index
    ///
    /// # Panics
    ///
    /// Panics if `id` is not less than [`pattern_count`](Self::pattern_count).
    pub fn pattern(&self, id: usize) -> &[u8] {
        &self.patterns[id]
    }

    /// All patterns in their original order
    pub fn patterns(&self) -> &[Vec<u8>] {
        &self.patterns
    }

    /// Number of patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// True if the root-state memchr prefilter is active
    pub fn has_prefilter(&self) -> bool {
        self.prefilter.is_some()
    }

    /// Check that every state has an in-range transition for every byte
    pub fn is_total(&self) -> bool {
        let count = self.states.len();
        self.transitions.len() == count * ALPHABET_LEN
            && self.transitions.iter().all(|next| next.as_usize() < count)
            && self.states.iter().all(|s| s.fail.as_usize() < count)
    }

    /// Get automaton statistics
    pub fn stats(&self) -> AutomatonStats {
        let pattern_ids: usize = self
            .states
            .iter()
            .map(|s| s.pattern_ids.capacity() * mem::size_of::<usize>())
            .sum();
        let pattern_bytes: usize = self.patterns.iter().map(Vec::capacity).sum();

        AutomatonStats {
            pattern_count: self.patterns.len(),
            state_count: self.states.len(),
            accepting_state_count: self.states.iter().filter(|s| s.is_accepting()).count(),
            max_depth: self.states.iter().map(State::depth).max().unwrap_or(0),
            memory_usage: self.states.capacity() * mem::size_of::<State>()
                + self.transitions.capacity() * mem::size_of::<StateId>()
                + pattern_ids
                + self.patterns.capacity() * mem::size_of::<Vec<u8>>()
                + pattern_bytes,
        }
    }
}
