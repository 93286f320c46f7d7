//! Build configuration
//!
//! [`BuildConfig`] controls resource caps and a couple of behavioural knobs
//! of [`AcBuilder`](crate::AcBuilder). It is plain data and can be loaded from
//! any serde format.

use serde::{Deserialize, Serialize};

/// Options for constructing an [`Automaton`](crate::Automaton)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Maximum number of states (root included). `None` means unbounded.
    pub max_states: Option<usize>,
    /// Maximum pattern length in bytes. `None` means unbounded.
    pub max_pattern_len: Option<usize>,
    /// Whether a state also accepts the patterns of its failure chain.
    ///
    /// Off by default: a state only accepts patterns ending exactly on its
    /// trie path, so a pattern that is a proper suffix of a longer partial
    /// match (e.g. `"bc"` inside `"abcx"` with `"abcd"` present) is not
    /// reported. Turn it on to stop at the first position where any pattern
    /// ends.
    pub inherit_suffix_matches: bool,
    /// Skip root-state runs with memchr when the root has at most three
    /// outgoing bytes.
    pub prefilter: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_states: None,
            max_pattern_len: None,
            inherit_suffix_matches: false,
            prefilter: true,
        }
    }
}

impl BuildConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of states
    pub fn with_max_states(mut self, limit: usize) -> Self {
        self.max_states = Some(limit);
        self
    }

    /// Cap the length of every pattern
    pub fn with_max_pattern_len(mut self, limit: usize) -> Self {
        self.max_pattern_len = Some(limit);
        self
    }

    /// Toggle failure-chain output inheritance
    pub fn with_inherit_suffix_matches(mut self, yes: bool) -> Self {
        self.inherit_suffix_matches = yes;
        self
    }

    /// Toggle the root prefilter
    pub fn with_prefilter(mut self, yes: bool) -> Self {
        self.prefilter = yes;
        self
    }
}
