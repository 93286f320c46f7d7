//! Aho-Corasick construction
//!
//! Building happens in three passes over a private [`BuildContext`]:
//!
//! 1. trie insertion, one path per pattern, with sparse edges
//! 2. failure links, breadth first from the root's children
//! 3. densification into a total 256-entry table per state
//!
//! The context is created per call and dropped afterwards. [`AcBuilder`]
//! itself only holds configuration, so one builder can serve any number of
//! concurrent builds.

use crate::automaton::{Automaton, State, StateId, ALPHABET_LEN};
use crate::config::BuildConfig;
use crate::error::{AcError, Result};
use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::time::Instant;

/// Builder for [`Automaton`]s
///
/// # Example
/// ```
/// use acscan::AcBuilder;
///
/// let ac = AcBuilder::default().build(["he", "she", "his", "hers"])?;
/// assert_eq!(ac.find_pattern(b"ushers"), Some(&b"she"[..]));
/// # Ok::<(), acscan::AcError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AcBuilder {
    config: BuildConfig,
}

impl AcBuilder {
    /// Create a builder with the given configuration
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Get the builder configuration
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build an automaton from `patterns`.
    ///
    /// Pattern ids are positions in `patterns`. Duplicates and the empty
    /// pattern are allowed. On error nothing is returned; there is no
    /// partially built automaton.
    pub fn build<I, P>(&self, patterns: I) -> Result<Automaton>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let start = Instant::now();
        let mut ctx = BuildContext::new(&self.config)?;
        let mut stored = Vec::new();

        for (index, pattern) in patterns.into_iter().enumerate() {
            let pattern = pattern.as_ref();
            ctx.insert(index, pattern)?;
            stored.try_reserve(1)?;
            stored.push(pattern.to_vec());
        }

        let order = ctx.build_failure_links()?;
        let automaton = ctx.into_automaton(&order, stored)?;

        debug!(
            "Built automaton: {} patterns, {} states in {:?}",
            automaton.pattern_count(),
            automaton.state_count(),
            start.elapsed()
        );

        Ok(automaton)
    }
}

/// Build an automaton with the default configuration
pub fn build<I, P>(patterns: I) -> Result<Automaton>
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    AcBuilder::default().build(patterns)
}

/// Trie state used during construction
#[derive(Debug, Clone)]
struct TrieState {
    edges: FxHashMap<u8, StateId>,
    fail: StateId,
    depth: u32,
    pattern_ids: Vec<usize>,
}

impl TrieState {
    fn new(depth: u32) -> Self {
        Self {
            edges: FxHashMap::default(),
            fail: StateId::ROOT,
            depth,
            pattern_ids: Vec::new(),
        }
    }

    /// Edges sorted by byte, so BFS order does not depend on hashing
    fn sorted_edges(&self) -> Vec<(u8, StateId)> {
        let mut edges: Vec<(u8, StateId)> = self.edges.iter().map(|(&b, &s)| (b, s)).collect();
        edges.sort_unstable_by_key(|&(b, _)| b);
        edges
    }
}

/// Mutable state of a single build
struct BuildContext<'c> {
    config: &'c BuildConfig,
    states: Vec<TrieState>,
}

impl<'c> BuildContext<'c> {
    fn new(config: &'c BuildConfig) -> Result<Self> {
        let mut ctx = Self {
            config,
            states: Vec::new(),
        };
        ctx.add_state(0)?;
        Ok(ctx)
    }

    fn add_state(&mut self, depth: u32) -> Result<StateId> {
        let index = self.states.len();
        if let Some(limit) = self.config.max_states {
            if index >= limit {
                warn!("Automaton build rejected: state limit {} reached", limit);
                return Err(AcError::StateLimitExceeded { limit });
            }
        }
        let id = u32::try_from(index).map_err(|_| AcError::StateLimitExceeded {
            limit: u32::MAX as usize,
        })?;

        self.states.try_reserve(1)?;
        self.states.push(TrieState::new(depth));
        Ok(StateId::new(id))
    }

    fn insert(&mut self, index: usize, pattern: &[u8]) -> Result<()> {
        if let Some(limit) = self.config.max_pattern_len {
            if pattern.len() > limit {
                warn!(
                    "Automaton build rejected: pattern {} is {} bytes (limit {})",
                    index,
                    pattern.len(),
                    limit
                );
                return Err(AcError::PatternTooLong {
                    index,
                    len: pattern.len(),
                    limit,
                });
            }
        }

        let mut current = StateId::ROOT;
        for &byte in pattern {
            let existing = self.states[current.as_usize()].edges.get(&byte).copied();
            current = match existing {
                Some(next) => next,
                None => {
                    let depth = self.states[current.as_usize()].depth + 1;
                    let next = self.add_state(depth)?;
                    self.states[current.as_usize()].edges.insert(byte, next);
                    next
                }
            };
        }

        self.states[current.as_usize()].pattern_ids.push(index);
        Ok(())
    }

    /// Compute failure links and return all states in BFS order.
    ///
    /// The root is completed first (missing edges loop back to the root) so
    /// every failure chase terminates there.
    fn build_failure_links(&mut self) -> Result<Vec<StateId>> {
        let mut order = Vec::new();
        order.try_reserve_exact(self.states.len())?;
        order.push(StateId::ROOT);

        let mut queue = VecDeque::new();

        for byte in 0..=u8::MAX {
            match self.states[StateId::ROOT.as_usize()].edges.get(&byte).copied() {
                Some(child) => {
                    self.states[child.as_usize()].fail = StateId::ROOT;
                    self.inherit_outputs(child);
                    queue.push_back(child);
                }
                None => {
                    self.states[StateId::ROOT.as_usize()]
                        .edges
                        .insert(byte, StateId::ROOT);
                }
            }
        }

        while let Some(state) = queue.pop_front() {
            order.push(state);

            let edges = self.states[state.as_usize()].sorted_edges();
            for (byte, child) in edges {
                queue.push_back(child);

                let mut fallback = self.states[state.as_usize()].fail;
                let target = loop {
                    if let Some(&next) = self.states[fallback.as_usize()].edges.get(&byte) {
                        break next;
                    }
                    fallback = self.states[fallback.as_usize()].fail;
                };

                self.states[child.as_usize()].fail = target;
                self.inherit_outputs(child);
            }
        }

        Ok(order)
    }

    /// Append the failure target's accepted patterns to `state`.
    ///
    /// The target is shallower, so its own list is already complete.
    fn inherit_outputs(&mut self, state: StateId) {
        if !self.config.inherit_suffix_matches {
            return;
        }
        let fail = self.states[state.as_usize()].fail;
        if fail == state {
            return;
        }
        let inherited = self.states[fail.as_usize()].pattern_ids.clone();
        self.states[state.as_usize()].pattern_ids.extend(inherited);
    }

    /// Fill every state's full transition table and freeze the automaton.
    ///
    /// `order` is breadth first, so a state's failure target already has a
    /// complete row when the state borrows from it.
    fn into_automaton(self, order: &[StateId], patterns: Vec<Vec<u8>>) -> Result<Automaton> {
        let count = self.states.len();
        let table_len = count
            .checked_mul(ALPHABET_LEN)
            .ok_or_else(|| AcError::AllocationFailed("transition table too large".to_string()))?;

        let mut transitions = Vec::new();
        transitions.try_reserve_exact(table_len)?;
        transitions.resize(table_len, StateId::ROOT);

        for &id in order {
            let state = &self.states[id.as_usize()];
            let row = id.as_usize() * ALPHABET_LEN;
            let fail_row = state.fail.as_usize() * ALPHABET_LEN;

            for byte in 0..ALPHABET_LEN {
                transitions[row + byte] = match state.edges.get(&(byte as u8)) {
                    Some(&next) => next,
                    None => transitions[fail_row + byte],
                };
            }
        }

        let mut states = Vec::new();
        states.try_reserve_exact(count)?;
        states.extend(self.states.into_iter().map(|s| State {
            fail: s.fail,
            depth: s.depth,
            pattern_ids: s.pattern_ids,
        }));

        Ok(Automaton::from_parts(
            states,
            transitions,
            patterns,
            self.config.prefilter,
        ))
    }
}
