//! acscan - First-Hit Multi-Pattern Byte Matching
//!
//! acscan compiles a set of byte patterns into a total Aho-Corasick automaton
//! and scans input in a single pass, stopping at the first state that accepts
//! a pattern. Scan time depends only on the input length, not on how many
//! patterns there are or how long they are.
//!
//! # Quick Start
//!
//! ```rust
//! use acscan::AcBuilder;
//!
//! let ac = AcBuilder::default().build(["he", "she", "his", "hers"])?;
//!
//! let m = ac.find(b"ushers").unwrap();
//! assert_eq!(ac.pattern(m.pattern()), b"she");
//! assert_eq!((m.start(), m.end()), (1, 4));
//!
//! assert!(ac.find(b"nothing to see").is_none());
//! # Ok::<(), acscan::AcError>(())
//! ```
//!
//! # Shared Matcher
//!
//! [`PatternMatcher`] wraps an automaton behind a build lock for callers that
//! rebuild at runtime and scan from many threads:
//!
//! ```rust
//! use acscan::PatternMatcher;
//!
//! let matcher = PatternMatcher::new();
//! matcher.build(["abc"])?;
//! assert_eq!(matcher.find(b"xxabcxx")?, Some(b"abc".to_vec()));
//! # Ok::<(), acscan::AcError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! patterns ──► AcBuilder ──────────────────────► Automaton ──► find() ──► Option<Match>
//!              1. trie (sparse FxHashMap edges)   (immutable,
//!              2. failure links (BFS)              Send + Sync)
//!              3. dense 256-entry rows
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Compiled automaton and scanning
pub mod automaton;
/// Trie construction and failure links
pub mod builder;
pub mod config;
/// Error types for build and match operations
pub mod error;
pub mod matcher;

// Re-exports for Rust consumers
pub use crate::automaton::{Automaton, AutomatonStats, Match, State, StateId, ALPHABET_LEN};
pub use crate::builder::{build, AcBuilder};
pub use crate::config::BuildConfig;
pub use crate::error::{AcError, Result};
pub use crate::matcher::PatternMatcher;

// Version information
/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
