//! Error types for the acscan library
use thiserror::Error;

/// Result type alias for automaton operations
pub type Result<T> = std::result::Result<T, AcError>;

/// Main error type for building and scanning
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcError {
    /// A scan was requested before any automaton was built
    #[error("Automaton not built: call build() before matching")]
    NotBuilt,

    /// Growing the state arena or transition table failed
    #[error("Allocation failed: {0}")]
    AllocationFailed(String),

    /// The trie grew past the configured state cap
    #[error("Resource limit exceeded: more than {limit} states")]
    StateLimitExceeded {
        /// Configured maximum number of states
        limit: usize,
    },

    /// A pattern is longer than the configured cap
    #[error("Pattern {index} is {len} bytes, limit is {limit}")]
    PatternTooLong {
        /// Position of the pattern in the input list
        index: usize,
        /// Pattern length in bytes
        len: usize,
        /// Configured maximum length
        limit: usize,
    },

    /// The matched pattern cannot be returned as text
    #[error("Pattern {pattern} is not valid UTF-8")]
    InvalidUtf8 {
        /// Id of the matched pattern
        pattern: usize,
    },
}

impl From<std::collections::TryReserveError> for AcError {
    fn from(err: std::collections::TryReserveError) -> Self {
        AcError::AllocationFailed(err.to_string())
    }
}
