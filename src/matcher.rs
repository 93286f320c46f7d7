//! Stateful matcher façade
//!
//! [`PatternMatcher`] owns at most one built automaton at a time and exposes
//! the build / match / is-built contract to callers that do not want to hold
//! an [`Automaton`] themselves.

use std::sync::Arc;

use log::debug;
use parking_lot::{Mutex, RwLock};

use crate::automaton::{Automaton, Match};
use crate::builder::AcBuilder;
use crate::config::BuildConfig;
use crate::error::{AcError, Result};

/// Shared first-hit matcher
///
/// Builds are serialized by an internal lock and publish their result only
/// on success. Scans take a snapshot of the current automaton and run
/// without holding any lock, so they may overlap freely with each other and
/// with a rebuild.
///
/// # Example
/// ```
/// use acscan::{AcError, PatternMatcher};
///
/// let matcher = PatternMatcher::new();
/// assert_eq!(matcher.find(b"abc"), Err(AcError::NotBuilt));
///
/// matcher.build(["abc"])?;
/// assert!(matcher.is_built());
/// assert_eq!(matcher.find_str(b"xxabcxx")?, Some("abc".to_string()));
/// assert_eq!(matcher.find(b"xxabxx")?, None);
/// # Ok::<(), AcError>(())
/// ```
pub struct PatternMatcher {
    builder: AcBuilder,
    automaton: RwLock<Option<Arc<Automaton>>>,
    build_lock: Mutex<()>,
}

impl PatternMatcher {
    /// Create an empty matcher with the default build configuration
    pub fn new() -> Self {
        Self::with_config(BuildConfig::default())
    }

    /// Create an empty matcher with the given build configuration
    pub fn with_config(config: BuildConfig) -> Self {
        Self {
            builder: AcBuilder::new(config),
            automaton: RwLock::new(None),
            build_lock: Mutex::new(()),
        }
    }

    /// Build a new automaton and make it current.
    ///
    /// On error the previously built automaton, if any, stays current.
    pub fn build<I, P>(&self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let _guard = self.build_lock.lock();
        let automaton = self.builder.build(patterns)?;
        let replaced = self.automaton.write().replace(Arc::new(automaton)).is_some();
        debug!("Automaton published (replaced previous: {})", replaced);
        Ok(())
    }

    /// True once a build has succeeded
    pub fn is_built(&self) -> bool {
        self.automaton.read().is_some()
    }

    /// Snapshot of the current automaton
    pub fn automaton(&self) -> Result<Arc<Automaton>> {
        self.automaton.read().clone().ok_or(AcError::NotBuilt)
    }

    /// Position and pattern id of the first match in `input`
    pub fn find_match(&self, input: &[u8]) -> Result<Option<Match>> {
        Ok(self.automaton()?.find(input))
    }

    /// Bytes of the first pattern found in `input`
    pub fn find(&self, input: &[u8]) -> Result<Option<Vec<u8>>> {
        let automaton = self.automaton()?;
        Ok(automaton.find_pattern(input).map(<[u8]>::to_vec))
    }

    /// Text of the first pattern found in `input`.
    ///
    /// Fails with [`AcError::InvalidUtf8`] if that pattern is not UTF-8.
    pub fn find_str(&self, input: &[u8]) -> Result<Option<String>> {
        let automaton = self.automaton()?;
        let Some(m) = automaton.find(input) else {
            return Ok(None);
        };
        let text = std::str::from_utf8(automaton.pattern(m.pattern()))
            .map_err(|_| AcError::InvalidUtf8 {
                pattern: m.pattern(),
            })?;
        Ok(Some(text.to_string()))
    }

    /// True if any pattern occurs in `input`
    pub fn is_match(&self, input: &[u8]) -> Result<bool> {
        Ok(self.automaton()?.is_match(input))
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_before_build() {
        let matcher = PatternMatcher::new();
        assert!(!matcher.is_built());
        assert_eq!(matcher.find(b"abc"), Err(AcError::NotBuilt));
        assert_eq!(matcher.find_str(b"abc"), Err(AcError::NotBuilt));
        assert_eq!(matcher.find_match(b"abc"), Err(AcError::NotBuilt));
        assert_eq!(matcher.is_match(b"abc"), Err(AcError::NotBuilt));
        assert!(matcher.automaton().is_err());
    }

    #[test]
    fn test_build_then_match() {
        let matcher = PatternMatcher::new();
        matcher.build(["he", "she", "his", "hers"]).unwrap();
        assert!(matcher.is_built());
        assert_eq!(matcher.find(b"ushers").unwrap(), Some(b"she".to_vec()));
        assert_eq!(matcher.find_str(b"ushers").unwrap().as_deref(), Some("she"));
        assert_eq!(matcher.find(b"xyz").unwrap(), None);
    }

    #[test]
    fn test_empty_build_is_built() {
        let matcher = PatternMatcher::new();
        matcher.build(Vec::<&str>::new()).unwrap();
        assert!(matcher.is_built());
        assert_eq!(matcher.find(b"anything").unwrap(), None);
    }

    #[test]
    fn test_repeated_match_is_stable() {
        let matcher = PatternMatcher::new();
        matcher.build(["abc", "bcd"]).unwrap();
        let first = matcher.find_match(b"zabcd").unwrap();
        let second = matcher.find_match(b"zabcd").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.unwrap().pattern(), 0);
    }

    #[test]
    fn test_failed_build_keeps_previous() {
        let matcher = PatternMatcher::with_config(BuildConfig::new().with_max_pattern_len(4));
        matcher.build(["abc"]).unwrap();
        let err = matcher.build(["abc", "too long"]).unwrap_err();
        assert!(matches!(err, AcError::PatternTooLong { index: 1, .. }));
        assert_eq!(matcher.find(b"xabc").unwrap(), Some(b"abc".to_vec()));
    }

    #[test]
    fn test_failed_first_build_stays_unbuilt() {
        let matcher = PatternMatcher::with_config(BuildConfig::new().with_max_states(2));
        assert!(matcher.build(["abc"]).is_err());
        assert!(!matcher.is_built());
    }

    #[test]
    fn test_rebuild_replaces_patterns() {
        let matcher = PatternMatcher::new();
        matcher.build(["old"]).unwrap();
        let snapshot = matcher.automaton().unwrap();
        matcher.build(["new"]).unwrap();
        assert_eq!(matcher.find(b"old new").unwrap(), Some(b"new".to_vec()));
        // earlier snapshots keep working
        assert_eq!(snapshot.find_pattern(b"old new"), Some(&b"old"[..]));
    }

    #[test]
    fn test_find_str_rejects_invalid_utf8() {
        let matcher = PatternMatcher::new();
        matcher.build([&[0xffu8, 0xfe][..]]).unwrap();
        assert_eq!(
            matcher.find_str(&[0x00, 0xff, 0xfe]),
            Err(AcError::InvalidUtf8 { pattern: 0 })
        );
        assert_eq!(matcher.find(&[0x00, 0xff, 0xfe]).unwrap(), Some(vec![0xff, 0xfe]));
    }

    #[test]
    fn test_concurrent_matches() {
        let matcher = Arc::new(PatternMatcher::new());
        matcher.build(["needle", "pin"]).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let matcher = Arc::clone(&matcher);
                std::thread::spawn(move || {
                    let input = if i % 2 == 0 {
                        b"haystack with a needle".to_vec()
                    } else {
                        b"haystack with a pin".to_vec()
                    };
                    matcher.find(&input).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let expected: &[u8] = if i % 2 == 0 { b"needle" } else { b"pin" };
            assert_eq!(handle.join().unwrap().as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_concurrent_builds_are_serialized() {
        let matcher = Arc::new(PatternMatcher::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let matcher = Arc::clone(&matcher);
                std::thread::spawn(move || {
                    let pattern = format!("p{}", i);
                    matcher.build([pattern]).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let automaton = matcher.automaton().unwrap();
        assert_eq!(automaton.pattern_count(), 1);
        assert!(automaton.is_total());
    }
}
