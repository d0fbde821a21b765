//! Request generations and queued jobs

use super::sink::ResultMatcher;
use crate::phrase::SearchPhrase;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic request generation counter shared by the core and its sinks
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
    current: Arc<AtomicU64>,
}

impl GenerationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return it
    pub fn advance(&self) -> u64 {
        self.current.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    /// Live generation
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }

    /// Whether `generation` is still the live one
    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

/// A full search queued for the background worker
pub(crate) struct SearchJob {
    pub phrase: Arc<SearchPhrase>,
    pub generation: u64,
    pub matcher: Option<Arc<dyn ResultMatcher>>,
}

impl SearchJob {
    pub fn is_superseded(&self, clock: &GenerationClock) -> bool {
        !clock.is_current(self.generation)
            || self.matcher.as_ref().is_some_and(|m| m.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_clock() {
        let clock = GenerationClock::new();
        assert_eq!(clock.current(), 0);
        let first = clock.advance();
        assert_eq!(first, 1);
        assert!(clock.is_current(first));

        let shared = clock.clone();
        let second = shared.advance();
        assert_eq!(second, 2);
        assert!(!clock.is_current(first));
        assert!(clock.is_current(second));
    }
}
