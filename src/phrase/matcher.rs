//! Name matching against the unresolved part of a phrase

use crate::locales::Collator;

/// Matches names against a pattern at primary collation strength.
///
/// A name matches when it starts with the pattern or when any of its
/// space-separated words does. An empty pattern matches everything.
#[derive(Debug, Clone)]
pub struct NameStringMatcher {
    pattern: String,
    collator: Collator,
}

impl NameStringMatcher {
    pub fn new(pattern: &str, collator: Collator) -> Self {
        let pattern = collator.fold(pattern.trim());
        Self { pattern, collator }
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        let name = self.collator.fold(name);
        name.starts_with(&self.pattern) || name.contains(&format!(" {}", self.pattern))
    }

    pub fn matches_any<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().any(|name| self.matches(name.as_ref()))
    }
}

/// Count how many of `words` prefix-match some word of `name`
pub fn count_matched_words<S: AsRef<str>>(collator: &Collator, words: &[S], name: &str) -> usize {
    let folded = collator.fold(name);
    let name_words: Vec<&str> = folded
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .filter(|w| !w.is_empty())
        .collect();

    words
        .iter()
        .map(|w| collator.fold(w.as_ref()))
        .filter(|w| !w.is_empty() && name_words.iter().any(|n| n.starts_with(w.as_str())))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match() {
        let matcher = NameStringMatcher::new("cent", Collator::default());
        assert!(matcher.matches("Central Park"));
        assert!(matcher.matches("Berlin Centrum"));
        assert!(!matcher.matches("Decent Cafe"));
    }

    #[test]
    fn test_accent_insensitive() {
        let matcher = NameStringMatcher::new("mu", Collator::default());
        assert!(matcher.matches("München"));
        assert!(matcher.matches_any(&["Munich", "Monaco di Baviera"]));
        assert!(!matcher.matches_any(&["Berlin"]));
    }

    #[test]
    fn test_empty_pattern_matches_all() {
        let matcher = NameStringMatcher::new("  ", Collator::default());
        assert!(matcher.is_empty());
        assert!(matcher.matches("anything"));
    }

    #[test]
    fn test_count_matched_words() {
        let collator = Collator::default();
        assert_eq!(count_matched_words(&collator, &["unter", "lin"], "Unter den Linden"), 2);
        assert_eq!(count_matched_words(&collator, &["unter", "xyz"], "Unter den Linden"), 1);
        assert_eq!(count_matched_words::<&str>(&collator, &[], "Unter den Linden"), 0);
    }
}
