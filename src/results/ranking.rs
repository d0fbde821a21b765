//! Deterministic ordering of search results

use super::types::{LatLon, SearchResult};
use crate::locales::Collator;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

/// ASCII digits only; other scripts' digits are not folded into a value
static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid integer pattern"));

/// Distance weight used by the last-resort tie break
const SECONDARY_PRIORITY_DISTANCE: f64 = 1.0;

/// Value of the first run of ASCII digits in `name`; 0 when there is none
pub fn first_integer(name: &str) -> u64 {
    FIRST_INTEGER
        .find(name)
        .map(|m| {
            m.as_str().bytes().fold(0u64, |acc, b| {
                acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
            })
        })
        .unwrap_or(0)
}

/// Compare two results for ranking.
///
/// Keys, first mismatch decides:
/// 1. matched word count, descending
/// 2. search distance from the anchor, ascending
/// 3. first integer in the name, ascending ("House 2" before "House 10")
/// 4. collated name
/// 5. search distance with a unit distance weight, ascending
pub fn compare_results(
    a: &SearchResult,
    b: &SearchResult,
    anchor: Option<&LatLon>,
    collator: &Collator,
) -> Ordering {
    b.found_word_count
        .cmp(&a.found_word_count)
        .then_with(|| a.search_distance(anchor).total_cmp(&b.search_distance(anchor)))
        .then_with(|| first_integer(&a.locale_name).cmp(&first_integer(&b.locale_name)))
        .then_with(|| collator.compare(&a.locale_name, &b.locale_name))
        .then_with(|| {
            a.search_distance_with(anchor, SECONDARY_PRIORITY_DISTANCE)
                .total_cmp(&b.search_distance_with(anchor, SECONDARY_PRIORITY_DISTANCE))
        })
}

/// Stable in-place sort by [`compare_results`]
pub fn sort_results(results: &mut [SearchResult], anchor: Option<&LatLon>, collator: &Collator) {
    results.sort_by(|a, b| compare_results(a, b, anchor, collator));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str) -> SearchResult {
        SearchResult::default()
            .with_name(name)
            .with_location(LatLon::new(0.0, 0.0))
            .with_priority(1.0, 0.0)
    }

    fn names(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.locale_name.as_str()).collect()
    }

    #[test]
    fn test_first_integer() {
        assert_eq!(first_integer("House 2"), 2);
        assert_eq!(first_integer("House 10b, 7"), 10);
        assert_eq!(first_integer("No number"), 0);
        assert_eq!(first_integer("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn test_first_integer_ignores_non_ascii_digits() {
        assert_eq!(first_integer("House \u{0663}"), 0);
        assert_eq!(first_integer("Haus \u{0663} 12"), 12);

        let collator = Collator::default();
        let mut results = vec![result("House 5"), result("House \u{0663}")];
        sort_results(&mut results, None, &collator);
        assert_eq!(names(&results), vec!["House \u{0663}", "House 5"]);
    }

    #[test]
    fn test_numeric_aware_names() {
        let collator = Collator::default();
        let mut results = vec![result("House 10"), result("House 2")];
        sort_results(&mut results, None, &collator);
        assert_eq!(names(&results), vec!["House 2", "House 10"]);
    }

    #[test]
    fn test_word_count_dominates_distance() {
        let anchor = LatLon::new(0.0, 0.0);
        let collator = Collator::default();
        let near = result("Alpha").with_location(LatLon::new(0.0, 0.001)).with_priority(1.0, 1.0);
        let far = result("Beta")
            .with_location(LatLon::new(0.0, 1.0))
            .with_priority(1.0, 1.0)
            .with_found_word_count(2);

        let mut results = vec![near, far];
        sort_results(&mut results, Some(&anchor), &collator);
        assert_eq!(names(&results), vec!["Beta", "Alpha"]);
    }

    #[test]
    fn test_distance_dominates_number() {
        let anchor = LatLon::new(0.0, 0.0);
        let collator = Collator::default();
        let near = result("House 10").with_location(LatLon::new(0.0, 0.001)).with_priority(1.0, 1.0);
        let far = result("House 2").with_location(LatLon::new(0.0, 0.01)).with_priority(1.0, 1.0);

        let mut results = vec![far, near];
        sort_results(&mut results, Some(&anchor), &collator);
        assert_eq!(names(&results), vec!["House 10", "House 2"]);
    }

    #[test]
    fn test_number_dominates_name() {
        let collator = Collator::default();
        let mut results = vec![result("A 5"), result("B 3")];
        sort_results(&mut results, None, &collator);
        assert_eq!(names(&results), vec!["B 3", "A 5"]);
    }

    #[test]
    fn test_name_dominates_secondary_distance() {
        let anchor = LatLon::new(0.0, 0.0);
        let collator = Collator::default();
        // priority_distance 0 makes the primary distance key tie
        let a = result("Apfel").with_location(LatLon::new(0.0, 0.5)).with_priority(1.0, 0.0);
        let b = result("Birne").with_location(LatLon::new(0.0, 0.001)).with_priority(1.0, 0.0);

        let mut results = vec![b, a];
        sort_results(&mut results, Some(&anchor), &collator);
        assert_eq!(names(&results), vec!["Apfel", "Birne"]);
    }

    #[test]
    fn test_secondary_distance_breaks_ties() {
        let anchor = LatLon::new(0.0, 0.0);
        let collator = Collator::default();
        let far = result("Kiosk")
            .with_location(LatLon::new(0.0, 0.5))
            .with_priority(1.0, 0.0)
            .with_found_word_count(1);
        let near = result("kiosk")
            .with_location(LatLon::new(0.0, 0.001))
            .with_priority(1.0, 0.0)
            .with_found_word_count(1);

        let mut results = vec![far, near];
        sort_results(&mut results, Some(&anchor), &collator);
        assert_eq!(names(&results), vec!["kiosk", "Kiosk"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let anchor = LatLon::new(0.0, 0.0);
        let collator = Collator::default();
        let mut results = vec![
            result("House 10").with_found_word_count(1),
            result("House 2"),
            result("Café").with_location(LatLon::new(0.0, 0.2)).with_priority(1.0, 1.0),
            result("cafe"),
            result("Zoo").with_found_word_count(1),
        ];
        sort_results(&mut results, Some(&anchor), &collator);
        let once: Vec<String> = names(&results).iter().map(|s| s.to_string()).collect();
        sort_results(&mut results, Some(&anchor), &collator);
        assert_eq!(names(&results), once);
        assert_eq!(once, vec!["Zoo", "House 10", "cafe", "House 2", "Café"]);
    }
}
