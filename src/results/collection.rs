//! Immutable snapshot of a finished search

use super::types::SearchResult;
use crate::phrase::SearchPhrase;
use std::sync::Arc;

/// Ordered, de-duplicated results paired with the phrase that produced them.
///
/// Provider progress signals are stripped on construction, so every entry is
/// a real match.
#[derive(Debug, Clone)]
pub struct ResultCollection {
    results: Vec<SearchResult>,
    phrase: Arc<SearchPhrase>,
}

impl ResultCollection {
    pub fn new(mut results: Vec<SearchResult>, phrase: Arc<SearchPhrase>) -> Self {
        results.retain(|r| !r.object_type.is_progress_sentinel());
        Self { results, phrase }
    }

    /// An empty collection for `phrase`
    pub fn empty(phrase: Arc<SearchPhrase>) -> Self {
        Self {
            results: Vec::new(),
            phrase,
        }
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn phrase(&self) -> &Arc<SearchPhrase> {
        &self.phrase
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.iter()
    }

    /// Results whose names still match `phrase`, keeping their order
    pub fn filter_for(&self, phrase: Arc<SearchPhrase>) -> ResultCollection {
        let matcher = phrase.name_matcher();
        let results = self
            .results
            .iter()
            .filter(|r| matcher.matches(&r.locale_name) || matcher.matches_any(&r.other_names))
            .cloned()
            .collect();
        ResultCollection { results, phrase }
    }

    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchSettings;
    use crate::results::ObjectType;

    fn phrase(text: &str) -> Arc<SearchPhrase> {
        let settings = Arc::new(SearchSettings::default());
        Arc::new(SearchPhrase::new(settings.clone()).generate_new_phrase(text, settings))
    }

    #[test]
    fn test_strips_progress_signals() {
        let p = phrase("park");
        let collection = ResultCollection::new(
            vec![
                SearchResult::new(p.clone()).with_name("Park"),
                SearchResult::new(p.clone()).with_type(ObjectType::SearchApiFinished),
                SearchResult::new(p.clone()).with_type(ObjectType::SearchApiRegionFinished),
            ],
            p,
        );
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.results()[0].locale_name, "Park");
    }

    #[test]
    fn test_filter_for_narrower_phrase() {
        let p = phrase("c");
        let collection = ResultCollection::new(
            vec![
                SearchResult::new(p.clone()).with_name("Central Park"),
                SearchResult::new(p.clone()).with_name("Café Einstein"),
                SearchResult::new(p.clone())
                    .with_name("Muzeum")
                    .with_other_names(vec!["Cité des Sciences".to_string()]),
                SearchResult::new(p.clone()).with_name("Brandenburger Tor"),
            ],
            p,
        );

        let narrowed = collection.filter_for(phrase("ci"));
        let names: Vec<&str> = narrowed.iter().map(|r| r.locale_name.as_str()).collect();
        assert_eq!(names, vec!["Muzeum"]);
        assert_eq!(narrowed.phrase().text(), "ci");

        let all = collection.filter_for(phrase(""));
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_empty() {
        let collection = ResultCollection::empty(phrase(""));
        assert!(collection.is_empty());
        assert_eq!((&collection).into_iter().count(), 0);
    }
}
