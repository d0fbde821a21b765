//! Search phrase module
//!
//! A [`SearchPhrase`] is the immutable snapshot of what the user has typed so
//! far: words already resolved to results (a chosen city, a chosen street) plus
//! the unresolved tail that providers match against.

mod matcher;

pub use matcher::{count_matched_words, NameStringMatcher};

use crate::config::SearchSettings;
use crate::locales::Collator;
use crate::results::{IndexFile, LatLon, SearchResult};
use std::fmt;
use std::sync::Arc;

/// Separator inserted after a selected word
const WORD_SEPARATOR: &str = ", ";

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

/// One resolved token of a phrase
#[derive(Debug, Clone)]
pub struct SearchWord {
    text: String,
    result: Option<Arc<SearchResult>>,
}

impl SearchWord {
    pub fn new(text: impl Into<String>, result: Option<Arc<SearchResult>>) -> Self {
        Self {
            text: text.into(),
            result,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Result the word was resolved to, if it was selected from a list
    pub fn result(&self) -> Option<&Arc<SearchResult>> {
        self.result.as_ref()
    }

    pub fn location(&self) -> Option<LatLon> {
        self.result.as_ref().and_then(|r| r.location)
    }
}

/// Immutable snapshot of the query being typed
#[derive(Debug, Clone)]
pub struct SearchPhrase {
    text: String,
    words: Vec<SearchWord>,
    unknown_search_phrase: String,
    unknown_search_words: Vec<String>,
    settings: Arc<SearchSettings>,
    selected_files: Vec<Arc<IndexFile>>,
    collator: Collator,
}

impl SearchPhrase {
    /// Create an empty phrase
    pub fn new(settings: Arc<SearchSettings>) -> Self {
        let collator = Collator::new(&settings.lang);
        Self {
            text: String::new(),
            words: Vec::new(),
            unknown_search_phrase: String::new(),
            unknown_search_words: Vec::new(),
            settings,
            selected_files: Vec::new(),
            collator,
        }
    }

    /// Derive the phrase for new input text.
    ///
    /// Resolved words are kept as long as the new text still starts with them
    /// (followed by a separator); everything after them becomes the unknown tail.
    pub fn generate_new_phrase(&self, text: &str, settings: Arc<SearchSettings>) -> SearchPhrase {
        let mut phrase = SearchPhrase::new(settings);
        let mut rest = text;

        for word in &self.words {
            match rest.strip_prefix(word.text.as_str()) {
                Some(tail) if tail.starts_with(is_separator) => {
                    phrase.words.push(word.clone());
                    rest = tail.trim_start_matches(is_separator);
                }
                _ => break,
            }
        }

        phrase.text = text.to_string();
        phrase.set_unknown(rest);
        phrase
    }

    /// Commit a result as a resolved word
    pub fn select_word(&self, result: Arc<SearchResult>) -> SearchPhrase {
        let mut phrase = SearchPhrase::new(self.settings.clone());
        phrase.words = self.words.clone();
        phrase
            .words
            .push(SearchWord::new(result.locale_name.clone(), Some(result)));
        phrase.text = phrase
            .words
            .iter()
            .map(|w| format!("{}{}", w.text, WORD_SEPARATOR))
            .collect();
        phrase
    }

    /// Copy of this phrase with the source files of resolved words selected.
    ///
    /// The selection is sorted by file identity so providers iterate in a
    /// stable order.
    pub fn prepared(&self) -> SearchPhrase {
        let mut phrase = self.clone();
        for word in &self.words {
            if let Some(file) = word.result.as_ref().and_then(|r| r.file.as_ref()) {
                phrase.select_file(file.clone());
            }
        }
        phrase.sort_files();
        phrase
    }

    fn select_file(&mut self, file: Arc<IndexFile>) {
        if !self.selected_files.iter().any(|f| **f == *file) {
            self.selected_files.push(file);
        }
    }

    fn sort_files(&mut self) {
        self.selected_files.sort();
    }

    fn set_unknown(&mut self, rest: &str) {
        self.unknown_search_phrase = rest.trim().to_string();
        self.unknown_search_words = rest
            .split(is_separator)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// Raw text of the phrase
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[SearchWord] {
        &self.words
    }

    /// Unresolved tail of the text
    pub fn unknown_search_phrase(&self) -> &str {
        &self.unknown_search_phrase
    }

    pub fn unknown_search_words(&self) -> &[String] {
        &self.unknown_search_words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.unknown_search_phrase.is_empty()
    }

    pub fn settings(&self) -> &Arc<SearchSettings> {
        &self.settings
    }

    pub fn collator(&self) -> &Collator {
        &self.collator
    }

    /// Matcher for the unresolved tail
    pub fn name_matcher(&self) -> NameStringMatcher {
        NameStringMatcher::new(&self.unknown_search_phrase, self.collator.clone())
    }

    /// Files explicitly selected through resolved words
    pub fn selected_files(&self) -> &[Arc<IndexFile>] {
        &self.selected_files
    }

    /// Files providers should search: the selection, or every configured file
    pub fn searchable_files(&self) -> Vec<&IndexFile> {
        if self.selected_files.is_empty() {
            let mut files: Vec<&IndexFile> = self.settings.index_files.iter().collect();
            files.sort();
            files
        } else {
            self.selected_files.iter().map(|f| f.as_ref()).collect()
        }
    }

    /// Whether results from `file` are in scope for this phrase
    pub fn is_file_selected(&self, file: &IndexFile) -> bool {
        self.selected_files.is_empty() || self.selected_files.iter().any(|f| **f == *file)
    }

    /// Ranking anchor: the last resolved word with a location, else the origin
    pub fn last_token_location(&self) -> Option<LatLon> {
        self.words
            .iter()
            .rev()
            .find_map(SearchWord::location)
            .or(self.settings.origin_location)
    }
}

impl fmt::Display for SearchPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
