//! In-memory record index provider

use super::traits::SearchProvider;
use crate::phrase::{count_matched_words, SearchPhrase};
use crate::results::{Amenity, IndexFile, LatLon, ObjectType, SearchResult};
use crate::search::ResultSink;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Weight of the anchor distance for records without an explicit one
const DEFAULT_PRIORITY_DISTANCE: f64 = 0.001;

fn default_kind() -> ObjectType {
    ObjectType::Poi
}

fn default_rank() -> f64 {
    1.0
}

/// A searchable record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub name: String,
    #[serde(default)]
    pub other_names: Vec<String>,
    #[serde(default = "default_kind")]
    pub kind: ObjectType,
    #[serde(default)]
    pub location: Option<LatLon>,
    #[serde(default)]
    pub amenity: Option<Amenity>,
    /// Name of the index file the record belongs to
    #[serde(default)]
    pub file: Option<String>,
    /// Base rank; lower is better
    #[serde(default = "default_rank")]
    pub rank: f64,
}

impl IndexRecord {
    pub fn new(name: impl Into<String>, kind: ObjectType) -> Self {
        Self {
            name: name.into(),
            other_names: vec![],
            kind,
            location: None,
            amenity: None,
            file: None,
            rank: default_rank(),
        }
    }

    pub fn at(mut self, location: LatLon) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_amenity(mut self, amenity: Amenity) -> Self {
        self.amenity = Some(amenity);
        self
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_other_names(mut self, names: Vec<String>) -> Self {
        self.other_names = names;
        self
    }
}

/// Provider scanning a list of records held in memory
pub struct MemoryIndexProvider {
    name: String,
    priority: i32,
    records: Vec<IndexRecord>,
}

impl MemoryIndexProvider {
    pub fn new(name: impl Into<String>, records: Vec<IndexRecord>) -> Self {
        Self {
            name: name.into(),
            priority: 1,
            records,
        }
    }

    /// Load records from a YAML or JSON (by extension) file
    pub fn from_file(name: impl Into<String>, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading records from {}", path.display()))?;
        let records: Vec<IndexRecord> = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        Ok(Self::new(name, records))
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn resolve_file(phrase: &SearchPhrase, name: &str) -> Arc<IndexFile> {
        phrase
            .selected_files()
            .iter()
            .find(|f| f.name == name)
            .cloned()
            .or_else(|| {
                phrase
                    .settings()
                    .index_files
                    .iter()
                    .find(|f| f.name == name)
                    .map(|f| Arc::new(f.clone()))
            })
            .unwrap_or_else(|| Arc::new(IndexFile::new(name, "")))
    }
}

impl SearchProvider for MemoryIndexProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self, phrase: &SearchPhrase) -> Option<i32> {
        if phrase.unknown_search_phrase().is_empty() {
            None
        } else {
            Some(self.priority)
        }
    }

    fn search(&self, phrase: &Arc<SearchPhrase>, sink: &mut ResultSink) -> Result<()> {
        let matcher = phrase.name_matcher();
        let words = phrase.unknown_search_words();
        let mut scanned_files = BTreeSet::new();

        for record in &self.records {
            if sink.is_cancelled() {
                debug!("{} cancelled mid-scan", self.name);
                return Ok(());
            }
            let file = record.file.as_deref().map(|name| Self::resolve_file(phrase, name));
            if file.as_ref().is_some_and(|f| !phrase.is_file_selected(f)) {
                continue;
            }
            if let Some(name) = &record.file {
                scanned_files.insert(name.as_str());
            }
            if !matcher.matches(&record.name) && !matcher.matches_any(&record.other_names) {
                continue;
            }

            let found_word_count = std::iter::once(&record.name)
                .chain(record.other_names.iter())
                .map(|name| count_matched_words(phrase.collator(), words, name))
                .max()
                .unwrap_or(0);

            let mut result = SearchResult::new(phrase.clone())
                .with_type(record.kind)
                .with_name(record.name.clone())
                .with_other_names(record.other_names.clone())
                .with_found_word_count(found_word_count)
                .with_priority(record.rank, DEFAULT_PRIORITY_DISTANCE);
            result.location = record.location;
            if let Some(amenity) = &record.amenity {
                result = result.with_amenity(amenity.clone());
            }
            if let Some(file) = file {
                result = result.with_file(file);
            }
            sink.publish(result);
        }

        for file in scanned_files {
            sink.api_search_region_finished(&self.name, Self::resolve_file(phrase, file), phrase);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchSettings;
    use crate::search::{FnMatcher, ResultMatcher};
    use parking_lot::Mutex;
    use std::io::Write;

    fn phrase(text: &str) -> Arc<SearchPhrase> {
        let settings = Arc::new(SearchSettings::default());
        Arc::new(SearchPhrase::new(settings.clone()).generate_new_phrase(text, settings))
    }

    fn records() -> Vec<IndexRecord> {
        vec![
            IndexRecord::new("Berlin", ObjectType::City)
                .at(LatLon::new(52.52, 13.40))
                .in_file("Germany_berlin"),
            IndexRecord::new("Unter den Linden", ObjectType::Street)
                .at(LatLon::new(52.517, 13.388))
                .in_file("Germany_berlin"),
            IndexRecord::new("Café Einstein", ObjectType::Poi)
                .at(LatLon::new(52.50, 13.35))
                .with_amenity(Amenity::new("amenity", "cafe"))
                .in_file("Germany_berlin"),
            IndexRecord::new("Lindenau", ObjectType::Village)
                .at(LatLon::new(51.34, 12.33))
                .in_file("Germany_sachsen"),
        ]
    }

    #[test]
    fn test_priority_needs_text() {
        let provider = MemoryIndexProvider::new("places", records()).with_priority(4);
        assert_eq!(provider.priority(&phrase("lin")), Some(4));
        assert_eq!(provider.priority(&phrase("")), None);
    }

    #[test]
    fn test_matches_word_prefixes() {
        let provider = MemoryIndexProvider::new("places", records());
        let mut sink = ResultSink::detached(None, None);
        provider.search(&phrase("lin"), &mut sink).unwrap();

        let names: Vec<&str> = sink.results().iter().map(|r| r.locale_name.as_str()).collect();
        assert_eq!(names, vec!["Unter den Linden", "Lindenau"]);
        assert!(sink.results()[0].file.is_some());
    }

    #[test]
    fn test_found_word_count() {
        let provider = MemoryIndexProvider::new("places", records());
        let mut sink = ResultSink::detached(None, None);
        provider.search(&phrase("unter den"), &mut sink).unwrap();

        let results = sink.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].found_word_count, 2);
    }

    #[test]
    fn test_respects_file_selection() {
        let settings = Arc::new(SearchSettings::default());
        let berlin = Arc::new(
            SearchResult::default()
                .with_type(ObjectType::City)
                .with_name("Berlin")
                .with_location(LatLon::new(52.52, 13.40))
                .with_file(Arc::new(IndexFile::new("Germany_berlin", ""))),
        );
        let selected = SearchPhrase::new(settings.clone())
            .select_word(berlin)
            .generate_new_phrase("Berlin, lin", settings)
            .prepared();

        let provider = MemoryIndexProvider::new("places", records());
        let mut sink = ResultSink::detached(None, None);
        provider.search(&Arc::new(selected), &mut sink).unwrap();

        let names: Vec<&str> = sink.results().iter().map(|r| r.locale_name.as_str()).collect();
        assert_eq!(names, vec!["Unter den Linden"]);
    }

    #[test]
    fn test_selected_file_with_path_stays_in_scope() {
        let berlin_file = IndexFile::new("Germany_berlin", "/maps/Germany_berlin.obf");
        let settings = Arc::new(SearchSettings::default().with_index_files(vec![
            berlin_file.clone(),
            IndexFile::new("Germany_sachsen", "/maps/Germany_sachsen.obf"),
        ]));
        let berlin = Arc::new(
            SearchResult::default()
                .with_type(ObjectType::City)
                .with_name("Berlin")
                .with_location(LatLon::new(52.52, 13.40))
                .with_file(Arc::new(berlin_file.clone())),
        );
        let selected = Arc::new(
            SearchPhrase::new(settings.clone())
                .select_word(berlin)
                .generate_new_phrase("Berlin, lin", settings)
                .prepared(),
        );

        let provider = MemoryIndexProvider::new("places", records());
        let mut sink = ResultSink::detached(None, None);
        provider.search(&selected, &mut sink).unwrap();

        let results = sink.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].locale_name, "Unter den Linden");
        let file = results[0].file.as_ref().unwrap();
        assert_eq!(**file, berlin_file);
        assert!(selected.is_file_selected(file));
        assert!(!selected.is_file_selected(&IndexFile::new("Germany_sachsen", "/maps/Germany_sachsen.obf")));
    }

    #[test]
    fn test_emits_region_finished() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let matcher: Arc<dyn ResultMatcher> = Arc::new(FnMatcher::new(move |r: &SearchResult| {
            log.lock().push(r.object_type);
            true
        }));

        let provider = MemoryIndexProvider::new("places", records());
        let mut sink = ResultSink::detached(Some(matcher), None);
        provider.search(&phrase("berlin"), &mut sink).unwrap();

        let seen = seen.lock();
        assert_eq!(
            *seen,
            vec![
                ObjectType::City,
                ObjectType::SearchApiRegionFinished,
                ObjectType::SearchApiRegionFinished
            ]
        );
        assert_eq!(sink.results().len(), 1);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(
            file,
            r#"
- name: Tiergarten
  kind: poi
  location: {{ lat: 52.514, lon: 13.350 }}
  amenity: {{ category: natural, sub_type: wood }}
- name: Alexanderplatz
  kind: street
"#
        )
        .unwrap();

        let provider = MemoryIndexProvider::from_file("parks", file.path()).unwrap();
        assert_eq!(provider.len(), 2);
        assert_eq!(provider.records[0].amenity, Some(Amenity::new("natural", "wood")));
        assert_eq!(provider.records[1].kind, ObjectType::Street);
        assert_eq!(provider.records[1].rank, 1.0);
    }
}
