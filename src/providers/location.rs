//! Coordinates and geo URLs typed straight into the search box

use super::traits::SearchProvider;
use crate::phrase::SearchPhrase;
use crate::results::{LatLon, ObjectType, ResultObject, SearchResult};
use crate::search::ResultSink;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static DECIMAL_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([-+]?\d{1,2}(?:\.\d+)?)\s*[,;\s]\s*([-+]?\d{1,3}(?:\.\d+)?)\s*$")
        .expect("valid coordinate pattern")
});

static GEO_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*geo:([-+]?\d+(?:\.\d+)?),([-+]?\d+(?:\.\d+)?)").expect("valid geo uri pattern")
});

static MAP_FRAGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#map=\d+(?:\.\d+)?/([-+]?\d+(?:\.\d+)?)/([-+]?\d+(?:\.\d+)?)")
        .expect("valid map url pattern")
});

/// Parse `lat, lon`, `geo:lat,lon` or a `#map=zoom/lat/lon` URL
pub fn parse_location(text: &str) -> Option<LatLon> {
    let caps = GEO_URI
        .captures(text)
        .or_else(|| MAP_FRAGMENT.captures(text))
        .or_else(|| DECIMAL_PAIR.captures(text))?;

    let lat: f64 = caps[1].parse().ok()?;
    let lon: f64 = caps[2].parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some(LatLon::new(lat, lon))
}

/// Provider resolving typed coordinates into a single location result
pub struct LocationProvider {
    name: String,
    priority: i32,
}

impl LocationProvider {
    pub fn new() -> Self {
        Self {
            name: "location".to_string(),
            priority: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for LocationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchProvider for LocationProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self, phrase: &SearchPhrase) -> Option<i32> {
        parse_location(phrase.unknown_search_phrase()).map(|_| self.priority)
    }

    fn search(&self, phrase: &Arc<SearchPhrase>, sink: &mut ResultSink) -> anyhow::Result<()> {
        let Some(location) = parse_location(phrase.unknown_search_phrase()) else {
            return Ok(());
        };

        let mut result = SearchResult::new(phrase.clone())
            .with_type(ObjectType::Location)
            .with_name(location.to_string())
            .with_location(location)
            .with_found_word_count(phrase.unknown_search_words().len())
            .with_priority(0.0, 0.0);
        result.object = ResultObject::Custom(serde_json::json!({
            "lat": location.lat,
            "lon": location.lon,
        }));
        sink.publish(result);
        Ok(())
    }
}
