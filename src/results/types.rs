//! Result type definitions

use crate::phrase::SearchPhrase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Mean earth radius used for distance calculations, in metres
const EARTH_RADIUS_M: f64 = 6_372_800.0;

/// A geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle (haversine) distance in metres
    pub fn distance_to(&self, other: &LatLon) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// A map index file providers can search
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndexFile {
    /// Region name, e.g. `Germany_berlin`; primary identity
    pub name: String,
    #[serde(default)]
    pub path: PathBuf,
}

impl IndexFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Kind of a search result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    City,
    Village,
    Postcode,
    Street,
    House,
    StreetIntersection,
    PoiType,
    Poi,
    #[default]
    Location,
    PartialLocation,
    Favorite,
    Wpt,
    RecentObj,
    Region,
    /// Progress signal: a provider finished; never a match
    SearchApiFinished,
    /// Progress signal: a provider finished one index file; never a match
    SearchApiRegionFinished,
    UnknownNameFilter,
}

impl ObjectType {
    /// Whether this is part of the address hierarchy
    pub fn is_address(&self) -> bool {
        matches!(
            self,
            Self::City
                | Self::Village
                | Self::Postcode
                | Self::Street
                | Self::House
                | Self::StreetIntersection
        )
    }

    /// Whether this is one of the provider progress signals
    pub fn is_progress_sentinel(&self) -> bool {
        matches!(self, Self::SearchApiFinished | Self::SearchApiRegionFinished)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Village => "village",
            Self::Postcode => "postcode",
            Self::Street => "street",
            Self::House => "house",
            Self::StreetIntersection => "street_intersection",
            Self::PoiType => "poi_type",
            Self::Poi => "poi",
            Self::Location => "location",
            Self::PartialLocation => "partial_location",
            Self::Favorite => "favorite",
            Self::Wpt => "wpt",
            Self::RecentObj => "recent_obj",
            Self::Region => "region",
            Self::SearchApiFinished => "search_api_finished",
            Self::SearchApiRegionFinished => "search_api_region_finished",
            Self::UnknownNameFilter => "unknown_name_filter",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point of interest as seen by the ranking and dedup rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenity {
    /// Top-level category key, e.g. `shop` or `natural`
    pub category: String,
    /// Sub-type within the category, e.g. `supermarket`
    #[serde(default)]
    pub sub_type: String,
}

impl Amenity {
    pub fn new(category: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            sub_type: sub_type.into(),
        }
    }

    /// Route reference markers (hiking/cycling) are spread far along a route
    pub fn is_route_marker(&self) -> bool {
        let sub = self.sub_type.as_str();
        sub.contains("cn_ref")
            || sub.contains("wn_ref")
            || (sub.starts_with("route_hiking_") && sub.ends_with("n_poi"))
    }
}

/// Provider-visible object a result was built from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultObject {
    #[default]
    None,
    Amenity(Amenity),
    /// Name of the provider that emitted a progress signal
    Provider(String),
    Custom(serde_json::Value),
}

/// A single candidate match
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Phrase the result was found for
    pub phrase: Option<Arc<SearchPhrase>>,
    pub object_type: ObjectType,
    /// Display name in the active language
    pub locale_name: String,
    /// Alternate names (other languages, old names)
    pub other_names: Vec<String>,
    pub location: Option<LatLon>,
    pub object: ResultObject,
    /// Number of query words this result matched
    pub found_word_count: usize,
    /// Provider-assigned base rank; lower is better
    pub priority: f64,
    /// Weight of the distance to the anchor in `search_distance`
    pub priority_distance: f64,
    /// Index file the result came from
    pub file: Option<Arc<IndexFile>>,
    /// Enclosing result for hierarchical matches (street inside a city)
    pub parent_search_result: Option<Arc<SearchResult>>,
}

impl SearchResult {
    /// Create a new result for a phrase
    pub fn new(phrase: Arc<SearchPhrase>) -> Self {
        Self {
            phrase: Some(phrase),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = object_type;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.locale_name = name.into();
        self
    }

    pub fn with_other_names(mut self, names: Vec<String>) -> Self {
        self.other_names = names;
        self
    }

    pub fn with_location(mut self, location: LatLon) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_amenity(mut self, amenity: Amenity) -> Self {
        self.object = ResultObject::Amenity(amenity);
        self
    }

    pub fn with_found_word_count(mut self, count: usize) -> Self {
        self.found_word_count = count;
        self
    }

    pub fn with_priority(mut self, priority: f64, priority_distance: f64) -> Self {
        self.priority = priority;
        self.priority_distance = priority_distance;
        self
    }

    pub fn with_file(mut self, file: Arc<IndexFile>) -> Self {
        self.file = Some(file);
        self
    }

    /// The POI this result stands for, if any
    pub fn amenity(&self) -> Option<&Amenity> {
        match &self.object {
            ResultObject::Amenity(amenity) => Some(amenity),
            _ => None,
        }
    }

    /// Ranking distance from the anchor using the result's own weight
    pub fn search_distance(&self, anchor: Option<&LatLon>) -> f64 {
        self.search_distance_with(anchor, self.priority_distance)
    }

    /// Ranking distance from the anchor with an explicit distance weight
    pub fn search_distance_with(&self, anchor: Option<&LatLon>, priority_distance: f64) -> f64 {
        let distance = match (anchor, self.location.as_ref()) {
            (Some(anchor), Some(location)) => anchor.distance_to(location),
            _ => 0.0,
        };
        self.priority - 1.0 / (1.0 + priority_distance * distance)
    }
}
