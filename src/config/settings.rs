//! Settings structures for MapSearch-RS configuration

use crate::results::{IndexFile, LatLon};
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub engine: EngineSettings,
    pub search: SearchSettings,
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            engine: EngineSettings::default(),
            search: SearchSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (MAPSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("MAPSEARCH_LOG") {
            self.general.log_filter = val;
        }
        if let Ok(val) = std::env::var("MAPSEARCH_LANG") {
            self.search.lang = val;
        }
        if let Ok(val) = std::env::var("MAPSEARCH_SETTLE_DELAY_MS") {
            if let Ok(ms) = val.parse() {
                self.engine.settle_delay_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("MAPSEARCH_QUEUE_CAPACITY") {
            if let Ok(capacity) = val.parse::<usize>() {
                self.engine.queue_capacity = capacity.max(1);
            }
        }
        if let Ok(val) = std::env::var("MAPSEARCH_TOTAL_LIMIT") {
            self.search.total_limit = parse_limit(&val);
        }
    }

    /// Get all enabled providers
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
        }
    }
}

/// Background engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Pause before a queued search starts running providers
    pub settle_delay_ms: u64,
    /// Maximum number of queued background jobs
    pub queue_capacity: usize,
}

impl EngineSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: crate::DEFAULT_SETTLE_DELAY_MS,
            queue_capacity: crate::DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Settings a phrase is searched with.
///
/// Never mutated in place: the `with_*` methods return a new value, and a new
/// phrase is generated whenever the settings change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Language used for collation and name matching
    pub lang: String,
    /// Index files available for searching
    pub index_files: Vec<IndexFile>,
    /// Maximum number of retained results (`None` or 0 = unlimited)
    #[serde(deserialize_with = "deserialize_limit")]
    pub total_limit: Option<usize>,
    /// Fallback ranking anchor when no resolved word carries a location
    pub origin_location: Option<LatLon>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            index_files: vec![],
            total_limit: None,
            origin_location: None,
        }
    }
}

impl SearchSettings {
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_index_files(mut self, files: Vec<IndexFile>) -> Self {
        self.index_files = files;
        self
    }

    pub fn with_total_limit(mut self, limit: Option<usize>) -> Self {
        self.total_limit = limit.filter(|&limit| limit > 0);
        self
    }

    pub fn with_origin_location(mut self, location: LatLon) -> Self {
        self.origin_location = Some(location);
        self
    }
}

/// Kind of built-in provider a config entry instantiates
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Coordinates and geo URLs typed directly into the search box
    #[default]
    Location,
    /// In-memory record index loaded from a YAML/JSON file
    Memory,
}

/// Individual provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name (unique identifier)
    pub name: String,
    /// Provider implementation to use
    pub kind: ProviderKind,
    /// Run priority; lower runs first
    pub priority: Option<i32>,
    /// Whether the provider is disabled
    pub disabled: bool,
    /// Data file for providers that need one
    pub data: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: ProviderKind::default(),
            priority: None,
            disabled: false,
            data: None,
        }
    }
}

/// Parse a result limit; `0` and `unlimited` both mean no limit
pub fn parse_limit(value: &str) -> Option<usize> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("unlimited") {
        return None;
    }
    value.parse::<usize>().ok().filter(|&limit| limit > 0)
}

fn deserialize_limit<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<usize>::deserialize(deserializer)?.filter(|&limit| limit > 0))
}

/// Default provider configurations
fn default_providers() -> Vec<ProviderConfig> {
    vec![ProviderConfig {
        name: "location".to_string(),
        kind: ProviderKind::Location,
        priority: Some(0),
        ..Default::default()
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.engine.settle_delay_ms, 200);
        assert_eq!(settings.engine.settle_delay(), Duration::from_millis(200));
        assert_eq!(settings.search.lang, "en");
        assert!(settings.search.total_limit.is_none());
        assert!(!settings.providers.is_empty());
    }

    #[test]
    fn test_enabled_providers() {
        let settings = Settings::default();
        let enabled = settings.enabled_providers();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].name, "location");
        assert_eq!(enabled[0].kind, ProviderKind::Location);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
engine:
  settle_delay_ms: 50
search:
  lang: de
  total_limit: 25
  index_files:
    - name: Germany_berlin
      path: /maps/Germany_berlin.obf
providers:
  - name: places
    kind: memory
    priority: 3
    data: places.yml
  - name: location
    kind: location
    disabled: true
"#
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.engine.settle_delay_ms, 50);
        assert_eq!(settings.engine.queue_capacity, crate::DEFAULT_QUEUE_CAPACITY);
        assert_eq!(settings.search.lang, "de");
        assert_eq!(settings.search.total_limit, Some(25));
        assert_eq!(settings.search.index_files[0].name, "Germany_berlin");

        let enabled = settings.enabled_providers();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].kind, ProviderKind::Memory);
        assert_eq!(enabled[0].priority, Some(3));
    }

    #[test]
    fn test_zero_limit_in_file_is_unlimited() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search:\n  total_limit: 0").unwrap();
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.search.total_limit, None);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search:\n  total_limit: null").unwrap();
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.search.total_limit, None);
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("10"), Some(10));
        assert_eq!(parse_limit("0"), None);
        assert_eq!(parse_limit("Unlimited"), None);
        assert_eq!(parse_limit("many"), None);
    }

    #[test]
    fn test_search_settings_builders() {
        let base = SearchSettings::default();
        let updated = base
            .clone()
            .with_lang("tr")
            .with_total_limit(Some(5))
            .with_origin_location(LatLon::new(41.0, 29.0));

        assert_eq!(base.lang, "en");
        assert_eq!(updated.lang, "tr");
        assert_eq!(updated.total_limit, Some(5));
        assert_eq!(updated.clone().with_total_limit(Some(0)).total_limit, None);
        assert_eq!(updated.origin_location, Some(LatLon::new(41.0, 29.0)));
    }
}
