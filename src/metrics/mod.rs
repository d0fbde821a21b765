//! Metrics collection module
//!
//! Tracks provider performance, failure rates, and job outcomes.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of response times kept per provider
const RESPONSE_WINDOW: usize = 100;

/// Metrics collector owned by a search core
pub struct Metrics {
    /// Total searches submitted
    pub total_searches: AtomicU64,
    /// Jobs that installed a collection
    completed_jobs: AtomicU64,
    /// Jobs abandoned because newer input arrived
    superseded_jobs: AtomicU64,
    /// Runs per provider
    provider_runs: RwLock<HashMap<String, u64>>,
    /// Provider response times (rolling window in ms)
    provider_response_times: RwLock<HashMap<String, Vec<u64>>>,
    /// Provider failure counts, panics included
    provider_errors: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            completed_jobs: AtomicU64::new(0),
            superseded_jobs: AtomicU64::new(0),
            provider_runs: RwLock::new(HashMap::new()),
            provider_response_times: RwLock::new(HashMap::new()),
            provider_errors: RwLock::new(HashMap::new()),
        }
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_completed(&self) {
        self.completed_jobs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_superseded(&self) {
        self.superseded_jobs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one provider run and how long it took
    pub fn record_provider_run(&self, provider: &str, time_ms: u64) {
        *self
            .provider_runs
            .write()
            .entry(provider.to_string())
            .or_insert(0) += 1;

        let mut times = self.provider_response_times.write();
        let entry = times.entry(provider.to_string()).or_default();
        if entry.len() >= RESPONSE_WINDOW {
            entry.remove(0);
        }
        entry.push(time_ms);
    }

    /// Record a provider failure
    pub fn record_error(&self, provider: &str) {
        let mut errors = self.provider_errors.write();
        *errors.entry(provider.to_string()).or_insert(0) += 1;
    }

    /// Get total searches
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    pub fn get_completed_jobs(&self) -> u64 {
        self.completed_jobs.load(Ordering::Relaxed)
    }

    pub fn get_superseded_jobs(&self) -> u64 {
        self.superseded_jobs.load(Ordering::Relaxed)
    }

    pub fn get_provider_runs(&self, provider: &str) -> u64 {
        self.provider_runs.read().get(provider).copied().unwrap_or(0)
    }

    pub fn get_provider_errors(&self, provider: &str) -> u64 {
        self.provider_errors.read().get(provider).copied().unwrap_or(0)
    }

    /// Get average response time for a provider
    pub fn get_avg_response_time(&self, provider: &str) -> Option<u64> {
        let times = self.provider_response_times.read();
        times.get(provider).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Get reliability percentage for a provider
    pub fn get_reliability(&self, provider: &str) -> f64 {
        let runs = self.get_provider_runs(provider);
        let errors = self.get_provider_errors(provider).min(runs);
        if runs == 0 {
            100.0
        } else {
            ((runs - errors) as f64 / runs as f64) * 100.0
        }
    }

    /// Get all provider statistics
    pub fn get_provider_stats(&self) -> HashMap<String, ProviderStats> {
        let providers: Vec<String> = self.provider_runs.read().keys().cloned().collect();
        providers
            .into_iter()
            .map(|name| {
                let stats = ProviderStats {
                    runs: self.get_provider_runs(&name),
                    errors: self.get_provider_errors(&name),
                    avg_response_time: self.get_avg_response_time(&name),
                    reliability: self.get_reliability(&name),
                };
                (name, stats)
            })
            .collect()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single provider
#[derive(Debug, Clone)]
pub struct ProviderStats {
    pub runs: u64,
    pub errors: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.inc_search();
        metrics.inc_completed();
        metrics.inc_superseded();
        metrics.record_provider_run("streets", 100);

        assert_eq!(metrics.get_total_searches(), 2);
        assert_eq!(metrics.get_completed_jobs(), 1);
        assert_eq!(metrics.get_superseded_jobs(), 1);
        assert_eq!(metrics.get_avg_response_time("streets"), Some(100));
        assert_eq!(metrics.get_reliability("streets"), 100.0);
    }

    #[test]
    fn test_reliability() {
        let metrics = Metrics::new();
        for _ in 0..4 {
            metrics.record_provider_run("poi", 10);
        }
        metrics.record_error("poi");

        assert_eq!(metrics.get_reliability("poi"), 75.0);
        assert_eq!(metrics.get_reliability("unknown"), 100.0);

        let stats = metrics.get_provider_stats();
        assert_eq!(stats["poi"].runs, 4);
        assert_eq!(stats["poi"].errors, 1);
    }

    #[test]
    fn test_response_window() {
        let metrics = Metrics::new();
        metrics.record_provider_run("poi", 10_000);
        for _ in 0..RESPONSE_WINDOW {
            metrics.record_provider_run("poi", 10);
        }
        assert_eq!(metrics.get_avg_response_time("poi"), Some(10));
    }
}
