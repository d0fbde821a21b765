//! Provider registry

use super::traits::SearchProvider;
use crate::phrase::SearchPhrase;
use std::sync::Arc;
use tracing::warn;

/// Registry of search providers.
///
/// Filled during setup and read-only once handed to a
/// [`SearchCore`](crate::search::SearchCore).
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a provider; a provider with the same name is replaced
    pub fn register(&mut self, provider: Arc<dyn SearchProvider>) {
        if let Some(existing) = self
            .providers
            .iter_mut()
            .find(|p| p.name() == provider.name())
        {
            warn!("Replacing provider {}", provider.name());
            *existing = provider;
        } else {
            self.providers.push(provider);
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn SearchProvider>> {
        self.providers.iter().find(|p| p.name() == name)
    }

    /// Get all provider names
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Enabled providers for `phrase`, ascending by priority.
    ///
    /// Providers that opt out are left out; equal priorities keep
    /// registration order.
    pub fn run_order(&self, phrase: &SearchPhrase) -> Vec<(i32, Arc<dyn SearchProvider>)> {
        let mut order: Vec<(i32, Arc<dyn SearchProvider>)> = self
            .providers
            .iter()
            .filter_map(|p| p.priority(phrase).map(|priority| (priority, p.clone())))
            .collect();
        order.sort_by_key(|(priority, _)| *priority);
        order
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
