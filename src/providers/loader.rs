//! Provider loader for initializing providers from configuration

use super::location::LocationProvider;
use super::memory::MemoryIndexProvider;
use super::registry::ProviderRegistry;
use super::traits::SearchProvider;
use crate::config::{ProviderConfig, ProviderKind, Settings};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Load all providers from settings
    pub fn load(settings: &Settings) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();

        let enabled = settings.enabled_providers();
        let skipped = settings.providers.len() - enabled.len();
        if skipped > 0 {
            info!("Skipping {} disabled providers", skipped);
        }

        for config in enabled {
            match Self::create_provider(config) {
                Ok(provider) => {
                    info!("Loaded provider: {} ({:?})", config.name, config.kind);
                    registry.register(provider);
                }
                Err(e) => {
                    warn!("Failed to load provider {}: {:#}", config.name, e);
                }
            }
        }

        info!("Loaded {} providers", registry.len());
        registry
    }

    /// Create a provider instance from its config
    fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn SearchProvider>> {
        let provider: Arc<dyn SearchProvider> = match config.kind {
            ProviderKind::Location => {
                let mut provider = LocationProvider::new().with_name(&config.name);
                if let Some(priority) = config.priority {
                    provider = provider.with_priority(priority);
                }
                Arc::new(provider)
            }
            ProviderKind::Memory => {
                let path = config
                    .data
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("memory provider needs a data file"))?;
                let mut provider = MemoryIndexProvider::from_file(&config.name, path)?;
                if let Some(priority) = config.priority {
                    provider = provider.with_priority(priority);
                }
                Arc::new(provider)
            }
        };
        Ok(provider)
    }
}
