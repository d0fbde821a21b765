//! Search provider module
//!
//! Defines the SearchProvider trait and provides a registry for all providers.

mod loader;
mod registry;
mod traits;

// Provider implementations
pub mod location;
pub mod memory;

pub use loader::ProviderLoader;
pub use registry::ProviderRegistry;
pub use traits::*;
