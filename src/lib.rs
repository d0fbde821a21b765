//! MapSearch-RS: an incremental, multi-provider map search engine
//!
//! Every keystroke becomes an immutable [`SearchPhrase`] that is fanned out to a
//! prioritized set of providers on a single background worker. Newer input
//! supersedes older work, results are capped while streaming, then sorted and
//! de-duplicated into a [`ResultCollection`].

pub mod config;
pub mod error;
pub mod locales;
pub mod metrics;
pub mod phrase;
pub mod providers;
pub mod results;
pub mod search;

pub use config::{SearchSettings, Settings};
pub use error::SearchError;
pub use phrase::{SearchPhrase, SearchWord};
pub use providers::{ProviderRegistry, SearchProvider};
pub use results::{ObjectType, ResultCollection, SearchResult};
pub use search::{ResultMatcher, ResultSink, SearchCore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default pause before a queued search runs, in milliseconds
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 200;

/// Default capacity of the background job queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;
