//! Provider trait

use crate::phrase::SearchPhrase;
use crate::search::ResultSink;
use std::sync::Arc;

/// A pluggable search source contributing candidates for a phrase.
///
/// One instance is invoked repeatedly across the serialized job stream, so
/// implementations must be stateless between calls or synchronize internally.
pub trait SearchProvider: Send + Sync {
    /// Provider name, unique within a registry
    fn name(&self) -> &str;

    /// Run priority for `phrase`; lower runs first, `None` opts out entirely
    fn priority(&self, phrase: &SearchPhrase) -> Option<i32>;

    /// Publish candidates into `sink`.
    ///
    /// Long scans should poll [`ResultSink::is_cancelled`] and return early once
    /// it reports true.
    fn search(&self, phrase: &Arc<SearchPhrase>, sink: &mut ResultSink) -> anyhow::Result<()>;
}
