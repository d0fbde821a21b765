//! Per-request result collection

use super::models::GenerationClock;
use crate::phrase::SearchPhrase;
use crate::results::{IndexFile, ObjectType, ResultObject, SearchResult};
use std::sync::Arc;

/// Caller-supplied receiver of streamed results.
///
/// Sees every result a provider publishes, including the ones a capped sink
/// does not keep, plus the provider progress signals.
pub trait ResultMatcher: Send + Sync {
    /// Accept or reject a result
    fn publish(&self, result: &SearchResult) -> bool;

    /// Whether the caller is no longer interested (e.g. the view went away)
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// [`ResultMatcher`] backed by a closure; never cancelled
pub struct FnMatcher<F> {
    f: F,
}

impl<F> FnMatcher<F>
where
    F: Fn(&SearchResult) -> bool + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ResultMatcher for FnMatcher<F>
where
    F: Fn(&SearchResult) -> bool + Send + Sync,
{
    fn publish(&self, result: &SearchResult) -> bool {
        (self.f)(result)
    }
}

/// Generation a sink belongs to
#[derive(Debug, Clone)]
struct RequestTicket {
    generation: u64,
    clock: GenerationClock,
}

/// Collector providers publish into for one request.
///
/// Never reused across requests. Enforces the soft result cap, tags results
/// with the current parent and exposes cancellation to providers.
pub struct ResultSink {
    results: Vec<SearchResult>,
    matcher: Option<Arc<dyn ResultMatcher>>,
    ticket: Option<RequestTicket>,
    total_limit: Option<usize>,
    parent: Option<Arc<SearchResult>>,
    count: usize,
}

impl ResultSink {
    /// Sink for a background request of `generation`
    pub fn new(
        matcher: Option<Arc<dyn ResultMatcher>>,
        generation: u64,
        clock: GenerationClock,
        total_limit: Option<usize>,
    ) -> Self {
        Self {
            results: Vec::new(),
            matcher,
            ticket: Some(RequestTicket { generation, clock }),
            total_limit,
            parent: None,
            count: 0,
        }
    }

    /// Sink outside the generation machinery; only the matcher can cancel it
    pub fn detached(matcher: Option<Arc<dyn ResultMatcher>>, total_limit: Option<usize>) -> Self {
        Self {
            results: Vec::new(),
            matcher,
            ticket: None,
            total_limit,
            parent: None,
            count: 0,
        }
    }

    /// Offer a result.
    ///
    /// Returns false if the caller's matcher rejected it. Accepted results past
    /// the cap are counted but not kept.
    pub fn publish(&mut self, mut result: SearchResult) -> bool {
        if let Some(matcher) = &self.matcher {
            if !matcher.publish(&result) {
                return false;
            }
        }
        self.count += 1;
        result.parent_search_result = self.parent.clone();
        if self.total_limit.map_or(true, |limit| self.count <= limit) {
            self.results.push(result);
        }
        true
    }

    pub fn is_cancelled(&self) -> bool {
        let superseded = self
            .ticket
            .as_ref()
            .is_some_and(|t| !t.clock.is_current(t.generation));
        superseded || self.matcher.as_ref().is_some_and(|m| m.is_cancelled())
    }

    /// Scope subsequent results under `parent`; returns the previous parent
    pub fn set_parent_search_result(
        &mut self,
        parent: Option<Arc<SearchResult>>,
    ) -> Option<Arc<SearchResult>> {
        std::mem::replace(&mut self.parent, parent)
    }

    /// Signal that `provider` finished searching `phrase`
    pub fn api_search_finished(&self, provider: &str, phrase: &Arc<SearchPhrase>) {
        self.signal(ObjectType::SearchApiFinished, provider, None, phrase);
    }

    /// Signal that `provider` finished searching one index file
    pub fn api_search_region_finished(
        &self,
        provider: &str,
        file: Arc<IndexFile>,
        phrase: &Arc<SearchPhrase>,
    ) {
        self.signal(ObjectType::SearchApiRegionFinished, provider, Some(file), phrase);
    }

    /// Progress signals go to the caller only; they are never kept or counted
    fn signal(
        &self,
        object_type: ObjectType,
        provider: &str,
        file: Option<Arc<IndexFile>>,
        phrase: &Arc<SearchPhrase>,
    ) {
        let Some(matcher) = &self.matcher else {
            return;
        };
        let mut result = SearchResult::new(phrase.clone()).with_type(object_type);
        result.object = ResultObject::Provider(provider.to_string());
        result.parent_search_result = self.parent.clone();
        result.file = file;
        matcher.publish(&result);
    }

    /// Number of accepted results, including the ones past the cap
    pub fn count(&self) -> usize {
        self.count
    }

    /// Retained results
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
    }
}
