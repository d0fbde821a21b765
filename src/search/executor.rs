//! Search orchestration

use super::mailbox::{Mailbox, MailboxClosed, PushOutcome};
use super::models::{GenerationClock, SearchJob};
use super::sink::{ResultMatcher, ResultSink};
use super::worker::{run_provider, SearchWorker};
use crate::config::{EngineSettings, SearchSettings, Settings};
use crate::error::{Result, SearchError};
use crate::locales;
use crate::metrics::Metrics;
use crate::phrase::SearchPhrase;
use crate::providers::{ProviderRegistry, SearchProvider};
use crate::results::{filter_duplicates, sort_results, ResultCollection, SearchResult};
use arc_swap::ArcSwap;
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Callback invoked after a background search installs its collection
pub type CompletionCallback = Arc<dyn Fn() + Send + Sync>;

/// State shared between the core and its worker thread
pub(crate) struct CoreState {
    pub clock: GenerationClock,
    pub registry: OnceCell<ProviderRegistry>,
    pub phrase: ArcSwap<SearchPhrase>,
    pub current: ArcSwap<ResultCollection>,
    pub settings: ArcSwap<SearchSettings>,
    pub on_results_complete: RwLock<Option<CompletionCallback>>,
    pub mailbox: Mailbox<SearchJob>,
    pub metrics: Metrics,
    pub settle_delay: Duration,
}

/// Incremental search engine.
///
/// Each [`search`](Self::search) call derives a new phrase, answers at once
/// with the previous results that still match, and queues a full search on
/// the background worker. Newer calls supersede older ones.
pub struct SearchCore {
    state: Arc<CoreState>,
    worker: Mutex<Option<SearchWorker>>,
}

impl SearchCore {
    /// Create a core; call [`start`](Self::start) to run background searches
    pub fn new(engine: &EngineSettings, settings: SearchSettings) -> Self {
        warn_unsupported_lang(&settings);
        let settings = Arc::new(settings);
        let phrase = Arc::new(SearchPhrase::new(settings.clone()));
        let current = Arc::new(ResultCollection::empty(phrase.clone()));

        Self {
            state: Arc::new(CoreState {
                clock: GenerationClock::new(),
                registry: OnceCell::new(),
                phrase: ArcSwap::new(phrase),
                current: ArcSwap::new(current),
                settings: ArcSwap::new(settings),
                on_results_complete: RwLock::new(None),
                mailbox: Mailbox::new(engine.queue_capacity),
                metrics: Metrics::new(),
                settle_delay: engine.settle_delay(),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Create a core from the full application settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.engine, settings.search.clone())
    }

    /// Register the providers. Only the first call succeeds.
    pub fn initialize(&self, registry: ProviderRegistry) -> Result<()> {
        let count = registry.len();
        self.state
            .registry
            .set(registry)
            .map_err(|_| SearchError::AlreadyInitialized)?;
        info!("search core initialized with {} providers", count);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.registry.get().is_some()
    }

    /// Start the background worker
    pub fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Err(SearchError::WorkerRunning);
        }
        if self.state.mailbox.is_closed() {
            return Err(SearchError::QueueClosed);
        }
        *worker = Some(SearchWorker::spawn(self.state.clone())?);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Stop the worker. Queued jobs are dropped and later searches only
    /// return quick results.
    pub fn shutdown(&self) {
        self.state.mailbox.close();
        let pending = self.state.mailbox.len();
        if pending > 0 {
            debug!("dropping {} queued searches", pending);
        }
        let worker = self.worker.lock().take();
        if let Some(mut worker) = worker {
            worker.shutdown();
            info!("search core shut down");
        }
    }

    /// Submit new input text.
    ///
    /// Returns immediately with the current results filtered by the new
    /// phrase; the full search runs in the background.
    pub fn search(
        &self,
        text: &str,
        matcher: Option<Arc<dyn ResultMatcher>>,
    ) -> Arc<ResultCollection> {
        let generation = self.state.clock.advance();
        let settings = self.state.settings.load_full();
        let phrase = Arc::new(self.state.phrase.load().generate_new_phrase(text, settings));
        self.state.phrase.store(phrase.clone());
        self.state.metrics.inc_search();

        let quick = Arc::new(self.state.current.load().filter_for(phrase.clone()));

        let job = SearchJob {
            phrase,
            generation,
            matcher,
        };
        match self.state.mailbox.push(job) {
            Ok(PushOutcome::Enqueued) => {}
            Ok(PushOutcome::ReplacedOldest) => {
                self.state.metrics.inc_superseded();
                debug!("search queue full, dropped oldest job");
            }
            Err(MailboxClosed) => warn!("search queue is closed, '{}' will not run", text),
        }
        quick
    }

    /// Run a single provider on the caller's thread.
    ///
    /// Does not touch the shared phrase or generation; only `matcher` can
    /// cancel it. Unknown providers yield an empty collection.
    pub fn shallow_search(
        &self,
        provider_name: &str,
        text: &str,
        matcher: Option<Arc<dyn ResultMatcher>>,
    ) -> Result<ResultCollection> {
        let settings = self.state.settings.load_full();
        let phrase = Arc::new(
            self.state
                .phrase
                .load()
                .generate_new_phrase(text, settings)
                .prepared(),
        );

        let Some(provider) = self.provider(provider_name) else {
            debug!("shallow search on unknown provider '{}'", provider_name);
            return Ok(ResultCollection::empty(phrase));
        };

        let mut sink = ResultSink::detached(matcher, phrase.settings().total_limit);
        run_provider(provider.as_ref(), &phrase, &mut sink)?;

        let mut results = sink.into_results();
        let anchor = phrase.last_token_location();
        sort_results(&mut results, anchor.as_ref(), phrase.collator());
        filter_duplicates(&mut results);
        info!(
            "shallow search '{}' on {} finished with {} results",
            phrase,
            provider_name,
            results.len()
        );
        Ok(ResultCollection::new(results, phrase))
    }

    /// Commit `result` as a resolved word of the current phrase
    pub fn select_search_result(&self, result: SearchResult) -> Arc<SearchPhrase> {
        let phrase = Arc::new(self.state.phrase.load().select_word(Arc::new(result)));
        self.state.phrase.store(phrase.clone());
        phrase
    }

    /// Replace the phrase with an empty one
    pub fn reset_phrase(&self) {
        let settings = self.state.settings.load_full();
        self.state.phrase.store(Arc::new(SearchPhrase::new(settings)));
    }

    /// Set the callback run on the worker thread after each installed search
    pub fn set_on_results_complete(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.state.on_results_complete.write() = Some(Arc::new(callback));
    }

    /// Latest installed collection
    pub fn current_search_result(&self) -> Arc<ResultCollection> {
        self.state.current.load_full()
    }

    pub fn phrase(&self) -> Arc<SearchPhrase> {
        self.state.phrase.load_full()
    }

    pub fn settings(&self) -> Arc<SearchSettings> {
        self.state.settings.load_full()
    }

    /// Settings used by subsequent searches
    pub fn update_settings(&self, settings: SearchSettings) {
        warn_unsupported_lang(&settings);
        self.state.settings.store(Arc::new(settings));
    }

    pub fn total_limit(&self) -> Option<usize> {
        self.state.settings.load().total_limit
    }

    pub fn set_total_limit(&self, limit: Option<usize>) {
        self.state
            .settings
            .rcu(|settings| Arc::new(settings.as_ref().clone().with_total_limit(limit)));
    }

    /// Look up a registered provider
    pub fn provider(&self, name: &str) -> Option<Arc<dyn SearchProvider>> {
        self.state.registry.get()?.get(name).cloned()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.state.metrics
    }
}

fn warn_unsupported_lang(settings: &SearchSettings) {
    if !locales::is_supported(&settings.lang) {
        warn!("language '{}' is not supported, using default collation", settings.lang);
    }
}

impl Drop for SearchCore {
    fn drop(&mut self) {
        self.shutdown();
    }
}
