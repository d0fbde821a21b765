//! Background search worker
//!
//! One named OS thread drives a current-thread runtime and runs queued jobs
//! strictly one at a time.

use super::executor::CoreState;
use super::models::SearchJob;
use super::sink::ResultSink;
use crate::error::{Result, SearchError};
use crate::phrase::SearchPhrase;
use crate::providers::SearchProvider;
use crate::results::{filter_duplicates, sort_results, ResultCollection};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const THREAD_NAME: &str = "search-worker";

/// How a job ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobOutcome {
    Installed,
    Superseded,
}

/// Handle to the running worker thread
pub(crate) struct SearchWorker {
    handle: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl SearchWorker {
    /// Spawn the worker thread over `state`
    pub fn spawn(state: Arc<CoreState>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let queue_capacity = state.mailbox.capacity();

        let handle = std::thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                runtime.block_on(run_loop(state, token));
                debug!("search worker stopped");
            })?;

        info!("search worker started (queue capacity {})", queue_capacity);
        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Stop the worker and wait for the thread to exit.
    ///
    /// A job already inside a provider finishes that provider first.
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.thread().id() == std::thread::current().id() {
            // Dropped from a completion callback; the loop exits on its own.
            return;
        }
        if handle.join().is_err() {
            error!("search worker panicked");
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_loop(state: Arc<CoreState>, token: CancellationToken) {
    loop {
        let job = tokio::select! {
            _ = token.cancelled() => break,
            job = state.mailbox.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };

        match run_job(&state, job, &token).await {
            Ok(JobOutcome::Installed) => state.metrics.inc_completed(),
            Ok(JobOutcome::Superseded) => state.metrics.inc_superseded(),
            Err(SearchError::Interrupted) => {
                debug!("settle delay interrupted, stopping");
                break;
            }
            Err(e) => error!("search job failed: {}", e),
        }
    }
}

/// Run one queued search to completion unless newer input supersedes it
async fn run_job(state: &CoreState, job: SearchJob, token: &CancellationToken) -> Result<JobOutcome> {
    if job.is_superseded(&state.clock) {
        debug!("job {} superseded before settle delay", job.generation);
        return Ok(JobOutcome::Superseded);
    }

    let delay = state.settle_delay;
    if !delay.is_zero() {
        tokio::select! {
            _ = token.cancelled() => return Err(SearchError::Interrupted),
            _ = tokio::time::sleep(delay) => {}
        }
    }
    if job.is_superseded(&state.clock) {
        debug!("job {} superseded during settle delay", job.generation);
        return Ok(JobOutcome::Superseded);
    }

    let phrase = Arc::new(job.phrase.prepared());
    let mut sink = ResultSink::new(
        job.matcher.clone(),
        job.generation,
        state.clock.clone(),
        phrase.settings().total_limit,
    );

    match state.registry.get() {
        Some(registry) => {
            for (priority, provider) in registry.run_order(&phrase) {
                if sink.is_cancelled() {
                    debug!("job {} superseded before {}", job.generation, provider.name());
                    return Ok(JobOutcome::Superseded);
                }
                debug!("running {} (priority {}) for '{}'", provider.name(), priority, phrase);

                let start = Instant::now();
                let outcome = run_provider(provider.as_ref(), &phrase, &mut sink);
                state
                    .metrics
                    .record_provider_run(provider.name(), start.elapsed().as_millis() as u64);
                match outcome {
                    Ok(()) => sink.api_search_finished(provider.name(), &phrase),
                    Err(e) => {
                        error!("{}", e);
                        state.metrics.record_error(provider.name());
                    }
                }
            }
        }
        None => warn!("search requested before providers were registered"),
    }

    if sink.is_cancelled() {
        debug!("job {} superseded after providers ran", job.generation);
        return Ok(JobOutcome::Superseded);
    }

    let mut results = sink.into_results();
    let anchor = phrase.last_token_location();
    sort_results(&mut results, anchor.as_ref(), phrase.collator());
    filter_duplicates(&mut results);

    if job.is_superseded(&state.clock) {
        debug!("job {} superseded before install", job.generation);
        return Ok(JobOutcome::Superseded);
    }
    let collection = ResultCollection::new(results, phrase);
    info!(
        "search '{}' finished with {} results",
        collection.phrase(),
        collection.len()
    );
    state.current.store(Arc::new(collection));

    let callback = state.on_results_complete.read().clone();
    if let Some(callback) = callback {
        callback();
    }
    Ok(JobOutcome::Installed)
}

/// Run one provider, turning errors and panics into [`SearchError`]
pub(crate) fn run_provider(
    provider: &dyn SearchProvider,
    phrase: &Arc<SearchPhrase>,
    sink: &mut ResultSink,
) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(|| provider.search(phrase, sink))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(SearchError::Provider {
            provider: provider.name().to_string(),
            source,
        }),
        Err(_) => Err(SearchError::ProviderPanic(provider.name().to_string())),
    }
}
