//! Search orchestration module
//!
//! Turns input text into phrases, runs providers on a single background
//! worker, and publishes the latest non-superseded result collection.

mod executor;
mod mailbox;
mod models;
mod sink;
mod worker;

pub use executor::{CompletionCallback, SearchCore};
pub use models::GenerationClock;
pub use sink::{FnMatcher, ResultMatcher, ResultSink};
