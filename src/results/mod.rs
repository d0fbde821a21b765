//! Result types, ranking and de-duplication
//!
//! This module defines the result structures providers produce and the
//! post-processing applied once a search finishes.

mod collection;
pub mod dedup;
pub mod ranking;
mod types;

pub use collection::ResultCollection;
pub use dedup::{filter_duplicates, same_search_result};
pub use ranking::{compare_results, sort_results};
pub use types::*;
