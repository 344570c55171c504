//! Pipeline entry points for crawler operations.
//!
//! - `run_pipeline`: Fetch the dashboard and store it in the warehouse
//! - `store_snapshot`: Store an already extracted snapshot

pub mod crawl;
pub mod load;

pub use crawl::run_pipeline;
pub use load::{RunSummary, store_snapshot};
