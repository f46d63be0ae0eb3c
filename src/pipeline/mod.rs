//! Pipeline entry points for ingestion operations.
//!
//! - `run_ingest`: Fetch, normalize and persist a list of package
//!   identifiers

pub mod ingest;

pub use ingest::{run_ingest, IngestStats};
