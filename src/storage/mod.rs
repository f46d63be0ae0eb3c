//! Storage backends for normalized entities.
//!
//! The SQLite store is the primary sink; the CSV export mirrors its two
//! relations into flat files for downstream consumers that want plain
//! text.

pub mod export;
pub mod sqlite;

// Re-export for convenience
pub use export::{export_csv, ExportSummary};
pub use sqlite::PackageStore;
