// src/pipeline/ingest.rs

//! Ingestion pipeline.

use std::fs;
use std::time::Instant;

use crate::error::Result;
use crate::models::{Config, PackageId};
use crate::normalize::normalize;
use crate::services::{BatchScheduler, PackageFetcher};
use crate::storage::{export_csv, PackageStore};

/// Summary of an ingestion run.
#[derive(Debug, Default)]
pub struct IngestStats {
    /// Fetch outcomes drained from the scheduler.
    pub processed: usize,
    /// Identifiers skipped because their fetch failed.
    pub fetch_failures: usize,
    /// Identifiers skipped because a required field was absent.
    pub normalize_failures: usize,
    /// Package rows written, including errored ones.
    pub packages_stored: usize,
    /// Packages the provider reported as not found.
    pub errored_packages: usize,
    /// App rows written.
    pub apps_stored: usize,
}

/// Run the ingestion pipeline over `ids` and commit once at the end.
///
/// The store lives on this task only: results are drained in completion
/// order, each one normalized and inserted (package first, then its apps)
/// before the next is taken, so inserts need no locking. A fetch or
/// normalization failure skips that identifier; an insert failure aborts
/// the run with nothing committed.
pub async fn run_ingest(config: &Config, ids: Vec<PackageId>) -> Result<IngestStats> {
    let start = Instant::now();
    log::info!("ingesting {} package identifiers", ids.len());

    if config.storage.reset_on_start {
        PackageStore::reset(&config.storage.db_path)?;
    }
    if let Some(parent) = config.storage.db_path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Schema problems are fatal before any fetch goes out.
    let mut store = PackageStore::open(&config.storage.db_path)?;
    store.ensure_schema()?;
    store.begin()?;

    let fetcher = PackageFetcher::new(&config.provider)?;
    let scheduler = BatchScheduler::new(fetcher, config.scheduler.clone());
    let mut results = scheduler.run(ids);

    let mut stats = IngestStats::default();
    while let Some((id, outcome)) = results.recv().await {
        stats.processed += 1;
        let record = match outcome {
            Ok(record) => record,
            Err(error) => {
                log::warn!("skipping package {}: {}", id, error.kind);
                stats.fetch_failures += 1;
                continue;
            }
        };

        match normalize(id, &record) {
            Ok(normalized) => {
                store.insert_package(&normalized.package)?;
                for app in &normalized.apps {
                    store.insert_app(app)?;
                }
                stats.packages_stored += 1;
                stats.apps_stored += normalized.apps.len();
                if normalized.package.error {
                    stats.errored_packages += 1;
                }
            }
            Err(error) => {
                log::error!("skipping package {id}: {error}");
                stats.normalize_failures += 1;
            }
        }
    }

    store.commit()?;

    if let Some(dir) = &config.storage.export_dir {
        let summary = export_csv(&store, dir)?;
        log::info!(
            "mirrored {} packages and {} apps to {}",
            summary.package_rows,
            summary.app_rows,
            dir.display()
        );
    }

    log::info!(
        "finished in {:.1}s: {} stored ({} provider errors), {} apps, {} fetch failures, {} normalize failures",
        start.elapsed().as_secs_f64(),
        stats.packages_stored,
        stats.errored_packages,
        stats.apps_stored,
        stats.fetch_failures,
        stats.normalize_failures,
    );

    Ok(stats)
}
