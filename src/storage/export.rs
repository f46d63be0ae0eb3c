//! CSV mirrors of the two relations.
//!
//! Writes `packages.csv` and `apps.csv` next to each other, one row per
//! entity, header row = field names.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::storage::PackageStore;

/// Where the mirror files landed and how many rows each carries.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub packages_path: PathBuf,
    pub package_rows: usize,
    pub apps_path: PathBuf,
    pub app_rows: usize,
}

const PACKAGE_HEADER: [&str; 12] = [
    "id",
    "price_currency",
    "price_initial",
    "price_final",
    "price_discount_percent",
    "price_individual",
    "platforms_windows",
    "platforms_mac",
    "platforms_linux",
    "release_date_coming_soon",
    "release_date",
    "error",
];

const APP_HEADER: [&str; 3] = ["id", "name", "package_id"];

/// Mirror the store's relations into CSV files under `dir`.
///
/// The header row is written explicitly so an empty relation still mirrors
/// to a well-formed file.
pub fn export_csv(store: &PackageStore, dir: &Path) -> Result<ExportSummary> {
    fs::create_dir_all(dir)?;

    let packages = store.packages()?;
    let packages_path = dir.join("packages.csv");
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&packages_path)?;
    writer.write_record(PACKAGE_HEADER)?;
    for package in &packages {
        writer.serialize(package)?;
    }
    writer.flush()?;

    let apps = store.apps()?;
    let apps_path = dir.join("apps.csv");
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&apps_path)?;
    writer.write_record(APP_HEADER)?;
    for app in &apps {
        writer.serialize(app)?;
    }
    writer.flush()?;

    Ok(ExportSummary {
        packages_path,
        package_rows: packages.len(),
        apps_path,
        app_rows: apps.len(),
    })
}
