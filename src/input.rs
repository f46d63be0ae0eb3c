// src/input.rs

//! Identifier list input.
//!
//! The identifier list arrives as a CSV file with a `PACKAGEID` column
//! (matched case-insensitively, any position). Order is preserved;
//! duplicates are not filtered.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::PackageId;

/// Read the ordered identifier list from a CSV file.
pub fn read_package_ids(path: &Path) -> Result<Vec<PackageId>> {
    let mut reader = csv::Reader::from_path(path)?;

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("PACKAGEID"))
        .ok_or_else(|| {
            AppError::input(format!("no PACKAGEID column in {}", path.display()))
        })?;

    let mut ids = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1, so the first data record is line 2.
        let line = index + 2;
        let field = record.get(column).unwrap_or("").trim();
        let id: PackageId = field.parse().map_err(|_| {
            AppError::input(format!("line {line}: `{field}` is not a package id"))
        })?;
        if id == 0 {
            return Err(AppError::input(format!(
                "line {line}: package id must be positive"
            )));
        }
        ids.push(id);
    }
    Ok(ids)
}
