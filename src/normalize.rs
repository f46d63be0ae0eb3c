// src/normalize.rs

//! Conversion of raw provider records into the relational shape.
//!
//! A record either carries data (one [`Package`] plus its [`App`]s) or
//! reports `success: false`, which is a representable outcome, not an
//! error: it becomes a package row with the `error` flag set and no apps.
//! Fetch failures never reach this layer.

use crate::error::NormalizationError;
use crate::models::raw::RawRecord;
use crate::models::{App, Package, PackageId};

/// A normalized record, ready for insertion.
#[derive(Debug, Clone)]
pub struct NormalizedPackage {
    pub package: Package,
    /// Apps in provider order, stamped with the owning package id.
    pub apps: Vec<App>,
}

/// Normalize one fetched record.
pub fn normalize(
    id: PackageId,
    record: &RawRecord,
) -> Result<NormalizedPackage, NormalizationError> {
    let data = match &record.data {
        Some(data) if record.success => data,
        // `success: false` (or a success record with a stripped payload,
        // which the provider treats the same way).
        _ => {
            return Ok(NormalizedPackage {
                package: Package::errored(id),
                apps: Vec::new(),
            });
        }
    };

    let package = Package::from_data(id, data)?;
    let apps = data
        .apps
        .iter()
        .map(|app| App {
            id: app.id,
            name: app.name.clone(),
            package_id: id,
        })
        .collect();

    Ok(NormalizedPackage { package, apps })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn unsuccessful_record_becomes_errored_package() {
        let normalized = normalize(55, &record(json!({"success": false}))).unwrap();
        assert_eq!(normalized.package.id, 55);
        assert!(normalized.package.error);
        assert!(normalized.apps.is_empty());
    }

    #[test]
    fn success_without_payload_is_treated_as_errored() {
        let normalized = normalize(55, &record(json!({"success": true}))).unwrap();
        assert!(normalized.package.error);
        assert!(normalized.apps.is_empty());
    }

    #[test]
    fn apps_keep_provider_order_and_owner() {
        let normalized = normalize(
            7,
            &record(json!({
                "success": true,
                "data": {
                    "price": {"currency": "USD", "initial": 999, "final": 999,
                              "discount_percent": 0, "individual": 999},
                    "platforms": {"windows": true, "mac": true, "linux": false},
                    "release_date": {"coming_soon": false, "date": "3 Mar, 2015"},
                    "apps": [
                        {"id": 300, "name": "Base Game"},
                        {"id": 100, "name": "Soundtrack"},
                        {"id": 200, "name": "Artbook"}
                    ]
                }
            })),
        )
        .unwrap();

        assert!(!normalized.package.error);
        let ids: Vec<u32> = normalized.apps.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![300, 100, 200]);
        assert!(normalized.apps.iter().all(|a| a.package_id == 7));
        assert_eq!(normalized.apps[1].name, "Soundtrack");
    }

    #[test]
    fn missing_platforms_is_a_construction_failure() {
        let result = normalize(
            7,
            &record(json!({
                "success": true,
                "data": {
                    "price": {"currency": "USD"},
                    "release_date": {"coming_soon": true},
                    "apps": []
                }
            })),
        );
        let err = result.unwrap_err();
        assert_eq!(err.id, 7);
        assert_eq!(err.field, "platforms");
    }
}
