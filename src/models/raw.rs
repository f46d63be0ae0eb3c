//! Wire types for the provider's `packagedetails` response.
//!
//! The HTTP body is a JSON object keyed by the stringified package
//! identifier: `{"<id>": {"success": bool, "data": {...}}}`. These types
//! mirror that shape verbatim; normalization into the relational entities
//! happens in [`crate::normalize`].

use serde::Deserialize;

/// Provider response for a single package identifier.
///
/// `success: false` is a valid outcome (unknown identifier), not a fetch
/// failure; `data` is only populated when `success` is true.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub success: bool,

    #[serde(default)]
    pub data: Option<RawData>,
}

/// Payload of a successful package record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawData {
    #[serde(default)]
    pub price: Option<RawPrice>,

    #[serde(default)]
    pub platforms: Option<RawPlatforms>,

    #[serde(default)]
    pub release_date: Option<RawReleaseDate>,

    /// Apps bundled in the package, in provider order.
    #[serde(default)]
    pub apps: Vec<RawApp>,
}

/// Price block. Amounts are in the currency's minor unit, as sent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPrice {
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub initial: Option<i64>,

    #[serde(default, rename = "final")]
    pub final_: Option<i64>,

    #[serde(default)]
    pub discount_percent: Option<i64>,

    #[serde(default)]
    pub individual: Option<i64>,
}

/// Platform availability flags.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawPlatforms {
    #[serde(default)]
    pub windows: bool,

    #[serde(default)]
    pub mac: bool,

    #[serde(default)]
    pub linux: bool,
}

/// Release date block.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReleaseDate {
    /// Absent in malformed records; required for a normalizable package.
    #[serde(default)]
    pub coming_soon: Option<bool>,

    /// Textual date, e.g. `"12 Oct, 2021"`. May be empty for unreleased
    /// titles.
    #[serde(default)]
    pub date: Option<String>,
}

/// One app entry under a package.
#[derive(Debug, Clone, Deserialize)]
pub struct RawApp {
    pub id: u32,
    pub name: String,
}
