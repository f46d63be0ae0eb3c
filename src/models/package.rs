//! Package entity.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::NormalizationError;
use crate::models::raw::RawData;
use crate::models::PackageId;

/// Textual date format used by the provider, e.g. `"12 Oct, 2021"`.
const PROVIDER_DATE_FORMAT: &str = "%d %b, %Y";

/// A normalized package row.
///
/// Constructed exactly once per identifier, either through
/// [`Package::errored`] (provider reported `success: false`) or through the
/// validating [`Package::from_data`]. Never mutated afterwards.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Package {
    /// Identifier in the provider's namespace; primary key.
    pub id: PackageId,

    pub price_currency: Option<String>,
    pub price_initial: Option<i64>,
    pub price_final: Option<i64>,
    pub price_discount_percent: Option<i64>,
    pub price_individual: Option<i64>,

    pub platforms_windows: Option<bool>,
    pub platforms_mac: Option<bool>,
    pub platforms_linux: Option<bool>,

    pub release_date_coming_soon: Option<bool>,

    /// ISO-8601 `YYYY-MM-DD`; `None` when the provider sent no parsable
    /// date (unreleased titles often carry an empty string).
    pub release_date: Option<NaiveDate>,

    /// True when the provider had no data for the identifier. Implies every
    /// other field is `None`.
    pub error: bool,
}

impl Package {
    /// Package row for an identifier the provider reported as not found.
    pub fn errored(id: PackageId) -> Self {
        Self {
            id,
            price_currency: None,
            price_initial: None,
            price_final: None,
            price_discount_percent: None,
            price_individual: None,
            platforms_windows: None,
            platforms_mac: None,
            platforms_linux: None,
            release_date_coming_soon: None,
            release_date: None,
            error: true,
        }
    }

    /// Build a package from a successful record's payload.
    ///
    /// The price block, the platforms block and `release_date.coming_soon`
    /// are required; a missing one fails construction rather than
    /// defaulting to null. The release date itself is the only field
    /// allowed to degrade: unparsable or absent text stores as `None`.
    pub fn from_data(id: PackageId, data: &RawData) -> Result<Self, NormalizationError> {
        let price = data
            .price
            .as_ref()
            .ok_or_else(|| NormalizationError::missing(id, "price"))?;
        let platforms = data
            .platforms
            .ok_or_else(|| NormalizationError::missing(id, "platforms"))?;
        let release_date = data
            .release_date
            .as_ref()
            .ok_or_else(|| NormalizationError::missing(id, "release_date"))?;
        let coming_soon = release_date
            .coming_soon
            .ok_or_else(|| NormalizationError::missing(id, "release_date.coming_soon"))?;

        Ok(Self {
            id,
            price_currency: price.currency.clone(),
            price_initial: price.initial,
            price_final: price.final_,
            price_discount_percent: price.discount_percent,
            price_individual: price.individual,
            platforms_windows: Some(platforms.windows),
            platforms_mac: Some(platforms.mac),
            platforms_linux: Some(platforms.linux),
            release_date_coming_soon: Some(coming_soon),
            release_date: release_date.date.as_deref().and_then(parse_release_date),
            error: false,
        })
    }
}

/// Parse the provider's textual release date into a calendar date.
///
/// Returns `None` for empty or unparsable text.
pub fn parse_release_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), PROVIDER_DATE_FORMAT).ok()
}
