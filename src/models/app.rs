//! App entity.

use serde::Serialize;

use crate::models::PackageId;

/// An app bundled in a package.
///
/// The app id is the provider's; the same id can legitimately appear under
/// several packages, so rows are unique on `(id, package_id)` rather than
/// on the id alone.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct App {
    /// App identifier in the provider's namespace.
    pub id: u32,

    /// Display name, verbatim from the provider.
    pub name: String,

    /// Owning package; must be inserted before this row.
    pub package_id: PackageId,
}
