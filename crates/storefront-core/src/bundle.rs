use serde::{Deserialize, Serialize};

/// A bundle scraped from its store page, normalized field by field.
///
/// Every field is extracted independently; a field whose marker could not be
/// found is `None` (or empty for the collection fields) without affecting its
/// siblings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleDetail {
    pub name: Option<String>,
    /// Bundle id as printed on the purchase block (`data-ds-bundleid`).
    pub bundle_id: Option<String>,
    pub header_image: Option<String>,
    pub description: Option<String>,
    pub genres: Option<Vec<String>>,
    pub developers: Option<Vec<String>>,
    pub publishers: Option<Vec<String>>,
    pub franchise: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    /// DRM notice kept as one string; it may itself contain commas.
    pub drm: Option<String>,
    pub categories: Vec<BundleCategory>,
    pub price: PriceInfo,
    pub package_items: Vec<PackageItem>,
}

/// A store feature category (`Single-player`, `Steam Achievements`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleCategory {
    pub id: u32,
    pub label: String,
}

/// Bundle price in minor currency units (cents).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub final_minor_units: Option<i64>,
    pub discount_percent: Option<i64>,
    /// Reconstructed pre-discount price; `0` when it cannot be derived.
    pub initial_minor_units: i64,
    pub initial_formatted: Option<String>,
    pub final_formatted: Option<String>,
}

impl PriceInfo {
    /// `true` when a positive bundle discount is advertised.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount_percent.is_some_and(|d| d > 0)
    }
}

/// One tile in the bundle's package list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageItem {
    pub name: Option<String>,
    /// Set when the tile is a package; its apps are then listed in `app_ids`.
    pub package_id: Option<String>,
    pub app_ids: Vec<u64>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub price: ItemPrice,
    pub platforms: Platforms,
    pub categories: Option<Vec<String>>,
}

impl PackageItem {
    #[must_use]
    pub fn is_package(&self) -> bool {
        self.package_id.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPrice {
    pub final_minor_units: Option<i64>,
    pub final_formatted: Option<String>,
}

/// Platform availability. A missing marker means `false`, never unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platforms {
    pub windows: bool,
    pub mac: bool,
    pub linux: bool,
}
