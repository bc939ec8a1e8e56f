//! Listing identifiers: which storefront entity a request refers to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_STORE_BASE_URL;
use crate::CoreError;

/// The three kinds of storefront listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// An individual title (game, DLC, demo, ...).
    App,
    /// A package, addressed as `sub` on the store.
    Package,
    /// A bundle of packages, only available as rendered markup.
    Bundle,
}

impl Category {
    /// Path segment used by store URLs (`/app/`, `/sub/`, `/bundle/`).
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Category::App => "app",
            Category::Package => "sub",
            Category::Bundle => "bundle",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "app" => Ok(Category::App),
            "sub" | "package" => Ok(Category::Package),
            "bundle" => Ok(Category::Bundle),
            other => Err(CoreError::InvalidCategory(other.to_string())),
        }
    }
}

/// A validated `(category, id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingTarget {
    pub category: Category,
    /// Numeric id kept as a string; it is also the key of the JSON envelope.
    pub id: String,
}

impl ListingTarget {
    /// Builds a target from an already-known category and a numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidListingId`] if `id` is empty or not all digits.
    pub fn parse_id(category: Category, id: &str) -> Result<Self, CoreError> {
        let id = id.trim();
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidListingId(id.to_string()));
        }
        Ok(Self {
            category,
            id: id.to_string(),
        })
    }

    /// Shorthand for an app target from an integer id.
    #[must_use]
    pub fn app(id: u64) -> Self {
        Self {
            category: Category::App,
            id: id.to_string(),
        }
    }

    /// Resolves a store page URL such as
    /// `https://store.steampowered.com/app/203160/Tomb_Raider/`.
    ///
    /// The scheme may be omitted (`store.steampowered.com/sub/1234`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStoreUrl`] when the host is not the store or
    /// the path lacks a category/id pair, and the category/id errors otherwise.
    pub fn from_store_url(url: &str) -> Result<Self, CoreError> {
        let trimmed = url.trim();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);

        let mut parts = without_scheme.split('/');
        let host = parts.next().unwrap_or_default();
        if !host.eq_ignore_ascii_case("store.steampowered.com") {
            return Err(CoreError::InvalidStoreUrl {
                url: trimmed.to_string(),
                reason: format!("unexpected host \"{host}\""),
            });
        }

        let (Some(category), Some(id)) = (parts.next(), parts.next()) else {
            return Err(CoreError::InvalidStoreUrl {
                url: trimmed.to_string(),
                reason: "expected /<category>/<id>".to_string(),
            });
        };

        let category = category.parse::<Category>()?;
        // Query strings can trail the id when there is no slug segment.
        let id = id.split(['?', '#']).next().unwrap_or_default();
        Self::parse_id(category, id)
    }

    /// Canonical store page link for this target.
    #[must_use]
    pub fn store_url(&self) -> String {
        self.store_url_on(DEFAULT_STORE_BASE_URL)
    }

    /// Store page link relative to a custom origin.
    #[must_use]
    pub fn store_url_on(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.category.path_segment(),
            self.id
        )
    }
}

impl fmt::Display for ListingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.id)
    }
}
