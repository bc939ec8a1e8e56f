//! Assembly of raw store responses into records.
//!
//! Field extraction is delegated to [`crate::listing`], [`crate::package`]
//! and [`crate::bundle`]; this module checks that a response belongs to the
//! requested id and decides whether it is a record at all.

use serde_json::Value;
use storefront_core::BundleDetail;

use crate::bundle::parse_bundle_page;
use crate::error::ScraperError;
use crate::listing::StoreListing;
use crate::package::PackageListing;
use crate::types::{open_envelope, BundlePage};

/// Builds a title record from an `appdetails` response.
///
/// # Errors
///
/// - [`ScraperError::IdentifierMismatch`] when the envelope key or the
///   record's `steam_appid` differs from `requested`.
/// - [`ScraperError::Deserialize`] when the body is not an envelope.
pub fn assemble_app(body: Value, requested: &str) -> Result<Option<StoreListing>, ScraperError> {
    let Some(data) = open_envelope(body, requested, "appdetails")? else {
        return Ok(None);
    };
    let listing = StoreListing::new(data);

    if let Some(appid) = listing.steam_appid() {
        if appid.to_string() != requested {
            return Err(ScraperError::IdentifierMismatch {
                requested: requested.to_owned(),
                received: appid.to_string(),
            });
        }
    }
    for field in listing.mistyped_fields() {
        tracing::debug!(appid = requested, field = field.key(), "title field has an unexpected shape");
    }
    Ok(Some(listing))
}

/// Builds a package record from a `packagedetails` response.
///
/// # Errors
///
/// Same as [`assemble_app`], minus the inner id check.
pub fn assemble_package(
    body: Value,
    requested: &str,
) -> Result<Option<PackageListing>, ScraperError> {
    let Some(data) = open_envelope(body, requested, "packagedetails")? else {
        return Ok(None);
    };
    let listing = PackageListing::new(data);
    for field in listing.mistyped_fields() {
        tracing::debug!(packageid = requested, field = field.key(), "package field has an unexpected shape");
    }
    Ok(Some(listing))
}

/// Builds a bundle record from its store page.
///
/// A redirected request is no record.
///
/// # Errors
///
/// [`ScraperError::IdentifierMismatch`] when the page's purchase block names
/// another bundle.
pub fn assemble_bundle(
    page: BundlePage,
    requested: &str,
) -> Result<Option<BundleDetail>, ScraperError> {
    let html = match page {
        BundlePage::Page(html) => html,
        BundlePage::Redirected { location } => {
            tracing::debug!(bundleid = requested, ?location, "bundle page redirected");
            return Ok(None);
        }
    };

    let detail = parse_bundle_page(&html);
    match detail.bundle_id.as_deref() {
        Some(found) if found != requested => Err(ScraperError::IdentifierMismatch {
            requested: requested.to_owned(),
            received: found.to_owned(),
        }),
        _ => Ok(Some(detail)),
    }
}

/// Price object from a currency-specific details response: `price_overview`
/// for titles, `price` for packages.
///
/// Free titles carry no price object; that is `Ok(None)`.
///
/// # Errors
///
/// Same as [`assemble_app`].
pub fn extract_price(
    body: Value,
    requested: &str,
    price_key: &str,
) -> Result<Option<Value>, ScraperError> {
    let Some(mut data) = open_envelope(body, requested, price_key)? else {
        return Ok(None);
    };
    Ok(data.remove(price_key))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
