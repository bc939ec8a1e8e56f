//! Store API response envelopes.
//!
//! ## Observed shapes
//!
//! ### `appdetails` / `packagedetails`
//! Both wrap the record in an object keyed by the requested id as a string:
//! `{ "203160": { "success": true, "data": { ... } } }`. An unknown or
//! region-locked id comes back as `{ "203160": { "success": false } }` with
//! no `data`. With `filters=price_overview`, a free title returns
//! `"data": []` instead of an object.
//!
//! ### `GetAppList/v2`
//! `{ "applist": { "apps": [ { "appid": 10, "name": "Counter-Strike" } ] } }`.
//! Names may be empty strings for delisted entries.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ScraperError;

/// One `{ success, data }` entry of a details response.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Unwraps the envelope for `requested`.
///
/// Returns `Ok(None)` when the store reports `success: false` or carries no
/// object under `data`.
///
/// # Errors
///
/// - [`ScraperError::Deserialize`] when the body is not an envelope map.
/// - [`ScraperError::IdentifierMismatch`] when the body is keyed by another id.
pub fn open_envelope(
    body: Value,
    requested: &str,
    context: &str,
) -> Result<Option<Map<String, Value>>, ScraperError> {
    let mut envelopes: BTreeMap<String, Envelope> =
        serde_json::from_value(body).map_err(|source| ScraperError::Deserialize {
            context: context.to_owned(),
            source,
        })?;

    let Some(envelope) = envelopes.remove(requested) else {
        let received = envelopes.into_keys().next().unwrap_or_default();
        return Err(ScraperError::IdentifierMismatch {
            requested: requested.to_owned(),
            received,
        });
    };

    if !envelope.success {
        tracing::debug!(id = requested, context, "store reported no record");
        return Ok(None);
    }
    match envelope.data {
        Some(Value::Object(data)) => Ok(Some(data)),
        other => {
            tracing::debug!(id = requested, context, ?other, "envelope carries no data object");
            Ok(None)
        }
    }
}

/// Outcome of requesting a bundle page.
///
/// The store answers unknown or age-gated bundle ids with a redirect to the
/// front page instead of a 404, so a redirect means "no such bundle".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundlePage {
    Page(String),
    Redirected { location: Option<String> },
}

/// Top-level response from `ISteamApps/GetAppList/v2/`.
#[derive(Debug, Deserialize)]
pub struct AppListResponse {
    pub applist: AppList,
}

#[derive(Debug, Deserialize)]
pub struct AppList {
    #[serde(default)]
    pub apps: Vec<AppListEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppListEntry {
    pub appid: u64,
    #[serde(default)]
    pub name: String,
}
