//! Base URL handling for the store client.

use reqwest::Url;

use crate::error::ScraperError;

/// Parses a configured base URL so that relative endpoint paths join under
/// it rather than replacing its last segment.
///
/// `"https://store.steampowered.com"` and `"https://store.steampowered.com/"`
/// both become `https://store.steampowered.com/`.
pub(super) fn parse_base_url(base_url: &str) -> Result<Url, ScraperError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| ScraperError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: "expected an http(s) origin".to_owned(),
        });
    }
    Ok(url)
}

/// Hostname of `url` for error messages, or the full URL when it has none.
pub(super) fn host_of(url: &Url) -> String {
    url.host_str()
        .map_or_else(|| url.to_string(), str::to_owned)
}
