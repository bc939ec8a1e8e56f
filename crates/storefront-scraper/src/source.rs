//! The fetch seam between the store and the record assembler.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ScraperError;
use crate::types::{AppListResponse, BundlePage};

/// Raw store responses, one method per endpoint.
///
/// [`crate::StoreClient`] is the HTTP implementation; tests substitute
/// in-memory sources.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// `appdetails` envelope for one app.
    async fn fetch_app(&self, appid: &str) -> Result<Value, ScraperError>;

    /// `packagedetails` envelope for one package.
    async fn fetch_package(&self, packageid: &str) -> Result<Value, ScraperError>;

    async fn fetch_bundle_page(&self, bundleid: &str) -> Result<BundlePage, ScraperError>;

    /// Review summary response, `{ success, query_summary, ... }`.
    async fn fetch_review_summary(&self, appid: &str) -> Result<Value, ScraperError>;

    async fn fetch_app_price(&self, appid: &str, country_code: &str) -> Result<Value, ScraperError>;

    async fn fetch_package_price(
        &self,
        packageid: &str,
        country_code: &str,
    ) -> Result<Value, ScraperError>;

    async fn fetch_app_list(&self) -> Result<AppListResponse, ScraperError>;
}
