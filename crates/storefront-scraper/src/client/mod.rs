//! HTTP client for the store's public catalog endpoints.

mod origin;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE, LOCATION, RETRY_AFTER};
use reqwest::{redirect, Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use storefront_core::AppConfig;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;
use crate::source::ListingSource;
use crate::types::{AppListResponse, BundlePage};

use origin::{host_of, parse_base_url};

/// Marks the visitor as an adult so age-gated bundle pages render instead of
/// redirecting to the age check.
const AGE_GATE_COOKIE: &str =
    "birthtime=0; lastagecheckage=1-0-1970; mature_content=1; wants_mature_content=1";

/// Bundle labels (`Genre:`, `Developer:`) are matched in English.
const PAGE_LANGUAGE: &str = "english";

/// Fallback wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// HTTP client for the store's details, review and bundle endpoints.
///
/// Rate limiting (429), not-found (404) and other non-2xx responses are typed
/// errors. Transient failures (429, 5xx, network errors) are retried with
/// exponential backoff up to `max_retries` additional attempts.
pub struct StoreClient {
    client: Client,
    /// Bundle pages are fetched without following redirects.
    page_client: Client,
    store_base: Url,
    api_base: Url,
    country_code: Option<String>,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl StoreClient {
    /// Creates a client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] if a `reqwest::Client` cannot be constructed.
    /// - [`ScraperError::InvalidBaseUrl`] if a configured base URL is invalid.
    pub fn new(config: &AppConfig) -> Result<Self, ScraperError> {
        let client = Self::with_base_urls(
            &config.store_base_url,
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retries(config.max_retries, config.retry_backoff_base_secs)
        .with_country_code(config.country_code.clone());
        Ok(client)
    }

    /// Creates a client serving both the store and the app-list API from
    /// `base_url`, without retries (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::with_base_urls`].
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        Self::with_base_urls(base_url, base_url, timeout_secs, user_agent)
    }

    /// Creates a client with explicit store and API origins.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] if a `reqwest::Client` cannot be constructed.
    /// - [`ScraperError::InvalidBaseUrl`] if either base URL is invalid.
    pub fn with_base_urls(
        store_base_url: &str,
        api_base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let store_base = parse_base_url(store_base_url)?;
        let api_base = parse_base_url(api_base_url)?;

        let builder = || {
            Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .user_agent(user_agent)
        };
        let client = builder().build()?;
        let page_client = builder().redirect(redirect::Policy::none()).build()?;

        Ok(Self {
            client,
            page_client,
            store_base,
            api_base,
            country_code: None,
            max_retries: 0,
            backoff_base_secs: 0,
        })
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_secs: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_secs = backoff_base_secs;
        self
    }

    /// Region used for `appdetails` and `packagedetails` when no explicit
    /// currency is requested.
    #[must_use]
    pub fn with_country_code(mut self, country_code: Option<String>) -> Self {
        self.country_code = country_code;
        self
    }

    /// Fetches the raw `appdetails` envelope for one app.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] on HTTP 429 after all retries exhausted.
    /// - [`ScraperError::NotFound`] on HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on network failure after all retries exhausted.
    /// - [`ScraperError::Deserialize`] when the body is not JSON (not retried).
    pub async fn fetch_app(&self, appid: &str) -> Result<Value, ScraperError> {
        let url = self.app_details_url(appid, self.country_code.as_deref(), None)?;
        self.get_json(url, "appdetails").await
    }

    /// Fetches the raw `packagedetails` envelope for one package.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::fetch_app`].
    pub async fn fetch_package(&self, packageid: &str) -> Result<Value, ScraperError> {
        let url = self.package_details_url(packageid, self.country_code.as_deref())?;
        self.get_json(url, "packagedetails").await
    }

    /// Fetches a bundle's store page with the age gate pre-answered.
    ///
    /// Any 3xx answer is returned as [`BundlePage::Redirected`].
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::fetch_app`], minus deserialization.
    pub async fn fetch_bundle_page(&self, bundleid: &str) -> Result<BundlePage, ScraperError> {
        let mut url = endpoint(&self.store_base, &["bundle", bundleid])?;
        url.query_pairs_mut().append_pair("l", PAGE_LANGUAGE);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .page_client
                    .get(url.clone())
                    .header(COOKIE, AGE_GATE_COOKIE)
                    .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .send()
                    .await?;

                if response.status().is_redirection() {
                    let location = response
                        .headers()
                        .get(LOCATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_owned);
                    return Ok(BundlePage::Redirected { location });
                }

                let response = check_status(response, &url)?;
                Ok(BundlePage::Page(response.text().await?))
            }
        })
        .await
    }

    /// Fetches the review summary (`query_summary`) for one app.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::fetch_app`].
    pub async fn fetch_review_summary(&self, appid: &str) -> Result<Value, ScraperError> {
        let mut url = endpoint(&self.store_base, &["appreviews", appid])?;
        url.query_pairs_mut()
            .append_pair("json", "1")
            .append_pair("num_per_page", "0");
        self.get_json(url, "appreviews").await
    }

    /// Fetches an app's `price_overview` in the given region's currency.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::fetch_app`].
    pub async fn fetch_app_price(
        &self,
        appid: &str,
        country_code: &str,
    ) -> Result<Value, ScraperError> {
        let url = self.app_details_url(appid, Some(country_code), Some("price_overview"))?;
        self.get_json(url, "appdetails price").await
    }

    /// Fetches a package's details in the given region's currency.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::fetch_app`].
    pub async fn fetch_package_price(
        &self,
        packageid: &str,
        country_code: &str,
    ) -> Result<Value, ScraperError> {
        let url = self.package_details_url(packageid, Some(country_code))?;
        self.get_json(url, "packagedetails price").await
    }

    /// Fetches the full public app list used for name lookups.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::fetch_app`].
    pub async fn fetch_app_list(&self) -> Result<AppListResponse, ScraperError> {
        let url = endpoint(&self.api_base, &["ISteamApps", "GetAppList", "v2", ""])?;
        self.get_json(url, "app list").await
    }

    fn app_details_url(
        &self,
        appid: &str,
        country_code: Option<&str>,
        filters: Option<&str>,
    ) -> Result<Url, ScraperError> {
        let mut url = endpoint(&self.store_base, &["api", "appdetails"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("appids", appid);
            if let Some(cc) = country_code {
                query.append_pair("cc", cc);
            }
            if let Some(filters) = filters {
                query.append_pair("filters", filters);
            }
        }
        Ok(url)
    }

    fn package_details_url(
        &self,
        packageid: &str,
        country_code: Option<&str>,
    ) -> Result<Url, ScraperError> {
        let mut url = endpoint(&self.store_base, &["api", "packagedetails"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("packageids", packageid);
            if let Some(cc) = country_code {
                query.append_pair("cc", cc);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let response = check_status(response, &url)?;
                let body = response.text().await?;
                serde_json::from_str::<T>(&body).map_err(|source| ScraperError::Deserialize {
                    context: format!("{context} from {url}"),
                    source,
                })
            }
        })
        .await
    }
}

#[async_trait]
impl ListingSource for StoreClient {
    async fn fetch_app(&self, appid: &str) -> Result<Value, ScraperError> {
        StoreClient::fetch_app(self, appid).await
    }

    async fn fetch_package(&self, packageid: &str) -> Result<Value, ScraperError> {
        StoreClient::fetch_package(self, packageid).await
    }

    async fn fetch_bundle_page(&self, bundleid: &str) -> Result<BundlePage, ScraperError> {
        StoreClient::fetch_bundle_page(self, bundleid).await
    }

    async fn fetch_review_summary(&self, appid: &str) -> Result<Value, ScraperError> {
        StoreClient::fetch_review_summary(self, appid).await
    }

    async fn fetch_app_price(&self, appid: &str, country_code: &str) -> Result<Value, ScraperError> {
        StoreClient::fetch_app_price(self, appid, country_code).await
    }

    async fn fetch_package_price(
        &self,
        packageid: &str,
        country_code: &str,
    ) -> Result<Value, ScraperError> {
        StoreClient::fetch_package_price(self, packageid, country_code).await
    }

    async fn fetch_app_list(&self) -> Result<AppListResponse, ScraperError> {
        StoreClient::fetch_app_list(self).await
    }
}

/// `base` with `segments` appended to its path.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ScraperError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ScraperError::InvalidBaseUrl {
            base_url: base.to_string(),
            reason: "URL cannot carry a path".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Maps non-2xx responses to typed errors.
fn check_status(response: Response, url: &Url) -> Result<Response, ScraperError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(ScraperError::RateLimited {
            domain: host_of(url),
            retry_after_secs,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ScraperError::NotFound {
            url: url.to_string(),
        });
    }

    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
