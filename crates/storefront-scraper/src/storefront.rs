//! Cached record façade.
//!
//! [`Storefront`] keeps the most recently requested listing. Every accessor
//! names its target; a different target discards the cached record and
//! fetches fresh, the same target reads the cached one. The cache lock is
//! held across the fetch, so concurrent callers serialize rather than race
//! to fill it.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use storefront_core::config::DEFAULT_COMMUNITY_LINK_PREFIX;
use storefront_core::{
    BundleCategory, BundleDetail, Category, ListingTarget, PackageItem, Platforms, PriceInfo,
    Rating, RequirementPlatform, RequirementSet, TextFormat,
};
use tokio::sync::Mutex;

use crate::error::ScraperError;
use crate::listing::{FormattedText, StoreListing, TitleField};
use crate::names::AppNameIndex;
use crate::normalize::{assemble_app, assemble_bundle, assemble_package, extract_price};
use crate::package::{PackageApp, PackageField, PackageListing};
use crate::rating::rate_summary;
use crate::source::ListingSource;

/// A record of any category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    App(StoreListing),
    Package(PackageListing),
    Bundle(BundleDetail),
}

impl Listing {
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Listing::App(_) => Category::App,
            Listing::Package(_) => Category::Package,
            Listing::Bundle(_) => Category::Bundle,
        }
    }
}

/// The cached target and what the store returned for it. `listing` is
/// `None` when the store has no record for the target.
#[derive(Debug, Clone)]
pub struct CachedListing {
    pub target: ListingTarget,
    pub listing: Option<Listing>,
}

/// Price as published: the store's own price object for titles and packages,
/// the reconstructed [`PriceInfo`] for bundles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Price {
    Store(Value),
    Bundle(PriceInfo),
}

/// User rating with the raw `query_summary` it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingReport {
    #[serde(flatten)]
    pub rating: Rating,
    pub summary: Value,
}

pub struct Storefront<S> {
    source: S,
    cache: Mutex<Option<CachedListing>>,
    names: Mutex<Option<Arc<AppNameIndex>>>,
    link_prefix: String,
}

impl<S: ListingSource> Storefront<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
            names: Mutex::new(None),
            link_prefix: DEFAULT_COMMUNITY_LINK_PREFIX.to_owned(),
        }
    }

    /// Sets the redirect wrapper stripped from review links.
    #[must_use]
    pub fn with_link_prefix(mut self, link_prefix: impl Into<String>) -> Self {
        self.link_prefix = link_prefix.into();
        self
    }

    /// Ensures the cache holds `target`, fetching it when it does not.
    /// Returns whether the store has a record for it.
    ///
    /// # Errors
    ///
    /// Transport failures other than not-found, malformed envelopes and
    /// [`ScraperError::IdentifierMismatch`]. The cache is left empty on error.
    pub async fn populate(&self, target: &ListingTarget) -> Result<bool, ScraperError> {
        let mut slot = self.cache.lock().await;
        self.fill(&mut slot, target).await?;
        Ok(slot.as_ref().is_some_and(|cached| cached.listing.is_some()))
    }

    /// The cached target and record, if any.
    pub async fn cached(&self) -> Option<CachedListing> {
        self.cache.lock().await.clone()
    }

    async fn fill(
        &self,
        slot: &mut Option<CachedListing>,
        target: &ListingTarget,
    ) -> Result<(), ScraperError> {
        if slot.as_ref().is_some_and(|cached| cached.target == *target) {
            tracing::trace!(category = %target.category, id = %target.id, "listing cache hit");
            return Ok(());
        }

        *slot = None;
        let listing = self.load(target).await?;
        tracing::debug!(
            category = %target.category,
            id = %target.id,
            found = listing.is_some(),
            "listing cached"
        );
        *slot = Some(CachedListing {
            target: target.clone(),
            listing,
        });
        Ok(())
    }

    async fn load(&self, target: &ListingTarget) -> Result<Option<Listing>, ScraperError> {
        let id = target.id.as_str();
        let loaded = match target.category {
            Category::App => self
                .source
                .fetch_app(id)
                .await
                .and_then(|body| assemble_app(body, id))
                .map(|app| app.map(Listing::App)),
            Category::Package => self
                .source
                .fetch_package(id)
                .await
                .and_then(|body| assemble_package(body, id))
                .map(|package| package.map(Listing::Package)),
            Category::Bundle => self
                .source
                .fetch_bundle_page(id)
                .await
                .and_then(|page| assemble_bundle(page, id))
                .map(|bundle| bundle.map(Listing::Bundle)),
        };
        not_found_is_none(loaded)
    }

    /// Runs `read` against the record for `target`, populating first.
    async fn with_listing<T>(
        &self,
        target: &ListingTarget,
        read: impl FnOnce(&Listing) -> Result<Option<T>, ScraperError>,
    ) -> Result<Option<T>, ScraperError> {
        let mut slot = self.cache.lock().await;
        self.fill(&mut slot, target).await?;
        match slot.as_ref().and_then(|cached| cached.listing.as_ref()) {
            Some(listing) => read(listing),
            None => Ok(None),
        }
    }

    /// The full record as returned by the store (or parsed from the page).
    ///
    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn raw(&self, target: &ListingTarget) -> Result<Option<Listing>, ScraperError> {
        self.with_listing(target, |listing| Ok(Some(listing.clone())))
            .await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn name(&self, target: &ListingTarget) -> Result<Option<String>, ScraperError> {
        self.with_listing(target, |listing| {
            Ok(match listing {
                Listing::App(app) => app.name().map(str::to_owned),
                Listing::Package(package) => package.name().map(str::to_owned),
                Listing::Bundle(bundle) => bundle.name.clone(),
            })
        })
        .await
    }

    /// Canonical store page for `target`. Needs no fetch.
    #[must_use]
    pub fn link(&self, target: &ListingTarget) -> String {
        target.store_url()
    }

    /// Price in the store's default currency.
    ///
    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn price(&self, target: &ListingTarget) -> Result<Option<Price>, ScraperError> {
        self.with_listing(target, |listing| {
            Ok(match listing {
                Listing::App(app) => app.get(TitleField::PriceOverview).cloned().map(Price::Store),
                Listing::Package(package) => {
                    package.get(PackageField::Price).cloned().map(Price::Store)
                }
                Listing::Bundle(bundle) => Some(Price::Bundle(bundle.price.clone())),
            })
        })
        .await
    }

    /// Price in the currency of `country_code`, fetched fresh and not cached.
    /// Bundles have no priced endpoint and yield `None`.
    ///
    /// # Errors
    ///
    /// Transport failures other than not-found, and malformed envelopes.
    pub async fn price_in_currency(
        &self,
        target: &ListingTarget,
        country_code: &str,
    ) -> Result<Option<Value>, ScraperError> {
        let id = target.id.as_str();
        let priced = match target.category {
            Category::App => self
                .source
                .fetch_app_price(id, country_code)
                .await
                .and_then(|body| extract_price(body, id, TitleField::PriceOverview.key())),
            Category::Package => self
                .source
                .fetch_package_price(id, country_code)
                .await
                .and_then(|body| extract_price(body, id, PackageField::Price.key())),
            Category::Bundle => Ok(None),
        };
        not_found_is_none(priced)
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn header_image(
        &self,
        target: &ListingTarget,
    ) -> Result<Option<String>, ScraperError> {
        self.with_listing(target, |listing| {
            Ok(match listing {
                Listing::App(app) => app.str(TitleField::HeaderImage).map(str::to_owned),
                Listing::Package(package) => {
                    package.str(PackageField::HeaderImage).map(str::to_owned)
                }
                Listing::Bundle(bundle) => bundle.header_image.clone(),
            })
        })
        .await
    }

    /// A title's `detailed_description` or a bundle's description.
    ///
    /// Bundle descriptions are extracted as plain text, so `raw` and `normal`
    /// render the same.
    ///
    /// # Errors
    ///
    /// [`ScraperError::UnsupportedFormat`] for `list`, and the errors of
    /// [`Storefront::populate`].
    pub async fn description(
        &self,
        target: &ListingTarget,
        format: TextFormat,
    ) -> Result<Option<FormattedText>, ScraperError> {
        self.with_listing(target, |listing| match listing {
            Listing::App(app) => app.text(TitleField::DetailedDescription, format),
            Listing::Package(_) => Ok(None),
            Listing::Bundle(bundle) => {
                if format == TextFormat::List {
                    return Err(ScraperError::UnsupportedFormat {
                        field: "description".to_owned(),
                        format: format.to_string(),
                    });
                }
                Ok(bundle.description.clone().map(FormattedText::Text))
            }
        })
        .await
    }

    /// A title's `short_description`, as sent.
    ///
    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn short_description(
        &self,
        target: &ListingTarget,
    ) -> Result<Option<String>, ScraperError> {
        self.with_title(target, |app| {
            Ok(app.str(TitleField::ShortDescription).map(str::to_owned))
        })
        .await
    }

    /// # Errors
    ///
    /// [`ScraperError::UnsupportedFormat`] for `list`, and the errors of
    /// [`Storefront::populate`].
    pub async fn about_the_game(
        &self,
        target: &ListingTarget,
        format: TextFormat,
    ) -> Result<Option<FormattedText>, ScraperError> {
        self.with_title(target, |app| app.text(TitleField::AboutTheGame, format))
            .await
    }

    /// Supported languages of a title, or the language list of a bundle.
    ///
    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn supported_languages(
        &self,
        target: &ListingTarget,
        format: TextFormat,
    ) -> Result<Option<FormattedText>, ScraperError> {
        self.with_listing(target, |listing| match listing {
            Listing::App(app) => app.text(TitleField::SupportedLanguages, format),
            Listing::Package(_) => Ok(None),
            Listing::Bundle(bundle) => Ok(bundle.languages.clone().map(|languages| {
                if format == TextFormat::List {
                    FormattedText::Items(languages)
                } else {
                    FormattedText::Text(languages.join(", "))
                }
            })),
        })
        .await
    }

    /// Press reviews of a title; `list` parses them into entries with the
    /// configured link prefix removed.
    ///
    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn reviews(
        &self,
        target: &ListingTarget,
        format: TextFormat,
    ) -> Result<Option<FormattedText>, ScraperError> {
        self.with_title(target, |app| {
            app.text_with_link_prefix(TitleField::Reviews, format, &self.link_prefix)
        })
        .await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn requirements(
        &self,
        target: &ListingTarget,
        platform: RequirementPlatform,
    ) -> Result<Option<RequirementSet>, ScraperError> {
        self.with_title(target, |app| Ok(app.requirements(platform)))
            .await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn developers(
        &self,
        target: &ListingTarget,
    ) -> Result<Option<Vec<String>>, ScraperError> {
        self.with_listing(target, |listing| {
            Ok(match listing {
                Listing::App(app) => app.string_list(TitleField::Developers),
                Listing::Package(_) => None,
                Listing::Bundle(bundle) => bundle.developers.clone(),
            })
        })
        .await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn publishers(
        &self,
        target: &ListingTarget,
    ) -> Result<Option<Vec<String>>, ScraperError> {
        self.with_listing(target, |listing| {
            Ok(match listing {
                Listing::App(app) => app.string_list(TitleField::Publishers),
                Listing::Package(_) => None,
                Listing::Bundle(bundle) => bundle.publishers.clone(),
            })
        })
        .await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn genres(&self, target: &ListingTarget) -> Result<Option<Vec<String>>, ScraperError> {
        self.with_listing(target, |listing| {
            Ok(match listing {
                Listing::App(app) => app.descriptions(TitleField::Genres),
                Listing::Package(_) => None,
                Listing::Bundle(bundle) => bundle.genres.clone(),
            })
        })
        .await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn categories(
        &self,
        target: &ListingTarget,
    ) -> Result<Option<Vec<BundleCategory>>, ScraperError> {
        self.with_listing(target, |listing| {
            Ok(match listing {
                Listing::App(app) => app.categories(),
                Listing::Package(_) => None,
                Listing::Bundle(bundle) => Some(bundle.categories.clone()),
            })
        })
        .await
    }

    /// Platform availability of a title or package.
    ///
    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn platforms(
        &self,
        target: &ListingTarget,
    ) -> Result<Option<Platforms>, ScraperError> {
        self.with_listing(target, |listing| {
            Ok(match listing {
                Listing::App(app) => app.get(TitleField::Platforms).and_then(platforms_of),
                Listing::Package(package) => {
                    package.get(PackageField::Platforms).and_then(platforms_of)
                }
                Listing::Bundle(_) => None,
            })
        })
        .await
    }

    /// The store's `release_date` object, as sent.
    ///
    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn release_date(&self, target: &ListingTarget) -> Result<Option<Value>, ScraperError> {
        self.with_listing(target, |listing| {
            Ok(match listing {
                Listing::App(app) => app.get(TitleField::ReleaseDate).cloned(),
                Listing::Package(package) => package.get(PackageField::ReleaseDate).cloned(),
                Listing::Bundle(_) => None,
            })
        })
        .await
    }

    /// Controller support as sent: the title's `controller_support` string or
    /// the package's `controller` object.
    ///
    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn controller_support(
        &self,
        target: &ListingTarget,
    ) -> Result<Option<Value>, ScraperError> {
        self.with_listing(target, |listing| {
            Ok(match listing {
                Listing::App(app) => app.get(TitleField::ControllerSupport).cloned(),
                Listing::Package(package) => package.get(PackageField::Controller).cloned(),
                Listing::Bundle(_) => None,
            })
        })
        .await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn franchise(
        &self,
        target: &ListingTarget,
    ) -> Result<Option<Vec<String>>, ScraperError> {
        self.with_bundle(target, |bundle| bundle.franchise.clone())
            .await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn drm(&self, target: &ListingTarget) -> Result<Option<String>, ScraperError> {
        self.with_bundle(target, |bundle| bundle.drm.clone()).await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn package_items(
        &self,
        target: &ListingTarget,
    ) -> Result<Option<Vec<PackageItem>>, ScraperError> {
        self.with_bundle(target, |bundle| Some(bundle.package_items.clone()))
            .await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn page_image(&self, target: &ListingTarget) -> Result<Option<String>, ScraperError> {
        self.with_package(target, |package| {
            package.str(PackageField::PageImage).map(str::to_owned)
        })
        .await
    }

    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn small_logo(&self, target: &ListingTarget) -> Result<Option<String>, ScraperError> {
        self.with_package(target, |package| {
            package.str(PackageField::SmallLogo).map(str::to_owned)
        })
        .await
    }

    /// Apps contained in a package.
    ///
    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn apps(
        &self,
        target: &ListingTarget,
    ) -> Result<Option<Vec<PackageApp>>, ScraperError> {
        self.with_package(target, PackageListing::apps).await
    }

    /// Any catalogued title field, as sent.
    ///
    /// # Errors
    ///
    /// Same as [`Storefront::populate`].
    pub async fn title_field(
        &self,
        target: &ListingTarget,
        field: TitleField,
    ) -> Result<Option<Value>, ScraperError> {
        self.with_title(target, |app| Ok(app.get(field).cloned()))
            .await
    }

    /// User rating of a title from its review summary. Fetched fresh; only
    /// titles have one.
    ///
    /// # Errors
    ///
    /// Transport failures other than not-found.
    pub async fn rating(&self, target: &ListingTarget) -> Result<Option<RatingReport>, ScraperError> {
        if target.category != Category::App {
            return Ok(None);
        }
        let summary = not_found_is_none(
            self.source
                .fetch_review_summary(&target.id)
                .await
                .map(Some),
        )?;
        Ok(summary.map(|response| {
            let (rating, summary) = rate_summary(&response);
            RatingReport { rating, summary }
        }))
    }

    /// Resolves a title name to its app target through the public app list.
    /// The list is fetched once and reused.
    ///
    /// # Errors
    ///
    /// [`ScraperError::NameNotFound`] when no app shares a word with `name`,
    /// and transport failures while fetching the list.
    pub async fn resolve_name(&self, name: &str) -> Result<ListingTarget, ScraperError> {
        let index = self.name_index().await?;
        let found = index.lookup(name).ok_or_else(|| ScraperError::NameNotFound {
            name: name.to_owned(),
        })?;
        tracing::info!(
            query = name,
            appid = found.appid,
            matched = %found.name,
            score = found.score,
            "resolved app name"
        );
        Ok(ListingTarget::app(found.appid))
    }

    async fn name_index(&self) -> Result<Arc<AppNameIndex>, ScraperError> {
        let mut slot = self.names.lock().await;
        if let Some(index) = slot.as_ref() {
            return Ok(Arc::clone(index));
        }
        let response = self.source.fetch_app_list().await?;
        let index = Arc::new(AppNameIndex::from_response(response));
        tracing::debug!(apps = index.len(), "app list indexed");
        *slot = Some(Arc::clone(&index));
        Ok(index)
    }

    async fn with_title<T>(
        &self,
        target: &ListingTarget,
        read: impl FnOnce(&StoreListing) -> Result<Option<T>, ScraperError>,
    ) -> Result<Option<T>, ScraperError> {
        self.with_listing(target, |listing| match listing {
            Listing::App(app) => read(app),
            _ => Ok(None),
        })
        .await
    }

    async fn with_package<T>(
        &self,
        target: &ListingTarget,
        read: impl FnOnce(&PackageListing) -> Option<T>,
    ) -> Result<Option<T>, ScraperError> {
        self.with_listing(target, |listing| match listing {
            Listing::Package(package) => Ok(read(package)),
            _ => Ok(None),
        })
        .await
    }

    async fn with_bundle<T>(
        &self,
        target: &ListingTarget,
        read: impl FnOnce(&BundleDetail) -> Option<T>,
    ) -> Result<Option<T>, ScraperError> {
        self.with_listing(target, |listing| match listing {
            Listing::Bundle(bundle) => Ok(read(bundle)),
            _ => Ok(None),
        })
        .await
    }
}

/// A not-found response means the store has no such record.
fn not_found_is_none<T>(result: Result<Option<T>, ScraperError>) -> Result<Option<T>, ScraperError> {
    match result {
        Err(ScraperError::NotFound { url }) => {
            tracing::debug!(%url, "no record at endpoint");
            Ok(None)
        }
        other => other,
    }
}

/// `{ windows, mac, linux }` booleans; a missing key means unavailable.
fn platforms_of(value: &Value) -> Option<Platforms> {
    let map = value.as_object()?;
    let flag = |key: &str| map.get(key).and_then(Value::as_bool).unwrap_or(false);
    Some(Platforms {
        windows: flag("windows"),
        mac: flag("mac"),
        linux: flag("linux"),
    })
}

#[cfg(test)]
#[path = "storefront_test.rs"]
mod tests;
