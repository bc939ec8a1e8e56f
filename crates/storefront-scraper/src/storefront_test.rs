use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use super::*;
use crate::types::{AppList, AppListEntry, AppListResponse, BundlePage};

const APPDETAILS: &str = include_str!("../tests/fixtures/appdetails_203160.json");
const BUNDLE_PAGE: &str = include_str!("../tests/fixtures/bundle_2823.html");

/// In-memory store. Unknown ids answer not-found, like the HTTP client.
/// Detail fetches yield once so concurrent callers interleave.
#[derive(Default)]
struct FakeSource {
    apps: HashMap<String, Value>,
    packages: HashMap<String, Value>,
    bundles: HashMap<String, BundlePage>,
    summaries: HashMap<String, Value>,
    prices: HashMap<(String, String), Value>,
    app_list: Vec<AppListEntry>,
    fetches: AtomicUsize,
    list_fetches: AtomicUsize,
}

impl FakeSource {
    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn not_found(path: &str) -> ScraperError {
    ScraperError::NotFound {
        url: format!("fake://{path}"),
    }
}

#[async_trait]
impl ListingSource for FakeSource {
    async fn fetch_app(&self, appid: &str) -> Result<Value, ScraperError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.apps.get(appid).cloned().ok_or_else(|| not_found("app"))
    }

    async fn fetch_package(&self, packageid: &str) -> Result<Value, ScraperError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.packages
            .get(packageid)
            .cloned()
            .ok_or_else(|| not_found("package"))
    }

    async fn fetch_bundle_page(&self, bundleid: &str) -> Result<BundlePage, ScraperError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.bundles
            .get(bundleid)
            .cloned()
            .ok_or_else(|| not_found("bundle"))
    }

    async fn fetch_review_summary(&self, appid: &str) -> Result<Value, ScraperError> {
        self.summaries
            .get(appid)
            .cloned()
            .ok_or_else(|| not_found("appreviews"))
    }

    async fn fetch_app_price(&self, appid: &str, country_code: &str) -> Result<Value, ScraperError> {
        self.prices
            .get(&(appid.to_owned(), country_code.to_owned()))
            .cloned()
            .ok_or_else(|| not_found("price"))
    }

    async fn fetch_package_price(
        &self,
        packageid: &str,
        country_code: &str,
    ) -> Result<Value, ScraperError> {
        self.fetch_app_price(packageid, country_code).await
    }

    async fn fetch_app_list(&self) -> Result<AppListResponse, ScraperError> {
        self.list_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(AppListResponse {
            applist: AppList {
                apps: self.app_list.clone(),
            },
        })
    }
}

fn tomb_raider() -> FakeSource {
    let mut source = FakeSource::default();
    source
        .apps
        .insert("203160".to_owned(), serde_json::from_str(APPDETAILS).unwrap());
    source.apps.insert(
        "400".to_owned(),
        json!({ "400": { "success": true, "data": {
            "name": "Portal",
            "steam_appid": 400,
            "controller_support": "full"
        } } }),
    );
    source.packages.insert(
        "54029".to_owned(),
        json!({
            "54029": {
                "success": true,
                "data": {
                    "name": "Rise of the Tomb Raider: 20 Year Celebration",
                    "page_image": "https://cdn.example/sub/54029/page.jpg",
                    "small_logo": "https://cdn.example/sub/54029/logo.jpg",
                    "apps": [
                        { "id": 391220, "name": "Rise of the Tomb Raider" },
                        { "name": "nameless" }
                    ],
                    "price": { "currency": "USD", "final": 2999 },
                    "platforms": { "windows": true, "mac": false },
                    "controller": { "full_gamepad": true },
                    "release_date": { "coming_soon": false, "date": "28 Jan, 2016" }
                }
            }
        }),
    );
    source
        .bundles
        .insert("2823".to_owned(), BundlePage::Page(BUNDLE_PAGE.to_owned()));
    source.bundles.insert(
        "9999".to_owned(),
        BundlePage::Redirected {
            location: Some("https://store.steampowered.com/".to_owned()),
        },
    );
    source.summaries.insert(
        "203160".to_owned(),
        json!({
            "success": 1,
            "query_summary": { "total_positive": 95, "total_reviews": 100 }
        }),
    );
    source.prices.insert(
        ("203160".to_owned(), "in".to_owned()),
        json!({
            "203160": {
                "success": true,
                "data": { "price_overview": { "currency": "INR", "final": 49900 } }
            }
        }),
    );
    source.app_list = vec![
        AppListEntry {
            appid: 203_160,
            name: "Tomb Raider".to_owned(),
        },
        AppListEntry {
            appid: 391_220,
            name: "Rise of the Tomb Raider".to_owned(),
        },
    ];
    source
}

fn app(id: u64) -> ListingTarget {
    ListingTarget::app(id)
}

fn target(category: Category, id: &str) -> ListingTarget {
    ListingTarget::parse_id(category, id).unwrap()
}

// -----------------------------------------------------------------------
// Cache behaviour
// -----------------------------------------------------------------------

#[tokio::test]
async fn same_target_reuses_the_cached_record() {
    let store = Storefront::new(tomb_raider());
    let target = app(203_160);

    assert_eq!(store.name(&target).await.unwrap().as_deref(), Some("Tomb Raider"));
    assert!(store.header_image(&target).await.unwrap().is_some());
    assert!(store.populate(&target).await.unwrap());

    assert_eq!(store.source.fetches(), 1);
}

#[tokio::test]
async fn different_target_replaces_the_cached_record() {
    let store = Storefront::new(tomb_raider());

    store.name(&app(203_160)).await.unwrap();
    assert_eq!(store.name(&app(400)).await.unwrap().as_deref(), Some("Portal"));
    store.name(&app(203_160)).await.unwrap();

    assert_eq!(store.source.fetches(), 3);
    let cached = store.cached().await.unwrap();
    assert_eq!(cached.target, app(203_160));
    assert_eq!(cached.listing.map(|l| l.category()), Some(Category::App));
}

#[tokio::test]
async fn category_is_part_of_the_cache_key() {
    let store = Storefront::new(tomb_raider());

    store.populate(&app(400)).await.unwrap();
    let found = store.populate(&target(Category::Package, "400")).await.unwrap();

    assert!(!found);
    assert_eq!(store.source.fetches(), 2);
}

#[tokio::test]
async fn unknown_id_is_cached_as_no_record() {
    let store = Storefront::new(tomb_raider());
    let missing = app(1);

    assert!(!store.populate(&missing).await.unwrap());
    assert!(store.name(&missing).await.unwrap().is_none());
    assert!(store.raw(&missing).await.unwrap().is_none());
    assert_eq!(store.source.fetches(), 1);
}

#[tokio::test]
async fn concurrent_populates_of_one_target_fetch_once() {
    let store = Storefront::new(tomb_raider());
    let target = app(203_160);

    let (first, second, name) = tokio::join!(
        store.populate(&target),
        store.populate(&target),
        store.name(&target)
    );

    assert!(first.unwrap());
    assert!(second.unwrap());
    assert_eq!(name.unwrap().as_deref(), Some("Tomb Raider"));
    assert_eq!(store.source.fetches(), 1);
}

#[tokio::test]
async fn concurrent_populates_of_different_targets_serialize() {
    let store = Storefront::new(tomb_raider());
    let package = target(Category::Package, "54029");
    let tomb = app(203_160);
    let portal_app = app(400);

    let (title, pkg, portal) = tokio::join!(
        store.name(&tomb),
        store.small_logo(&package),
        store.name(&portal_app)
    );

    assert_eq!(title.unwrap().as_deref(), Some("Tomb Raider"));
    assert!(pkg.unwrap().is_some());
    assert_eq!(portal.unwrap().as_deref(), Some("Portal"));
    assert_eq!(store.source.fetches(), 3);
    // The lock is granted in arrival order, so the last caller's target stays.
    assert_eq!(store.cached().await.unwrap().target, app(400));
}

#[tokio::test]
async fn mismatched_record_is_an_error_and_not_cached() {
    let mut source = tomb_raider();
    source.apps.insert(
        "500".to_owned(),
        json!({ "500": { "success": true, "data": { "steam_appid": 501 } } }),
    );
    let store = Storefront::new(source);

    let err = store.populate(&app(500)).await.unwrap_err();
    assert!(matches!(
        err,
        ScraperError::IdentifierMismatch { ref requested, ref received }
            if requested == "500" && received == "501"
    ));
    assert!(store.cached().await.is_none());
}

// -----------------------------------------------------------------------
// Title accessors
// -----------------------------------------------------------------------

#[tokio::test]
async fn title_text_accessors() {
    let store = Storefront::new(tomb_raider());
    let target = app(203_160);

    assert_eq!(
        store.short_description(&target).await.unwrap().as_deref(),
        Some("Tomb Raider explores the intense and gritty origin story of Lara Croft.")
    );

    let Some(FormattedText::Items(languages)) = store
        .supported_languages(&target, TextFormat::List)
        .await
        .unwrap()
    else {
        panic!("expected a language list");
    };
    assert_eq!(languages.len(), 5);
    assert_eq!(languages[4], "Spanish - Spain");

    let Some(FormattedText::Text(description)) = store
        .description(&target, TextFormat::Normal)
        .await
        .unwrap()
    else {
        panic!("expected normalized text");
    };
    assert!(!description.contains('<'));

    let err = store
        .about_the_game(&target, TextFormat::List)
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::UnsupportedFormat { .. }));
}

#[tokio::test]
async fn reviews_strip_the_configured_link_prefix() {
    let store = Storefront::new(tomb_raider());
    let Some(FormattedText::Reviews(reviews)) =
        store.reviews(&app(203_160), TextFormat::List).await.unwrap()
    else {
        panic!("expected parsed reviews");
    };
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].reviewer, "GameSpot");
    assert_eq!(
        reviews[0].link,
        "https://www.gamespot.com/reviews/tomb-raider-review/"
    );

    let store = Storefront::new(tomb_raider()).with_link_prefix("https://elsewhere/?u=");
    let Some(FormattedText::Reviews(reviews)) =
        store.reviews(&app(203_160), TextFormat::List).await.unwrap()
    else {
        panic!("expected parsed reviews");
    };
    assert!(reviews[1].link.starts_with("https://steamcommunity.com/linkfilter/"));
}

#[tokio::test]
async fn title_list_and_mapping_accessors() {
    let store = Storefront::new(tomb_raider());
    let target = app(203_160);

    assert_eq!(
        store.developers(&target).await.unwrap().map(|d| d.len()),
        Some(3)
    );
    assert_eq!(
        store.publishers(&target).await.unwrap().unwrap()[0],
        "Square Enix"
    );
    assert_eq!(
        store.genres(&target).await.unwrap(),
        Some(vec!["Action".to_owned(), "Adventure".to_owned()])
    );
    assert_eq!(store.categories(&target).await.unwrap().unwrap()[1].id, 22);
    assert_eq!(
        store.platforms(&target).await.unwrap(),
        Some(Platforms {
            windows: true,
            mac: true,
            linux: true
        })
    );
    assert_eq!(
        store.release_date(&target).await.unwrap().unwrap()["date"],
        "4 Mar, 2013"
    );
    assert_eq!(
        store
            .requirements(&target, RequirementPlatform::Linux)
            .await
            .unwrap(),
        Some(RequirementSet::default())
    );
    assert_eq!(
        store
            .title_field(&target, TitleField::SteamAppid)
            .await
            .unwrap(),
        Some(json!(203_160))
    );
    // Bundle-only fields do not apply to titles.
    assert!(store.drm(&target).await.unwrap().is_none());
    assert!(store.package_items(&target).await.unwrap().is_none());
    assert_eq!(store.source.fetches(), 1);
}

#[tokio::test]
async fn title_price_is_the_store_object() {
    let store = Storefront::new(tomb_raider());
    let Some(Price::Store(price)) = store.price(&app(203_160)).await.unwrap() else {
        panic!("expected a store price");
    };
    assert_eq!(price["final_formatted"], "$19.99");
}

#[tokio::test]
async fn controller_support_reads_the_title_field() {
    let store = Storefront::new(tomb_raider());

    assert_eq!(
        store.controller_support(&app(400)).await.unwrap(),
        Some(json!("full"))
    );
    assert!(store
        .controller_support(&app(203_160))
        .await
        .unwrap()
        .is_none());
    assert!(store
        .controller_support(&target(Category::Bundle, "2823"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn regional_price_is_fetched_per_call() {
    let store = Storefront::new(tomb_raider());

    let price = store.price_in_currency(&app(203_160), "in").await.unwrap();
    assert_eq!(price, Some(json!({ "currency": "INR", "final": 49900 })));

    assert!(store
        .price_in_currency(&app(203_160), "br")
        .await
        .unwrap()
        .is_none());
    assert!(store
        .price_in_currency(&target(Category::Bundle, "2823"), "in")
        .await
        .unwrap()
        .is_none());
    assert_eq!(store.source.fetches(), 0);
}

#[tokio::test]
async fn rating_comes_from_the_review_summary() {
    let store = Storefront::new(tomb_raider());

    let report = store.rating(&app(203_160)).await.unwrap().unwrap();
    assert!((report.rating.score_percent - 95.0).abs() < 1e-9);
    assert!(report.rating.rating_percent < report.rating.score_percent);
    assert_eq!(report.summary["total_reviews"], 100);

    assert!(store.rating(&app(1)).await.unwrap().is_none());
    assert!(store
        .rating(&target(Category::Bundle, "2823"))
        .await
        .unwrap()
        .is_none());
}

// -----------------------------------------------------------------------
// Package and bundle accessors
// -----------------------------------------------------------------------

#[tokio::test]
async fn package_accessors() {
    let store = Storefront::new(tomb_raider());
    let package = target(Category::Package, "54029");

    assert_eq!(
        store.small_logo(&package).await.unwrap().as_deref(),
        Some("https://cdn.example/sub/54029/logo.jpg")
    );
    assert!(store.page_image(&package).await.unwrap().is_some());
    assert!(store.header_image(&package).await.unwrap().is_none());
    assert_eq!(
        store.apps(&package).await.unwrap(),
        Some(vec![PackageApp {
            id: 391_220,
            name: "Rise of the Tomb Raider".to_owned()
        }])
    );
    assert_eq!(
        store.platforms(&package).await.unwrap(),
        Some(Platforms {
            windows: true,
            mac: false,
            linux: false
        })
    );
    assert_eq!(
        store.controller_support(&package).await.unwrap(),
        Some(json!({ "full_gamepad": true }))
    );
    assert!(store.reviews(&package, TextFormat::Raw).await.unwrap().is_none());
    assert_eq!(store.source.fetches(), 1);
}

#[tokio::test]
async fn bundle_accessors() {
    let store = Storefront::new(tomb_raider());
    let bundle = target(Category::Bundle, "2823");

    assert_eq!(
        store.name(&bundle).await.unwrap().as_deref(),
        Some("Tomb Raider Collection")
    );
    assert_eq!(
        store.franchise(&bundle).await.unwrap(),
        Some(vec!["Tomb Raider".to_owned()])
    );
    assert!(store.drm(&bundle).await.unwrap().unwrap().contains("Denuvo"));
    assert_eq!(store.package_items(&bundle).await.unwrap().unwrap().len(), 3);
    assert_eq!(store.categories(&bundle).await.unwrap().unwrap().len(), 3);

    let Some(Price::Bundle(price)) = store.price(&bundle).await.unwrap() else {
        panic!("expected a bundle price");
    };
    assert_eq!(price.initial_minor_units, 20_000);

    let Some(FormattedText::Text(languages)) = store
        .supported_languages(&bundle, TextFormat::Normal)
        .await
        .unwrap()
    else {
        panic!("expected joined languages");
    };
    assert!(languages.ends_with("Spanish - Spain"));

    let err = store
        .description(&bundle, TextFormat::List)
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::UnsupportedFormat { .. }));
    assert_eq!(store.source.fetches(), 1);
}

#[tokio::test]
async fn redirected_bundle_is_no_record() {
    let store = Storefront::new(tomb_raider());
    let bundle = target(Category::Bundle, "9999");

    assert!(!store.populate(&bundle).await.unwrap());
    assert!(store.name(&bundle).await.unwrap().is_none());
}

#[test]
fn link_needs_no_fetch() {
    let store = Storefront::new(FakeSource::default());
    assert_eq!(
        store.link(&target(Category::Package, "54029")),
        "https://store.steampowered.com/sub/54029"
    );
    assert_eq!(store.source.fetches(), 0);
}

// -----------------------------------------------------------------------
// Name resolution
// -----------------------------------------------------------------------

#[tokio::test]
async fn resolves_names_with_one_list_fetch() {
    let store = Storefront::new(tomb_raider());

    assert_eq!(store.resolve_name("tomb raider").await.unwrap(), app(203_160));
    assert_eq!(
        store.resolve_name("Rise of the Tomb Raider").await.unwrap(),
        app(391_220)
    );
    let err = store.resolve_name("Half-Life").await.unwrap_err();
    assert!(matches!(err, ScraperError::NameNotFound { ref name } if name == "Half-Life"));

    assert_eq!(store.source.list_fetches.load(Ordering::SeqCst), 1);
}
