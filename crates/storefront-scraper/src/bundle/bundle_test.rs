use storefront_core::Platforms;

use super::*;

const PAGE: &str = include_str!("../../tests/fixtures/bundle_2823.html");

fn columns(page: &str) -> (&str, &str) {
    let left = first_with_class(page, "leftcol").unwrap().inner();
    let right = first_with_class(page, "rightcol").unwrap().inner();
    (left, right)
}

#[test]
fn parses_page_scalars() {
    let detail = parse_bundle_page(PAGE);
    assert_eq!(detail.name.as_deref(), Some("Tomb Raider Collection"));
    assert_eq!(detail.bundle_id.as_deref(), Some("2823"));
    assert_eq!(
        detail.header_image.as_deref(),
        Some("https://cdn.cloudflare.steamstatic.com/steam/bundles/2823/header.jpg")
    );
    assert_eq!(
        detail.description.as_deref(),
        Some("All the Tomb Raider games in one place & at one price.")
    );
}

#[test]
fn parses_labelled_lists() {
    let detail = parse_bundle_page(PAGE);
    assert_eq!(detail.genres, Some(vec!["Action".to_owned(), "Adventure".to_owned()]));
    assert_eq!(
        detail.developers,
        Some(vec!["Crystal Dynamics".to_owned(), "Eidos-Montréal".to_owned()])
    );
    assert_eq!(detail.publishers, Some(vec!["Square Enix".to_owned()]));
    assert_eq!(detail.franchise, Some(vec!["Tomb Raider".to_owned()]));
    assert_eq!(detail.languages.as_ref().map(Vec::len), Some(5));
    assert_eq!(
        detail.languages.as_ref().and_then(|l| l.last()).map(String::as_str),
        Some("Spanish - Spain")
    );
}

#[test]
fn drm_notice_is_kept_whole() {
    let detail = parse_bundle_page(PAGE);
    assert_eq!(
        detail.drm.as_deref(),
        Some("3rd-party DRM: Denuvo Anti-tamper, Square Enix account")
    );
}

#[test]
fn parses_categories_with_ids() {
    let detail = parse_bundle_page(PAGE);
    let got: Vec<_> = detail
        .categories
        .iter()
        .map(|c| (c.id, c.label.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            (2, "Single-player"),
            (22, "Steam Achievements"),
            (28, "Full controller support"),
        ]
    );
}

#[test]
fn parses_and_reconciles_price() {
    let price = parse_bundle_page(PAGE).price;
    assert_eq!(price.final_minor_units, Some(5000));
    assert_eq!(price.discount_percent, Some(75));
    assert_eq!(price.initial_minor_units, 20000);
    assert_eq!(price.initial_formatted.as_deref(), Some("$199.99"));
    assert_eq!(price.final_formatted.as_deref(), Some("$50.00"));
    assert!(price.is_discounted());
}

#[test]
fn parses_package_tiles() {
    let items = parse_bundle_page(PAGE).package_items;
    assert_eq!(items.len(), 3);

    let app = &items[0];
    assert_eq!(app.name.as_deref(), Some("Tomb Raider"));
    assert!(!app.is_package());
    assert_eq!(app.app_ids, vec![203_160]);
    assert_eq!(
        app.link.as_deref(),
        Some("https://store.steampowered.com/app/203160/Tomb_Raider/")
    );
    assert_eq!(app.price.final_minor_units, Some(1999));
    assert_eq!(app.price.final_formatted.as_deref(), Some("$19.99"));
    assert!(app.platforms.windows && app.platforms.mac && app.platforms.linux);
    assert_eq!(
        app.categories,
        Some(vec!["Action".to_owned(), "Adventure".to_owned()])
    );

    let package = &items[1];
    assert!(package.is_package());
    assert_eq!(package.package_id.as_deref(), Some("54029"));
    assert_eq!(package.app_ids, vec![391_220, 750_920]);
    assert_eq!(package.price.final_minor_units, None);
    assert!(package.platforms.windows);
    assert!(!package.platforms.mac);
    assert!(!package.platforms.linux);
    assert_eq!(package.categories.as_ref().map(Vec::len), Some(3));
}

#[test]
fn malformed_tile_keeps_what_it_can() {
    let items = parse_bundle_page(PAGE).package_items;
    let broken = &items[2];
    assert_eq!(broken.name.as_deref(), Some("Broken Tile"));
    assert!(broken.app_ids.is_empty());
    assert!(broken.link.is_none());
    assert!(broken.image.is_none());
    assert_eq!(broken.platforms, Platforms::default());
    assert!(broken.categories.is_none());
}

#[test]
fn missing_genre_label_leaves_siblings_intact() {
    let (left, right) = columns(PAGE);
    let right = right.replace("<b>Genre:</b>", "<b>Theme:</b>");
    let detail = parse_bundle_fragments(left, &right);

    assert!(detail.genres.is_none());
    assert_eq!(detail.developers.as_ref().map(Vec::len), Some(2));
    assert_eq!(detail.publishers, Some(vec!["Square Enix".to_owned()]));
    assert!(detail.drm.is_some());
    assert_eq!(detail.categories.len(), 3);
    assert_eq!(detail.price.initial_minor_units, 20000);
    assert_eq!(detail.package_items.len(), 3);
}

#[test]
fn fragments_without_page_header_have_no_name() {
    let (left, right) = columns(PAGE);
    let detail = parse_bundle_fragments(left, right);
    assert!(detail.name.is_none());
    assert_eq!(detail.bundle_id.as_deref(), Some("2823"));
}

#[test]
fn empty_page_yields_empty_detail() {
    let detail = parse_bundle_page("");
    assert_eq!(detail, BundleDetail::default());
}

/// A discounted price never reports an initial price below the final one.
fn assert_consistent(price: &PriceInfo) {
    if let (true, Some(final_units)) = (price.is_discounted(), price.final_minor_units) {
        assert!(
            price.initial_minor_units >= final_units,
            "initial {} below final {final_units}",
            price.initial_minor_units
        );
    }
}

#[test]
fn full_discount_is_dropped_as_malformed() {
    let left = r#"<div class="game_area_purchase_game" data-ds-bundleid="1">
        <div class="discount_block" data-price-final="1999" data-discount="100"></div>
    </div>"#;
    let price = parse_bundle_fragments(left, "").price;
    assert_eq!(price.final_minor_units, Some(1999));
    assert_eq!(price.discount_percent, None);
    assert_eq!(price.initial_minor_units, NO_INITIAL_PRICE);
    assert_consistent(&price);
}

#[test]
fn out_of_range_badge_is_dropped_as_malformed() {
    let left = r#"<div class="discount_block" data-price-final="900">
        <div class="bundle_base_discount">-150%</div>
    </div>"#;
    let price = parse_bundle_fragments(left, "").price;
    assert_eq!(price.final_minor_units, Some(900));
    assert_eq!(price.discount_percent, None);
    assert!(!price.is_discounted());
    assert_consistent(&price);
}

#[test]
fn negative_discount_attribute_is_dropped() {
    let left = r#"<div class="discount_block" data-price-final="900" data-discount="-150"></div>"#;
    let price = parse_bundle_fragments(left, "").price;
    assert_eq!(price.discount_percent, None);
    assert_consistent(&price);
}

#[test]
fn negative_final_price_is_absent() {
    let left = r#"<div class="discount_block" data-price-final="-100" data-discount="50"></div>"#;
    let price = parse_bundle_fragments(left, "").price;
    assert_eq!(price.final_minor_units, None);
    assert_eq!(price.discount_percent, Some(50));
    assert_eq!(price.initial_minor_units, NO_INITIAL_PRICE);
    assert_consistent(&price);
}

#[test]
fn discount_falls_back_to_badge_text() {
    let left = r#"<div class="discount_block" data-price-final="900">
        <div class="bundle_base_discount">-10%</div>
    </div>"#;
    let price = parse_bundle_fragments(left, "").price;
    assert_eq!(price.discount_percent, Some(10));
    assert_eq!(price.initial_minor_units, 1000);
}

#[test]
fn non_numeric_price_is_absent() {
    let left = r#"<div class="discount_block" data-price-final="free" data-discount="25"></div>"#;
    let price = parse_bundle_fragments(left, "").price;
    assert_eq!(price.final_minor_units, None);
    assert_eq!(price.initial_minor_units, NO_INITIAL_PRICE);
}

#[test]
fn category_id_reads_first_query_value() {
    assert_eq!(
        category_id("https://store.steampowered.com/search/?category2=22&snr=1_614_615_"),
        Some(22)
    );
    assert_eq!(category_id("https://store.steampowered.com/search/"), None);
    assert_eq!(category_id("/search/?category2=abc"), None);
}
