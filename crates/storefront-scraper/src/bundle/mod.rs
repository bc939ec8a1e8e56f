//! Bundle store page extraction.
//!
//! Bundles have no JSON endpoint, so their details come from the store page.
//! The page has two columns: the left one carries the header image, the
//! purchase block and the package tiles; the right one carries the labelled
//! details block and the feature categories. Each field is looked up on its
//! own and a missing marker only empties that field.

mod items;

use storefront_core::{BundleCategory, BundleDetail, PriceInfo};

use crate::markup::{
    clean_text, elements_with_class, first_integer, first_with_class, leading_digits, strip_tags,
};
use crate::pricing::{reconcile, NO_INITIAL_PRICE};
use crate::segment::{after, take_until};

const GENRE_LABELS: &[&str] = &["Genre:", "Genres:"];
const DEVELOPER_LABELS: &[&str] = &["Developer:", "Developers:"];
const PUBLISHER_LABELS: &[&str] = &["Publisher:", "Publishers:"];
const FRANCHISE_LABELS: &[&str] = &["Franchise:", "Franchises:"];
const LANGUAGE_LABELS: &[&str] = &["Languages:", "Language:"];
const DRM_LABELS: &[&str] = &["DRM:"];

/// Parses a full bundle page.
///
/// Locates the two columns and delegates to [`parse_bundle_fragments`]. The
/// page title and bundle id fall back to a whole-page lookup when the columns
/// do not carry them.
#[must_use]
pub fn parse_bundle_page(html: &str) -> BundleDetail {
    let left = first_with_class(html, "leftcol").map_or("", |col| col.inner());
    let right = first_with_class(html, "rightcol").map_or("", |col| col.inner());
    if left.is_empty() && right.is_empty() {
        tracing::debug!("bundle page has no store columns");
    }

    let mut detail = parse_bundle_fragments(left, right);
    if detail.name.is_none() {
        detail.name = page_title(html);
    }
    if detail.bundle_id.is_none() {
        detail.bundle_id = bundle_id(html);
    }
    detail
}

/// Parses the left and right column fragments of a bundle page.
#[must_use]
pub fn parse_bundle_fragments(left: &str, right: &str) -> BundleDetail {
    let details = first_with_class(right, "details_block").map_or(right, |block| block.inner());

    BundleDetail {
        name: page_title(left).or_else(|| page_title(right)),
        bundle_id: bundle_id(left),
        header_image: first_with_class(left, "package_header").and_then(|img| img.attr("src")),
        description: description(left),
        genres: labelled_list(details, GENRE_LABELS),
        developers: labelled_list(details, DEVELOPER_LABELS),
        publishers: labelled_list(details, PUBLISHER_LABELS),
        franchise: labelled_list(details, FRANCHISE_LABELS),
        languages: labelled_list(details, LANGUAGE_LABELS),
        drm: labelled_text(details, DRM_LABELS),
        categories: categories(right),
        price: price(left),
        package_items: items::parse_package_items(left),
    }
}

fn page_title(html: &str) -> Option<String> {
    first_with_class(html, "pageheader")
        .map(|header| header.text())
        .filter(|text| !text.is_empty())
}

fn bundle_id(html: &str) -> Option<String> {
    first_with_class(html, "game_area_purchase_game")
        .and_then(|block| block.attr("data-ds-bundleid"))
        .filter(|id| !id.is_empty())
}

/// First paragraph of the description block, or all of its text when it has
/// no paragraphs.
fn description(left: &str) -> Option<String> {
    let block = first_with_class(left, "bundle_description")?;
    block
        .first_tag("p")
        .map(|p| p.text())
        .filter(|text| !text.is_empty())
        .or_else(|| Some(block.text()).filter(|text| !text.is_empty()))
}

/// Markup following the first matching label, up to the next line break.
fn labelled_run<'a>(details: &'a str, labels: &[&str]) -> Option<&'a str> {
    labels
        .iter()
        .find_map(|label| after(details, label))
        .map(|tail| take_until(tail, "<br"))
}

fn labelled_text(details: &str, labels: &[&str]) -> Option<String> {
    labelled_run(details, labels).map(|run| clean_text(&strip_tags(run, &[])))
}

fn labelled_list(details: &str, labels: &[&str]) -> Option<Vec<String>> {
    let text = labelled_text(details, labels)?;
    Some(
        text.split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

/// Feature categories. The id is the numeric value of the search link's
/// first query parameter (`?category2=22&snr=...` → 22).
fn categories(right: &str) -> Vec<BundleCategory> {
    elements_with_class(right, "game_area_details_specs")
        .filter_map(|spec| {
            let href = spec.first_tag("a").and_then(|a| a.attr("href"));
            let id = href.as_deref().and_then(category_id);
            let label = spec.text();
            match id {
                Some(id) if !label.is_empty() => Some(BundleCategory { id, label }),
                _ => {
                    tracing::debug!(?href, label = %label, "skipping unparsable bundle category");
                    None
                }
            }
        })
        .collect()
}

fn category_id(href: &str) -> Option<u32> {
    let query = after(href, "?").unwrap_or(href);
    let value = after(query, "=")?;
    leading_digits(value).parse().ok()
}

fn price(left: &str) -> PriceInfo {
    let scope = first_with_class(left, "game_area_purchase_game").map_or(left, |block| block.inner());
    let block = first_with_class(scope, "discount_block");

    let final_minor_units = block
        .and_then(|b| b.attr("data-price-final"))
        .and_then(|raw| parse_minor_units(&raw, "data-price-final"))
        .filter(|units| *units >= 0);
    let mut discount_percent = block
        .and_then(|b| b.attr("data-discount"))
        .and_then(|raw| parse_minor_units(&raw, "data-discount"))
        .or_else(|| {
            first_with_class(scope, "bundle_base_discount").and_then(|el| first_integer(&el.text()))
        });

    // A discount the price cannot be rebuilt from is malformed, so it is
    // dropped rather than reported next to a zero initial price.
    let initial_minor_units = match reconcile(final_minor_units, discount_percent) {
        Ok(initial) => initial,
        Err(e) => {
            tracing::warn!(error = %e, "could not reconstruct bundle price; dropping discount");
            discount_percent = None;
            NO_INITIAL_PRICE
        }
    };

    PriceInfo {
        final_minor_units,
        discount_percent,
        initial_minor_units,
        initial_formatted: class_text(scope, "bundle_final_package_price"),
        final_formatted: class_text(scope, "discount_final_price"),
    }
}

/// Integer attribute value; malformed numbers are logged and treated as absent.
fn parse_minor_units(raw: &str, attribute: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(attribute, raw, error = %e, "non-numeric price attribute");
            None
        }
    }
}

fn class_text(html: &str, class: &str) -> Option<String> {
    first_with_class(html, class)
        .map(|el| el.text())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
#[path = "bundle_test.rs"]
mod tests;
