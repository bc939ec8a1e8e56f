//! Package tiles listed on a bundle page.

use storefront_core::{ItemPrice, PackageItem, Platforms};

use crate::markup::{elements_with_class, Element};

use super::{class_text, parse_minor_units};

pub(super) fn parse_package_items(left: &str) -> Vec<PackageItem> {
    elements_with_class(left, "tab_item")
        .map(|tile| parse_tile(&tile))
        .collect()
}

/// A tile carrying `data-ds-packageid` is a package and lists its apps
/// comma-separated in `data-ds-appid`; otherwise it is a single app.
fn parse_tile(tile: &Element<'_>) -> PackageItem {
    let package_id = tile
        .attr("data-ds-packageid")
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty());
    let app_ids = tile
        .attr("data-ds-appid")
        .map(|raw| app_ids(&raw))
        .unwrap_or_default();

    let block = tile.first_with_class("discount_block");
    let price = ItemPrice {
        final_minor_units: block
            .and_then(|b| b.attr("data-price-final"))
            .and_then(|raw| parse_minor_units(&raw, "data-price-final")),
        final_formatted: class_text(tile.inner(), "discount_final_price"),
    };

    let categories = tile.first_with_class("tab_item_details").map(|details| {
        details
            .text()
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned)
            .collect()
    });

    PackageItem {
        name: class_text(tile.inner(), "tab_item_name"),
        package_id,
        app_ids,
        link: tile
            .first_with_class("tab_item_overlay")
            .and_then(|a| a.attr("href"))
            .or_else(|| tile.attr("href"))
            .filter(|href| !href.is_empty()),
        image: tile
            .first_with_class("tab_item_cap_img")
            .and_then(|img| img.attr("src")),
        price,
        platforms: Platforms {
            windows: tile.contains_class("win"),
            mac: tile.contains_class("mac"),
            linux: tile.contains_class("linux"),
        },
        categories,
    }
}

fn app_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter_map(|id| match id.parse::<u64>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::debug!(id, error = %e, "skipping non-numeric tile app id");
                None
            }
        })
        .collect()
}
