//! Command handlers: resolve the listing, read one accessor, shape the output
//! as JSON.
//!
//! A listing the store has no record for prints `null` rather than failing,
//! matching how the accessors report "not present".

use serde_json::{json, Value};
use storefront_core::{Category, ListingTarget};
use storefront_scraper::{ListingSource, Storefront};

use crate::{Commands, TargetArgs};

/// Turns the target flags into a listing target. `--name` always resolves to
/// an app.
pub(super) async fn resolve_target<S: ListingSource>(
    store: &Storefront<S>,
    args: &TargetArgs,
    category: Category,
) -> anyhow::Result<ListingTarget> {
    if let Some(id) = args.appid.as_deref() {
        return Ok(ListingTarget::parse_id(category, id)?);
    }
    if let Some(url) = args.url.as_deref() {
        return Ok(ListingTarget::from_store_url(url)?);
    }
    if let Some(name) = args.name.as_deref() {
        return Ok(store.resolve_name(name).await?);
    }
    anyhow::bail!("one of --appid, --url or --name is required")
}

/// Runs `command` against `target` and returns the value to print.
pub(super) async fn run<S: ListingSource>(
    store: &Storefront<S>,
    target: &ListingTarget,
    command: &Commands,
) -> anyhow::Result<Value> {
    let output = match command {
        Commands::Raw => serde_json::to_value(store.raw(target).await?)?,
        Commands::Name => serde_json::to_value(store.name(target).await?)?,
        Commands::Link => Value::String(store.link(target)),
        Commands::Price { currency: None } => serde_json::to_value(store.price(target).await?)?,
        Commands::Price {
            currency: Some(country_code),
        } => serde_json::to_value(store.price_in_currency(target, country_code).await?)?,
        Commands::Description { short: true, .. } => {
            serde_json::to_value(store.short_description(target).await?)?
        }
        Commands::Description { format, .. } => {
            serde_json::to_value(store.description(target, *format).await?)?
        }
        Commands::Languages { format } => {
            serde_json::to_value(store.supported_languages(target, *format).await?)?
        }
        Commands::Reviews { format } => {
            serde_json::to_value(store.reviews(target, *format).await?)?
        }
        Commands::Requirements { platform } => {
            serde_json::to_value(store.requirements(target, *platform).await?)?
        }
        Commands::Rating => serde_json::to_value(store.rating(target).await?)?,
        Commands::BundleItems => bundle_items(store, target).await?,
    };
    Ok(output)
}

async fn bundle_items<S: ListingSource>(
    store: &Storefront<S>,
    target: &ListingTarget,
) -> anyhow::Result<Value> {
    if target.category != Category::Bundle {
        tracing::warn!(category = %target.category, "bundle-items only applies to bundles");
        return Ok(Value::Null);
    }
    let Some(items) = store.package_items(target).await? else {
        return Ok(Value::Null);
    };
    let name = store.name(target).await?;
    Ok(json!({
        "name": name,
        "count": items.len(),
        "items": items,
    }))
}
