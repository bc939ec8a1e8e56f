mod query;

use clap::{Args, Parser, Subcommand};
use storefront_core::{Category, RequirementPlatform, TextFormat};
use storefront_scraper::{StoreClient, Storefront};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Extract normalized catalog records from the storefront")]
struct Cli {
    #[command(flatten)]
    target: TargetArgs,

    /// Listing category for `--appid`: app, sub (package) or bundle
    #[arg(long, default_value = "app")]
    category: Category,

    #[command(subcommand)]
    command: Commands,
}

/// Exactly one way of naming the listing.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct TargetArgs {
    /// Numeric listing id
    #[arg(long)]
    appid: Option<String>,

    /// Store page URL, e.g. https://store.steampowered.com/app/203160/
    #[arg(long)]
    url: Option<String>,

    /// Title name, resolved through the public app list
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the full record
    Raw,
    /// Print the listing name
    Name,
    /// Print the canonical store link
    Link,
    /// Print the price, optionally in another region's currency
    Price {
        /// Two-letter region code (`us`, `gb`, `in`, ...)
        #[arg(long)]
        currency: Option<String>,
    },
    /// Print the description
    Description {
        #[arg(long, default_value = "raw")]
        format: TextFormat,

        /// Print the short description instead
        #[arg(long)]
        short: bool,
    },
    /// Print supported languages
    Languages {
        #[arg(long, default_value = "raw")]
        format: TextFormat,
    },
    /// Print press reviews
    Reviews {
        #[arg(long, default_value = "raw")]
        format: TextFormat,
    },
    /// Print system requirements for one platform
    Requirements {
        #[arg(long)]
        platform: RequirementPlatform,
    },
    /// Print the confidence-adjusted user rating
    Rating,
    /// Print the package tiles of a bundle
    BundleItems,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = StoreClient::new(&config)?;
    let store = Storefront::new(client).with_link_prefix(config.community_link_prefix.clone());

    let target = query::resolve_target(&store, &cli.target, cli.category).await?;
    tracing::debug!(category = %target.category, id = %target.id, "resolved listing");

    let output = query::run(&store, &target, &cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests;
