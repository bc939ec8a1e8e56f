pub mod bundle;
pub mod client;
pub mod error;
pub mod listing;
pub(crate) mod markup;
pub mod names;
pub mod normalize;
pub mod package;
pub mod pricing;
pub(crate) mod rate_limit;
pub mod rating;
pub mod requirements;
pub mod reviews;
pub mod segment;
pub mod source;
pub mod storefront;
pub(crate) mod text;
pub mod types;

pub use bundle::{parse_bundle_fragments, parse_bundle_page};
pub use client::StoreClient;
pub use error::ScraperError;
pub use listing::{FieldKind, FormattedText, StoreListing, TitleField};
pub use names::{AppNameIndex, NameMatch};
pub use normalize::{assemble_app, assemble_bundle, assemble_package, extract_price};
pub use package::{PackageApp, PackageField, PackageListing};
pub use pricing::{reconcile, PriceError, NO_INITIAL_PRICE};
pub use rating::{rate, rate_summary};
pub use requirements::{parse_requirement_block, parse_requirements};
pub use reviews::{parse_reviews, parse_reviews_with_prefix};
pub use source::ListingSource;
pub use storefront::{CachedListing, Listing, Price, RatingReport, Storefront};
pub use types::{AppListEntry, AppListResponse, BundlePage};
