pub mod app_config;
pub mod bundle;
pub mod config;
pub mod format;
pub mod requirements;
pub mod review;
pub mod target;

pub use app_config::{AppConfig, Environment};
pub use bundle::{BundleCategory, BundleDetail, ItemPrice, PackageItem, Platforms, PriceInfo};
pub use config::{load_app_config, load_app_config_from_env};
pub use format::TextFormat;
pub use requirements::{LabelMap, RequirementPlatform, RequirementSet};
pub use review::{Rating, ReviewEntry};
pub use target::{Category, ListingTarget};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid listing id \"{0}\": must be a non-empty numeric string")]
    InvalidListingId(String),

    #[error("invalid store url \"{url}\": {reason}")]
    InvalidStoreUrl { url: String, reason: String },

    #[error("invalid format \"{0}\": expected one of raw, normal, list")]
    InvalidFormat(String),

    #[error("invalid requirement platform \"{0}\": expected one of pc, mac, linux")]
    InvalidPlatform(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
