use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_STORE_BASE_URL: &str = "https://store.steampowered.com";
pub const DEFAULT_API_BASE_URL: &str = "https://api.steampowered.com";
pub const DEFAULT_COMMUNITY_LINK_PREFIX: &str = "https://steamcommunity.com/linkfilter/?url=";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("STOREFRONT_ENV", "development"))?;
    let log_level = or_default("STOREFRONT_LOG_LEVEL", "info");
    let store_base_url = or_default("STOREFRONT_BASE_URL", DEFAULT_STORE_BASE_URL);
    let api_base_url = or_default("STOREFRONT_API_BASE_URL", DEFAULT_API_BASE_URL);
    let community_link_prefix = or_default(
        "STOREFRONT_COMMUNITY_LINK_PREFIX",
        DEFAULT_COMMUNITY_LINK_PREFIX,
    );

    let request_timeout_secs = parse_u64("STOREFRONT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("STOREFRONT_USER_AGENT", "storefront/0.1 (catalog-extraction)");
    let max_retries = parse_u32("STOREFRONT_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("STOREFRONT_RETRY_BACKOFF_BASE_SECS", "2")?;

    let country_code = match lookup("STOREFRONT_COUNTRY_CODE") {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => Some(parse_country_code(&raw)?),
        Err(_) => None,
    };

    Ok(AppConfig {
        env,
        log_level,
        store_base_url,
        api_base_url,
        community_link_prefix,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        country_code,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Store regions are two ASCII letters; normalized to lowercase.
fn parse_country_code(raw: &str) -> Result<String, ConfigError> {
    let code = raw.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_lowercase())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_COUNTRY_CODE".to_string(),
            reason: format!("expected a two-letter region code, got \"{code}\""),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
