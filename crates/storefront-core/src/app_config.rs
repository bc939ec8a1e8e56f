#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings shared by the store client and the command-line front end.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Storefront origin, e.g. `https://store.steampowered.com`.
    pub store_base_url: String,
    /// Origin of the public app-list API used for name lookups.
    pub api_base_url: String,
    /// Redirect wrapper prepended to outbound review links.
    pub community_link_prefix: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Two-letter store region (`us`, `in`, ...). `None` uses the store default.
    pub country_code: Option<String>,
}
