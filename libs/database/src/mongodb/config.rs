#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_first, env_parse};

/// MongoDB database configuration
///
/// # Example
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "products");
///
/// // From environment variables (requires `config` feature)
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// MongoDB connection string
    pub url: String,

    /// Database name
    pub database: String,

    /// Application name reported to the server
    pub app_name: Option<String>,

    /// Maximum number of pooled connections
    pub max_pool_size: u32,

    /// Minimum number of pooled connections
    pub min_pool_size: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "products".to_string(),
            app_name: None,
            max_pool_size: 10,
            min_pool_size: 0,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 10,
        }
    }
}

/// Load MongoConfig from environment variables
///
/// Environment variables (all optional):
/// - `MONGODB_URL` or `MONGO_URL` (default: `mongodb://localhost:27017`)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (default: `products`)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_MAX_POOL_SIZE` (default: 10)
/// - `MONGODB_MIN_POOL_SIZE` (default: 0)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default: 10)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            url: env_first(&["MONGODB_URL", "MONGO_URL"]).unwrap_or(defaults.url),
            database: env_first(&["MONGODB_DATABASE", "MONGO_DATABASE"])
                .unwrap_or(defaults.database),
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse("MONGODB_MAX_POOL_SIZE", "10")?,
            min_pool_size: env_parse("MONGODB_MIN_POOL_SIZE", "0")?,
            connect_timeout_secs: env_parse("MONGODB_CONNECT_TIMEOUT_SECS", "10")?,
            server_selection_timeout_secs: env_parse(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                "10",
            )?,
        })
    }
}
