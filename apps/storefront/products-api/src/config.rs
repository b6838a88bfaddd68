use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig,
};
use domain_products::UsersClientConfig;
use std::path::PathBuf;
use strum::{Display, EnumString};

pub use core_config::Environment;

pub const DEFAULT_PORT: u16 = 4002;

/// Where products are stored; chosen once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Backend {
    Postgres,
    #[strum(serialize = "mongodb", serialize = "mongo")]
    Mongodb,
    Memory,
}

/// Application-specific configuration
///
/// Storage connection settings are read separately, and only for the
/// selected [`Backend`].
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: Backend,
    pub users: UsersClientConfig,
    /// Snapshot file for the memory backend; volatile when unset
    pub data_file: Option<PathBuf>,
    /// Create the schema and table on startup (postgres backend)
    pub init_schema: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_file = std::env::var("PRODUCTS_DATA_FILE")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            app: app_info!("products-api"),
            environment: Environment::from_env(),
            server: ServerConfig::from_env_or_port(DEFAULT_PORT)?,
            backend: env_parse("PRODUCTS_BACKEND", "postgres")?,
            users: UsersClientConfig::from_env()?,
            data_file,
            init_schema: env_parse("DB_INIT_SCHEMA", "false")?,
        })
    }
}
