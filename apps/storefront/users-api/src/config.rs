use core_config::{AppInfo, ConfigError, app_info, env_parse, server::ServerConfig};
use strum::{Display, EnumString};

pub use core_config::Environment;

pub const DEFAULT_PORT: u16 = 4001;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Backend {
    Postgres,
    Memory,
}

/// Application-specific configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: Backend,
    pub init_schema: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!("users-api"),
            environment: Environment::from_env(),
            server: ServerConfig::from_env_or_port(DEFAULT_PORT)?,
            backend: env_parse("USERS_BACKEND", "postgres")?,
            init_schema: env_parse("DB_INIT_SCHEMA", "false")?,
        })
    }
}
