//! Client for the users service, used by `GET /products/with-users`.

use async_trait::async_trait;
use core_config::{env_or_default, env_parse, ConfigError, FromEnv};
use serde_json::Value;
use std::time::Duration;
use tracing::{instrument, warn};

pub const DEFAULT_USERS_API_URL: &str = "http://users-api:4001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for UsersClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_USERS_API_URL.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl FromEnv for UsersClientConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_or_default("USERS_API_URL", DEFAULT_USERS_API_URL);
        let timeout_secs: u64 = env_parse("USERS_API_TIMEOUT_SECS", "5")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Counts the users known to the users service.
///
/// Never fails: an unreachable or misbehaving service counts as zero users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCounter: Send + Sync {
    async fn count_users(&self) -> u64;
}

/// `GET {base_url}/users` over HTTP
#[derive(Clone)]
pub struct HttpUsersClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUsersClient {
    pub fn new(config: &UsersClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    async fn fetch_users(&self) -> Result<Value, reqwest::Error> {
        self.client
            .get(self.users_url())
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    }
}

#[async_trait]
impl UserCounter for HttpUsersClient {
    #[instrument(skip(self), fields(url = %self.users_url()))]
    async fn count_users(&self) -> u64 {
        match self.fetch_users().await {
            Ok(Value::Array(users)) => users.len() as u64,
            Ok(other) => {
                warn!(body = %other, "Users service did not return a list");
                0
            }
            Err(e) => {
                warn!(error = %e, "Users service unreachable");
                0
            }
        }
    }
}
