use mongodb::{Client, Database, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::{MongoConfig, check_health};
use crate::common::{DatabaseError, DatabaseResult};

/// Connect to MongoDB and return a handle to the configured database.
///
/// The server is pinged before returning, so an unreachable deployment fails
/// here (after the server selection timeout) instead of on the first request.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_from_config};
/// use core_config::FromEnv;
///
/// let config = MongoConfig::from_env()?;
/// let db = connect_from_config(&config).await?;
/// let products = db.collection::<Document>("products");
/// ```
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Database> {
    info!(database = %config.database, "Attempting to connect to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;
    let db = client.database(&config.database);

    check_health(&db)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(db)
}

/// Connect with default settings to `url`, using database `database`.
pub async fn connect(url: &str, database: &str) -> DatabaseResult<Database> {
    connect_from_config(&MongoConfig::with_database(url, database)).await
}
