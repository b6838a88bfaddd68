use mongodb::{Database, bson::doc};
use tracing::debug;

use crate::common::DatabaseError;

/// Check MongoDB health with a `{ping: 1}` command against `db`.
pub async fn check_health(db: &Database) -> Result<(), DatabaseError> {
    debug!("Running MongoDB health check");

    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    debug!("MongoDB health check passed");
    Ok(())
}
