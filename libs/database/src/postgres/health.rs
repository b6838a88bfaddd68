use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use tracing::debug;

use crate::common::DatabaseError;

/// Check PostgreSQL database health
///
/// Executes a simple `SELECT 1` query to verify the database connection is working.
///
/// # Example
/// ```ignore
/// use database::postgres::{connect, check_health};
///
/// let db = connect(&db_url).await?;
/// check_health(&db).await?;
/// ```
pub async fn check_health<C>(db: &C) -> Result<(), DatabaseError>
where
    C: ConnectionTrait,
{
    debug!("Running PostgreSQL health check");

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    debug!("PostgreSQL health check passed");
    Ok(())
}
