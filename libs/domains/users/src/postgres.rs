//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use database::postgres::is_unique_violation;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement, Value,
};
use tracing::instrument;

use crate::error::{StorageOp, UserError, UserResult};
use crate::models::{NewUser, User, UserChanges};
use crate::repository::UserRepository;

const SCHEMA_SQL: &str = r#"
    CREATE SCHEMA IF NOT EXISTS users_schema;
    CREATE TABLE IF NOT EXISTS users_schema.users (
        id     SERIAL PRIMARY KEY,
        name   TEXT NOT NULL,
        email  TEXT NOT NULL UNIQUE
    );
"#;

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: i64::from(row.id),
            name: row.name,
            email: row.email,
        }
    }
}

/// Unique violations become [`UserError::EmailTaken`]; the only unique
/// column is `email`.
fn classify(op: StorageOp, err: DbErr) -> UserError {
    if is_unique_violation(&err) {
        UserError::EmailTaken(err.to_string())
    } else {
        UserError::storage(op, err)
    }
}

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates `users_schema.users` if it does not exist yet.
    pub async fn init_schema(&self) -> UserResult<()> {
        self.db
            .execute_unprepared(SCHEMA_SQL)
            .await
            .map_err(|e| UserError::Unavailable(e.to_string()))?;

        tracing::info!("users_schema.users is ready");
        Ok(())
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn insert(&self, input: NewUser) -> UserResult<User> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "INSERT INTO users_schema.users (name, email) VALUES ($1, $2) RETURNING id, name, email",
            [input.name.into(), input.email.into()],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| classify(StorageOp::Insert, e))?
            .ok_or_else(|| UserError::storage(StorageOp::Insert, "no row returned"))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> UserResult<Vec<User>> {
        let stmt = Statement::from_string(
            DbBackend::Postgres,
            "SELECT id, name, email FROM users_schema.users ORDER BY id ASC",
        );

        let rows = UserRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| UserError::storage(StorageOp::Query, e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT id, name, email FROM users_schema.users WHERE id = $1",
            [id.into()],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| UserError::storage(StorageOp::Query, e))?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self, changes))]
    async fn update_by_id(&self, id: i64, changes: UserChanges) -> UserResult<Option<User>> {
        let mut sets = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(name) = changes.name {
            values.push(name.into());
            sets.push(format!("name = ${}", values.len()));
        }
        if let Some(email) = changes.email {
            values.push(email.into());
            sets.push(format!("email = ${}", values.len()));
        }
        if sets.is_empty() {
            return self.get_by_id(id).await;
        }
        values.push(id.into());

        let sql = format!(
            "UPDATE users_schema.users SET {} WHERE id = ${} RETURNING id, name, email",
            sets.join(", "),
            values.len()
        );
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, values);

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| classify(StorageOp::Update, e))?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> UserResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM users_schema.users WHERE id = $1",
            [id.into()],
        );

        let result = self
            .db
            .execute_raw(stmt)
            .await
            .map_err(|e| UserError::storage(StorageOp::Delete, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> UserResult<()> {
        database::postgres::check_health(&self.db)
            .await
            .map_err(|e| UserError::Unavailable(e.to_string()))
    }
}
