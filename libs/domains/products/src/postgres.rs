//! PostgreSQL implementation of ProductRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, Value,
};
use tracing::instrument;

use crate::error::{ProductError, ProductResult, StorageOp};
use crate::models::{NewProduct, Product, ProductChanges};
use crate::repository::ProductRepository;

/// `price` is NUMERIC(12,2); it is read back as float8 so it maps onto `f64`.
const COLUMNS: &str = "id, name, price::float8 AS price, stock, created_at";

const SCHEMA_SQL: &str = r#"
    CREATE SCHEMA IF NOT EXISTS products_schema;
    CREATE TABLE IF NOT EXISTS products_schema.products (
        id          SERIAL PRIMARY KEY,
        name        TEXT NOT NULL,
        price       NUMERIC(12,2) NOT NULL CHECK (price >= 0),
        stock       INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    );
"#;

#[derive(Debug, FromQueryResult)]
struct ProductRow {
    id: i32,
    name: String,
    price: f64,
    stock: i32,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: i64::from(row.id),
            name: row.name,
            price: row.price,
            stock: row.stock,
            created_at: row.created_at,
        }
    }
}

/// Builds `UPDATE ... SET` over the supplied fields only.
///
/// Returns `None` when there is nothing to set.
fn update_statement(id: i64, changes: ProductChanges) -> Option<Statement> {
    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(name) = changes.name {
        values.push(name.into());
        sets.push(format!("name = ${}", values.len()));
    }
    if let Some(price) = changes.price {
        values.push(price.into());
        sets.push(format!("price = ${}", values.len()));
    }
    if let Some(stock) = changes.stock {
        values.push(stock.into());
        sets.push(format!("stock = ${}", values.len()));
    }

    if sets.is_empty() {
        return None;
    }

    values.push(id.into());
    let sql = format!(
        "UPDATE products_schema.products SET {} WHERE id = ${} RETURNING {}",
        sets.join(", "),
        values.len(),
        COLUMNS
    );

    Some(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
}

/// PostgreSQL implementation of the ProductRepository
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates `products_schema.products` if it does not exist yet.
    pub async fn init_schema(&self) -> ProductResult<()> {
        self.db
            .execute_unprepared(SCHEMA_SQL)
            .await
            .map_err(|e| ProductError::Unavailable(e.to_string()))?;

        tracing::info!("products_schema.products is ready");
        Ok(())
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    type Id = i64;

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn insert(&self, input: NewProduct) -> ProductResult<Product> {
        let sql = format!(
            "INSERT INTO products_schema.products (name, price, stock) VALUES ($1, $2, $3) RETURNING {}",
            COLUMNS
        );
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [input.name.into(), input.price.into(), input.stock.into()],
        );

        let row = ProductRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| ProductError::storage(StorageOp::Insert, e))?
            .ok_or_else(|| ProductError::storage(StorageOp::Insert, "no row returned"))?;

        tracing::info!(product_id = row.id, "Product created");
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products_schema.products ORDER BY id ASC",
            COLUMNS
        );
        let stmt = Statement::from_string(DbBackend::Postgres, sql);

        let rows = ProductRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| ProductError::storage(StorageOp::Query, e))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &i64) -> ProductResult<Option<Product>> {
        let sql = format!(
            "SELECT {} FROM products_schema.products WHERE id = $1",
            COLUMNS
        );
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [(*id).into()]);

        let row = ProductRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| ProductError::storage(StorageOp::Query, e))?;

        Ok(row.map(Product::from))
    }

    #[instrument(skip(self, changes))]
    async fn update_by_id(
        &self,
        id: &i64,
        changes: ProductChanges,
    ) -> ProductResult<Option<Product>> {
        let Some(stmt) = update_statement(*id, changes) else {
            return self.get_by_id(id).await;
        };

        let row = ProductRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| ProductError::storage(StorageOp::Update, e))?;

        Ok(row.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &i64) -> ProductResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM products_schema.products WHERE id = $1",
            [(*id).into()],
        );

        let result = self
            .db
            .execute_raw(stmt)
            .await
            .map_err(|e| ProductError::storage(StorageOp::Delete, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> ProductResult<()> {
        database::postgres::check_health(&self.db)
            .await
            .map_err(|e| ProductError::Unavailable(e.to_string()))
    }
}
