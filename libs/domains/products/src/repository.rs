use async_trait::async_trait;
use axum_helpers::PathId;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{ProductError, ProductResult, StorageOp};
use crate::models::{NewProduct, Product, ProductChanges};

/// Bounds every backend's identifier type has to meet.
pub trait ProductKey:
    PathId + Clone + Debug + Display + PartialEq + Serialize + Send + Sync + 'static
{
}

impl<T> ProductKey for T where
    T: PathId + Clone + Debug + Display + PartialEq + Serialize + Send + Sync + 'static
{
}

/// Repository trait for Product persistence
///
/// Implementations: [`crate::postgres::PgProductRepository`],
/// [`crate::mongodb::MongoProductRepository`] and [`InMemoryProductRepository`].
/// The backend is picked once at startup; handlers never branch on it.
#[cfg_attr(test, mockall::automock(type Id = i64;))]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Store-assigned identifier
    type Id: ProductKey;

    /// Insert a validated product; the store assigns id and `created_at`
    async fn insert(&self, input: NewProduct) -> ProductResult<Product<Self::Id>>;

    /// All products, ordered by id ascending
    async fn list(&self) -> ProductResult<Vec<Product<Self::Id>>>;

    async fn get_by_id(&self, id: &Self::Id) -> ProductResult<Option<Product<Self::Id>>>;

    /// Write only the supplied fields. `None` when no product has this id.
    async fn update_by_id(
        &self,
        id: &Self::Id,
        changes: ProductChanges,
    ) -> ProductResult<Option<Product<Self::Id>>>;

    /// Hard delete. `false` when nothing matched.
    async fn delete_by_id(&self, id: &Self::Id) -> ProductResult<bool>;

    /// Trivial round trip to the store
    async fn ping(&self) -> ProductResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    next_id: i64,
    products: Vec<Product>,
}

#[derive(Debug)]
struct MemoryState {
    next_id: i64,
    products: BTreeMap<i64, Product>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            next_id: 1,
            products: BTreeMap::new(),
        }
    }
}

impl From<Snapshot> for MemoryState {
    fn from(snapshot: Snapshot) -> Self {
        let highest = snapshot.products.iter().map(|p| p.id).max().unwrap_or(0);
        let products = snapshot.products.into_iter().map(|p| (p.id, p)).collect();

        Self {
            next_id: snapshot.next_id.max(highest + 1),
            products,
        }
    }
}

impl MemoryState {
    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            next_id: self.next_id,
            products: self.products.values().cloned().collect(),
        }
    }
}

/// In-memory product store: an ordered map behind an async mutex.
///
/// With a snapshot path every successful mutation is written to disk (temp
/// file, then rename), including the next id, so ids stay monotonic across
/// restarts even after the highest one is deleted. A mutation whose snapshot
/// write fails is rolled back.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    state: Arc<Mutex<MemoryState>>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryProductRepository {
    /// Volatile store, lost on restart
    pub fn new() -> Self {
        Self::default()
    }

    /// Durable store backed by a JSON snapshot at `path`.
    ///
    /// A missing file starts an empty store; an unreadable or corrupt one is
    /// an error.
    pub async fn open(path: impl AsRef<Path>) -> ProductResult<Self> {
        let path = path.as_ref().to_path_buf();

        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|e| {
                    ProductError::Snapshot(format!("{}: {}", path.display(), e))
                })?;
                MemoryState::from(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryState::default(),
            Err(e) => {
                return Err(ProductError::Snapshot(format!("{}: {}", path.display(), e)));
            }
        };

        tracing::info!(
            path = %path.display(),
            products = state.products.len(),
            next_id = state.next_id,
            "Loaded product snapshot"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            snapshot_path: Some(path),
        })
    }

    async fn persist(&self, state: &MemoryState) -> Result<(), String> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(&state.to_snapshot()).map_err(|e| e.to_string())?;
        let tmp = path.with_extension("tmp");

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| e.to_string())?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    type Id = i64;

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn insert(&self, input: NewProduct) -> ProductResult<Product> {
        let mut state = self.state.lock().await;

        let id = state.next_id;
        let product = Product {
            id,
            name: input.name,
            price: input.price,
            stock: input.stock,
            created_at: Utc::now(),
        };

        state.next_id += 1;
        state.products.insert(id, product.clone());

        if let Err(e) = self.persist(&state).await {
            state.products.remove(&id);
            state.next_id = id;
            return Err(ProductError::storage(StorageOp::Insert, e));
        }

        tracing::info!(product_id = id, "Product created");
        Ok(product)
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let state = self.state.lock().await;
        Ok(state.products.values().cloned().collect())
    }

    async fn get_by_id(&self, id: &i64) -> ProductResult<Option<Product>> {
        let state = self.state.lock().await;
        Ok(state.products.get(id).cloned())
    }

    #[instrument(skip(self, changes))]
    async fn update_by_id(
        &self,
        id: &i64,
        changes: ProductChanges,
    ) -> ProductResult<Option<Product>> {
        let mut state = self.state.lock().await;

        let Some(existing) = state.products.get_mut(id) else {
            return Ok(None);
        };
        let previous = existing.clone();
        existing.apply(changes);
        let updated = existing.clone();

        if let Err(e) = self.persist(&state).await {
            state.products.insert(*id, previous);
            return Err(ProductError::storage(StorageOp::Update, e));
        }

        Ok(Some(updated))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &i64) -> ProductResult<bool> {
        let mut state = self.state.lock().await;

        let Some(removed) = state.products.remove(id) else {
            return Ok(false);
        };

        if let Err(e) = self.persist(&state).await {
            state.products.insert(*id, removed);
            return Err(ProductError::storage(StorageOp::Delete, e));
        }

        tracing::info!(product_id = id, "Product deleted");
        Ok(true)
    }

    async fn ping(&self) -> ProductResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: 9.99,
            stock: 0,
        }
    }

    fn snapshot_path(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "products-snapshot-{}-{}",
            test,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("products.json");
        let _ = std::fs::remove_file(&path);
        path
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_list_is_ordered() {
        let repo = InMemoryProductRepository::new();

        let a = repo.insert(widget("a")).await.unwrap();
        let b = repo.insert(widget("b")).await.unwrap();
        let c = repo.insert(widget("c")).await.unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryProductRepository::new();
        repo.insert(widget("a")).await.unwrap();
        let b = repo.insert(widget("b")).await.unwrap();

        assert!(repo.delete_by_id(&b.id).await.unwrap());
        let c = repo.insert(widget("c")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_id() {
        let repo = InMemoryProductRepository::new();

        let updated = repo
            .update_by_id(
                &42,
                ProductChanges {
                    stock: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(!repo.delete_by_id(&42).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let repo = InMemoryProductRepository::new();
        let created = repo.insert(widget("a")).await.unwrap();

        let updated = repo
            .update_by_id(
                &created.id,
                ProductChanges {
                    price: Some(1.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, 1.5);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_snapshot_survives_restart() {
        let path = snapshot_path("restart");

        {
            let repo = InMemoryProductRepository::open(&path).await.unwrap();
            repo.insert(widget("a")).await.unwrap();
            let b = repo.insert(widget("b")).await.unwrap();
            repo.delete_by_id(&b.id).await.unwrap();
        }

        let reopened = InMemoryProductRepository::open(&path).await.unwrap();
        let products = reopened.list().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "a");

        // id 2 was handed out before the restart and must not come back
        let c = reopened.insert(widget("c")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_an_error() {
        let path = snapshot_path("corrupt");
        std::fs::write(&path, b"{ not json").unwrap();

        let result = InMemoryProductRepository::open(&path).await;
        assert!(matches!(result, Err(ProductError::Snapshot(_))));
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back_insert() {
        let dir = snapshot_path("rollback");
        let repo = InMemoryProductRepository::open(&dir).await.unwrap();
        // Make the snapshot target unwritable by turning it into a directory
        std::fs::create_dir_all(&dir).unwrap();

        let err = repo.insert(widget("a")).await.unwrap_err();
        assert!(matches!(
            err,
            ProductError::Storage {
                op: StorageOp::Insert,
                ..
            }
        ));
        assert!(repo.list().await.unwrap().is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
