//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductPayload, ProductsWithUsers};
use crate::repository::ProductRepository;
use crate::users_client::UserCounter;
use crate::validation;

/// Product service providing business logic operations
///
/// Validates raw bodies, turns "no such row" into [`ProductError::NotFound`]
/// and combines the local listing with the users service for the composite
/// endpoint.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    users: Arc<dyn UserCounter>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, users: Arc<dyn UserCounter>) -> Self {
        Self {
            repository: Arc::new(repository),
            users,
        }
    }

    #[instrument(skip(self, payload))]
    pub async fn create_product(&self, payload: ProductPayload) -> ProductResult<Product<R::Id>> {
        let input = validation::new_product(payload)?;
        self.repository.insert(input).await
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product<R::Id>>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &R::Id) -> ProductResult<Product<R::Id>> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Body problems are reported before the id is looked up.
    #[instrument(skip(self, payload))]
    pub async fn update_product(
        &self,
        id: &R::Id,
        payload: ProductPayload,
    ) -> ProductResult<Product<R::Id>> {
        let changes = validation::product_changes(payload)?;

        self.repository
            .update_by_id(id, changes)
            .await?
            .ok_or(ProductError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &R::Id) -> ProductResult<()> {
        if self.repository.delete_by_id(id).await? {
            Ok(())
        } else {
            Err(ProductError::NotFound)
        }
    }

    /// Local listing and remote user count, fetched concurrently.
    ///
    /// Only a local failure is an error; the user count degrades to zero.
    #[instrument(skip(self))]
    pub async fn list_with_users(&self) -> ProductResult<ProductsWithUsers<R::Id>> {
        let (products, users_count) =
            tokio::join!(self.repository.list(), self.users.count_users());

        let products = products.map_err(|e| ProductError::Composite(e.into_detail()))?;

        Ok(ProductsWithUsers {
            products,
            users_count,
        })
    }

    pub async fn ping(&self) -> ProductResult<()> {
        self.repository.ping().await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            users: Arc::clone(&self.users),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageOp;
    use crate::repository::{InMemoryProductRepository, MockProductRepository};
    use crate::users_client::MockUserCounter;
    use crate::validation::{NAME_AND_PRICE_REQUIRED, NOTHING_TO_UPDATE};
    use serde_json::json;

    fn users(count: u64) -> Arc<dyn UserCounter> {
        let mut mock = MockUserCounter::new();
        mock.expect_count_users().returning(move || count);
        Arc::new(mock)
    }

    fn payload(body: serde_json::Value) -> ProductPayload {
        serde_json::from_value(body).unwrap()
    }

    fn service() -> ProductService<InMemoryProductRepository> {
        ProductService::new(InMemoryProductRepository::new(), users(0))
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();
        let created = service
            .create_product(payload(json!({ "name": "Widget", "price": 9.99 })))
            .await
            .unwrap();

        let fetched = service.get_product(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.stock, 0);
    }

    #[tokio::test]
    async fn test_create_invalid_never_reaches_repository() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert().never();
        let service = ProductService::new(repo, users(0));

        let err = service
            .create_product(payload(json!({ "price": 1 })))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(msg) if msg == NAME_AND_PRICE_REQUIRED));
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let mut repo = MockProductRepository::new();
        repo.expect_update_by_id().never();
        let service = ProductService::new(repo, users(0));

        let err = service
            .update_product(&99, payload(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(msg) if msg == NOTHING_TO_UPDATE));
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let service = service();

        assert!(matches!(
            service.get_product(&7).await,
            Err(ProductError::NotFound)
        ));
        assert!(matches!(
            service
                .update_product(&7, payload(json!({ "stock": 1 })))
                .await,
            Err(ProductError::NotFound)
        ));
        assert!(matches!(
            service.delete_product(&7).await,
            Err(ProductError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_with_users_combines_both_sources() {
        let service = ProductService::new(InMemoryProductRepository::new(), users(4));
        service
            .create_product(payload(json!({ "name": "Widget", "price": 1 })))
            .await
            .unwrap();

        let combined = service.list_with_users().await.unwrap();
        assert_eq!(combined.products.len(), 1);
        assert_eq!(combined.users_count, 4);
    }

    #[tokio::test]
    async fn test_list_with_users_local_failure_is_composite_error() {
        let mut repo = MockProductRepository::new();
        repo.expect_list()
            .returning(|| Err(ProductError::storage(StorageOp::Query, "connection refused")));
        let service = ProductService::new(repo, users(2));

        let err = service.list_with_users().await.unwrap_err();
        assert!(matches!(err, ProductError::Composite(detail) if detail == "connection refused"));
    }

    #[tokio::test]
    async fn test_storage_failure_is_propagated() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete_by_id()
            .returning(|_| Err(ProductError::storage(StorageOp::Delete, "disk full")));
        let service = ProductService::new(repo, users(0));

        let err = service.delete_product(&1).await.unwrap_err();
        assert!(matches!(
            err,
            ProductError::Storage {
                op: StorageOp::Delete,
                ..
            }
        ));
    }
}
