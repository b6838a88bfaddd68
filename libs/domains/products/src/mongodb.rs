//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use axum_helpers::PathId;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document},
    options::ReturnDocument,
    Collection, Database,
};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use tracing::instrument;

use crate::error::{ProductError, ProductResult, StorageOp};
use crate::models::{NewProduct, Product, ProductChanges};
use crate::repository::ProductRepository;

/// Identifier of a product stored in MongoDB.
///
/// Travels over HTTP as the 24-character hex form of the ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub ObjectId);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl PathId for DocumentId {
    fn parse_path_id(raw: &str) -> Option<Self> {
        ObjectId::parse_str(raw).ok().map(DocumentId)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    price: f64,
    stock: i32,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

impl From<ProductDocument> for Product<DocumentId> {
    fn from(doc: ProductDocument) -> Self {
        Self {
            id: DocumentId(doc.id),
            name: doc.name,
            price: doc.price,
            stock: doc.stock,
            created_at: chrono::DateTime::from_timestamp_millis(doc.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

fn now() -> BsonDateTime {
    BsonDateTime::from_millis(Utc::now().timestamp_millis())
}

/// `$set` document for the supplied fields, always bumping `updated_at`.
fn update_document(changes: ProductChanges) -> Document {
    let mut set = doc! { "updated_at": now() };

    if let Some(name) = changes.name {
        set.insert("name", name);
    }
    if let Some(price) = changes.price {
        set.insert("price", price);
    }
    if let Some(stock) = changes.stock {
        set.insert("stock", stock);
    }

    doc! { "$set": set }
}

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    db: Database,
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    /// Uses the `products` collection of `db`
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, "products")
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection::<ProductDocument>(collection_name),
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    type Id = DocumentId;

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn insert(&self, input: NewProduct) -> ProductResult<Product<DocumentId>> {
        let timestamp = now();
        let document = ProductDocument {
            id: ObjectId::new(),
            name: input.name,
            price: input.price,
            stock: input.stock,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.collection
            .insert_one(&document)
            .await
            .map_err(|e| ProductError::storage(StorageOp::Insert, e))?;

        tracing::info!(product_id = %document.id, "Product created");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product<DocumentId>>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| ProductError::storage(StorageOp::Query, e))?;

        let documents: Vec<ProductDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| ProductError::storage(StorageOp::Query, e))?;

        Ok(documents.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &DocumentId) -> ProductResult<Option<Product<DocumentId>>> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.0 })
            .await
            .map_err(|e| ProductError::storage(StorageOp::Query, e))?;

        Ok(document.map(Product::from))
    }

    #[instrument(skip(self, changes))]
    async fn update_by_id(
        &self,
        id: &DocumentId,
        changes: ProductChanges,
    ) -> ProductResult<Option<Product<DocumentId>>> {
        let document = self
            .collection
            .find_one_and_update(doc! { "_id": id.0 }, update_document(changes))
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| ProductError::storage(StorageOp::Update, e))?;

        Ok(document.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &DocumentId) -> ProductResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.0 })
            .await
            .map_err(|e| ProductError::storage(StorageOp::Delete, e))?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> ProductResult<()> {
        database::mongodb::check_health(&self.db)
            .await
            .map_err(|e| ProductError::Unavailable(e.to_string()))
    }
}
