//! Secondary document store holding the schema-less Sales records.
//!
//! The store is reached only through the outbox worker, so every write is
//! an idempotent upsert keyed by the outbox row id: redelivery after a
//! partial failure can never produce a second Sales document.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_document, Document},
    options::UpdateOptions,
    Client, Collection,
};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::errors::ServiceError;

const SALES_COLLECTION: &str = "Sales";
const IDEMPOTENCY_FIELD: &str = "_outbox_id";

#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Upserts one Sales document. Calling twice with the same key must
    /// leave exactly one document behind.
    async fn upsert_sale(&self, key: &str, document: &JsonValue) -> Result<(), ServiceError>;
}

/// MongoDB-backed store for production deployments.
pub struct MongoSalesStore {
    collection: Collection<Document>,
}

impl MongoSalesStore {
    pub async fn connect(url: &str, database: &str) -> Result<Self, ServiceError> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|e| ServiceError::DocumentStoreError(e.to_string()))?;
        let collection = client.database(database).collection(SALES_COLLECTION);
        Ok(Self { collection })
    }
}

#[async_trait]
impl SalesStore for MongoSalesStore {
    async fn upsert_sale(&self, key: &str, document: &JsonValue) -> Result<(), ServiceError> {
        let mut doc = to_document(document)
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;
        doc.insert(IDEMPOTENCY_FIELD, key);

        self.collection
            .update_one(
                doc! { IDEMPOTENCY_FIELD: key },
                doc! { "$set": doc },
                UpdateOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(|e| ServiceError::DocumentStoreError(e.to_string()))?;

        debug!(key = %key, "sales document upserted");
        Ok(())
    }
}

/// In-memory store for tests and store-less development deployments.
#[derive(Default)]
pub struct InMemorySalesStore {
    documents: Mutex<HashMap<String, JsonValue>>,
}

impl InMemorySalesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> Vec<(String, JsonValue)> {
        self.documents
            .lock()
            .expect("sales store mutex poisoned")
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents
            .lock()
            .expect("sales store mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SalesStore for InMemorySalesStore {
    async fn upsert_sale(&self, key: &str, document: &JsonValue) -> Result<(), ServiceError> {
        self.documents
            .lock()
            .expect("sales store mutex poisoned")
            .insert(key.to_string(), document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn upsert_is_idempotent_per_key() {
        let store = InMemorySalesStore::new();
        let doc = json!({"color": "red", "_equipment_id": 42});

        store.upsert_sale("k1", &doc).await.unwrap();
        store.upsert_sale("k1", &doc).await.unwrap();
        store.upsert_sale("k2", &doc).await.unwrap();

        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn later_upsert_replaces_earlier_document() {
        let store = InMemorySalesStore::new();
        store.upsert_sale("k1", &json!({"v": 1})).await.unwrap();
        store.upsert_sale("k1", &json!({"v": 2})).await.unwrap();

        let docs = store.documents();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].1, json!({"v": 2}));
    }
}
