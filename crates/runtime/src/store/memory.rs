//! In-memory DocumentStore implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::{DocumentStore, Result, StoreError, VersionedDocument, Write, check_id};

type Key = (String, String);

/// Documents keyed by `(collection, id)` behind a single lock, so a commit
/// checks and applies its whole batch atomically.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<Key, VersionedDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<VersionedDocument>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }

    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<VersionedDocument>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let mut found: Vec<VersionedDocument> = documents
            .iter()
            .filter(|((c, _), doc)| c == collection && doc.field_equals(field, value))
            .map(|(_, doc)| doc.clone())
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        for write in &writes {
            check_id(write.id())?;
            let key = (write.collection().to_string(), write.id().to_string());
            let current = documents.get(&key).map(|doc| doc.version);
            if !write.expect().holds(current) {
                return Err(StoreError::Conflict {
                    collection: key.0,
                    id: key.1,
                });
            }
        }

        let now = Utc::now();
        for write in writes {
            match write {
                Write::Put {
                    collection,
                    id,
                    body,
                    ..
                } => {
                    let key = (collection.to_string(), id.clone());
                    let version = documents.get(&key).map_or(1, |doc| doc.version + 1);
                    documents.insert(
                        key,
                        VersionedDocument {
                            id,
                            version,
                            updated_at: now,
                            body,
                        },
                    );
                }
                Write::Delete { collection, id, .. } => {
                    documents.remove(&(collection.to_string(), id));
                }
            }
        }
        Ok(())
    }
}
