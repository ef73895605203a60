//! File-based DocumentStore implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::{DocumentStore, Result, StoreError, VersionedDocument, Write, check_id};

/// Stores each document as `{collection}/{id}.json`.
///
/// Commits are serialized through a process-wide lock: preconditions for the
/// whole batch are checked first, then every file is written to a temporary
/// path and renamed into place.
pub struct FileDocumentStore {
    base_dir: PathBuf,
    commit_lock: Mutex<()>,
}

impl FileDocumentStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            commit_lock: Mutex::new(()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf> {
        check_id(collection)?;
        Ok(self.base_dir.join(collection))
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf> {
        check_id(id)?;
        Ok(self.collection_dir(collection)?.join(format!("{}.json", id)))
    }

    fn read(&self, path: &Path) -> Result<Option<VersionedDocument>> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        let doc = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::CorruptedData(format!("{}: {}", path.display(), e)))?;
        Ok(Some(doc))
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<VersionedDocument>> {
        let path = self.document_path(collection, id)?;
        self.read(&path)
    }

    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<VersionedDocument>> {
        let dir = self.collection_dir(collection)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(doc) = self.read(&path)?
                && doc.field_equals(field, value)
            {
                found.push(doc);
            }
        }
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<()> {
        let _guard = self
            .commit_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;

        let mut planned = Vec::with_capacity(writes.len());
        for write in writes {
            let path = self.document_path(write.collection(), write.id())?;
            let current = self.read(&path)?.map(|doc| doc.version);
            if !write.expect().holds(current) {
                return Err(StoreError::Conflict {
                    collection: write.collection().to_string(),
                    id: write.id().to_string(),
                });
            }
            planned.push((path, current, write));
        }

        let now = Utc::now();
        for (path, current, write) in planned {
            match write {
                Write::Put { id, body, .. } => {
                    if let Some(dir) = path.parent() {
                        fs::create_dir_all(dir)?;
                    }
                    let doc = VersionedDocument {
                        id,
                        version: current.map_or(1, |v| v + 1),
                        updated_at: now,
                        body,
                    };
                    let temp_path = path.with_extension("json.tmp");
                    fs::write(&temp_path, serde_json::to_vec_pretty(&doc)?)?;
                    fs::rename(&temp_path, &path)?;
                    tracing::debug!(
                        target: "runtime::store",
                        path = %path.display(),
                        version = doc.version,
                        "document written"
                    );
                }
                Write::Delete { .. } => {
                    if path.exists() {
                        fs::remove_file(&path)?;
                        tracing::debug!(target: "runtime::store", path = %path.display(), "document deleted");
                    }
                }
            }
        }
        Ok(())
    }
}
