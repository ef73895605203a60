//! Document store port.
//!
//! The runtime persists two collections, games and interactions, as JSON
//! documents. Every document carries a version; a commit applies a batch of
//! writes atomically only if every precondition still holds, otherwise it
//! fails with [`StoreError::Conflict`] and the caller retries from a fresh
//! read.

mod error;
mod file;
mod memory;

pub use error::{Result, StoreError};
pub use file::FileDocumentStore;
pub use memory::InMemoryDocumentStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored document together with its optimistic-concurrency version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionedDocument {
    pub id: String,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
    pub body: Value,
}

impl VersionedDocument {
    /// Equality on a top-level field of the body.
    pub fn field_equals(&self, field: &str, value: &Value) -> bool {
        self.body.get(field) == Some(value)
    }
}

/// What a write expects to find before it applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    /// The document must not exist yet.
    Absent,
    /// The document must exist at exactly this version.
    Version(u64),
}

impl Expect {
    pub(crate) fn holds(self, current: Option<u64>) -> bool {
        match (self, current) {
            (Expect::Absent, None) => true,
            (Expect::Version(expected), Some(actual)) => expected == actual,
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Write {
    Put {
        collection: &'static str,
        id: String,
        expect: Expect,
        body: Value,
    },
    Delete {
        collection: &'static str,
        id: String,
        expect: Expect,
    },
}

impl Write {
    pub fn collection(&self) -> &'static str {
        match self {
            Write::Put { collection, .. } | Write::Delete { collection, .. } => collection,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Write::Put { id, .. } | Write::Delete { id, .. } => id,
        }
    }

    pub fn expect(&self) -> Expect {
        match self {
            Write::Put { expect, .. } | Write::Delete { expect, .. } => *expect,
        }
    }
}

/// Transactional document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<VersionedDocument>>;

    /// Documents whose top-level `field` equals `value`.
    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<VersionedDocument>>;

    /// Applies all writes or none of them.
    async fn commit(&self, writes: Vec<Write>) -> Result<()>;
}

/// Ids end up in file names; restrict them to a safe alphabet.
pub(crate) fn check_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expectations() {
        assert!(Expect::Absent.holds(None));
        assert!(!Expect::Absent.holds(Some(1)));
        assert!(Expect::Version(3).holds(Some(3)));
        assert!(!Expect::Version(3).holds(Some(4)));
        assert!(!Expect::Version(3).holds(None));
    }

    #[test]
    fn ids_are_file_safe() {
        assert!(check_id("0b1c-aa_9").is_ok());
        assert!(check_id("").is_err());
        assert!(check_id("../etc").is_err());
    }
}
