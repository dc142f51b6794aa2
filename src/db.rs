use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::store::{Collection, MemoryStore, RecordStore, SqliteStore};

/// The facade every caller goes through. Owns the storage port; all
/// invariants are enforced in its repository methods and nowhere else.
pub struct SchoolDb {
    store: Box<dyn RecordStore>,
}

impl SchoolDb {
    /// Open a durable store under `workspace`.
    pub fn open(workspace: &Path) -> Result<Self> {
        Ok(Self {
            store: Box::new(SqliteStore::open(workspace)?),
        })
    }

    /// Volatile store, mainly for tests.
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
        }
    }

    /// Inject an arbitrary backend.
    pub fn with_store(store: Box<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Read and deserialize a whole collection. An unreadable or unparsable
    /// blob is treated as "not yet initialized": logged, never propagated.
    pub(crate) fn read_collection<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let blob = match self.store.read(collection) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(collection = collection.key(), error = %e, "collection read failed; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&blob) {
            Ok(records) => records,
            Err(e) => {
                warn!(collection = collection.key(), error = %e, "collection blob unparsable; treating as empty");
                Vec::new()
            }
        }
    }

    /// Serialize and overwrite a whole collection.
    pub(crate) fn write_collection<T: Serialize>(
        &mut self,
        collection: Collection,
        records: &[T],
    ) -> Result<()> {
        let blob = serde_json::to_string(records)?;
        self.store.write(collection, &blob)
    }

    /// Raw blob access for the migration path, which works at the JSON level
    /// before the typed model gets involved.
    pub(crate) fn read_raw(&self, collection: Collection) -> Result<Option<String>> {
        self.store.read(collection)
    }
}
