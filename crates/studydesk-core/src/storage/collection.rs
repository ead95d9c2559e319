//! JSON collection adapter over a [`KvStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KvStore;
use crate::error::StorageError;

/// A list of records persisted as one JSON array under a fixed key.
///
/// Loading never fails: a missing, unreadable or malformed value yields an
/// empty list. Saving overwrites the whole array.
#[derive(Debug)]
pub struct JsonList<S> {
    kv: S,
    key: &'static str,
}

impl<S: KvStore> JsonList<S> {
    pub fn new(kv: S, key: &'static str) -> Self {
        Self { kv, key }
    }

    pub fn load<T: DeserializeOwned>(&self) -> Vec<T> {
        let raw = match self.kv.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "failed to read collection, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "discarding malformed collection");
                Vec::new()
            }
        }
    }

    /// # Errors
    /// Returns an error if encoding or the backend write fails.
    pub fn save<T: Serialize>(&self, items: &[T]) -> Result<(), StorageError> {
        let json = serde_json::to_string(items).map_err(|source| StorageError::Encode {
            key: self.key.to_string(),
            source,
        })?;
        self.kv.set(self.key, &json)
    }
}
