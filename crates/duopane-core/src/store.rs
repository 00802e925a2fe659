//! Document store: named markdown documents in one serialized blob.
//!
//! Every document for a storage namespace lives in a single JSON record,
//! `{ "files": { name: content } }`, stored under the namespace key. Each
//! mutation reads the whole blob, changes it and writes it back.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Synchronous key-value persistence for serialized strings.
///
/// The browser implementation wraps `localStorage`; [`MemoryStorage`] keeps
/// everything in process for tests and for `clientSideStorage: false`.
pub trait StorageBackend {
    /// Read the value under `key`. `Ok(None)` when nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Whether the backend can currently be used at all.
    fn is_available(&self) -> bool {
        true
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (*self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (*self).set(key, value)
    }

    fn is_available(&self) -> bool {
        (*self).is_available()
    }
}

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `key`, bypassing the `StorageBackend` interface.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend standing in for storage that does not exist. Every call fails
/// with [`StorageError::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl StorageBackend for UnavailableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// The serialized record holding every document of a namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreBlob {
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

/// Named-document store over a [`StorageBackend`].
#[derive(Debug)]
pub struct DocumentStore<S> {
    backend: S,
    namespace: String,
    default_name: String,
    default_content: String,
}

impl<S: StorageBackend> DocumentStore<S> {
    /// Create a store for `namespace`. `default_name` and `default_content`
    /// seed the blob the first time it is initialized.
    pub fn new(
        backend: S,
        namespace: impl Into<String>,
        default_name: impl Into<String>,
        default_content: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            default_name: default_name.into(),
            default_content: default_content.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Create the blob with the default document if nothing is stored yet.
    ///
    /// Returns true when a new blob was written.
    pub fn initialize(&self) -> Result<bool, StorageError> {
        if self.backend.get(&self.namespace)?.is_some() {
            return Ok(false);
        }
        let mut blob = StoreBlob::default();
        blob.files
            .insert(self.default_name.clone(), self.default_content.clone());
        self.write(&blob)?;
        tracing::debug!(namespace = %self.namespace, "initialized document store");
        Ok(true)
    }

    /// Read the whole blob. A missing blob reads as empty.
    pub fn files(&self) -> Result<StoreBlob, StorageError> {
        match self.backend.get(&self.namespace)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(StoreBlob::default()),
        }
    }

    /// Content stored under `name`, if any.
    pub fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.files()?.files.remove(name))
    }

    pub fn contains(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.files()?.files.contains_key(name))
    }

    /// Store `content` under `name`, replacing any previous entry.
    pub fn save(&self, name: &str, content: &str) -> Result<(), StorageError> {
        self.update(|blob| {
            blob.files.insert(name.to_string(), content.to_string());
        })
    }

    /// Delete `name`. Removing an absent document is not an error.
    ///
    /// Returns the removed content.
    pub fn remove(&self, name: &str) -> Result<Option<String>, StorageError> {
        let mut removed = None;
        self.update(|blob| removed = blob.files.remove(name))?;
        Ok(removed)
    }

    /// Move the content of `old` to `new` in one write.
    ///
    /// A missing `old` produces an empty `new`. Returns whether `old` existed.
    pub fn rename(&self, old: &str, new: &str) -> Result<bool, StorageError> {
        let mut existed = false;
        self.update(|blob| {
            let content = blob.files.remove(old);
            existed = content.is_some();
            blob.files
                .insert(new.to_string(), content.unwrap_or_default());
        })?;
        Ok(existed)
    }

    fn update(&self, f: impl FnOnce(&mut StoreBlob)) -> Result<(), StorageError> {
        let mut blob = self.files()?;
        f(&mut blob);
        self.write(&blob)
    }

    fn write(&self, blob: &StoreBlob) -> Result<(), StorageError> {
        let raw = serde_json::to_string(blob)?;
        self.backend.set(&self.namespace, &raw)
    }
}
