//! `localStorage` backend for the document store.
//!
//! `localStorage` throws in sandboxed frames and some private modes, so the
//! backend probes once at construction and reports [`StorageError::Unavailable`]
//! from then on instead of touching it.

use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen::JsValue;

use duopane_core::{StorageBackend, StorageError};

#[derive(Debug, Clone, Copy)]
pub struct LocalStorageBackend {
    available: bool,
}

impl LocalStorageBackend {
    pub fn new() -> Self {
        Self {
            available: probe(),
        }
    }
}

impl Default for LocalStorageBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn probe() -> bool {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .is_some()
}

fn backend_error(e: JsValue) -> StorageError {
    StorageError::Backend(format!("{:?}", e))
}

impl StorageBackend for LocalStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        LocalStorage::raw().get_item(key).map_err(backend_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        // Quota errors surface here.
        LocalStorage::raw().set_item(key, value).map_err(backend_error)
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// Drop the blob stored under `namespace`.
pub fn clear(namespace: &str) {
    if probe() {
        LocalStorage::delete(namespace);
        tracing::debug!(%namespace, "cleared document store");
    }
}
