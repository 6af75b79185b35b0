//! `window.localStorage` as a [`Storage`].

use crate::error::describe_js;
use livepen_traits::{Storage, StorageError};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    pub fn new() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window object".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(describe_js(&e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { inner })
    }
}

fn is_quota_error(value: &JsValue) -> bool {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.name()) == "QuotaExceededError")
        .unwrap_or(false)
}

impl Storage for LocalStorage {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(|e| {
            if is_quota_error(&e) {
                StorageError::QuotaExceeded(key.to_string())
            } else {
                StorageError::WriteFailed {
                    key: key.to_string(),
                    message: describe_js(&e),
                }
            }
        })
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::ReadFailed {
                key: key.to_string(),
                message: describe_js(&e),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner
            .remove_item(key)
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: describe_js(&e),
            })
    }

    fn name(&self) -> &'static str {
        "LocalStorage"
    }
}
