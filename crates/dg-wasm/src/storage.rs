//! `localStorage`-backed key-value store.

use dg_core::{Error, Result};
use dg_editor::KeyValueStore;
use wasm_bindgen::JsValue;
use web_sys::Storage;

pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// The window's `localStorage`, if the page is allowed to use it.
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

fn js_error(value: JsValue) -> Error {
    Error::Store(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        // Quota errors surface here.
        self.storage.set_item(key, &value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let existed = self.get(key)?.is_some();
        self.storage.remove_item(key).map_err(js_error)?;
        Ok(existed)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let len = self.storage.length().map_err(js_error)?;
        (0..len)
            .filter_map(|i| self.storage.key(i).transpose())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(js_error)
    }
}
