//! Persistence adapter: named document snapshots in a string key-value store.
//!
//! Each saved document lives under `<namespace><title>` as a JSON
//! `DocumentRecord`. Saving under an existing title overwrites it.

use dg_core::{DocumentRecord, Result};
use std::collections::BTreeMap;

pub const DEFAULT_NAMESPACE: &str = "diagram:";

/// Minimal string store: browser localStorage, a file, or memory.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    /// Returns whether the key existed.
    fn remove(&mut self, key: &str) -> Result<bool>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-process store, used by tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Typed view over a `KeyValueStore`.
pub struct SnapshotStore {
    backend: Box<dyn KeyValueStore>,
    namespace: String,
}

impl SnapshotStore {
    pub fn new(backend: Box<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            backend,
            namespace: namespace.to_string(),
        }
    }

    /// A `MemoryStore` under the default namespace.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), DEFAULT_NAMESPACE)
    }

    fn key(&self, title: &str) -> String {
        format!("{}{}", self.namespace, title)
    }

    pub fn save(&mut self, record: &DocumentRecord) -> Result<()> {
        let key = self.key(&record.title);
        self.backend.set(&key, record.to_json()?)?;
        log::info!("saved {key} ({} nodes)", record.nodes.len());
        Ok(())
    }

    pub fn load(&self, title: &str) -> Result<Option<DocumentRecord>> {
        match self.backend.get(&self.key(title))? {
            Some(json) => Ok(Some(DocumentRecord::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Saved titles, sorted.
    pub fn titles(&self) -> Result<Vec<String>> {
        let mut titles: Vec<String> = self
            .backend
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.namespace).map(str::to_string))
            .collect();
        titles.sort();
        Ok(titles)
    }

    pub fn remove(&mut self, title: &str) -> Result<bool> {
        let key = self.key(title);
        self.backend.remove(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dg_core::{Graph, NodeStyle, Point};
    use pretty_assertions::assert_eq;

    fn record(title: &str) -> DocumentRecord {
        let mut graph = Graph::new();
        graph.add_node(Point::new(1.0, 2.0), Some("A"), NodeStyle::default());
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        DocumentRecord::capture(title, &graph, at)
    }

    #[test]
    fn save_then_load() {
        let mut store = SnapshotStore::in_memory();
        store.save(&record("Flow")).unwrap();
        assert_eq!(store.load("Flow").unwrap(), Some(record("Flow")));
        assert_eq!(store.load("Missing").unwrap(), None);
    }

    #[test]
    fn titles_ignore_foreign_keys() {
        let mut backend = MemoryStore::new();
        backend.set("settings", "{}".to_string()).unwrap();
        let mut store = SnapshotStore::new(Box::new(backend), DEFAULT_NAMESPACE);
        store.save(&record("b")).unwrap();
        store.save(&record("a")).unwrap();
        assert_eq!(store.titles().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn remove_reports_existence() {
        let mut store = SnapshotStore::in_memory();
        store.save(&record("x")).unwrap();
        assert!(store.remove("x").unwrap());
        assert!(!store.remove("x").unwrap());
    }

    #[test]
    fn corrupt_entry_is_a_validation_error() {
        let mut backend = MemoryStore::new();
        backend.set("diagram:bad", "not json".to_string()).unwrap();
        let store = SnapshotStore::new(Box::new(backend), DEFAULT_NAMESPACE);
        let err = store.load("bad").unwrap_err();
        assert_eq!(err.kind(), dg_core::ErrorKind::Validation);
    }
}
