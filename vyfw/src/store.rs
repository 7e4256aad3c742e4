//! Document store adapter.
//!
//! The persistence backend is an external collaborator; the core only
//! needs get/put/delete-by-key plus the two partial-key listings. Writes
//! are atomic upserts, which is where last-writer-wins semantics for
//! concurrent mutation of the same firewall live.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Address of a stored document within a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKey {
    /// The live document for a firewall.
    Current { firewall: String },
    /// An immutable point-in-time copy.
    Snapshot { firewall: String, label: String },
}

impl DocumentKey {
    pub fn current(firewall: impl Into<String>) -> Self {
        DocumentKey::Current {
            firewall: firewall.into(),
        }
    }

    pub fn snapshot(firewall: impl Into<String>, label: impl Into<String>) -> Self {
        DocumentKey::Snapshot {
            firewall: firewall.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend I/O failure: {0}")]
    Io(#[from] io::Error),
    #[error("stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Get/put/delete-by-key document persistence.
///
/// `put` is an atomic upsert. Current documents never carry snapshot
/// linkage keys and snapshots always do; [`normalize_for_key`] enforces
/// that on every write, whatever the backend.
pub trait DocumentStore {
    fn get(&self, collection: &str, key: &DocumentKey) -> Result<Option<Value>, StoreError>;
    fn put(&mut self, collection: &str, key: &DocumentKey, doc: Value) -> Result<(), StoreError>;
    /// Returns whether a document was present.
    fn delete(&mut self, collection: &str, key: &DocumentKey) -> Result<bool, StoreError>;
    /// Names of documents stored without snapshot linkage.
    fn list_firewalls(&self, collection: &str) -> Result<Vec<String>, StoreError>;
    /// Snapshot payloads for one firewall, in no particular order.
    fn list_snapshots(&self, collection: &str, firewall: &str) -> Result<Vec<Value>, StoreError>;
}

/// Strip or attach snapshot linkage so the payload matches its key:
/// current documents lose `_id`, `firewall`, `snapshot`, and `tag`;
/// snapshots lose `_id` and gain `firewall` and `snapshot`.
pub fn normalize_for_key(key: &DocumentKey, doc: &mut Value) {
    let Some(map) = doc.as_object_mut() else {
        return;
    };
    map.remove("_id");
    match key {
        DocumentKey::Current { .. } => {
            map.remove("firewall");
            map.remove("snapshot");
            map.remove("tag");
        }
        DocumentKey::Snapshot { firewall, label } => {
            map.insert("firewall".to_string(), Value::String(firewall.clone()));
            map.insert("snapshot".to_string(), Value::String(label.clone()));
        }
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    // (firewall, label) -> payload; an empty label marks the current doc.
    collections: BTreeMap<String, BTreeMap<(String, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn memory_key(key: &DocumentKey) -> (String, String) {
    match key {
        DocumentKey::Current { firewall } => (firewall.clone(), String::new()),
        DocumentKey::Snapshot { firewall, label } => (firewall.clone(), label.clone()),
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, collection: &str, key: &DocumentKey) -> Result<Option<Value>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(&memory_key(key)))
            .cloned())
    }

    fn put(&mut self, collection: &str, key: &DocumentKey, mut doc: Value) -> Result<(), StoreError> {
        normalize_for_key(key, &mut doc);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(memory_key(key), doc);
        Ok(())
    }

    fn delete(&mut self, collection: &str, key: &DocumentKey) -> Result<bool, StoreError> {
        Ok(self
            .collections
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(&memory_key(key)).is_some()))
    }

    fn list_firewalls(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.keys()
                    .filter(|(_, label)| label.is_empty())
                    .map(|(firewall, _)| firewall.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_snapshots(&self, collection: &str, firewall: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|((fw, label), _)| fw == firewall && !label.is_empty())
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Filesystem store: one JSON file per document, one directory per
/// collection. Snapshot files are named `<firewall>@<label>.json`.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn document_path(&self, collection: &str, key: &DocumentKey) -> PathBuf {
        let file = match key {
            DocumentKey::Current { firewall } => format!("{firewall}.json"),
            DocumentKey::Snapshot { firewall, label } => format!("{firewall}@{label}.json"),
        };
        self.root.join(collection).join(file)
    }

    fn collection_files(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.root.join(collection);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if let Some(stem) = name.strip_suffix(".json") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl DocumentStore for FsStore {
    fn get(&self, collection: &str, key: &DocumentKey) -> Result<Option<Value>, StoreError> {
        let path = self.document_path(collection, key);
        debug!(path = %path.display(), "reading document");
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&mut self, collection: &str, key: &DocumentKey, mut doc: Value) -> Result<(), StoreError> {
        normalize_for_key(key, &mut doc);
        let path = self.document_path(collection, key);
        debug!(path = %path.display(), "writing document");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename keeps the upsert atomic for concurrent readers.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&doc)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&mut self, collection: &str, key: &DocumentKey) -> Result<bool, StoreError> {
        let path = self.document_path(collection, key);
        debug!(path = %path.display(), "deleting document");
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn list_firewalls(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .collection_files(collection)?
            .into_iter()
            .filter(|name| !name.contains('@'))
            .collect())
    }

    fn list_snapshots(&self, collection: &str, firewall: &str) -> Result<Vec<Value>, StoreError> {
        let prefix = format!("{firewall}@");
        let mut out = Vec::new();
        for name in self.collection_files(collection)? {
            let Some(label) = name.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let key = DocumentKey::snapshot(firewall, label);
            if let Some(doc) = self.get(collection, &key)? {
                out.push(doc);
            }
        }
        Ok(out)
    }
}
