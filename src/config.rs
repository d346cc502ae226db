//! Store configuration
//!
//! Selects and opens a backend from a small serde-friendly description, so the
//! choice can live in a config file or be passed in by the host.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::persistence::{FileStore, MemoryStore, Namespaced, Store};

/// Which backend to open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Backend {
    /// In-process map, gone when the process exits
    #[default]
    Memory,
    /// JSON file at `path`
    File { path: PathBuf },
    /// Browser LocalStorage (wasm32 only)
    Local,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Memory => "memory",
            Backend::File { .. } => "file",
            Backend::Local => "local",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Prefix applied to every key, `None` for the raw key space
    #[serde(default)]
    pub namespace: Option<String>,
    /// Byte limit for the memory backend
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File { path: path.into() },
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Corrupt(format!("store config: {}", e)))
    }

    /// Open the configured backend
    pub fn open(&self) -> Result<Box<dyn Store>, StoreError> {
        let store: Box<dyn Store> = match &self.backend {
            Backend::Memory => match self.quota_bytes {
                Some(quota) => Box::new(MemoryStore::with_quota(quota)),
                None => Box::new(MemoryStore::new()),
            },
            Backend::File { path } => Box::new(FileStore::open(path.clone())?),
            Backend::Local => open_local()?,
        };
        log::info!("Opened {} store", self.backend.as_str());

        Ok(match &self.namespace {
            Some(ns) => Box::new(Namespaced::new(ns.clone(), store)),
            None => store,
        })
    }
}

#[cfg(target_arch = "wasm32")]
fn open_local() -> Result<Box<dyn Store>, StoreError> {
    Ok(Box::new(crate::persistence::LocalStorage::open()?))
}

#[cfg(not(target_arch = "wasm32"))]
fn open_local() -> Result<Box<dyn Store>, StoreError> {
    Err(StoreError::Unavailable(
        "LocalStorage is only available in the browser".to_string(),
    ))
}
