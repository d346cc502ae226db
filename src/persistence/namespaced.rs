//! Prefixed view over another store

use super::Store;
use crate::error::StoreError;

/// Maps every key `k` to `"{namespace}:{k}"` in the inner store
#[derive(Debug)]
pub struct Namespaced<S> {
    namespace: String,
    inner: S,
}

impl<S: Store> Namespaced<S> {
    pub fn new(namespace: impl Into<String>, inner: S) -> Self {
        Self {
            namespace: namespace.into(),
            inner,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

impl<S: Store> Store for Namespaced<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(&self.scoped(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(&self.scoped(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.scoped(key))
    }
}
