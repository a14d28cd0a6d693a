use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};
use tracing::debug;
use xmlrel_core::{Result, Schema};

/// Compiled mappings, keyed by the identity of their source.
///
/// A mapping is compiled at most once per key. Concurrent callers asking
/// for a key that is being compiled wait for that compilation and share its
/// result. A failed compilation is not cached.
#[derive(Debug, Default)]
pub struct MappingCache {
    entries: Mutex<HashMap<String, Arc<Entry>>>,
}

/// One key's slot. Its lock is held while the mapping compiles.
#[derive(Debug, Default)]
struct Entry {
    schema: Mutex<Option<Arc<Schema>>>,
}

impl MappingCache {
    pub fn new() -> MappingCache {
        MappingCache::default()
    }

    /// The process-wide cache.
    pub fn global() -> &'static MappingCache {
        static GLOBAL: OnceLock<MappingCache> = OnceLock::new();
        GLOBAL.get_or_init(MappingCache::new)
    }

    /// Returns the mapping compiled for `key`, calling `compile` if there is
    /// none yet.
    pub fn get_or_compile<F>(&self, key: impl Into<String>, compile: F) -> Result<Arc<Schema>>
    where
        F: FnOnce() -> Result<Schema>,
    {
        let key = key.into();

        let entry = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.entry(key.clone()).or_default().clone()
        };

        let mut schema = entry.schema.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(schema) = &*schema {
            return Ok(schema.clone());
        }

        debug!(key = %key, "compiling mapping");
        let compiled = Arc::new(compile()?);
        *schema = Some(compiled.clone());

        Ok(compiled)
    }

    /// Returns the mapping compiled for `key`, if any.
    pub fn get(&self, key: &str) -> Option<Arc<Schema>> {
        let entry = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()?;

        let schema = entry.schema.lock().unwrap_or_else(PoisonError::into_inner);
        schema.clone()
    }

    /// Drops the mapping compiled for `key`. Callers already holding it keep
    /// their copy.
    pub fn remove(&self, key: &str) -> Option<Arc<Schema>> {
        let entry = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)?;

        let schema = entry.schema.lock().unwrap_or_else(PoisonError::into_inner);
        schema.clone()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
