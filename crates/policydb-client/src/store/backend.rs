use bytes::Bytes;
use dashmap::DashMap;

use policydb_core::error::Result;

/// Raw key-value backend, partitioned by namespace.
///
/// Implementations must allow concurrent reads and writes from any thread.
pub trait Backend: Send + Sync {
    /// Reachability check used at construction.
    fn ping(&self) -> Result<()>;
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Bytes>>;
    fn set(&self, namespace: &str, key: &str, value: Bytes) -> Result<()>;
    /// Returns whether the key was present.
    fn delete(&self, namespace: &str, key: &str) -> Result<bool>;
    fn keys(&self, namespace: &str) -> Result<Vec<String>>;
}

/// Process-local backend: `namespace -> (key -> bytes)`.
#[derive(Default)]
pub struct InMemoryBackend {
    spaces: DashMap<String, DashMap<String, Bytes>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            spaces: DashMap::new(),
        }
    }
}

impl Backend for InMemoryBackend {
    fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn get(&self, namespace: &str, key: &str) -> Result<Option<Bytes>> {
        let Some(space) = self.spaces.get(namespace) else { return Ok(None); };
        let value = space.get(key).map(|v| v.value().clone());
        Ok(value)
    }

    fn set(&self, namespace: &str, key: &str, value: Bytes) -> Result<()> {
        self.spaces
            .entry(namespace.to_string())
            .or_insert_with(DashMap::new)
            .insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<bool> {
        Ok(self
            .spaces
            .get(namespace)
            .map(|space| space.remove(key).is_some())
            .unwrap_or(false))
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>> {
        let Some(space) = self.spaces.get(namespace) else { return Ok(vec![]); };
        let mut keys: Vec<String> = space.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}
