use std::collections::{BTreeMap, BTreeSet};

use bytes::Bytes;
use serde::Deserialize;

use policydb_core::error::{PolicyDbError, Result};

/// One upsert/delete batch for a single stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBatch {
    pub stream: String,
    /// Key -> encoded value, in the partition codec's format.
    pub upserts: BTreeMap<String, Bytes>,
    pub deletes: BTreeSet<String>,
}

impl UpdateBatch {
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            ..Self::default()
        }
    }

    pub fn upsert(mut self, key: impl Into<String>, raw: impl Into<Bytes>) -> Self {
        self.upserts.insert(key.into(), raw.into());
        self
    }

    pub fn delete(mut self, key: impl Into<String>) -> Self {
        self.deletes.insert(key.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }
}

/// Snapshot file entry. Upsert values are inline JSON documents and are
/// re-encoded to bytes unchanged, so the partition codec still decides
/// whether they are valid.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SnapshotBatch {
    pub stream: String,
    #[serde(default)]
    pub upserts: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub deletes: BTreeSet<String>,
}

impl SnapshotBatch {
    pub(crate) fn into_batch(self) -> Result<UpdateBatch> {
        let mut batch = UpdateBatch::new(self.stream);
        batch.deletes = self.deletes;
        for (key, doc) in self.upserts {
            let raw = serde_json::to_vec(&doc)
                .map_err(|e| PolicyDbError::Internal(format!("snapshot re-encode failed: {e}")))?;
            batch.upserts.insert(key, Bytes::from(raw));
        }
        Ok(batch)
    }
}
