//! Partition listener: applies feed batches to one store partition.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use bytes::Bytes;

use policydb_core::error::PolicyDbError;

use crate::feed::StreamListener;
use crate::store::{ObjectMap, Partition};

/// One entry that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub key: String,
    pub error: PolicyDbError,
}

/// Outcome of applying one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub upserted: usize,
    /// Deletes that removed an existing key.
    pub deleted: usize,
    pub failures: Vec<EntryFailure>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Binds one feed stream to one `ObjectMap`.
///
/// Upserts are decoded through the partition codec and written last-write-wins;
/// deletes of absent keys are no-ops. A bad entry is skipped without touching
/// the rest of the batch.
pub struct PartitionListener {
    map: Arc<ObjectMap>,
}

impl PartitionListener {
    pub fn new(map: Arc<ObjectMap>) -> Self {
        Self { map }
    }

    pub fn partition(&self) -> Partition {
        self.map.partition()
    }
}

impl StreamListener for PartitionListener {
    fn stream_name(&self) -> &'static str {
        self.map.partition().stream_name()
    }

    fn apply(&self, upserts: &BTreeMap<String, Bytes>, deletes: &BTreeSet<String>) -> ApplyReport {
        let mut report = ApplyReport::default();
        let partition = self.map.partition();

        for (key, raw) in upserts {
            let res = self.map.codec().decode(raw).and_then(|value| {
                if !partition.accepts(&value) {
                    return Err(PolicyDbError::TypeMismatch {
                        namespace: self.map.namespace().to_string(),
                        key: key.clone(),
                        expected: partition.expected_kind(),
                        found: value.kind_name(),
                    });
                }
                self.map.set(key, &value)
            });

            match res {
                Ok(()) => report.upserted += 1,
                Err(error) => {
                    tracing::warn!(partition = partition.as_str(), key = %key, %error, "skipping feed upsert");
                    report.failures.push(EntryFailure { key: key.clone(), error });
                }
            }
        }

        for key in deletes {
            match self.map.delete(key) {
                Ok(true) => report.deleted += 1,
                Ok(false) => {}
                Err(error) => {
                    tracing::warn!(partition = partition.as_str(), key = %key, %error, "skipping feed delete");
                    report.failures.push(EntryFailure { key: key.clone(), error });
                }
            }
        }

        tracing::debug!(
            partition = partition.as_str(),
            upserted = report.upserted,
            deleted = report.deleted,
            failed = report.failures.len(),
            "applied feed batch"
        );
        report
    }
}
