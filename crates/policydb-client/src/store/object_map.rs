use std::sync::Arc;

use policydb_core::codec::Codec;
use policydb_core::error::{PolicyDbError, Result};
use policydb_core::{BaseNameSet, PolicyRule, StoredValue};

use super::Backend;

/// Which entity kind a namespace holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Rules,
    BaseNames,
}

impl Partition {
    /// Feed stream that carries updates for this partition.
    pub fn stream_name(self) -> &'static str {
        match self {
            Partition::Rules => "policydb",
            Partition::BaseNames => "base_names",
        }
    }

    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Partition::Rules => "rules",
            Partition::BaseNames => "base_names",
        }
    }

    pub fn expected_kind(self) -> &'static str {
        match self {
            Partition::Rules => StoredValue::RULE,
            Partition::BaseNames => StoredValue::BASE_NAMES,
        }
    }

    pub fn accepts(self, value: &StoredValue) -> bool {
        matches!(
            (self, value),
            (Partition::Rules, StoredValue::Rule(_)) | (Partition::BaseNames, StoredValue::BaseNames(_))
        )
    }
}

/// One namespace of the backend with its registered codec.
///
/// Values are encoded on write and decoded on every read; the typed
/// accessors are the only place where the decoded kind is checked.
pub struct ObjectMap {
    namespace: String,
    partition: Partition,
    backend: Arc<dyn Backend>,
    codec: Arc<dyn Codec>,
}

impl ObjectMap {
    pub fn new(
        backend: Arc<dyn Backend>,
        namespace: impl Into<String>,
        partition: Partition,
        codec: Arc<dyn Codec>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            partition,
            backend,
            codec,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    /// Decoded value for `key`, of whatever kind the codec produced.
    pub fn get(&self, key: &str) -> Result<StoredValue> {
        let raw = self
            .backend
            .get(&self.namespace, key)?
            .ok_or_else(|| PolicyDbError::not_found(&self.namespace, key))?;
        self.codec.decode(&raw)
    }

    pub fn set(&self, key: &str, value: &StoredValue) -> Result<()> {
        let raw = self.codec.encode(value)?;
        self.backend.set(&self.namespace, key, raw)
    }

    pub fn delete(&self, key: &str) -> Result<bool> {
        self.backend.delete(&self.namespace, key)
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        self.backend.keys(&self.namespace)
    }

    pub fn get_rule(&self, id: &str) -> Result<PolicyRule> {
        match self.get(id)? {
            StoredValue::Rule(rule) => Ok(rule),
            other => Err(self.mismatch(id, StoredValue::RULE, &other)),
        }
    }

    pub fn get_base_names(&self, name: &str) -> Result<BaseNameSet> {
        match self.get(name)? {
            StoredValue::BaseNames(set) => Ok(set),
            other => Err(self.mismatch(name, StoredValue::BASE_NAMES, &other)),
        }
    }

    fn mismatch(&self, key: &str, expected: &'static str, found: &StoredValue) -> PolicyDbError {
        PolicyDbError::TypeMismatch {
            namespace: self.namespace.clone(),
            key: key.to_string(),
            expected,
            found: found.kind_name(),
        }
    }
}
