//! Value store: raw byte backends plus codec-bound namespace maps.
//!
//! The store is split in two partitions (rules, base names). They share a
//! backend but are never written together, so a reader may see one updated
//! before the other.

mod backend;
mod object_map;

pub use backend::{Backend, InMemoryBackend};
pub use object_map::{ObjectMap, Partition};

/// Namespace names of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    pub rules: String,
    pub base_names: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            rules: "policydb:rules".into(),
            base_names: "policydb:base_names".into(),
        }
    }
}
