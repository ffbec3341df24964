//! Namespace codecs (panic-free).
//!
//! Every partition registers one codec. Decoding always yields a tagged
//! `StoredValue`; whether the variant fits the partition is decided by the
//! reader, not here.

use bytes::Bytes;

use crate::error::{PolicyDbError, Result};
use crate::model::StoredValue;

/// Encode/decode pair registered for a store namespace.
pub trait Codec: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;
    fn encode(&self, value: &StoredValue) -> Result<Bytes>;
    fn decode(&self, raw: &[u8]) -> Result<StoredValue>;
}

/// JSON codec: `{"kind": "rule" | "base_names", ...fields}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, value: &StoredValue) -> Result<Bytes> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| PolicyDbError::Internal(format!("json encode failed: {e}")))
    }

    fn decode(&self, raw: &[u8]) -> Result<StoredValue> {
        if raw.is_empty() {
            return Err(PolicyDbError::DecodeFailure("empty payload".into()));
        }
        serde_json::from_slice(raw)
            .map_err(|e| PolicyDbError::DecodeFailure(format!("invalid json value: {e}")))
    }
}
