use std::sync::{Arc, Mutex};

use policydb_core::error::PolicyDbError;

use crate::obs::metrics::PolicyDbMetrics;

/// Batch operation that skipped an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOp {
    ChargingKeys,
    ExpandBaseNames,
}

impl BatchOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BatchOp::ChargingKeys => "charging_keys",
            BatchOp::ExpandBaseNames => "expand_base_names",
        }
    }
}

/// One item a batch operation left out of its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub op: BatchOp,
    pub item: String,
    pub error: PolicyDbError,
}

/// Sink for per-item failures of best-effort batch operations.
pub trait Diagnostics: Send + Sync {
    fn skipped(&self, skip: Skipped);
}

/// Default sink: warning log plus a skip counter.
pub struct TracingDiagnostics {
    metrics: Arc<PolicyDbMetrics>,
}

impl TracingDiagnostics {
    pub fn new(metrics: Arc<PolicyDbMetrics>) -> Self {
        Self { metrics }
    }
}

impl Diagnostics for TracingDiagnostics {
    fn skipped(&self, skip: Skipped) {
        let reason = skip.error.kind().as_str();
        self.metrics
            .batch_skips
            .inc(&[("op", skip.op.as_str()), ("reason", reason)]);
        tracing::warn!(op = skip.op.as_str(), item = %skip.item, error = %skip.error, "batch item skipped");
    }
}

/// Keeps every skip in memory so callers can inspect them.
#[derive(Default)]
pub struct RecordingDiagnostics {
    records: Mutex<Vec<Skipped>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Skipped> {
        match self.records.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drain recorded skips.
    pub fn take(&self) -> Vec<Skipped> {
        match self.records.lock() {
            Ok(mut g) => std::mem::take(&mut *g),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn skipped(&self, skip: Skipped) {
        match self.records.lock() {
            Ok(mut g) => g.push(skip),
            Err(poisoned) => poisoned.into_inner().push(skip),
        }
    }
}
