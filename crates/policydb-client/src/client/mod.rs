//! Policy query client: rule lookup, base-name expansion and charging keys.
//!
//! Construction wires the store partitions, their listeners and the feed in
//! that order; after that the client holds no mutable state and can be
//! shared freely across tasks.

mod diagnostics;
mod policy_client;

pub use diagnostics::{BatchOp, Diagnostics, RecordingDiagnostics, Skipped, TracingDiagnostics};
pub use policy_client::{PolicyDbClient, PolicyLookup};
