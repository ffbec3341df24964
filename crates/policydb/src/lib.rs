//! Top-level facade crate for policydb.
//!
//! Re-exports the core model and the query client so users can depend on a single crate.

pub mod core {
    pub use policydb_core::*;
}

pub mod client {
    pub use policydb_client::*;
}
