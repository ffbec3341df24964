//! policydb core: policy rule model, charging-key derivation, codecs and the
//! shared error surface.
//!
//! This crate carries no storage or runtime dependencies so the model and the
//! codecs can be reused by the client, by feed producers and by test tooling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed stored
//! bytes surface as `PolicyDbError::DecodeFailure`, never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod charging;
pub mod codec;
pub mod error;
pub mod model;

/// Shared result type.
pub use error::{ErrorKind, PolicyDbError, Result};
pub use charging::{derive_charging_key, needs_charging, ChargingKey};
pub use model::{BaseNameSet, PolicyRule, StoredValue, TrackingType};
