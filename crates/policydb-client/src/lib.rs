//! policydb client library entry.
//!
//! This crate wires the value store, the update feed, the partition listeners
//! and the policy query client into one stack, and exposes it over HTTP. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod client;
pub mod config;
pub mod feed;
pub mod http;
pub mod listener;
pub mod obs;
pub mod router;
pub mod store;

pub use client::{PolicyDbClient, PolicyLookup};
