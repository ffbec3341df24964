//! Agent config loader (strict parsing).

pub mod schema;

use std::fs;

use policydb_core::error::{PolicyDbError, Result};

pub use schema::{AgentConfig, BackendKind, FeedSection, FeedSourceKind, HttpSection, StoreSection};

pub fn load_from_file(path: &str) -> Result<AgentConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PolicyDbError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AgentConfig> {
    let cfg: AgentConfig = serde_yaml::from_str(s)
        .map_err(|e| PolicyDbError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
