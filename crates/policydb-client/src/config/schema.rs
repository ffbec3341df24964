use std::path::PathBuf;

use serde::Deserialize;
use policydb_core::error::{PolicyDbError, Result};

use crate::store::Namespaces;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub version: u32,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub feed: FeedSection,

    #[serde(default)]
    pub http: HttpSection,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PolicyDbError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.store.validate()?;
        self.feed.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_rules_namespace")]
    pub rules_namespace: String,

    #[serde(default = "default_base_names_namespace")]
    pub base_names_namespace: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            rules_namespace: default_rules_namespace(),
            base_names_namespace: default_base_names_namespace(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if self.rules_namespace.trim().is_empty() || self.base_names_namespace.trim().is_empty() {
            return Err(PolicyDbError::BadConfig(
                "store namespaces must not be empty".into(),
            ));
        }
        if self.rules_namespace == self.base_names_namespace {
            return Err(PolicyDbError::BadConfig(
                "store.rules_namespace and store.base_names_namespace must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn namespaces(&self) -> Namespaces {
        Namespaces {
            rules: self.rules_namespace.clone(),
            base_names: self.base_names_namespace.clone(),
        }
    }
}

fn default_rules_namespace() -> String {
    "policydb:rules".into()
}
fn default_base_names_namespace() -> String {
    "policydb:base_names".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedSourceKind {
    #[default]
    Channel,
    Snapshot,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedSection {
    #[serde(default)]
    pub source: FeedSourceKind,

    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            source: FeedSourceKind::default(),
            snapshot_path: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl FeedSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=65536).contains(&self.channel_capacity) {
            return Err(PolicyDbError::BadConfig(
                "feed.channel_capacity must be between 1 and 65536".into(),
            ));
        }
        if self.source == FeedSourceKind::Snapshot && self.snapshot_path.is_none() {
            return Err(PolicyDbError::BadConfig(
                "feed.snapshot_path is required when feed.source is snapshot".into(),
            ));
        }
        Ok(())
    }
}

fn default_channel_capacity() -> usize {
    64
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8090".into()
}
