//! Policy data model mirrored from the update feed.
//!
//! Field names follow the wire representation used by feed producers, so the
//! same types serve the codecs and the HTTP query surface.

use serde::{Deserialize, Serialize};

/// How usage for a rule is reported: online (OCS), offline (PCRF), both, or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingType {
    #[default]
    NoTracking,
    OnlyOcs,
    OnlyPcrf,
    OcsAndPcrf,
}

impl TrackingType {
    pub const ALL: [TrackingType; 4] = [
        TrackingType::NoTracking,
        TrackingType::OnlyOcs,
        TrackingType::OnlyPcrf,
        TrackingType::OcsAndPcrf,
    ];
}

/// A policy rule as distributed by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub id: String,
    #[serde(default)]
    pub rating_group: u32,
    #[serde(default)]
    pub tracking_type: TrackingType,
    /// Service identifier override. `None` means the rule is charged by rating group only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_identifier: Option<u32>,
    #[serde(default)]
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_key: Option<String>,
}

impl PolicyRule {
    /// Rule with the given id and tracking type; everything else zeroed.
    pub fn new(id: impl Into<String>, rating_group: u32, tracking_type: TrackingType) -> Self {
        Self {
            id: id.into(),
            rating_group,
            tracking_type,
            service_identifier: None,
            priority: 0,
            monitoring_key: None,
        }
    }

    pub fn with_service_identifier(mut self, sid: u32) -> Self {
        self.service_identifier = Some(sid);
        self
    }
}

/// Ordered member rule ids of one charging rule base name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseNameSet {
    #[serde(default)]
    pub rule_names: Vec<String>,
}

impl BaseNameSet {
    pub fn new<I, S>(rule_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rule_names: rule_names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decoded store value. Codecs always produce one of these; callers check the
/// variant once when reading a partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoredValue {
    Rule(PolicyRule),
    BaseNames(BaseNameSet),
}

impl StoredValue {
    /// Entity kind name used in type-mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StoredValue::Rule(_) => StoredValue::RULE,
            StoredValue::BaseNames(_) => StoredValue::BASE_NAMES,
        }
    }

    pub const RULE: &'static str = "policy_rule";
    pub const BASE_NAMES: &'static str = "base_name_set";
}

impl From<PolicyRule> for StoredValue {
    fn from(rule: PolicyRule) -> Self {
        StoredValue::Rule(rule)
    }
}

impl From<BaseNameSet> for StoredValue {
    fn from(set: BaseNameSet) -> Self {
        StoredValue::BaseNames(set)
    }
}
