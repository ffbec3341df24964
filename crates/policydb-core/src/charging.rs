//! Charging-key derivation.
//!
//! A charging key names the usage-reporting bucket for a rule: the rating
//! group alone, or the rating group plus a service identifier when the rule
//! carries one. Keys are recomputed on every query and never stored.

use std::fmt;

use serde::Serialize;

use crate::model::{PolicyRule, TrackingType};

/// Reporting key for a charging rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChargingKey {
    pub rating_group: u32,
    pub service_id_tracking: bool,
    /// Zero unless `service_id_tracking` is set.
    pub service_identifier: u32,
}

impl fmt::Display for ChargingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChargingKey: RatingGroup = {}, ServiceIdTracking = {}, ServiceIdentifier = {}",
            self.rating_group, self.service_id_tracking, self.service_identifier
        )
    }
}

/// True when the rule requires online (OCS) usage reporting.
pub fn needs_charging(rule: &PolicyRule) -> bool {
    matches!(
        rule.tracking_type,
        TrackingType::OnlyOcs | TrackingType::OcsAndPcrf
    )
}

/// Build the charging key for a rule.
pub fn derive_charging_key(rule: &PolicyRule) -> ChargingKey {
    ChargingKey {
        rating_group: rule.rating_group,
        service_id_tracking: rule.service_identifier.is_some(),
        service_identifier: rule.service_identifier.unwrap_or(0),
    }
}
