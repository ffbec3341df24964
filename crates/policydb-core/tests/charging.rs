#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use policydb_core::{derive_charging_key, needs_charging, ChargingKey, PolicyRule, TrackingType};

#[test]
fn needs_charging_only_for_ocs_tracking() {
    for tracking in TrackingType::ALL {
        let rule = PolicyRule::new("r", 1, tracking);
        let expected = matches!(tracking, TrackingType::OnlyOcs | TrackingType::OcsAndPcrf);
        assert_eq!(needs_charging(&rule), expected, "tracking={tracking:?}");
    }
}

#[test]
fn key_without_service_identifier_is_zeroed() {
    let rule = PolicyRule::new("r", 5, TrackingType::OnlyOcs);
    let key = derive_charging_key(&rule);
    assert_eq!(
        key,
        ChargingKey { rating_group: 5, service_id_tracking: false, service_identifier: 0 }
    );
}

#[test]
fn key_tracks_service_identifier_when_present() {
    // Zero is a valid override and must still count as present.
    for sid in [0, 3, u32::MAX] {
        let rule = PolicyRule::new("r", 7, TrackingType::OcsAndPcrf).with_service_identifier(sid);
        let key = derive_charging_key(&rule);
        assert!(key.service_id_tracking);
        assert_eq!(key.service_identifier, sid);
        assert_eq!(key.rating_group, 7);
    }
}

#[test]
fn tracking_flag_matches_presence_for_every_tracking_type() {
    for tracking in TrackingType::ALL {
        for sid in [None, Some(11)] {
            let mut rule = PolicyRule::new("r", 2, tracking);
            rule.service_identifier = sid;
            let key = derive_charging_key(&rule);
            assert_eq!(key.service_id_tracking, sid.is_some());
            if !key.service_id_tracking {
                assert_eq!(key.service_identifier, 0);
            }
        }
    }
}

#[test]
fn display_format() {
    let key = ChargingKey { rating_group: 7, service_id_tracking: true, service_identifier: 3 };
    assert_eq!(
        key.to_string(),
        "ChargingKey: RatingGroup = 7, ServiceIdTracking = true, ServiceIdentifier = 3"
    );
}
