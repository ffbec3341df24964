#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use policydb_client::client::BatchOp;
use policydb_client::PolicyLookup;
use policydb_core::{ChargingKey, ErrorKind, PolicyRule, TrackingType};

use fixtures::{ids, Harness};

fn key(rating_group: u32, service_id_tracking: bool, service_identifier: u32) -> ChargingKey {
    ChargingKey { rating_group, service_id_tracking, service_identifier }
}

#[test]
fn resolve_rule_returns_stored_rule() {
    let h = Harness::new();
    let rule = PolicyRule::new("R1", 5, TrackingType::OnlyOcs).with_service_identifier(4);
    h.put_rule(rule.clone());

    assert_eq!(h.client.resolve_rule("R1").unwrap(), rule);
}

#[test]
fn resolve_missing_rule_is_not_found() {
    let h = Harness::new();
    let err = h.client.resolve_rule("missing").expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn resolve_wrong_kind_is_type_mismatch() {
    let h = Harness::new();
    h.put_raw("policydb:rules", "bn-in-rules", br#"{"kind":"base_names","rule_names":["a"]}"#);

    let err = h.client.resolve_rule("bn-in-rules").expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn resolve_corrupt_bytes_is_decode_failure() {
    let h = Harness::new();
    h.put_raw("policydb:rules", "broken", b"\x00\x01not json");

    let err = h.client.resolve_rule("broken").expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::DecodeFailure);
}

#[test]
fn charging_keys_scenario() {
    let h = Harness::new();
    h.put_rule(PolicyRule::new("R1", 5, TrackingType::OnlyOcs));
    h.put_rule(PolicyRule::new("R2", 6, TrackingType::OnlyPcrf));
    let d1 = PolicyRule::new("D1", 7, TrackingType::OcsAndPcrf).with_service_identifier(3);

    let keys = h.client.derive_charging_keys(&ids(&["R1", "missing", "R2"]), &[d1]);
    assert_eq!(keys, vec![key(5, false, 0), key(7, true, 3)]);

    let skips = h.diagnostics.take();
    assert_eq!(skips.len(), 1);
    assert_eq!(skips[0].op, BatchOp::ChargingKeys);
    assert_eq!(skips[0].item, "missing");
    assert_eq!(skips[0].error.kind(), ErrorKind::NotFound);
}

#[test]
fn static_keys_precede_dynamic_keys() {
    let h = Harness::new();
    h.put_rule(PolicyRule::new("S1", 10, TrackingType::OnlyOcs));
    h.put_rule(PolicyRule::new("S2", 20, TrackingType::OcsAndPcrf).with_service_identifier(2));
    let dynamic = vec![
        PolicyRule::new("D1", 30, TrackingType::OnlyOcs),
        PolicyRule::new("D2", 40, TrackingType::NoTracking),
        PolicyRule::new("D3", 50, TrackingType::OcsAndPcrf),
    ];

    let keys = h.client.derive_charging_keys(&ids(&["S2", "S1"]), &dynamic);
    assert_eq!(
        keys,
        vec![key(20, true, 2), key(10, false, 0), key(30, false, 0), key(50, false, 0)]
    );
}

#[test]
fn duplicate_keys_are_kept() {
    let h = Harness::new();
    h.put_rule(PolicyRule::new("S1", 9, TrackingType::OnlyOcs));
    let dynamic = vec![PolicyRule::new("D1", 9, TrackingType::OnlyOcs)];

    let keys = h.client.derive_charging_keys(&ids(&["S1", "S1"]), &dynamic);
    assert_eq!(keys, vec![key(9, false, 0); 3]);
}

#[test]
fn failing_static_lookups_only_shrink_the_result() {
    let h = Harness::new();
    h.put_rule(PolicyRule::new("A", 1, TrackingType::OnlyOcs));
    h.put_rule(PolicyRule::new("B", 2, TrackingType::OnlyOcs));
    h.put_raw("policydb:rules", "corrupt", b"{");
    h.put_raw("policydb:rules", "wrong", br#"{"kind":"base_names"}"#);
    let dynamic = vec![PolicyRule::new("D", 3, TrackingType::OnlyOcs)];

    let full = h.client.derive_charging_keys(&ids(&["A", "corrupt", "B", "wrong", "gone"]), &dynamic);
    assert_eq!(full, vec![key(1, false, 0), key(2, false, 0), key(3, false, 0)]);

    let reasons: Vec<ErrorKind> = h.diagnostics.take().iter().map(|s| s.error.kind()).collect();
    assert_eq!(
        reasons,
        vec![ErrorKind::DecodeFailure, ErrorKind::TypeMismatch, ErrorKind::NotFound]
    );

    let subset = h.client.derive_charging_keys(&ids(&["B", "gone"]), &dynamic);
    assert_eq!(subset, vec![key(2, false, 0), key(3, false, 0)]);

    let none = h.client.derive_charging_keys(&ids(&["gone", "corrupt"]), &dynamic);
    assert_eq!(none, vec![key(3, false, 0)]);

    assert!(h.client.derive_charging_keys(&[], &[]).is_empty());
}

#[test]
fn expand_base_names_scenario() {
    let h = Harness::new();
    h.put_base_names("bn1", &["ruleA", "ruleB"]);

    let expanded = h.client.expand_base_names(&ids(&["bn2", "bn1"]));
    assert_eq!(expanded, ids(&["ruleA", "ruleB"]));

    let skips = h.diagnostics.take();
    assert_eq!(skips.len(), 1);
    assert_eq!(skips[0].op, BatchOp::ExpandBaseNames);
    assert_eq!(skips[0].item, "bn2");
}

#[test]
fn expand_keeps_input_order_and_duplicates() {
    let h = Harness::new();
    h.put_base_names("bn1", &["r1", "r2"]);
    h.put_base_names("bn2", &["r2", "r3", "r2"]);

    let expanded = h.client.expand_base_names(&ids(&["bn2", "bn1", "bn2"]));
    assert_eq!(expanded, ids(&["r2", "r3", "r2", "r1", "r2", "r2", "r3", "r2"]));
}

#[test]
fn expand_skips_bad_entries_and_handles_empty_input() {
    let h = Harness::new();
    h.put_base_names("ok", &["r1"]);
    h.put_raw("policydb:base_names", "corrupt", b"[]");
    h.put_raw("policydb:base_names", "rule", br#"{"kind":"rule","id":"x"}"#);

    assert!(h.client.expand_base_names(&[]).is_empty());
    assert!(h.client.expand_base_names(&ids(&["nope", "corrupt", "rule"])).is_empty());
    assert_eq!(h.client.expand_base_names(&ids(&["corrupt", "ok", "rule"])), ids(&["r1"]));

    let reasons: Vec<ErrorKind> = h.diagnostics.take().iter().map(|s| s.error.kind()).collect();
    assert_eq!(
        reasons,
        vec![
            ErrorKind::NotFound,
            ErrorKind::DecodeFailure,
            ErrorKind::TypeMismatch,
            ErrorKind::DecodeFailure,
            ErrorKind::TypeMismatch,
        ]
    );
}

#[test]
fn partitions_are_independent() {
    let h = Harness::new();
    h.put_rule(PolicyRule::new("same", 1, TrackingType::OnlyOcs));
    h.put_base_names("same", &["r"]);

    assert_eq!(h.client.resolve_rule("same").unwrap().rating_group, 1);
    assert_eq!(h.client.expand_base_names(&ids(&["same"])), ids(&["r"]));
}

#[test]
fn lookups_are_counted() {
    let h = Harness::new();
    h.put_rule(PolicyRule::new("R1", 5, TrackingType::OnlyOcs));

    let _ = h.client.resolve_rule("R1");
    let _ = h.client.derive_charging_keys(&ids(&["R1", "missing"]), &[]);

    let lookups = &h.metrics.lookups;
    assert_eq!(lookups.get(&[("partition", "rules"), ("outcome", "hit")]), 2);
    assert_eq!(lookups.get(&[("partition", "rules"), ("outcome", "NOT_FOUND")]), 1);
    assert_eq!(h.metrics.query_duration.count(&[("op", "derive_charging_keys")]), 1);
}

#[test]
fn works_through_the_lookup_trait() {
    let h = Harness::new();
    h.put_rule(PolicyRule::new("R1", 5, TrackingType::OnlyOcs));
    h.put_base_names("bn", &["R1"]);

    let lookup: &dyn PolicyLookup = &h.client;
    let members = lookup.expand_base_names(&ids(&["bn"]));
    assert_eq!(lookup.derive_charging_keys(&members, &[]), vec![key(5, false, 0)]);
    assert!(lookup.resolve_rule("nope").is_err());
}

#[test]
fn concurrent_readers_see_consistent_results() {
    let h = std::sync::Arc::new(Harness::new());
    h.put_rule(PolicyRule::new("R1", 5, TrackingType::OnlyOcs));
    h.put_base_names("bn1", &["R1", "R2"]);

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let h = std::sync::Arc::clone(&h);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let members = h.client.expand_base_names(&ids(&["bn1"]));
                    let keys = h.client.derive_charging_keys(&members, &[]);
                    assert_eq!(keys, vec![key(5, false, 0)]);
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }
}
