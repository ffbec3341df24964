#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use policydb_client::obs::metrics::PolicyDbMetrics;

fn position(text: &str, needle: &str) -> usize {
    text.find(needle).unwrap_or_else(|| panic!("missing `{needle}` in:\n{text}"))
}

#[test]
fn histogram_series_render_in_label_order() {
    let metrics = PolicyDbMetrics::new();
    metrics.query_duration.observe(&[("op", "resolve_rule")], Duration::from_micros(40));
    metrics.query_duration.observe(&[("op", "expand_base_names")], Duration::from_micros(900));
    metrics.query_duration.observe(&[("op", "derive_charging_keys")], Duration::from_micros(7));

    let text = metrics.render();
    let derive = position(&text, "policydb_query_duration_micros_count{op=\"derive_charging_keys\"} 1");
    let expand = position(&text, "policydb_query_duration_micros_count{op=\"expand_base_names\"} 1");
    let resolve = position(&text, "policydb_query_duration_micros_count{op=\"resolve_rule\"} 1");
    assert!(derive < expand && expand < resolve);

    // Rendering twice gives identical output.
    assert_eq!(text, metrics.render());
}

#[test]
fn counter_series_render_in_label_order() {
    let metrics = PolicyDbMetrics::new();
    metrics.lookups.inc(&[("partition", "rules"), ("outcome", "not_found")]);
    metrics.lookups.inc(&[("partition", "base_names"), ("outcome", "hit")]);

    let text = metrics.render();
    let base = position(&text, "policydb_lookups_total{outcome=\"hit\",partition=\"base_names\"} 1");
    let rules = position(&text, "policydb_lookups_total{outcome=\"not_found\",partition=\"rules\"} 1");
    assert!(base < rules);
}
