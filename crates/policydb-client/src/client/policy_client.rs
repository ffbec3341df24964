use std::sync::Arc;
use std::time::Instant;

use policydb_core::codec::JsonCodec;
use policydb_core::error::{PolicyDbError, Result};
use policydb_core::{derive_charging_key, needs_charging, ChargingKey, PolicyRule};

use super::diagnostics::{BatchOp, Diagnostics, Skipped};
use crate::feed::{FeedClient, FeedHandle, FeedSource};
use crate::listener::PartitionListener;
use crate::obs::metrics::PolicyDbMetrics;
use crate::store::{Backend, Namespaces, ObjectMap, Partition};

/// Read-side interface consumed by usage-reporting and enforcement code.
pub trait PolicyLookup: Send + Sync {
    /// Single rule by id. Errors are surfaced as-is.
    fn resolve_rule(&self, id: &str) -> Result<PolicyRule>;

    /// Charging keys for stored (`static_ids`) and inline (`dynamic_rules`)
    /// rules. Unresolvable static ids are skipped; never fails.
    fn derive_charging_keys(&self, static_ids: &[String], dynamic_rules: &[PolicyRule]) -> Vec<ChargingKey>;

    /// Member rule ids of each base name, concatenated in input order.
    /// Unresolvable names contribute nothing; never fails.
    fn expand_base_names(&self, base_names: &[String]) -> Vec<String>;
}

/// Policy client over the rules and base-names partitions.
pub struct PolicyDbClient {
    rules: Arc<ObjectMap>,
    base_names: Arc<ObjectMap>,
    diagnostics: Arc<dyn Diagnostics>,
    metrics: Arc<PolicyDbMetrics>,
}

impl PolicyDbClient {
    /// Client over already-built partitions. No feed is attached.
    pub fn new(
        rules: Arc<ObjectMap>,
        base_names: Arc<ObjectMap>,
        diagnostics: Arc<dyn Diagnostics>,
        metrics: Arc<PolicyDbMetrics>,
    ) -> Self {
        Self {
            rules,
            base_names,
            diagnostics,
            metrics,
        }
    }

    /// Build both partitions on `backend`, bind a listener to each and start
    /// them against `source`.
    ///
    /// Fails with `BackendUnavailable` if the backend does not answer a ping
    /// or the feed refuses a subscription, whatever the underlying cause.
    /// Nothing is retried.
    pub async fn connect(
        backend: Arc<dyn Backend>,
        namespaces: &Namespaces,
        source: &dyn FeedSource,
        diagnostics: Arc<dyn Diagnostics>,
        metrics: Arc<PolicyDbMetrics>,
    ) -> Result<(Self, FeedHandle)> {
        backend.ping().map_err(|e| match e {
            PolicyDbError::BackendUnavailable(_) => e,
            other => PolicyDbError::BackendUnavailable(other.to_string()),
        })?;

        // 1) partitions
        let rules = Arc::new(ObjectMap::new(
            Arc::clone(&backend),
            namespaces.rules.clone(),
            Partition::Rules,
            Arc::new(JsonCodec::new()),
        ));
        let base_names = Arc::new(ObjectMap::new(
            backend,
            namespaces.base_names.clone(),
            Partition::BaseNames,
            Arc::new(JsonCodec::new()),
        ));

        // 2) listeners bound to them
        let feed = FeedClient::new(Arc::clone(&metrics));
        feed.register(Arc::new(PartitionListener::new(Arc::clone(&rules))));
        feed.register(Arc::new(PartitionListener::new(Arc::clone(&base_names))));

        // 3) feed subscriptions
        let handle = feed.start(source).await.map_err(|e| match e {
            PolicyDbError::BackendUnavailable(_) => e,
            other => PolicyDbError::BackendUnavailable(format!("feed subscription failed: {other}")),
        })?;

        Ok((Self::new(rules, base_names, diagnostics, metrics), handle))
    }

    pub fn rules(&self) -> &ObjectMap {
        &self.rules
    }

    pub fn base_names(&self) -> &ObjectMap {
        &self.base_names
    }

    pub fn resolve_rule(&self, id: &str) -> Result<PolicyRule> {
        let started = Instant::now();
        let res = self.rules.get_rule(id);
        self.record_lookup(Partition::Rules, res.as_ref().err());
        self.metrics
            .query_duration
            .observe(&[("op", "resolve_rule")], started.elapsed());
        res
    }

    pub fn derive_charging_keys(&self, static_ids: &[String], dynamic_rules: &[PolicyRule]) -> Vec<ChargingKey> {
        let started = Instant::now();
        let mut keys = Vec::with_capacity(static_ids.len() + dynamic_rules.len());

        for id in static_ids {
            let rule = match self.rules.get_rule(id) {
                Ok(rule) => {
                    self.record_lookup(Partition::Rules, None);
                    rule
                }
                Err(error) => {
                    self.record_lookup(Partition::Rules, Some(&error));
                    self.diagnostics.skipped(Skipped {
                        op: BatchOp::ChargingKeys,
                        item: id.clone(),
                        error,
                    });
                    continue;
                }
            };
            if needs_charging(&rule) {
                keys.push(derive_charging_key(&rule));
            }
        }

        keys.extend(
            dynamic_rules
                .iter()
                .filter(|rule| needs_charging(rule))
                .map(derive_charging_key),
        );

        self.metrics
            .query_duration
            .observe(&[("op", "derive_charging_keys")], started.elapsed());
        keys
    }

    pub fn expand_base_names(&self, base_names: &[String]) -> Vec<String> {
        let started = Instant::now();
        let mut rule_ids = Vec::new();

        for name in base_names {
            match self.base_names.get_base_names(name) {
                Ok(set) => {
                    self.record_lookup(Partition::BaseNames, None);
                    rule_ids.extend(set.rule_names);
                }
                Err(error) => {
                    self.record_lookup(Partition::BaseNames, Some(&error));
                    self.diagnostics.skipped(Skipped {
                        op: BatchOp::ExpandBaseNames,
                        item: name.clone(),
                        error,
                    });
                }
            }
        }

        self.metrics
            .query_duration
            .observe(&[("op", "expand_base_names")], started.elapsed());
        rule_ids
    }

    fn record_lookup(&self, partition: Partition, error: Option<&PolicyDbError>) {
        let outcome = error.map_or("hit", |e| e.kind().as_str());
        self.metrics
            .lookups
            .inc(&[("partition", partition.as_str()), ("outcome", outcome)]);
    }
}

impl PolicyLookup for PolicyDbClient {
    fn resolve_rule(&self, id: &str) -> Result<PolicyRule> {
        PolicyDbClient::resolve_rule(self, id)
    }

    fn derive_charging_keys(&self, static_ids: &[String], dynamic_rules: &[PolicyRule]) -> Vec<ChargingKey> {
        PolicyDbClient::derive_charging_keys(self, static_ids, dynamic_rules)
    }

    fn expand_base_names(&self, base_names: &[String]) -> Vec<String> {
        PolicyDbClient::expand_base_names(self, base_names)
    }
}
