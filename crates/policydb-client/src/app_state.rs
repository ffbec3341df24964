//! Shared application state for the policydb agent.
//!
//! Builds backend, feed source and client from config. Startup errors are
//! returned instead of panicking so the binary can report them.

use std::sync::Arc;

use policydb_core::error::Result;

use crate::client::{PolicyDbClient, TracingDiagnostics};
use crate::config::{AgentConfig, BackendKind, FeedSourceKind};
use crate::feed::{ChannelFeed, FeedHandle, FeedPublisher, FeedSource, SnapshotFeed};
use crate::obs::metrics::PolicyDbMetrics;
use crate::store::{Backend, InMemoryBackend};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    client: Arc<PolicyDbClient>,
    metrics: Arc<PolicyDbMetrics>,
}

struct AppStateInner {
    cfg: AgentConfig,
    publisher: Option<FeedPublisher>,
    feed: FeedHandle,
}

impl AppState {
    /// Build application state. A backend or feed that cannot be reached is
    /// fatal here and surfaces as `BackendUnavailable`.
    pub async fn new(cfg: AgentConfig) -> Result<Self> {
        let metrics = Arc::new(PolicyDbMetrics::new());

        // 1) Backend
        let backend: Arc<dyn Backend> = match cfg.store.backend {
            BackendKind::Memory => Arc::new(InMemoryBackend::new()),
        };

        // 2) Feed source
        let mut publisher = None;
        let source: Box<dyn FeedSource> = match cfg.feed.source {
            FeedSourceKind::Channel => {
                let feed = ChannelFeed::new(cfg.feed.channel_capacity);
                publisher = Some(feed.publisher());
                Box::new(feed)
            }
            FeedSourceKind::Snapshot => {
                let path = cfg.feed.snapshot_path.clone().unwrap_or_default();
                Box::new(SnapshotFeed::new(path))
            }
        };

        // 3) Client: partitions -> listeners -> subscriptions
        let diagnostics = Arc::new(TracingDiagnostics::new(Arc::clone(&metrics)));
        let (client, feed) = PolicyDbClient::connect(
            backend,
            &cfg.store.namespaces(),
            source.as_ref(),
            diagnostics,
            Arc::clone(&metrics),
        )
        .await?;

        tracing::info!(
            rules = %cfg.store.rules_namespace,
            base_names = %cfg.store.base_names_namespace,
            streams = ?feed.streams(),
            endpoint = source.endpoint(),
            "policy client ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, publisher, feed }),
            client: Arc::new(client),
            metrics,
        })
    }

    pub fn cfg(&self) -> &AgentConfig {
        &self.inner.cfg
    }

    pub fn client(&self) -> Arc<PolicyDbClient> {
        Arc::clone(&self.client)
    }

    pub fn metrics(&self) -> Arc<PolicyDbMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Producer handle when the feed source is an in-process channel.
    pub fn publisher(&self) -> Option<FeedPublisher> {
        self.inner.publisher.clone()
    }

    pub fn feed_streams(&self) -> Vec<&'static str> {
        self.inner.feed.streams()
    }
}
