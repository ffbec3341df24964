use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use policydb_core::error::{PolicyDbError, Result};

use crate::feed::{FeedSource, UpdateBatch};
use crate::listener::ApplyReport;
use crate::obs::metrics::PolicyDbMetrics;

/// Consumer of one feed stream.
pub trait StreamListener: Send + Sync {
    fn stream_name(&self) -> &'static str;
    fn apply(&self, upserts: &BTreeMap<String, Bytes>, deletes: &BTreeSet<String>) -> ApplyReport;
}

/// Listener registry. Each stream has at most one listener.
pub struct FeedClient {
    listeners: DashMap<&'static str, Arc<dyn StreamListener>>,
    metrics: Arc<PolicyDbMetrics>,
}

impl FeedClient {
    pub fn new(metrics: Arc<PolicyDbMetrics>) -> Self {
        Self {
            listeners: DashMap::new(),
            metrics,
        }
    }

    pub fn register(&self, listener: Arc<dyn StreamListener>) {
        self.listeners.insert(listener.stream_name(), listener);
    }

    pub fn registered_streams(&self) -> Vec<&'static str> {
        let mut streams: Vec<&'static str> = self.listeners.iter().map(|e| *e.key()).collect();
        streams.sort_unstable();
        streams
    }

    /// Route one batch to its stream's listener.
    pub fn deliver(&self, batch: &UpdateBatch) -> Result<ApplyReport> {
        let listener = self
            .listeners
            .get(batch.stream.as_str())
            .ok_or_else(|| PolicyDbError::Internal(format!("no listener for stream: {}", batch.stream)))?
            .value()
            .clone();
        let report = listener.apply(&batch.upserts, &batch.deletes);
        record(&self.metrics, listener.stream_name(), &report);
        Ok(report)
    }

    /// Subscribe every registered stream on `source` and spawn its apply loop.
    ///
    /// Any subscription failure aborts the loops started so far and is
    /// returned as-is; nothing is retried.
    pub async fn start(&self, source: &dyn FeedSource) -> Result<FeedHandle> {
        let mut handle = FeedHandle { tasks: Vec::new() };
        for stream in self.registered_streams() {
            let Some(listener) = self.listeners.get(stream).map(|e| e.value().clone()) else {
                continue;
            };
            let rx = match source.subscribe(stream).await {
                Ok(rx) => rx,
                Err(e) => {
                    handle.abort();
                    return Err(e);
                }
            };
            tracing::info!(stream, endpoint = source.endpoint(), "feed stream subscribed");
            let task = tokio::spawn(run_stream(rx, listener, Arc::clone(&self.metrics)));
            handle.tasks.push((stream, task));
        }
        Ok(handle)
    }
}

async fn run_stream(
    mut rx: mpsc::Receiver<UpdateBatch>,
    listener: Arc<dyn StreamListener>,
    metrics: Arc<PolicyDbMetrics>,
) {
    let stream = listener.stream_name();
    while let Some(batch) = rx.recv().await {
        if batch.stream != stream {
            tracing::warn!(stream, got = %batch.stream, "dropping batch for foreign stream");
            continue;
        }
        let report = listener.apply(&batch.upserts, &batch.deletes);
        record(&metrics, stream, &report);
    }
    tracing::info!(stream, "feed stream closed");
}

fn record(metrics: &PolicyDbMetrics, stream: &str, report: &ApplyReport) {
    metrics.feed_entries.add(&[("stream", stream), ("action", "upsert")], report.upserted as u64);
    metrics.feed_entries.add(&[("stream", stream), ("action", "delete")], report.deleted as u64);
    metrics.feed_entries.add(&[("stream", stream), ("action", "skip")], report.failures.len() as u64);
}

/// Running apply loops, one per subscribed stream.
pub struct FeedHandle {
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl FeedHandle {
    pub fn streams(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|(s, _)| *s).collect()
    }

    pub fn abort(&self) {
        for (_, task) in &self.tasks {
            task.abort();
        }
    }

    /// Wait until every stream's source is exhausted.
    pub async fn join(self) {
        for (stream, task) in self.tasks {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::error!(stream, error = %e, "feed stream task failed");
                }
            }
        }
    }
}
