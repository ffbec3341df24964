use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{mpsc, OnceCell};

use policydb_core::error::{PolicyDbError, Result};

use crate::feed::batch::SnapshotBatch;
use crate::feed::UpdateBatch;

/// Push source of update batches.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable endpoint, for logs.
    fn endpoint(&self) -> &str;
    /// Receiver of batches for `stream`. Fails with `BackendUnavailable`
    /// when the source cannot be reached.
    async fn subscribe(&self, stream: &str) -> Result<mpsc::Receiver<UpdateBatch>>;
}

type Senders = Arc<DashMap<String, mpsc::Sender<UpdateBatch>>>;

/// In-process feed backed by bounded tokio channels.
pub struct ChannelFeed {
    capacity: usize,
    senders: Senders,
    closed: Arc<AtomicBool>,
}

impl ChannelFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            senders: Arc::new(DashMap::new()),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn publisher(&self) -> FeedPublisher {
        FeedPublisher {
            senders: Arc::clone(&self.senders),
            closed: Arc::clone(&self.closed),
        }
    }
}

#[async_trait]
impl FeedSource for ChannelFeed {
    fn endpoint(&self) -> &str {
        "channel://in-process"
    }

    async fn subscribe(&self, stream: &str) -> Result<mpsc::Receiver<UpdateBatch>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PolicyDbError::BackendUnavailable("channel feed is closed".into()));
        }
        if self.senders.contains_key(stream) {
            return Err(PolicyDbError::Internal(format!("stream already subscribed: {stream}")));
        }
        let (tx, rx) = mpsc::channel(self.capacity);
        self.senders.insert(stream.to_string(), tx);
        Ok(rx)
    }
}

/// Producer side of a `ChannelFeed`.
#[derive(Clone)]
pub struct FeedPublisher {
    senders: Senders,
    closed: Arc<AtomicBool>,
}

impl FeedPublisher {
    /// Queue a batch for its stream, waiting for capacity.
    pub async fn publish(&self, batch: UpdateBatch) -> Result<()> {
        let tx = self
            .senders
            .get(&batch.stream)
            .map(|e| e.value().clone())
            .ok_or_else(|| {
                PolicyDbError::BackendUnavailable(format!("no subscriber for stream: {}", batch.stream))
            })?;
        tx.send(batch)
            .await
            .map_err(|e| PolicyDbError::BackendUnavailable(format!("stream {} closed", e.0.stream)))
    }

    /// Drop every sender; apply loops finish once their queues drain.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.senders.clear();
    }
}

/// Replays a JSON file of batches once per stream, then ends the stream.
///
/// The file is read on the first subscription; later subscriptions filter
/// the same parsed batches.
///
/// File format: `[{"stream": "policydb", "upserts": {"id": {...}}, "deletes": ["id"]}]`.
pub struct SnapshotFeed {
    path: PathBuf,
    endpoint: String,
    batches: OnceCell<Vec<UpdateBatch>>,
}

impl SnapshotFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let endpoint = format!("file://{}", path.display());
        Self {
            path,
            endpoint,
            batches: OnceCell::new(),
        }
    }

    async fn load(&self) -> Result<&[UpdateBatch]> {
        let batches = self
            .batches
            .get_or_try_init(|| async {
                let s = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                    PolicyDbError::BackendUnavailable(format!("read snapshot {} failed: {e}", self.path.display()))
                })?;
                let entries: Vec<SnapshotBatch> = serde_json::from_str(&s).map_err(|e| {
                    PolicyDbError::DecodeFailure(format!("invalid snapshot {}: {e}", self.path.display()))
                })?;
                entries
                    .into_iter()
                    .map(SnapshotBatch::into_batch)
                    .collect::<Result<Vec<_>>>()
            })
            .await?;
        Ok(batches)
    }
}

#[async_trait]
impl FeedSource for SnapshotFeed {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn subscribe(&self, stream: &str) -> Result<mpsc::Receiver<UpdateBatch>> {
        let batches: Vec<UpdateBatch> = self
            .load()
            .await?
            .iter()
            .filter(|b| b.stream == stream)
            .cloned()
            .collect();

        let (tx, rx) = mpsc::channel(batches.len().max(1));
        for batch in batches {
            tx.try_send(batch)
                .map_err(|e| PolicyDbError::Internal(format!("snapshot queue rejected batch: {e}")))?;
        }
        Ok(rx)
    }
}
