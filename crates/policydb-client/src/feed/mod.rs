//! Update feed plumbing.
//!
//! A `FeedSource` hands out one batch receiver per stream; `FeedClient` owns
//! the registered listeners and runs one apply loop per stream.

pub mod batch;
pub mod client;
pub mod source;

pub use batch::UpdateBatch;
pub use client::{FeedClient, FeedHandle, StreamListener};
pub use source::{ChannelFeed, FeedPublisher, FeedSource, SnapshotFeed};
