//! Sample log trait definition

use async_trait::async_trait;

use super::error::StorageResult;
use crate::MetricSample;

/// What `ensure_initialized` found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialization {
    /// The store did not exist (or was empty) and the header was written
    Created,

    /// The store already had content and was left untouched
    Existing,
}

/// Durable, append-only store of samples
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync` and serialize concurrent `append`
/// calls so rows are never interleaved or lost.
///
/// ## Error Handling
///
/// Only a failing `ensure_initialized` is fatal to the monitor. Errors from
/// `append` and `close` are logged by the caller and the loop carries on.
#[async_trait]
pub trait SampleLog: Send + Sync {
    /// Create the store with its header if it does not exist yet
    ///
    /// Idempotent. Must never truncate or rewrite an existing store.
    async fn ensure_initialized(&self) -> StorageResult<Initialization>;

    /// Durably add one row for `sample`
    ///
    /// A crash between two calls loses at most the row being written.
    async fn append(&self, sample: &MetricSample) -> StorageResult<()>;

    /// Flush and release any cached handle
    ///
    /// A later `append` reopens the store.
    async fn close(&self) -> StorageResult<()>;

    /// Where the samples end up, for status output
    fn location(&self) -> String;
}
