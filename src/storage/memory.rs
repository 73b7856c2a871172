//! In-memory sample log (no persistence)
//!
//! Keeps rendered rows in a `Vec`. It's useful for:
//! - Testing the monitor without touching the filesystem
//! - Dry runs where nothing should be written to disk

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::backend::{Initialization, SampleLog};
use super::error::StorageResult;
use super::schema::LogEntry;
use crate::MetricSample;

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<LogEntry>,
    initialized: bool,
    closed: bool,
}

/// In-memory sample log
#[derive(Debug, Default)]
pub struct MemorySampleLog {
    inner: Mutex<Inner>,
}

impl MemorySampleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows appended so far, in write order
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.inner.lock().await.entries.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether `close` ran after the last append
    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.closed
    }
}

#[async_trait]
impl SampleLog for MemorySampleLog {
    async fn ensure_initialized(&self) -> StorageResult<Initialization> {
        let mut inner = self.inner.lock().await;
        if inner.initialized {
            return Ok(Initialization::Existing);
        }
        inner.initialized = true;
        Ok(Initialization::Created)
    }

    async fn append(&self, sample: &MetricSample) -> StorageResult<()> {
        let mut inner = self.inner.lock().await;
        inner.initialized = true;
        inner.closed = false;
        inner.entries.push(LogEntry::from(sample));
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        let mut inner = self.inner.lock().await;
        debug!("closing in-memory sample log ({} rows)", inner.entries.len());
        inner.closed = true;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
