//! CSV file backend (default)
//!
//! The file is created with a header row on first use and only ever appended
//! to afterwards. A single writer handle is cached between ticks; every append
//! is flushed and synced before the call returns. File I/O runs on the
//! blocking pool while the handle's lock is held.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{Writer, WriterBuilder};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use super::backend::{Initialization, SampleLog};
use super::error::{StorageError, StorageResult};
use super::schema::{HEADER, LogEntry};
use crate::MetricSample;

/// Default file name, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "system_monitor_log.csv";

pub struct CsvSampleLog {
    path: PathBuf,

    /// Cached handle, `None` until first use and after `close`
    writer: Mutex<Option<Writer<File>>>,
}

impl CsvSampleLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every data row back, oldest first. Rows with the wrong column
    /// count, such as one torn by a crash, are skipped.
    pub fn read_entries(&self) -> StorageResult<Vec<LogEntry>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            match LogEntry::from_record(&record) {
                Some(entry) => entries.push(entry),
                None => warn!("skipping malformed row in {}", self.path.display()),
            }
        }
        Ok(entries)
    }
}

/// Open `path` for appending, writing the header if it is empty.
///
/// A file whose last row was cut short gets its line terminated first, so the
/// torn row stays the only damaged one.
fn open(path: &Path) -> StorageResult<(Writer<File>, Initialization)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .create(true)
        .append(true)
        .open(path)?;
    let len = file.metadata()?.len();

    if len > 0 {
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            warn!("{} ends in a partial row, terminating it", path.display());
            file.write_all(b"\n")?;
            file.sync_data()?;
        }
        let writer = WriterBuilder::new().has_headers(false).from_writer(file);
        return Ok((writer, Initialization::Existing));
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(HEADER)?;
    writer.flush()?;
    writer.get_ref().sync_data()?;
    info!("created sample log at {}", path.display());

    Ok((writer, Initialization::Created))
}

fn sync(writer: &mut Writer<File>) -> StorageResult<()> {
    writer.flush()?;
    writer.get_ref().sync_data()?;
    Ok(())
}

async fn blocking<T, F>(f: F) -> StorageResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> StorageResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
}

#[async_trait]
impl SampleLog for CsvSampleLog {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn ensure_initialized(&self) -> StorageResult<Initialization> {
        let mut guard = self.writer.lock().await;
        let path = self.path.clone();
        let (writer, initialization) = blocking(move || open(&path)).await?;
        *guard = Some(writer);

        debug!("sample log ready ({initialization:?})");
        Ok(initialization)
    }

    async fn append(&self, sample: &MetricSample) -> StorageResult<()> {
        let mut guard = self.writer.lock().await;

        let cached = guard.take();
        let path = self.path.clone();
        let entry = LogEntry::from(sample);
        let timestamp = entry.timestamp.clone();

        // a failed write leaves the slot empty so the next tick reopens the file
        let writer = blocking(move || {
            let mut writer = match cached {
                Some(writer) => writer,
                None => open(&path)?.0,
            };
            writer.write_record(entry.to_record())?;
            sync(&mut writer)?;
            Ok(writer)
        })
        .await?;
        *guard = Some(writer);

        trace!("appended row {timestamp:?}");
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        let Some(mut writer) = self.writer.lock().await.take() else {
            return Ok(());
        };

        blocking(move || sync(&mut writer)).await?;
        debug!("closed sample log at {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
