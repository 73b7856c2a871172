//! Sample log backends
//!
//! ## Design
//!
//! - **Trait-based**: `SampleLog` lets the monitor run against any backend
//! - **Async**: all operations are async for use inside the monitor actor
//! - **Append-only**: rows are never rewritten, one per successful tick
//!
//! ## Backends
//!
//! - **CSV** (default): `Timestamp,CPU %,RAM %,Disk %,GPU %,Battery %`
//! - **In-Memory**: no persistence, for tests and dry runs
//!
//! ## Usage
//!
//! ```no_run
//! use system_monitor::storage::{CsvSampleLog, SampleLog};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let log = CsvSampleLog::new("./system_monitor_log.csv");
//!     log.ensure_initialized().await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod csv_log;
pub mod error;
pub mod memory;
pub mod schema;

pub use backend::{Initialization, SampleLog};
pub use csv_log::{CsvSampleLog, DEFAULT_LOG_FILE};
pub use error::{StorageError, StorageResult};
pub use memory::MemorySampleLog;
pub use schema::LogEntry;
