//! On-disk row layout of the sample log
//!
//! ```text
//! Timestamp,CPU %,RAM %,Disk %,GPU %,Battery %
//! 2026-10-16 12:00:00,90,40,50,10,80
//! 2026-10-16 12:00:05,91,40,50,10,N/A
//! ```

use crate::MetricSample;

/// Column names, in write order
pub const HEADER: [&str; 6] = ["Timestamp", "CPU %", "RAM %", "Disk %", "GPU %", "Battery %"];

/// Local time, second precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Written in the battery column when the host has no battery sensor
pub const NOT_AVAILABLE: &str = "N/A";

/// One row of the sample log, already rendered to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub cpu: String,
    pub ram: String,
    pub disk: String,
    pub gpu: String,
    pub battery: String,
}

impl LogEntry {
    pub fn to_record(&self) -> [&str; 6] {
        [
            self.timestamp.as_str(),
            self.cpu.as_str(),
            self.ram.as_str(),
            self.disk.as_str(),
            self.gpu.as_str(),
            self.battery.as_str(),
        ]
    }

    /// Parses a data row; `None` for rows with the wrong column count.
    pub fn from_record(record: &csv::StringRecord) -> Option<Self> {
        if record.len() != HEADER.len() {
            return None;
        }

        Some(Self {
            timestamp: record[0].to_string(),
            cpu: record[1].to_string(),
            ram: record[2].to_string(),
            disk: record[3].to_string(),
            gpu: record[4].to_string(),
            battery: record[5].to_string(),
        })
    }
}

impl From<&MetricSample> for LogEntry {
    fn from(sample: &MetricSample) -> Self {
        Self {
            timestamp: sample.timestamp().format(TIMESTAMP_FORMAT).to_string(),
            cpu: sample.cpu_percent().to_string(),
            ram: sample.ram_percent().to_string(),
            disk: sample.disk_percent().to_string(),
            gpu: sample.gpu_percent().to_string(),
            battery: sample
                .battery_percent()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |battery| battery.to_string()),
        }
    }
}
