//! Metric sources
//!
//! A provider reads every metric independently. CPU, RAM and disk are
//! mandatory: if any of them fails the whole reading fails and the tick is
//! skipped. GPU and battery are optional: a missing GPU reads as `0`, a
//! missing battery as `None`, and actual read errors are reported next to the
//! sample as [`PartialFailure`]s.

pub mod system;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use thiserror::Error;

use crate::MetricSample;

pub use system::SystemProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MandatoryMetric {
    Cpu,
    Ram,
    Disk,
}

impl fmt::Display for MandatoryMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MandatoryMetric::Cpu => f.write_str("CPU"),
            MandatoryMetric::Ram => f.write_str("RAM"),
            MandatoryMetric::Disk => f.write_str("disk"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalMetric {
    Gpu,
    Battery,
}

impl fmt::Display for OptionalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionalMetric::Gpu => f.write_str("GPU"),
            OptionalMetric::Battery => f.write_str("battery"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// A mandatory metric could not be read; no sample this tick
    #[error("failed to read {metric} usage: {reason}")]
    Mandatory {
        metric: MandatoryMetric,
        reason: String,
    },

    /// The reading task itself died
    #[error("metric collection task failed: {0}")]
    Task(String),
}

/// An optional metric that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{metric} unavailable: {reason}")]
pub struct PartialFailure {
    pub metric: OptionalMetric,
    pub reason: String,
}

/// One successful reading
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    pub sample: MetricSample,
    pub partial: Vec<PartialFailure>,
}

impl Sampling {
    pub fn complete(sample: MetricSample) -> Self {
        Self {
            sample,
            partial: Vec::new(),
        }
    }
}

/// Source of metric samples
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn sample(&self) -> Result<Sampling, ProviderError>;
}

/// Independently obtained readings, before the availability policy is applied
///
/// `Ok(None)` for an optional metric means "not present on this host".
#[derive(Debug, Clone)]
pub struct RawReadings {
    pub cpu: Result<f32, String>,
    pub ram: Result<f32, String>,
    pub disk: Result<f32, String>,
    pub gpu: Result<Option<f32>, String>,
    pub battery: Result<Option<f32>, String>,
}

impl RawReadings {
    pub fn into_sampling(self, timestamp: DateTime<Local>) -> Result<Sampling, ProviderError> {
        let mandatory = |metric, reading: Result<f32, String>| {
            reading.map_err(|reason| ProviderError::Mandatory { metric, reason })
        };

        let cpu = mandatory(MandatoryMetric::Cpu, self.cpu)?;
        let ram = mandatory(MandatoryMetric::Ram, self.ram)?;
        let disk = mandatory(MandatoryMetric::Disk, self.disk)?;

        let mut partial = Vec::new();
        let mut optional = |metric, reading: Result<Option<f32>, String>| {
            reading.unwrap_or_else(|reason| {
                partial.push(PartialFailure { metric, reason });
                None
            })
        };

        let gpu = optional(OptionalMetric::Gpu, self.gpu).unwrap_or(0.0);
        let battery = optional(OptionalMetric::Battery, self.battery);

        Ok(Sampling {
            sample: MetricSample::new(timestamp, cpu, ram, disk, gpu, battery),
            partial,
        })
    }
}
