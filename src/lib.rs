pub mod actors;
pub mod config;
pub mod monitors;
pub mod notifier;
pub mod provider;
pub mod status;
pub mod storage;
pub mod util;

use std::fmt;

use chrono::{DateTime, Local};

/// One reading cycle of every tracked metric.
///
/// Percentages are always within `0.0..=100.0`. A missing GPU is reported as
/// `0.0`, a missing battery sensor as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    timestamp: DateTime<Local>,
    cpu_percent: f32,
    ram_percent: f32,
    disk_percent: f32,
    gpu_percent: f32,
    battery_percent: Option<f32>,
}

impl MetricSample {
    pub fn new(
        timestamp: DateTime<Local>,
        cpu_percent: f32,
        ram_percent: f32,
        disk_percent: f32,
        gpu_percent: f32,
        battery_percent: Option<f32>,
    ) -> Self {
        Self {
            timestamp,
            cpu_percent: percentage(cpu_percent),
            ram_percent: percentage(ram_percent),
            disk_percent: percentage(disk_percent),
            gpu_percent: percentage(gpu_percent),
            battery_percent: battery_percent.map(percentage),
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn cpu_percent(&self) -> f32 {
        self.cpu_percent
    }

    pub fn ram_percent(&self) -> f32 {
        self.ram_percent
    }

    pub fn disk_percent(&self) -> f32 {
        self.disk_percent
    }

    pub fn gpu_percent(&self) -> f32 {
        self.gpu_percent
    }

    pub fn battery_percent(&self) -> Option<f32> {
        self.battery_percent
    }
}

fn percentage(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Metrics that can raise an alert, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlertKind {
    Cpu,
    Ram,
    Disk,
}

impl AlertKind {
    pub const ALL: [AlertKind; 3] = [AlertKind::Cpu, AlertKind::Ram, AlertKind::Disk];

    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::Cpu => "CPU",
            AlertKind::Ram => "RAM",
            AlertKind::Disk => "Disk",
        }
    }

    /// The reading of this kind in `sample`.
    pub fn value_of(&self, sample: &MetricSample) -> f32 {
        match self {
            AlertKind::Cpu => sample.cpu_percent(),
            AlertKind::Ram => sample.ram_percent(),
            AlertKind::Disk => sample.disk_percent(),
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
