use serde::Deserialize;

use crate::{AlertKind, MetricSample};

/// Upper limits per alert kind. A reading alerts only when it is strictly
/// greater than its limit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub cpu: f32,
    pub ram: f32,
    pub disk: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu: 85.0,
            ram: 85.0,
            disk: 90.0,
        }
    }
}

impl Thresholds {
    pub fn limit(&self, kind: AlertKind) -> f32 {
        match kind {
            AlertKind::Cpu => self.cpu,
            AlertKind::Ram => self.ram,
            AlertKind::Disk => self.disk,
        }
    }
}

/// A reading that crossed its limit during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub value: f32,
    pub limit: f32,
}

impl AlertEvent {
    pub fn title(&self) -> &'static str {
        match self.kind {
            AlertKind::Cpu => "⚠ High CPU Usage",
            AlertKind::Ram => "⚠ High RAM Usage",
            AlertKind::Disk => "⚠ Disk Almost Full",
        }
    }

    pub fn message(&self) -> String {
        format!("{} usage is at {:.1}%", self.kind, self.value)
    }

    /// Console line printed whenever the limit is exceeded, cooldown or not.
    pub fn warning(&self) -> &'static str {
        match self.kind {
            AlertKind::Cpu => "⚠ WARNING: High CPU Usage!",
            AlertKind::Ram => "⚠ WARNING: High RAM Usage!",
            AlertKind::Disk => "⚠ WARNING: Disk Almost Full!",
        }
    }
}

/// Maps a sample to the alerts it triggers.
///
/// GPU and battery readings are recorded but never alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEvaluator {
    thresholds: Thresholds,
}

impl ThresholdEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Events come out in `AlertKind::ALL` order.
    pub fn evaluate(&self, sample: &MetricSample) -> Vec<AlertEvent> {
        AlertKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let value = kind.value_of(sample);
                let limit = self.thresholds.limit(kind);
                (value > limit).then_some(AlertEvent { kind, value, limit })
            })
            .collect()
    }
}
