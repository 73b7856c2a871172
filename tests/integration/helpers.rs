//! Test helpers and utilities for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use system_monitor::{
    MetricSample,
    config::Config,
    notifier::{Notification, Notifier, NotifierError},
    provider::{MandatoryMetric, MetricsProvider, ProviderError, Sampling},
    storage::{Initialization, MemorySampleLog, SampleLog, StorageError, StorageResult},
};

/// Create a sample with a fixed timestamp offset by `second`
pub fn create_test_sample(
    second: u32,
    cpu: f32,
    ram: f32,
    disk: f32,
    gpu: f32,
    battery: Option<f32>,
) -> MetricSample {
    let timestamp = Local
        .with_ymd_and_hms(2026, 10, 16, 12, 0, second % 60)
        .unwrap();
    MetricSample::new(timestamp, cpu, ram, disk, gpu, battery)
}

/// A quiet sample that triggers no alert
pub fn create_idle_sample() -> MetricSample {
    MetricSample::new(Local::now(), 5.0, 20.0, 30.0, 0.0, None)
}

/// Config with a long interval so only the first timer tick fires on its own
pub fn create_test_config() -> Config {
    Config {
        interval: 3600,
        ..Config::default()
    }
}

pub enum Step {
    Sample(MetricSample),
    Fail(MandatoryMetric),
}

/// Provider replaying a script, then idle samples forever
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn samples(samples: Vec<MetricSample>) -> Self {
        Self::new(samples.into_iter().map(Step::Sample).collect())
    }

    /// Make every reading take `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricsProvider for ScriptedProvider {
    async fn sample(&self) -> Result<Sampling, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Sample(sample)) => Ok(Sampling::complete(sample)),
            Some(Step::Fail(metric)) => Err(ProviderError::Mandatory {
                metric,
                reason: "sensor offline".to_string(),
            }),
            None => Ok(Sampling::complete(create_idle_sample())),
        }
    }
}

/// Notifier that records every attempt and can fail the first few
#[derive(Default)]
pub struct RecordingNotifier {
    attempts: Mutex<Vec<Notification>>,
    delivered: Mutex<Vec<Notification>>,
    failures_left: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first(failures: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(failures),
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
        self.attempts.lock().unwrap().push(notification.clone());

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(NotifierError::Unavailable("no notification daemon".to_string()));
        }

        self.delivered.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// In-memory log whose appends can be switched to fail
#[derive(Default)]
pub struct FlakyLog {
    inner: MemorySampleLog,
    failing: AtomicBool,
}

impl FlakyLog {
    pub fn failing() -> Self {
        Self {
            inner: MemorySampleLog::new(),
            failing: AtomicBool::new(true),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }
}

#[async_trait]
impl SampleLog for FlakyLog {
    async fn ensure_initialized(&self) -> StorageResult<Initialization> {
        self.inner.ensure_initialized().await
    }

    async fn append(&self, sample: &MetricSample) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.append(sample).await
    }

    async fn close(&self) -> StorageResult<()> {
        self.inner.close().await
    }

    fn location(&self) -> String {
        "flaky".to_string()
    }
}

/// Wait until `log` holds at least `rows` entries
/// Returns false on timeout
pub async fn wait_for_rows(log: &MemorySampleLog, rows: usize, timeout_ms: u64) -> bool {
    tokio::time::timeout(Duration::from_millis(timeout_ms), async {
        while log.len().await < rows {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .is_ok()
}
