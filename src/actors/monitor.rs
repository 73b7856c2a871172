//! MonitorActor - samples, alerts and logs on a fixed interval
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → sample → status block → evaluate → [cooldown → notify]* → append
//!     ↑
//!     └─── Commands (TickNow, Shutdown)
//! ```
//!
//! Ticks never overlap: a tick runs to completion inside the `select!` arm
//! before the next command or timer tick is looked at. Commands are polled
//! first, so a shutdown wakes the actor in the middle of an interval wait.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, instrument, warn};

use super::messages::{MonitorCommand, MonitorReport, MonitorState, TickSummary};
use crate::config::{Config, ConfigError};
use crate::monitors::{AlertCooldownTracker, AlertEvent, CooldownDecision, ThresholdEvaluator};
use crate::notifier::{Notification, Notifier};
use crate::provider::{MetricsProvider, Sampling};
use crate::status;
use crate::storage::{Initialization, SampleLog, StorageError};

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The configuration cannot drive a monitor; nothing was started
    #[error("invalid monitor configuration: {0}")]
    InvalidConfig(#[source] ConfigError),

    /// The sample log could not be prepared; the monitor never started
    #[error("failed to initialize sample log: {0}")]
    Initialization(#[source] StorageError),

    /// The monitor is no longer running
    #[error("monitor has stopped")]
    Stopped,
}

/// A monitor that has not been started yet
pub struct MonitorLoop {
    config: Config,
    provider: Arc<dyn MetricsProvider>,
    notifier: Arc<dyn Notifier>,
    log: Arc<dyn SampleLog>,
    state_tx: watch::Sender<MonitorState>,
}

impl MonitorLoop {
    pub fn new(
        config: Config,
        provider: Arc<dyn MetricsProvider>,
        notifier: Arc<dyn Notifier>,
        log: Arc<dyn SampleLog>,
    ) -> Self {
        let (state_tx, _) = watch::channel(MonitorState::Idle);
        Self {
            config,
            provider,
            notifier,
            log,
            state_tx,
        }
    }

    pub fn state(&self) -> MonitorState {
        *self.state_tx.borrow()
    }

    /// Prepare the sample log and spawn the actor
    ///
    /// Fails without spawning anything if the configuration is invalid or the
    /// log cannot be initialized.
    #[instrument(skip_all, fields(log = %self.log.location()))]
    pub async fn start(self) -> Result<MonitorHandle, MonitorError> {
        self.config.validate().map_err(MonitorError::InvalidConfig)?;

        let location = self.log.location();

        let initialization = self
            .log
            .ensure_initialized()
            .await
            .map_err(MonitorError::Initialization)?;
        if initialization == Initialization::Created {
            status::print_log_created(&location);
        }
        status::print_startup(&location, self.config.interval());

        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let state_rx = self.state_tx.subscribe();

        let actor = MonitorActor::new(self, cmd_rx);
        actor.state_tx.send_replace(MonitorState::Running);
        tokio::spawn(actor.run());

        Ok(MonitorHandle {
            sender: cmd_tx,
            state: state_rx,
        })
    }
}

struct MonitorActor {
    provider: Arc<dyn MetricsProvider>,
    notifier: Arc<dyn Notifier>,
    log: Arc<dyn SampleLog>,
    evaluator: ThresholdEvaluator,
    cooldowns: AlertCooldownTracker,
    app_name: String,
    notification_timeout: Duration,
    interval_duration: Duration,
    command_rx: mpsc::Receiver<MonitorCommand>,
    state_tx: watch::Sender<MonitorState>,
    report: MonitorReport,
}

impl MonitorActor {
    fn new(monitor: MonitorLoop, command_rx: mpsc::Receiver<MonitorCommand>) -> Self {
        let MonitorLoop {
            config,
            provider,
            notifier,
            log,
            state_tx,
        } = monitor;

        let report = MonitorReport {
            log_location: log.location(),
            ..MonitorReport::default()
        };

        Self {
            evaluator: ThresholdEvaluator::new(config.thresholds),
            cooldowns: AlertCooldownTracker::new(config.cooldown()),
            notification_timeout: config.notification_timeout(),
            interval_duration: config.interval(),
            app_name: config.app_name,
            provider,
            notifier,
            log,
            command_rx,
            state_tx,
            report,
        }
    }

    #[instrument(skip(self), fields(interval = ?self.interval_duration))]
    async fn run(mut self) {
        debug!("starting monitor actor");

        let mut ticker = interval(self.interval_duration);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                cmd = self.command_rx.recv() => match cmd {
                    Some(MonitorCommand::TickNow { respond_to }) => {
                        debug!("received TickNow command");
                        let summary = self.tick().await;
                        let _ = respond_to.send(summary);
                    }

                    Some(MonitorCommand::Shutdown { respond_to }) => {
                        debug!("received shutdown command");
                        let report = self.stop().await;
                        let _ = respond_to.send(report);
                        break;
                    }

                    None => {
                        warn!("command channel closed, shutting down");
                        self.stop().await;
                        break;
                    }
                },

                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        debug!("monitor actor stopped");
    }

    async fn tick(&mut self) -> TickSummary {
        self.report.ticks += 1;
        let mut summary = TickSummary::default();

        let Sampling { sample, partial } = match self.provider.sample().await {
            Ok(sampling) => sampling,
            Err(e) => {
                error!("skipping tick: {e}");
                self.report.skipped_ticks += 1;
                return summary;
            }
        };
        summary.sampled = true;

        for failure in &partial {
            debug!("partial sample: {failure}");
        }

        status::print_sample(&sample);

        for event in self.evaluator.evaluate(&sample) {
            status::print_warning(&event);
            summary.alerts.push(event.kind);

            if self.alert(&event).await {
                summary.notified.push(event.kind);
            }
        }

        match self.log.append(&sample).await {
            Ok(()) => {
                self.report.rows_written += 1;
                summary.logged = true;
            }
            Err(e) => {
                error!("failed to append sample to {}: {e}", self.report.log_location);
                self.report.write_failures += 1;
            }
        }

        summary
    }

    /// Returns whether a notification was delivered.
    async fn alert(&mut self, event: &AlertEvent) -> bool {
        let previous = match self.cooldowns.try_fire(event.kind, Instant::now()) {
            CooldownDecision::Fire { previous } => previous,
            CooldownDecision::Suppressed { remaining } => {
                debug!(
                    "{} notification suppressed, cooldown ends in {}s",
                    event.kind,
                    remaining.as_secs()
                );
                self.report.notifications_suppressed += 1;
                return false;
            }
        };

        let notification = Notification {
            app_name: self.app_name.clone(),
            title: event.title().to_string(),
            message: event.message(),
            timeout: self.notification_timeout,
        };

        match self.notifier.notify(&notification).await {
            Ok(()) => {
                info!("sent {} alert: {}", event.kind, notification.message);
                self.report.notifications_sent += 1;
                true
            }
            Err(e) => {
                error!("failed to send {} alert: {e}", event.kind);
                // an undelivered alert must not silence the next one
                self.cooldowns.restore(event.kind, previous);
                self.report.notification_failures += 1;
                false
            }
        }
    }

    async fn stop(&mut self) -> MonitorReport {
        self.state_tx.send_replace(MonitorState::Stopping);

        if let Err(e) = self.log.close().await {
            error!("failed to close sample log: {e}");
        }

        self.state_tx.send_replace(MonitorState::Stopped);
        status::print_shutdown(&self.report.log_location);

        self.report.clone()
    }
}

/// Handle for controlling a running monitor
///
/// Can be cloned and shared across tasks.
#[derive(Clone)]
pub struct MonitorHandle {
    sender: mpsc::Sender<MonitorCommand>,
    state: watch::Receiver<MonitorState>,
}

impl MonitorHandle {
    pub fn state(&self) -> MonitorState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<MonitorState> {
        self.state.clone()
    }

    /// Run one tick now, bypassing the interval timer.
    pub async fn tick_now(&self) -> Result<TickSummary, MonitorError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::TickNow { respond_to: tx })
            .await
            .map_err(|_| MonitorError::Stopped)?;

        rx.await.map_err(|_| MonitorError::Stopped)
    }

    /// Stop the monitor and wait until the log is closed.
    pub async fn shutdown(&self) -> Result<MonitorReport, MonitorError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::Shutdown { respond_to: tx })
            .await
            .map_err(|_| MonitorError::Stopped)?;

        rx.await.map_err(|_| MonitorError::Stopped)
    }

    /// Resolves once the monitor reached `Stopped`, however it got there.
    pub async fn stopped(&self) {
        let mut state = self.state.clone();
        // an Err means the actor is gone, which is stopped as well
        let _ = state
            .wait_for(|state| *state == MonitorState::Stopped)
            .await;
    }
}
