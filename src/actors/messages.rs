//! Message types for monitor communication
//!
//! 1. **Commands**: sent to the monitor actor via mpsc, answered via oneshot
//! 2. **State**: published through a watch channel for any number of observers

use std::fmt;

use tokio::sync::oneshot;

use crate::AlertKind;

/// Lifecycle of a monitor
///
/// ```text
/// Idle ──start──▶ Running ──shutdown──▶ Stopping ──log closed──▶ Stopped
/// ```
///
/// `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            MonitorState::Idle => "idle",
            MonitorState::Running => "running",
            MonitorState::Stopping => "stopping",
            MonitorState::Stopped => "stopped",
        };
        f.write_str(state)
    }
}

/// Commands that can be sent to a MonitorActor
#[derive(Debug)]
pub enum MonitorCommand {
    /// Run one tick immediately, independent of the interval timer
    TickNow {
        respond_to: oneshot::Sender<TickSummary>,
    },

    /// Stop the monitor
    ///
    /// A tick already in progress finishes (including its append) first.
    Shutdown {
        respond_to: oneshot::Sender<MonitorReport>,
    },
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// A sample was obtained; `false` means the tick was skipped
    pub sampled: bool,

    /// Kinds whose threshold was exceeded, in evaluation order
    pub alerts: Vec<AlertKind>,

    /// Kinds for which a notification was actually delivered
    pub notified: Vec<AlertKind>,

    /// The sample was appended to the log
    pub logged: bool,
}

/// Counters collected over the lifetime of a monitor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorReport {
    pub ticks: u64,
    pub skipped_ticks: u64,
    pub rows_written: u64,
    pub write_failures: u64,
    pub notifications_sent: u64,
    pub notifications_suppressed: u64,
    pub notification_failures: u64,

    /// Where the sample log lives
    pub log_location: String,
}
