//! Actor-based monitoring loop
//!
//! The monitor runs as an independent tokio task and is controlled through a
//! command channel, which keeps shutdown deterministic and testable without
//! process signals.
//!
//! ## Architecture Overview
//!
//! ```text
//!   MonitorLoop::start ──ensure_initialized──▶ SampleLog
//!          │
//!          │ spawns
//!          ▼
//!   ┌──────────────┐  sample   ┌─────────────────┐
//!   │ MonitorActor │──────────▶│ MetricsProvider │
//!   │              │  notify   ├─────────────────┤
//!   │  cooldowns   │──────────▶│ Notifier        │
//!   │  evaluator   │  append   ├─────────────────┤
//!   │              │──────────▶│ SampleLog       │
//!   └──────▲───────┘           └─────────────────┘
//!          │ TickNow / Shutdown
//!   MonitorHandle (cloneable)
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: mpsc command channel into the actor
//! 2. **Request/Response**: oneshot channels for tick summaries and the final report
//! 3. **State**: watch channel publishing `MonitorState` transitions

pub mod messages;
pub mod monitor;

pub use messages::{MonitorCommand, MonitorReport, MonitorState, TickSummary};
pub use monitor::{MonitorError, MonitorHandle, MonitorLoop};
