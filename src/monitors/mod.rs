//! Alert decision logic: which readings exceed their limits and whether a
//! notification may go out right now.

pub mod cooldown;
pub mod thresholds;

pub use cooldown::{AlertCooldownTracker, CooldownDecision, CooldownState};
pub use thresholds::{AlertEvent, ThresholdEvaluator, Thresholds};
