//! Per-kind notification rate limiting.
//!
//! ```text
//! never fired                  → Fire
//! now <  last_fired + cooldown → Suppressed { remaining }
//! now >= last_fired + cooldown → Fire
//! ```
//!
//! The state is owned by one tracker, so independent monitors never share
//! cooldowns.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::AlertKind;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300);

/// Last time each kind fired. Starts empty and lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct CooldownState {
    last_fired: HashMap<AlertKind, Instant>,
}

impl CooldownState {
    pub fn last_fired(&self, kind: AlertKind) -> Option<Instant> {
        self.last_fired.get(&kind).copied()
    }

    fn remaining(&self, kind: AlertKind, now: Instant, cooldown: Duration) -> Option<Duration> {
        let last = self.last_fired(kind)?;
        let elapsed = now.saturating_duration_since(last);
        (elapsed < cooldown).then(|| cooldown - elapsed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// The firing has been recorded. `previous` is what to hand back to
    /// [`AlertCooldownTracker::restore`] if delivery fails.
    Fire { previous: Option<Instant> },
    Suppressed { remaining: Duration },
}

#[derive(Debug)]
pub struct AlertCooldownTracker {
    cooldown: Duration,
    state: Mutex<CooldownState>,
}

impl Default for AlertCooldownTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl AlertCooldownTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            state: Mutex::new(CooldownState::default()),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn should_fire(&self, kind: AlertKind, now: Instant) -> bool {
        self.lock().remaining(kind, now, self.cooldown).is_none()
    }

    pub fn record_fired(&self, kind: AlertKind, now: Instant) {
        self.lock().last_fired.insert(kind, now);
    }

    /// Checks and records in one critical section, so concurrent callers
    /// get at most one `Fire` per kind and window.
    pub fn try_fire(&self, kind: AlertKind, now: Instant) -> CooldownDecision {
        let mut state = self.lock();
        if let Some(remaining) = state.remaining(kind, now, self.cooldown) {
            return CooldownDecision::Suppressed { remaining };
        }
        let previous = state.last_fired.insert(kind, now);
        CooldownDecision::Fire { previous }
    }

    /// Rolls back a `try_fire` whose notification was never delivered.
    pub fn restore(&self, kind: AlertKind, previous: Option<Instant>) {
        let mut state = self.lock();
        match previous {
            Some(instant) => state.last_fired.insert(kind, instant),
            None => state.last_fired.remove(&kind),
        };
    }

    pub fn snapshot(&self) -> CooldownState {
        self.lock().clone()
    }

    // The map stays consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, CooldownState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
