//! Countdown state machine.
//!
//! Like the rest of the apps, the countdown has no thread of its own. It is
//! a wall-clock deadline that the caller checks with `tick()` on every pass;
//! while time remains the pass asks the host for another pass one interval
//! later.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --tick(remaining <= 0)--> Expired
//!  ^                 |                                  |
//!  +-----reset-------+--------------reset---------------+
//! ```
//!
//! `start` is accepted in every state and re-arms the deadline.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    /// Deadline reached and the notification has been shown.
    Expired,
}

/// Outcome of checking the deadline during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    /// Still counting; whole seconds left, rounded down.
    Running { remaining_secs: i64 },
    /// This check is the one that found the deadline passed.
    JustExpired,
    /// Expired on an earlier pass.
    Expired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownTimer {
    active: bool,
    /// Present from `start` until `reset`.
    #[serde(default)]
    end_time: Option<DateTime<Utc>>,
    /// Set once per armed timer, when expiry is first observed.
    notified: bool,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn is_notified(&self) -> bool {
        self.notified
    }

    pub fn phase(&self) -> TimerPhase {
        if self.active {
            TimerPhase::Running
        } else if self.notified {
            TimerPhase::Expired
        } else {
            TimerPhase::Idle
        }
    }

    /// Time left at `now`, never negative. Zero when no deadline is armed.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.end_time {
            Some(end) if self.active => (end - now).max(Duration::zero()),
            _ => Duration::zero(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arms the timer for `minutes` from `now`, whatever state it was in.
    pub fn start(&mut self, minutes: u32, now: DateTime<Utc>) -> DateTime<Utc> {
        let end = now + Duration::minutes(i64::from(minutes));
        self.active = true;
        self.end_time = Some(end);
        self.notified = false;
        end
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.end_time = None;
        self.notified = false;
    }

    /// Call once per pass.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        if !self.active {
            return if self.notified { Tick::Expired } else { Tick::Idle };
        }
        let Some(end) = self.end_time else {
            // Active without a deadline cannot be produced by `start`.
            self.active = false;
            return Tick::Idle;
        };

        let remaining = end - now;
        if remaining > Duration::zero() {
            return Tick::Running {
                remaining_secs: remaining.num_seconds(),
            };
        }

        self.active = false;
        if self.notified {
            Tick::Expired
        } else {
            self.notified = true;
            Tick::JustExpired
        }
    }
}

/// `mm:ss`, zero-padded; negative input shows as `00:00`.
pub fn format_mmss(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_then_tick_shows_full_duration() {
        let now = Utc::now();
        let mut timer = CountdownTimer::new();
        timer.start(5, now);
        assert_eq!(timer.phase(), TimerPhase::Running);
        let tick = timer.tick(now + Duration::milliseconds(400));
        let Tick::Running { remaining_secs } = tick else {
            panic!("expected running, got {tick:?}");
        };
        let shown = format_mmss(remaining_secs);
        assert!(shown == "04:59" || shown == "05:00", "shown {shown}");
    }

    #[test]
    fn expiry_is_reported_once() {
        let now = Utc::now();
        let mut timer = CountdownTimer::new();
        timer.start(3, now);
        let later = now + Duration::minutes(3);
        assert_eq!(timer.tick(later), Tick::JustExpired);
        assert!(timer.is_notified());
        assert!(!timer.is_active());
        for i in 1..5 {
            assert_eq!(timer.tick(later + Duration::seconds(i)), Tick::Expired);
        }
        assert_eq!(timer.phase(), TimerPhase::Expired);
    }

    #[test]
    fn restart_clears_notification() {
        let now = Utc::now();
        let mut timer = CountdownTimer::new();
        timer.start(3, now);
        timer.tick(now + Duration::minutes(4));
        let end = timer.start(10, now + Duration::minutes(4));
        assert_eq!(end, now + Duration::minutes(14));
        assert!(!timer.is_notified());
        assert_eq!(timer.phase(), TimerPhase::Running);
    }

    #[test]
    fn reset_goes_idle_from_any_state() {
        let now = Utc::now();
        let mut timer = CountdownTimer::new();
        timer.start(15, now);
        timer.reset();
        assert_eq!(timer, CountdownTimer::new());
        assert_eq!(timer.tick(now), Tick::Idle);

        timer.start(3, now);
        timer.tick(now + Duration::minutes(5));
        timer.reset();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.end_time(), None);
    }

    #[test]
    fn formats() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(59), "00:59");
        assert_eq!(format_mmss(61), "01:01");
        assert_eq!(format_mmss(15 * 60), "15:00");
        assert_eq!(format_mmss(-3), "00:00");
    }

    #[test]
    fn remaining_clamps_at_zero() {
        let now = Utc::now();
        let mut timer = CountdownTimer::new();
        assert_eq!(timer.remaining(now), Duration::zero());
        timer.start(3, now);
        assert_eq!(timer.remaining(now + Duration::minutes(1)), Duration::minutes(2));
        assert_eq!(timer.remaining(now + Duration::minutes(9)), Duration::zero());
    }
}
