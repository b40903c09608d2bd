use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::countdown::{format_mmss, CountdownTimer, Tick, TimerPhase};
use crate::events::Event;
use crate::host::{App, PassContext, Rendered, Rerun};
use crate::session::{Key, SessionStore};
use crate::storage::TimerConfig;

pub const TIMER: Key<CountdownTimer> = Key::new("timer");

pub const EXPIRY_MESSAGE: &str = "Time's up!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// One of the preset buttons.
    Start(u32),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerView {
    pub phase: TimerPhase,
    pub display: String,
    pub remaining_secs: i64,
    pub end_time: Option<DateTime<Utc>>,
    pub presets: Vec<u32>,
    /// Shown on every pass after expiry until the next start or reset.
    pub notification: Option<String>,
    /// Only on the pass that first observed expiry.
    pub celebrate: bool,
}

impl fmt::Display for TimerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.notification {
            Some(note) => write!(f, "{} {note}", self.display),
            None => write!(f, "{}", self.display),
        }
    }
}

/// Countdown timer with fixed start buttons.
#[derive(Debug, Clone, Default)]
pub struct TimerApp {
    config: TimerConfig,
}

impl TimerApp {
    pub fn new(config: TimerConfig) -> Self {
        Self { config }
    }

    pub fn presets(&self) -> &[u32] {
        &self.config.presets
    }

    fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.config.tick_interval_ms.max(1))
    }
}

impl App for TimerApp {
    type Action = TimerAction;
    type View = TimerView;

    fn name(&self) -> &'static str {
        "timer"
    }

    async fn handle(&self, store: &mut SessionStore, action: TimerAction, ctx: &mut PassContext) {
        let timer = store.get_or_init(TIMER, CountdownTimer::new);
        match action {
            TimerAction::Start(minutes) => {
                if !self.config.presets.contains(&minutes) {
                    warn!(minutes, presets = ?self.config.presets, "ignoring start with unknown duration");
                    return;
                }
                let end_time = timer.start(minutes, ctx.now());
                info!(minutes, %end_time, "countdown started");
                ctx.emit(Event::TimerStarted {
                    minutes,
                    end_time,
                    at: ctx.now(),
                });
            }
            TimerAction::Reset => {
                timer.reset();
                ctx.emit(Event::TimerReset { at: ctx.now() });
            }
        }
    }

    fn render(&self, store: &mut SessionStore, ctx: &mut PassContext) -> Rendered<TimerView> {
        let timer = store.get_or_init(TIMER, CountdownTimer::new);
        let tick = timer.tick(ctx.now());

        let mut view = TimerView {
            phase: timer.phase(),
            display: format_mmss(0),
            remaining_secs: 0,
            end_time: timer.end_time(),
            presets: self.config.presets.clone(),
            notification: None,
            celebrate: false,
        };

        match tick {
            Tick::Idle => Rendered::new(view),
            Tick::Running { remaining_secs } => {
                view.display = format_mmss(remaining_secs);
                view.remaining_secs = remaining_secs;
                Rendered::new(view).rerun(Rerun::After(self.tick_interval()))
            }
            Tick::JustExpired => {
                info!("countdown expired");
                ctx.emit(Event::TimerExpired { at: ctx.now() });
                view.notification = Some(EXPIRY_MESSAGE.to_string());
                view.celebrate = true;
                Rendered::new(view)
            }
            Tick::Expired => {
                view.notification = Some(EXPIRY_MESSAGE.to_string());
                Rendered::new(view)
            }
        }
    }
}
