use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::events::Event;

/// What a pass asks the host to do once it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rerun {
    /// Wait for the next user action.
    #[default]
    None,
    /// Run another pass right away.
    Immediate,
    /// Suspend for the interval, then run another pass.
    After(Duration),
}

/// Output of [`App::render`](super::App::render).
#[derive(Debug, Clone)]
pub struct Rendered<V> {
    pub view: V,
    pub rerun: Rerun,
}

impl<V> Rendered<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            rerun: Rerun::None,
        }
    }

    pub fn rerun(mut self, rerun: Rerun) -> Self {
        self.rerun = rerun;
        self
    }
}

/// Clock reading and event buffer for one callback or pass.
///
/// The clock is read once so every computation in the pass sees the same
/// `today` and `now`.
#[derive(Debug)]
pub struct PassContext {
    today: NaiveDate,
    now: DateTime<Utc>,
    pass: u64,
    events: Vec<Event>,
}

impl PassContext {
    pub fn new<C: Clock + ?Sized>(clock: &C, pass: u64) -> Self {
        Self {
            today: clock.today(),
            now: clock.now(),
            pass,
            events: Vec::new(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn pass(&self) -> u64 {
        self.pass
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
