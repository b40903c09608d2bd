//! Time sources.
//!
//! Every date and timestamp the apps look at comes from a [`Clock`], read
//! once at the start of each pass. Tests and the CLI's `--today` override
//! use [`ManualClock`].

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for D-day arithmetic.
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// Wall clock; `today()` is the local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

#[derive(Debug)]
struct ManualInner {
    now: DateTime<Utc>,
    today: Option<NaiveDate>,
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    inner: Mutex<ManualInner>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            inner: Mutex::new(ManualInner { now, today: None }),
        }
    }

    /// Starts at the current wall-clock time with `today` pinned.
    pub fn on(today: NaiveDate) -> Self {
        let clock = Self::new(Utc::now());
        clock.set_today(today);
        clock
    }

    pub fn set_now(&self, now: DateTime<Utc>) {
        self.lock().now = now;
    }

    /// Pins the calendar date independently of `now`.
    pub fn set_today(&self, today: NaiveDate) {
        self.lock().today = Some(today);
    }

    pub fn advance(&self, by: Duration) {
        let mut inner = self.lock();
        inner.now += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        // A poisoned clock still holds a valid timestamp.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.lock().now
    }

    fn today(&self) -> NaiveDate {
        let inner = self.lock();
        inner
            .today
            .unwrap_or_else(|| inner.now.with_timezone(&Local).date_naive())
    }
}
