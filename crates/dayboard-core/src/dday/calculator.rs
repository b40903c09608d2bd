use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::offset_date;
use crate::error::ValidationError;
use crate::events::Event;
use crate::host::{App, PassContext, Rendered};
use crate::session::{Key, SessionStore};
use crate::storage::CalculatorConfig;

pub const TARGET_DATE: Key<NaiveDate> = Key::new("target_date");
pub const DDAY_TITLE: Key<String> = Key::new("dday_title");
pub const MODE: Key<CountMode> = Key::new("mode");

/// How the distance to the target date is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMode {
    /// Days left until the target; negative distances are reported as elapsed.
    #[default]
    Remaining,
    /// Day count since a start date, the start day itself being day 1.
    Elapsed,
}

impl fmt::Display for CountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountMode::Remaining => write!(f, "remaining"),
            CountMode::Elapsed => write!(f, "elapsed"),
        }
    }
}

impl FromStr for CountMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remaining" | "dday" | "d-day" => Ok(CountMode::Remaining),
            "elapsed" | "count" | "daycount" => Ok(CountMode::Elapsed),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("expected 'remaining' or 'elapsed', got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DdayOutcome {
    /// Target is today or later; `days == 0` means today is the day.
    Remaining { days: i64 },
    /// Target has passed.
    Passed { days: i64 },
    /// Start date is today or earlier; `count == 1` on the start day.
    DayCount { count: i64 },
    /// Start date is still ahead.
    UntilStart { days: i64 },
}

impl DdayOutcome {
    /// True on the day the count is about: the D-day itself, or the start day.
    pub fn is_milestone(&self) -> bool {
        matches!(
            self,
            DdayOutcome::Remaining { days: 0 } | DdayOutcome::DayCount { count: 1 }
        )
    }

    pub fn message(&self, title: &str) -> String {
        match *self {
            DdayOutcome::Remaining { days: 0 } => format!("D-Day! Today is the day for {title}."),
            DdayOutcome::Remaining { days: 1 } => "1 day remaining.".to_string(),
            DdayOutcome::Remaining { days } => format!("{days} days remaining."),
            DdayOutcome::Passed { days: 1 } => "The D-day passed 1 day ago. Set your next goal!".to_string(),
            DdayOutcome::Passed { days } => {
                format!("The D-day passed {days} days ago. Set your next goal!")
            }
            DdayOutcome::DayCount { count: 1 } => format!("Today is the start day of {title}."),
            DdayOutcome::DayCount { count } => format!("Day +{count} since the start."),
            DdayOutcome::UntilStart { days } => {
                format!("Not started yet: {days} days until the start date.")
            }
        }
    }
}

/// Signed whole days from `today` to `target`.
pub fn days_between(today: NaiveDate, target: NaiveDate) -> i64 {
    (target - today).num_days()
}

pub fn outcome(today: NaiveDate, target: NaiveDate, mode: CountMode) -> DdayOutcome {
    let delta = days_between(today, target);
    match mode {
        CountMode::Remaining if delta >= 0 => DdayOutcome::Remaining { days: delta },
        CountMode::Remaining => DdayOutcome::Passed { days: delta.abs() },
        CountMode::Elapsed if delta <= 0 => DdayOutcome::DayCount {
            count: delta.abs() + 1,
        },
        CountMode::Elapsed => DdayOutcome::UntilStart { days: delta },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculatorAction {
    SetTitle(String),
    SetDate(NaiveDate),
    SetMode(CountMode),
    /// Restore title, date and mode to their defaults.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatorView {
    pub title: String,
    pub target_date: NaiveDate,
    pub today: NaiveDate,
    pub mode: CountMode,
    pub outcome: DdayOutcome,
    pub message: String,
    pub celebrate: bool,
}

impl fmt::Display for CalculatorView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.message)?;
        let label = match (self.mode, self.outcome) {
            (CountMode::Remaining, DdayOutcome::Passed { .. }) => "Past target date",
            (CountMode::Remaining, _) => "Target date",
            (CountMode::Elapsed, DdayOutcome::UntilStart { .. }) => "Planned start date",
            (CountMode::Elapsed, _) => "Start date",
        };
        writeln!(f, "{label}: {}", self.target_date.format("%Y-%m-%d"))?;
        write!(f, "Today: {}", self.today.format("%Y-%m-%d"))
    }
}

/// Single-target D-day calculator.
#[derive(Debug, Clone, Default)]
pub struct CalculatorApp {
    config: CalculatorConfig,
}

impl CalculatorApp {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    fn default_date(&self, today: NaiveDate) -> NaiveDate {
        offset_date(today, self.config.default_offset_days).unwrap_or_else(|| {
            warn!(offset = self.config.default_offset_days, "default offset out of range, using today");
            today
        })
    }
}

impl App for CalculatorApp {
    type Action = CalculatorAction;
    type View = CalculatorView;

    fn name(&self) -> &'static str {
        "calculator"
    }

    async fn handle(&self, store: &mut SessionStore, action: CalculatorAction, ctx: &mut PassContext) {
        match action {
            CalculatorAction::SetTitle(title) => store.set(DDAY_TITLE, title),
            CalculatorAction::SetDate(date) => store.set(TARGET_DATE, date),
            CalculatorAction::SetMode(mode) => store.set(MODE, mode),
            CalculatorAction::Reset => {
                store.set(TARGET_DATE, self.default_date(ctx.today()));
                store.set(DDAY_TITLE, self.config.default_title.clone());
                store.set(MODE, CountMode::default());
                ctx.emit(Event::SettingsReset { at: ctx.now() });
            }
        }
    }

    fn render(&self, store: &mut SessionStore, ctx: &mut PassContext) -> Rendered<CalculatorView> {
        let today = ctx.today();
        let target_date = *store.get_or_init(TARGET_DATE, || self.default_date(today));
        let title = store
            .get_or_init(DDAY_TITLE, || self.config.default_title.clone())
            .clone();
        let mode = *store.get_or_init(MODE, CountMode::default);

        let outcome = outcome(today, target_date, mode);
        Rendered::new(CalculatorView {
            message: outcome.message(&title),
            celebrate: outcome.is_milestone(),
            title,
            target_date,
            today,
            mode,
            outcome,
        })
    }
}
