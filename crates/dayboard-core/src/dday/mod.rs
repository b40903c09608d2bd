//! D-day arithmetic and the two D-day apps.
//!
//! - [`CalculatorApp`]: one target date, counted as days remaining or as
//!   days elapsed since a start date.
//! - [`ListApp`]: any number of titled dates with add/edit/delete.

mod board;
mod calculator;
mod list;

pub use board::{AddForm, ItemCard, ListAction, ListApp, ListView};
pub use calculator::{
    days_between, outcome, CalculatorAction, CalculatorApp, CalculatorView, CountMode, DdayOutcome,
};
pub use list::{columns, DdayItem, DdayList, ItemId, ItemStatus};

use chrono::{Duration, NaiveDate};

use crate::error::ValidationError;

/// `today` shifted by `days`, or `None` when the result leaves chrono's
/// date range.
pub(crate) fn offset_date(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    today.checked_add_signed(Duration::try_days(days)?)
}

/// Parses `YYYY-MM-DD`, `today`, or a signed day offset from `today`
/// such as `+14` or `-3`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    let invalid = || ValidationError::InvalidValue {
        field: "date".into(),
        message: format!("expected YYYY-MM-DD, 'today' or +N/-N days, got '{input}'"),
    };
    if input.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    let (negative, digits) = match input.as_bytes().first() {
        Some(b'+') => (false, &input[1..]),
        Some(b'-') => (true, &input[1..]),
        _ => return NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid()),
    };
    if !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let days: i64 = digits.parse().map_err(|_| invalid())?;
    let days = if negative {
        days.checked_neg().ok_or_else(invalid)?
    } else {
        days
    };
    offset_date(today, days).ok_or_else(invalid)
}
