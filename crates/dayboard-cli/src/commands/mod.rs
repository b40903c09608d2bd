pub mod calc;
pub mod config;
pub mod list;
pub mod prompt;
pub mod timer;

use std::sync::Arc;

use chrono::NaiveDate;
use dayboard_core::{Clock, ManualClock, SystemClock};
use serde::Serialize;

/// Wall clock, or a clock pinned to `today` when one is given.
pub fn clock_for(today: Option<NaiveDate>) -> Arc<dyn Clock> {
    match today {
        Some(day) => Arc::new(ManualClock::on(day)),
        None => Arc::new(SystemClock),
    }
}

/// Prints `value` as pretty JSON, or with its Display impl.
pub fn print_view<V>(value: &V, json: bool) -> Result<(), Box<dyn std::error::Error>>
where
    V: Serialize + std::fmt::Display,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{value}");
    }
    Ok(())
}
