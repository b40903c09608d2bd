mod app;
mod countdown;

pub use app::{TimerAction, TimerApp, TimerView};
pub use countdown::{format_mmss, CountdownTimer, Tick, TimerPhase};
