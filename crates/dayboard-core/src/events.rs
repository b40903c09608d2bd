use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dday::ItemId;

/// Every state change made by a callback or a render pass produces an Event.
/// The host collects them into the frame of the pass they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Calculator settings restored to their defaults.
    SettingsReset {
        at: DateTime<Utc>,
    },
    ItemAdded {
        id: ItemId,
        title: String,
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    ItemUpdated {
        id: ItemId,
        title: String,
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    ItemDeleted {
        id: ItemId,
        at: DateTime<Utc>,
    },
    ListCleared {
        removed: usize,
        at: DateTime<Utc>,
    },
    EditStarted {
        id: ItemId,
        at: DateTime<Utc>,
    },
    EditCancelled {
        id: ItemId,
        at: DateTime<Utc>,
    },
    PromptGenerated {
        chars: usize,
        at: DateTime<Utc>,
    },
    PromptFailed {
        message: String,
        at: DateTime<Utc>,
    },
    TimerStarted {
        minutes: u32,
        end_time: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// Emitted exactly once per armed timer.
    TimerExpired {
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
}
