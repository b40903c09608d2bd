use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculator::days_between;

/// Identity of a D-day item, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdayItem {
    id: ItemId,
    pub title: String,
    pub date: NaiveDate,
}

impl DdayItem {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: ItemId::new(),
            title: title.into(),
            date,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn status(&self, today: NaiveDate) -> ItemStatus {
        ItemStatus::of(today, self.date)
    }
}

/// Where an item's date sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemStatus {
    /// Date has passed; the date itself counts as day 1.
    Started { day_count: i64 },
    Today,
    Remaining { days: i64, weeks_left: i64 },
}

impl ItemStatus {
    pub fn of(today: NaiveDate, date: NaiveDate) -> Self {
        let delta = days_between(today, date);
        match delta {
            d if d < 0 => ItemStatus::Started {
                day_count: d.abs() + 1,
            },
            0 => ItemStatus::Today,
            d => ItemStatus::Remaining {
                days: d,
                weeks_left: d.div_euclid(7),
            },
        }
    }

    pub fn label(&self) -> String {
        match self {
            ItemStatus::Started { day_count } => format!("+{day_count}, started"),
            ItemStatus::Today => "D-Day".to_string(),
            ItemStatus::Remaining { days, .. } => format!("D-{days}"),
        }
    }
}

/// Ordered D-day items plus the one (at most) being edited.
///
/// Insertion order is display order. The edit pointer only ever refers to
/// an item that is still in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdayList {
    items: Vec<DdayItem>,
    editing: Option<ItemId>,
}

impl DdayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[DdayItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&DdayItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn editing(&self) -> Option<ItemId> {
        self.editing
    }

    pub fn is_editing(&self, id: ItemId) -> bool {
        self.editing == Some(id)
    }

    /// Appends a new item with a fresh id.
    pub fn add(&mut self, title: impl Into<String>, date: NaiveDate) -> &DdayItem {
        let index = self.items.len();
        self.items.push(DdayItem::new(title, date));
        &self.items[index]
    }

    /// Puts `id` in edit mode, replacing any other item in edit mode.
    /// Returns false (and changes nothing) if there is no such item.
    pub fn start_edit(&mut self, id: ItemId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.editing = Some(id);
        true
    }

    /// Overwrites title and date and leaves edit mode. Silently does nothing
    /// if the item no longer exists.
    pub fn save_edit(&mut self, id: ItemId, title: impl Into<String>, date: NaiveDate) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        item.title = title.into();
        item.date = date;
        self.editing = None;
        true
    }

    pub fn cancel_edit(&mut self) -> Option<ItemId> {
        self.editing.take()
    }

    /// Removes the item, keeping the order of the rest. Leaves edit mode if
    /// the removed item was being edited.
    pub fn delete(&mut self, id: ItemId) -> Option<DdayItem> {
        let index = self.position(id)?;
        if self.editing == Some(id) {
            self.editing = None;
        }
        Some(self.items.remove(index))
    }

    /// Empties the list; returns how many items were removed.
    pub fn clear_all(&mut self) -> usize {
        self.editing = None;
        let removed = self.items.len();
        self.items.clear();
        removed
    }
}

/// Deals `items` round-robin into `n` columns: index `i` lands in column
/// `i % n`, keeping list order inside each column.
pub fn columns<T>(items: &[T], n: usize) -> Vec<Vec<&T>> {
    let n = n.max(1);
    let mut cols: Vec<Vec<&T>> = (0..n).map(|_| Vec::new()).collect();
    for (i, item) in items.iter().enumerate() {
        cols[i % n].push(item);
    }
    cols
}
