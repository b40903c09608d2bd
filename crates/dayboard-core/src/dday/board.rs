use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::list::{columns, DdayList, ItemId, ItemStatus};
use super::offset_date;
use crate::events::Event;
use crate::host::{App, PassContext, Rendered};
use crate::session::{Key, SessionStore};
use crate::storage::ListConfig;

pub const DDAY_LIST: Key<DdayList> = Key::new("dday_list");
pub const ADD_FORM: Key<AddForm> = Key::new("add_form");

/// Pending inputs of the "add" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddForm {
    pub title: String,
    pub date: Option<NaiveDate>,
}

impl AddForm {
    /// Title and date to create, substituting defaults for blank inputs.
    pub fn resolve(&self, config: &ListConfig, today: NaiveDate) -> (String, NaiveDate) {
        let title = match self.title.trim() {
            "" => config.default_title.clone(),
            t => t.to_string(),
        };
        let date = self.date.unwrap_or_else(|| {
            offset_date(today, config.default_offset_days).unwrap_or_else(|| {
                warn!(offset = config.default_offset_days, "default offset out of range, using today");
                today
            })
        });
        (title, date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    SetNewTitle(String),
    SetNewDate(Option<NaiveDate>),
    Add,
    StartEdit(ItemId),
    SaveEdit {
        id: ItemId,
        title: String,
        date: NaiveDate,
    },
    CancelEdit,
    Delete(ItemId),
    ClearAll,
}

/// One rendered item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemCard {
    pub id: ItemId,
    /// 1-based position in list order.
    pub position: usize,
    pub column: usize,
    pub title: String,
    pub date: NaiveDate,
    pub status: ItemStatus,
    pub label: String,
    pub editing: bool,
    pub celebrate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub today: NaiveDate,
    pub form: AddForm,
    /// Cards dealt round-robin into columns.
    pub columns: Vec<Vec<ItemCard>>,
    pub editing: Option<ItemId>,
    pub total: usize,
}

impl ListView {
    /// Cards in list order.
    pub fn cards(&self) -> Vec<&ItemCard> {
        let mut cards: Vec<_> = self.columns.iter().flatten().collect();
        cards.sort_by_key(|c| c.position);
        cards
    }
}

impl fmt::Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(f, "No D-days yet. Add one with `add`.");
        }
        let cards = self.cards();
        for (i, card) in cards.iter().enumerate() {
            let marker = if card.editing { "*" } else { " " };
            write!(
                f,
                "{marker}[{}] {:<20} {}  {}",
                card.position,
                card.title,
                card.date.format("%Y-%m-%d"),
                card.label
            )?;
            if let ItemStatus::Remaining { weeks_left, .. } = card.status {
                let unit = if weeks_left == 1 { "week" } else { "weeks" };
                write!(f, " ({weeks_left} {unit} left)")?;
            }
            if card.celebrate {
                write!(f, " -- today!")?;
            }
            if i + 1 < cards.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Multi-item D-day list manager.
#[derive(Debug, Clone, Default)]
pub struct ListApp {
    config: ListConfig,
}

impl ListApp {
    pub fn new(config: ListConfig) -> Self {
        Self { config }
    }
}

impl App for ListApp {
    type Action = ListAction;
    type View = ListView;

    fn name(&self) -> &'static str {
        "list"
    }

    async fn handle(&self, store: &mut SessionStore, action: ListAction, ctx: &mut PassContext) {
        let at = ctx.now();
        match action {
            ListAction::SetNewTitle(title) => {
                store.get_or_init(ADD_FORM, AddForm::default).title = title;
            }
            ListAction::SetNewDate(date) => {
                store.get_or_init(ADD_FORM, AddForm::default).date = date;
            }
            ListAction::Add => {
                let form = store.get_or_init(ADD_FORM, AddForm::default);
                let (title, date) = form.resolve(&self.config, ctx.today());
                *form = AddForm::default();
                let id = store.mutate(DDAY_LIST, DdayList::new, |list| {
                    list.add(title.clone(), date).id()
                });
                ctx.emit(Event::ItemAdded { id, title, date, at });
            }
            ListAction::StartEdit(id) => {
                if store.mutate(DDAY_LIST, DdayList::new, |list| list.start_edit(id)) {
                    ctx.emit(Event::EditStarted { id, at });
                }
            }
            ListAction::SaveEdit { id, title, date } => {
                let saved = store.mutate(DDAY_LIST, DdayList::new, |list| {
                    list.save_edit(id, title.clone(), date)
                });
                if saved {
                    ctx.emit(Event::ItemUpdated { id, title, date, at });
                }
            }
            ListAction::CancelEdit => {
                if let Some(id) = store.mutate(DDAY_LIST, DdayList::new, DdayList::cancel_edit) {
                    ctx.emit(Event::EditCancelled { id, at });
                }
            }
            ListAction::Delete(id) => {
                if store
                    .mutate(DDAY_LIST, DdayList::new, |list| list.delete(id))
                    .is_some()
                {
                    ctx.emit(Event::ItemDeleted { id, at });
                }
            }
            ListAction::ClearAll => {
                let removed = store.mutate(DDAY_LIST, DdayList::new, DdayList::clear_all);
                ctx.emit(Event::ListCleared { removed, at });
            }
        }
    }

    fn render(&self, store: &mut SessionStore, ctx: &mut PassContext) -> Rendered<ListView> {
        let today = ctx.today();
        let form = store.get_or_init(ADD_FORM, AddForm::default).clone();
        let list = store.get_or_init(DDAY_LIST, DdayList::new);

        let n = self.config.columns.max(1);
        let cards: Vec<ItemCard> = list
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let status = item.status(today);
                ItemCard {
                    id: item.id(),
                    position: i + 1,
                    column: i % n,
                    title: item.title.clone(),
                    date: item.date,
                    label: status.label(),
                    editing: list.is_editing(item.id()),
                    celebrate: status == ItemStatus::Today,
                    status,
                }
            })
            .collect();

        let columns = columns(&cards, n)
            .into_iter()
            .map(|col| col.into_iter().cloned().collect())
            .collect();

        Rendered::new(ListView {
            today,
            form,
            columns,
            editing: list.editing(),
            total: list.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::host::Host;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    fn host() -> Host<ListApp, ManualClock> {
        Host::with_clock(ListApp::default(), ManualClock::on(today()))
    }

    #[tokio::test]
    async fn add_exam_scenario() {
        let mut host = host();
        let id = host.open_session();
        host.dispatch(id, ListAction::SetNewTitle("Exam".into())).await.unwrap();
        host.dispatch(id, ListAction::SetNewDate(Some(today() + Duration::days(14))))
            .await
            .unwrap();
        let frame = host.dispatch(id, ListAction::Add).await.unwrap();

        assert_eq!(frame.view.total, 1);
        let card = &frame.view.columns[0][0];
        assert_eq!(card.column, 0);
        assert_eq!(card.title, "Exam");
        assert_eq!(card.label, "D-14");
        assert_eq!(card.status, ItemStatus::Remaining { days: 14, weeks_left: 2 });
        assert_eq!(frame.view.form, AddForm::default());
        assert!(matches!(frame.events.as_slice(), [Event::ItemAdded { .. }]));
    }

    #[tokio::test]
    async fn blank_inputs_get_defaults() {
        let mut host = host();
        let id = host.open_session();
        host.dispatch(id, ListAction::SetNewTitle("   ".into())).await.unwrap();
        let frame = host.dispatch(id, ListAction::Add).await.unwrap();
        let card = &frame.view.columns[0][0];
        assert_eq!(card.title, "New D-day");
        assert_eq!(card.date, today() + Duration::days(7));
        assert_eq!(card.label, "D-7");
    }

    #[test]
    fn out_of_range_default_offset_falls_back_to_today() {
        let config = ListConfig {
            default_offset_days: 100_000_000_000,
            ..ListConfig::default()
        };
        let (_, date) = AddForm::default().resolve(&config, today());
        assert_eq!(date, today());
    }

    #[tokio::test]
    async fn weeks_left_is_pluralised() {
        let mut host = host();
        let id = host.open_session();
        for (title, offset) in [("Soon", 7), ("Later", 20), ("Close", 3)] {
            host.dispatch(id, ListAction::SetNewTitle(title.into())).await.unwrap();
            host.dispatch(id, ListAction::SetNewDate(Some(today() + Duration::days(offset))))
                .await
                .unwrap();
            host.dispatch(id, ListAction::Add).await.unwrap();
        }
        let text = host.render(id).unwrap().view.to_string();
        assert!(text.contains("D-7 (1 week left)"), "{text}");
        assert!(text.contains("D-20 (2 weeks left)"), "{text}");
        assert!(text.contains("D-3 (0 weeks left)"), "{text}");
    }

    #[tokio::test]
    async fn items_spread_over_three_columns() {
        let mut host = host();
        let id = host.open_session();
        let mut frame = host.render(id).unwrap();
        for _ in 0..4 {
            frame = host.dispatch(id, ListAction::Add).await.unwrap();
        }
        let sizes: Vec<_> = frame.view.columns.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 1, 1]);
        assert_eq!(frame.view.columns[0][1].position, 4);
        let positions: Vec<_> = frame.view.cards().iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn edit_save_delete_flow() {
        let mut host = host();
        let id = host.open_session();
        let frame = host.dispatch(id, ListAction::Add).await.unwrap();
        let item = frame.view.columns[0][0].id;

        let frame = host.dispatch(id, ListAction::StartEdit(item)).await.unwrap();
        assert_eq!(frame.view.editing, Some(item));
        assert!(frame.view.columns[0][0].editing);

        let frame = host
            .dispatch(id, ListAction::SaveEdit { id: item, title: "Moved".into(), date: today() })
            .await
            .unwrap();
        assert_eq!(frame.view.editing, None);
        let card = &frame.view.columns[0][0];
        assert_eq!((card.title.as_str(), card.label.as_str()), ("Moved", "D-Day"));
        assert!(card.celebrate);
        assert_eq!(card.id, item);

        host.dispatch(id, ListAction::StartEdit(item)).await.unwrap();
        let frame = host.dispatch(id, ListAction::Delete(item)).await.unwrap();
        assert_eq!(frame.view.total, 0);
        assert_eq!(frame.view.editing, None);

        let frame = host
            .dispatch(id, ListAction::SaveEdit { id: item, title: "ghost".into(), date: today() })
            .await
            .unwrap();
        assert_eq!(frame.view.total, 0);
        assert!(frame.events.is_empty());
    }

    #[tokio::test]
    async fn clear_all_empties_and_cancel_keeps_items() {
        let mut host = host();
        let id = host.open_session();
        host.dispatch(id, ListAction::Add).await.unwrap();
        let frame = host.dispatch(id, ListAction::Add).await.unwrap();
        let first = frame.view.columns[0][0].id;

        host.dispatch(id, ListAction::StartEdit(first)).await.unwrap();
        let frame = host.dispatch(id, ListAction::CancelEdit).await.unwrap();
        assert_eq!(frame.view.editing, None);
        assert_eq!(frame.view.total, 2);

        let frame = host.dispatch(id, ListAction::ClearAll).await.unwrap();
        assert_eq!(frame.view.total, 0);
        assert!(matches!(frame.events.as_slice(), [Event::ListCleared { removed: 2, .. }]));
    }
}
