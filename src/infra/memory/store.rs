use std::cmp::Ordering;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;

use crate::domain::entities::condition::{Clause, Condition, Operand, Operator, ViewColumn};
use crate::domain::entities::event::{EventId, EventViewRow, NewEvent, NewPlace, PlaceId};
use crate::domain::entities::page::{SortDirection, SortKey};
use crate::error::{Error, Result};
use crate::usecase::ports::repo::{EventCatalog, EventViewStore};

#[derive(Debug, Default)]
struct Tables {
    places: Vec<(PlaceId, NewPlace)>,
    events: Vec<(EventId, NewEvent)>,
}

/// In-process store that evaluates conditions in Rust instead of SQL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| Error::from(anyhow!("memory store lock poisoned")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| Error::from(anyhow!("memory store lock poisoned")))
    }

    /// Inner join of events with their place, in insertion (id) order.
    fn joined_rows(tables: &Tables) -> impl Iterator<Item = EventViewRow> + '_ {
        tables.events.iter().filter_map(|(id, event)| {
            let (_, place) = tables
                .places
                .iter()
                .find(|(place_id, _)| *place_id == event.place_id)?;
            Some(EventViewRow {
                id: *id,
                place_name: place.place_name.clone(),
                event_name: event.event_name.clone(),
                event_status: event.event_status,
                event_start_datetime: event.event_start_datetime,
                event_end_datetime: event.event_end_datetime,
                current_number_of_people: event.current_number_of_people,
                capacity: event.capacity,
                memo: event.memo.clone(),
            })
        })
    }
}

fn column_text(row: &EventViewRow, column: ViewColumn) -> Option<String> {
    match column {
        ViewColumn::Id => Some(row.id.0.to_string()),
        ViewColumn::PlaceName => Some(row.place_name.clone()),
        ViewColumn::EventName => Some(row.event_name.clone()),
        ViewColumn::EventStatus => Some(row.event_status.as_str().to_string()),
        ViewColumn::EventStartDatetime => Some(row.event_start_datetime.to_string()),
        ViewColumn::EventEndDatetime => Some(row.event_end_datetime.to_string()),
        ViewColumn::CurrentNumberOfPeople => Some(row.current_number_of_people.to_string()),
        ViewColumn::Capacity => Some(row.capacity.to_string()),
        ViewColumn::Memo => row.memo.clone(),
    }
}

/// `None` when the operand cannot be compared with the column.
fn compare_with_operand(row: &EventViewRow, column: ViewColumn, operand: &Operand) -> Option<Ordering> {
    match (column, operand) {
        (ViewColumn::EventStartDatetime, Operand::DateTime(bound)) => {
            Some(row.event_start_datetime.cmp(bound))
        }
        (ViewColumn::EventEndDatetime, Operand::DateTime(bound)) => {
            Some(row.event_end_datetime.cmp(bound))
        }
        (ViewColumn::EventStatus, Operand::Status(status)) => {
            Some(row.event_status.as_str().cmp(status.as_str()))
        }
        (_, Operand::Text(text)) => column_text(row, column).map(|value| value.as_str().cmp(text)),
        _ => None,
    }
}

fn clause_matches(row: &EventViewRow, clause: &Clause) -> bool {
    match clause.operator {
        Operator::ContainsIgnoreCase => {
            let needle = match &clause.operand {
                Operand::Text(text) => text.to_lowercase(),
                Operand::Status(status) => status.as_str().to_lowercase(),
                Operand::DateTime(value) => value.to_string(),
            };
            column_text(row, clause.column)
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        }
        Operator::Eq => compare_with_operand(row, clause.column, &clause.operand) == Some(Ordering::Equal),
        Operator::Ge => matches!(
            compare_with_operand(row, clause.column, &clause.operand),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Le => matches!(
            compare_with_operand(row, clause.column, &clause.operand),
            Some(Ordering::Less | Ordering::Equal)
        ),
    }
}

fn matches_condition(row: &EventViewRow, condition: &Condition) -> bool {
    condition.clauses().iter().all(|clause| clause_matches(row, clause))
}

fn compare_rows(a: &EventViewRow, b: &EventViewRow, column: ViewColumn) -> Ordering {
    match column {
        ViewColumn::Id => a.id.cmp(&b.id),
        ViewColumn::PlaceName => a.place_name.cmp(&b.place_name),
        ViewColumn::EventName => a.event_name.cmp(&b.event_name),
        ViewColumn::EventStatus => a.event_status.as_str().cmp(b.event_status.as_str()),
        ViewColumn::EventStartDatetime => a.event_start_datetime.cmp(&b.event_start_datetime),
        ViewColumn::EventEndDatetime => a.event_end_datetime.cmp(&b.event_end_datetime),
        ViewColumn::CurrentNumberOfPeople => {
            a.current_number_of_people.cmp(&b.current_number_of_people)
        }
        ViewColumn::Capacity => a.capacity.cmp(&b.capacity),
        ViewColumn::Memo => a.memo.cmp(&b.memo),
    }
}

fn compare_by_order(a: &EventViewRow, b: &EventViewRow, order: &[SortKey]) -> Ordering {
    order
        .iter()
        .map(|key| match key.direction {
            SortDirection::Asc => compare_rows(a, b, key.column),
            SortDirection::Desc => compare_rows(b, a, key.column),
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.id.cmp(&b.id))
}

impl EventViewStore for MemoryStore {
    fn count_matching(&self, condition: &Condition) -> Result<u64> {
        let tables = self.read()?;
        let count = Self::joined_rows(&tables)
            .filter(|row| matches_condition(row, condition))
            .count();
        u64::try_from(count).map_err(Error::data_access)
    }

    fn select_matching(
        &self,
        condition: &Condition,
        order: &[SortKey],
        limit: u64,
        offset: u64,
    ) -> Result<Vec<EventViewRow>> {
        let limit = usize::try_from(limit).map_err(Error::data_access)?;
        let offset = usize::try_from(offset).map_err(Error::data_access)?;

        let tables = self.read()?;
        let mut rows: Vec<_> = Self::joined_rows(&tables)
            .filter(|row| matches_condition(row, condition))
            .collect();
        rows.sort_by(|a, b| compare_by_order(a, b, order));

        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }
}

impl EventCatalog for MemoryStore {
    fn init(&self) -> Result<()> {
        Ok(())
    }

    fn insert_place(&self, place: NewPlace) -> Result<PlaceId> {
        let mut tables = self.write()?;
        let id = PlaceId(next_id(tables.places.iter().map(|(id, _)| id.0)));
        tables.places.push((id, place));
        Ok(id)
    }

    fn insert_event(&self, event: NewEvent) -> Result<EventId> {
        let mut tables = self.write()?;
        if !tables.places.iter().any(|(id, _)| *id == event.place_id) {
            return Err(Error::from(anyhow!(
                "FOREIGN KEY constraint failed: place {} does not exist",
                event.place_id.0
            )));
        }
        let id = EventId(next_id(tables.events.iter().map(|(id, _)| id.0)));
        tables.events.push((id, event));
        Ok(id)
    }
}

fn next_id(existing: impl Iterator<Item = i64>) -> i64 {
    existing.max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::entities::event::{EventStatus, PlaceType};

    fn at(day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("fixture datetime should be valid")
    }

    fn store_with_events() -> MemoryStore {
        let store = MemoryStore::new();
        let place = store
            .insert_place(NewPlace {
                place_type: PlaceType::Sports,
                place_name: "Seoul Badminton Court".to_string(),
                address: "Seoul".to_string(),
                phone_number: "010-1234-5678".to_string(),
                capacity: 30,
                memo: None,
            })
            .expect("place should be inserted");
        for (name, day) in [("morning", 1), ("Evening", 2), ("night", 3)] {
            store
                .insert_event(NewEvent {
                    place_id: place,
                    event_name: name.to_string(),
                    event_status: EventStatus::Opened,
                    event_start_datetime: at(day, 9),
                    event_end_datetime: at(day, 12),
                    current_number_of_people: 0,
                    capacity: 10,
                    memo: None,
                })
                .expect("event should be inserted");
        }
        store
    }

    #[test]
    fn contains_ignores_case() {
        let store = store_with_events();
        let condition = Condition::always().and(Clause::new(
            ViewColumn::PlaceName,
            Operator::ContainsIgnoreCase,
            Operand::Text("BADMINTON".to_string()),
        ));

        assert_eq!(store.count_matching(&condition).expect("count should succeed"), 3);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let store = store_with_events();
        let condition = Condition::always()
            .and(Clause::new(
                ViewColumn::EventStartDatetime,
                Operator::Ge,
                Operand::DateTime(at(2, 9)),
            ))
            .and(Clause::new(
                ViewColumn::EventEndDatetime,
                Operator::Le,
                Operand::DateTime(at(2, 12)),
            ));

        let rows = store
            .select_matching(&condition, &[], 10, 0)
            .expect("select should succeed");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_name, "Evening");
    }

    #[test]
    fn select_orders_then_pages() {
        let store = store_with_events();
        let order = [SortKey::desc(ViewColumn::EventStartDatetime)];

        let rows = store
            .select_matching(&Condition::always(), &order, 2, 1)
            .expect("select should succeed");

        let names: Vec<_> = rows.iter().map(|row| row.event_name.as_str()).collect();
        assert_eq!(names, vec!["Evening", "morning"]);
    }

    #[test]
    fn event_without_place_is_rejected() {
        let store = MemoryStore::new();
        let err = store
            .insert_event(NewEvent {
                place_id: PlaceId(42),
                event_name: "orphan".to_string(),
                event_status: EventStatus::Opened,
                event_start_datetime: at(1, 9),
                event_end_datetime: at(1, 12),
                current_number_of_people: 0,
                capacity: 10,
                memo: None,
            })
            .expect_err("event for missing place should fail");

        assert!(matches!(err, Error::DataAccess(_)));
    }
}
