use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime};
use rusqlite::types::{Type, Value};
use rusqlite::{params, Row};

use crate::domain::entities::condition::{Condition, Operand, Operator, ViewColumn};
use crate::domain::entities::event::{EventId, EventStatus, EventViewRow, NewEvent, NewPlace, PlaceId};
use crate::domain::entities::page::SortKey;
use crate::infra::sqlite::schema::{open_connection, FOLD_CASE_FN};

/// Text layout for datetimes; the same one rusqlite's chrono support writes and reads.
const SQL_DATETIME_FORMAT: &str = "%F %T%.f";

/// Years `%Y` writes as four bare digits. Stored datetimes stay inside this
/// range so their text sorts chronologically.
const TEXT_SORTABLE_YEARS: RangeInclusive<i32> = 0..=9999;

const EVENT_VIEW_FROM: &str = "FROM event e INNER JOIN place p ON p.id = e.place_id";

const EVENT_VIEW_SELECT: &str = "SELECT e.id, p.place_name, e.event_name, e.event_status,
        e.event_start_datetime, e.event_end_datetime,
        e.current_number_of_people, e.capacity, e.memo";

/// A condition rendered to a parameterised `WHERE` body.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<Value>,
}

pub fn column_sql(column: ViewColumn) -> &'static str {
    match column {
        ViewColumn::Id => "e.id",
        ViewColumn::PlaceName => "p.place_name",
        ViewColumn::EventName => "e.event_name",
        ViewColumn::EventStatus => "e.event_status",
        ViewColumn::EventStartDatetime => "e.event_start_datetime",
        ViewColumn::EventEndDatetime => "e.event_end_datetime",
        ViewColumn::CurrentNumberOfPeople => "e.current_number_of_people",
        ViewColumn::Capacity => "e.capacity",
        ViewColumn::Memo => "e.memo",
    }
}

fn datetime_value(value: NaiveDateTime) -> Result<Value> {
    anyhow::ensure!(
        TEXT_SORTABLE_YEARS.contains(&value.year()),
        "datetime {value} is outside the storable years 0000-9999"
    );
    Ok(Value::Text(value.format(SQL_DATETIME_FORMAT).to_string()))
}

/// Constant outcome of a range clause whose bound lies outside the storable
/// years, where text comparison against stored values would be wrong.
fn out_of_range_bound(operator: Operator, operand: &Operand) -> Option<bool> {
    let Operand::DateTime(bound) = operand else {
        return None;
    };
    if TEXT_SORTABLE_YEARS.contains(&bound.year()) {
        return None;
    }
    let above = bound.year() > *TEXT_SORTABLE_YEARS.end();
    match operator {
        Operator::Ge => Some(!above),
        Operator::Le => Some(above),
        Operator::ContainsIgnoreCase | Operator::Eq => None,
    }
}

// Every column the view filters on is stored as text.
fn operand_text(operand: &Operand) -> String {
    match operand {
        Operand::Text(text) => text.clone(),
        Operand::Status(status) => status.as_str().to_string(),
        Operand::DateTime(value) => value.format(SQL_DATETIME_FORMAT).to_string(),
    }
}

pub fn render_condition(condition: &Condition) -> WhereClause {
    if condition.is_always_true() {
        return WhereClause {
            sql: "1 = 1".to_string(),
            params: Vec::new(),
        };
    }

    let mut clauses = Vec::with_capacity(condition.clauses().len());
    let mut params = Vec::with_capacity(condition.clauses().len());

    for clause in condition.clauses() {
        let column = column_sql(clause.column);
        if let Some(holds) = out_of_range_bound(clause.operator, &clause.operand) {
            clauses.push(if holds { "1 = 1" } else { "1 = 0" }.to_string());
            continue;
        }
        match clause.operator {
            Operator::ContainsIgnoreCase => {
                clauses.push(format!("instr({FOLD_CASE_FN}({column}), ?) > 0"));
                params.push(Value::Text(operand_text(&clause.operand).to_lowercase()));
            }
            Operator::Eq => {
                clauses.push(format!("{column} = ?"));
                params.push(Value::Text(operand_text(&clause.operand)));
            }
            Operator::Ge => {
                clauses.push(format!("{column} >= ?"));
                params.push(Value::Text(operand_text(&clause.operand)));
            }
            Operator::Le => {
                clauses.push(format!("{column} <= ?"));
                params.push(Value::Text(operand_text(&clause.operand)));
            }
        }
    }

    WhereClause {
        sql: clauses.join(" AND "),
        params,
    }
}

pub fn render_order(order: &[SortKey]) -> String {
    if order.is_empty() {
        return "e.id ASC".to_string();
    }
    order
        .iter()
        .map(|key| format!("{} {}", column_sql(key.column), key.direction.as_sql()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn count_event_views(db_path: &Path, condition: &Condition) -> Result<u64> {
    let conn = open_connection(db_path)?;
    let filter = render_condition(condition);

    let count_sql = format!("SELECT COUNT(*) {EVENT_VIEW_FROM} WHERE {}", filter.sql);
    tracing::debug!(sql = %count_sql, params = filter.params.len(), "counting event views");

    let total: i64 = conn
        .query_row(
            &count_sql,
            rusqlite::params_from_iter(filter.params),
            |row| row.get(0),
        )
        .context("failed to query filtered event count")?;

    u64::try_from(total).context("event count should not be negative")
}

pub fn query_event_view_page(
    db_path: &Path,
    condition: &Condition,
    order: &[SortKey],
    limit: u64,
    offset: u64,
) -> Result<Vec<EventViewRow>> {
    let limit = i64::try_from(limit).context("page limit out of range")?;
    let offset = i64::try_from(offset).context("page offset out of range")?;

    let conn = open_connection(db_path)?;
    let filter = render_condition(condition);

    let page_sql = format!(
        "{EVENT_VIEW_SELECT}
         {EVENT_VIEW_FROM}
         WHERE {}
         ORDER BY {}
         LIMIT ? OFFSET ?",
        filter.sql,
        render_order(order)
    );
    tracing::debug!(sql = %page_sql, limit, offset, "querying event view page");

    let mut page_params = filter.params;
    page_params.push(Value::Integer(limit));
    page_params.push(Value::Integer(offset));

    let mut stmt = conn
        .prepare(&page_sql)
        .context("failed to prepare event view page query")?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(page_params), map_event_view_row)
        .context("failed to query event view page")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect event view page")?;

    Ok(rows)
}

fn map_event_view_row(row: &Row<'_>) -> rusqlite::Result<EventViewRow> {
    let status: String = row.get(3)?;
    let event_status = status
        .parse::<EventStatus>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(err)))?;

    Ok(EventViewRow {
        id: EventId::from(row.get::<_, i64>(0)?),
        place_name: row.get(1)?,
        event_name: row.get(2)?,
        event_status,
        event_start_datetime: row.get(4)?,
        event_end_datetime: row.get(5)?,
        current_number_of_people: row.get(6)?,
        capacity: row.get(7)?,
        memo: row.get(8)?,
    })
}

pub fn insert_place(db_path: &Path, place: &NewPlace) -> Result<PlaceId> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT INTO place(place_type, place_name, address, phone_number, capacity, memo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            place.place_type.as_str(),
            place.place_name,
            place.address,
            place.phone_number,
            place.capacity,
            place.memo,
        ],
    )
    .with_context(|| format!("failed to insert place {}", place.place_name))?;
    Ok(PlaceId::from(conn.last_insert_rowid()))
}

pub fn insert_event(db_path: &Path, event: &NewEvent) -> Result<EventId> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT INTO event(
             place_id, event_name, event_status, event_start_datetime, event_end_datetime,
             current_number_of_people, capacity, memo
         )
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            event.place_id.0,
            event.event_name,
            event.event_status.as_str(),
            datetime_value(event.event_start_datetime)?,
            datetime_value(event.event_end_datetime)?,
            event.current_number_of_people,
            event.capacity,
            event.memo,
        ],
    )
    .with_context(|| format!("failed to insert event {}", event.event_name))?;
    Ok(EventId::from(conn.last_insert_rowid()))
}
