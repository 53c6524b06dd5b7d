//! Backend-neutral description of a search condition over the event/place join.
//!
//! A [`Condition`] is an AND of independent [`Clause`] descriptors. Storage
//! backends translate it into their own query form; nothing here knows about SQL.

use chrono::NaiveDateTime;

use crate::domain::entities::event::EventStatus;

/// Columns of the event view projection that can be filtered or ordered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewColumn {
    Id,
    PlaceName,
    EventName,
    EventStatus,
    EventStartDatetime,
    EventEndDatetime,
    CurrentNumberOfPeople,
    Capacity,
    Memo,
}

impl ViewColumn {
    pub const ALL: [ViewColumn; 9] = [
        ViewColumn::Id,
        ViewColumn::PlaceName,
        ViewColumn::EventName,
        ViewColumn::EventStatus,
        ViewColumn::EventStartDatetime,
        ViewColumn::EventEndDatetime,
        ViewColumn::CurrentNumberOfPeople,
        ViewColumn::Capacity,
        ViewColumn::Memo,
    ];

    /// Field name as it appears on [`crate::domain::entities::event::EventViewRow`] when serialized.
    pub const fn field_name(self) -> &'static str {
        match self {
            ViewColumn::Id => "id",
            ViewColumn::PlaceName => "placeName",
            ViewColumn::EventName => "eventName",
            ViewColumn::EventStatus => "eventStatus",
            ViewColumn::EventStartDatetime => "eventStartDatetime",
            ViewColumn::EventEndDatetime => "eventEndDatetime",
            ViewColumn::CurrentNumberOfPeople => "currentNumberOfPeople",
            ViewColumn::Capacity => "capacity",
            ViewColumn::Memo => "memo",
        }
    }

    /// Resolves a camelCase or snake_case field name.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        ViewColumn::ALL
            .into_iter()
            .find(|column| column.field_name().to_ascii_lowercase() == wanted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Case-insensitive substring match.
    ContainsIgnoreCase,
    Eq,
    Ge,
    Le,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Text(String),
    Status(EventStatus),
    DateTime(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub column: ViewColumn,
    pub operator: Operator,
    pub operand: Operand,
}

impl Clause {
    pub fn new(column: ViewColumn, operator: Operator, operand: Operand) -> Self {
        Self {
            column,
            operator,
            operand,
        }
    }
}

/// AND of clauses. No clauses means "always true".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Condition {
    clauses: Vec<Clause>,
}

impl Condition {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_always_true(&self) -> bool {
        self.clauses.is_empty()
    }
}
