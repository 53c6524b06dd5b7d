use chrono::NaiveDateTime;

use crate::domain::entities::event::EventStatus;

/// Optional search constraints for one event view query.
///
/// Every field is independent; an unset field never narrows the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSearch {
    pub place_name_contains: Option<String>,
    pub event_name_contains: Option<String>,
    pub status: Option<EventStatus>,
    pub start_not_before: Option<NaiveDateTime>,
    pub end_not_after: Option<NaiveDateTime>,
}

impl EventSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place_name(mut self, term: impl Into<String>) -> Self {
        self.place_name_contains = Some(term.into());
        self
    }

    pub fn event_name(mut self, term: impl Into<String>) -> Self {
        self.event_name_contains = Some(term.into());
        self
    }

    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn start_not_before(mut self, bound: NaiveDateTime) -> Self {
        self.start_not_before = Some(bound);
        self
    }

    pub fn end_not_after(mut self, bound: NaiveDateTime) -> Self {
        self.end_not_after = Some(bound);
        self
    }

    /// Place name term as given, or `None` when unset or blank.
    pub fn place_name_term(&self) -> Option<&str> {
        non_blank(self.place_name_contains.as_deref())
    }

    /// Event name term as given, or `None` when unset or blank.
    pub fn event_name_term(&self) -> Option<&str> {
        non_blank(self.event_name_contains.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_terms_read_as_absent() {
        let search = EventSearch::new().place_name("   ").event_name("");
        assert_eq!(search.place_name_term(), None);
        assert_eq!(search.event_name_term(), None);
    }

    #[test]
    fn present_terms_keep_surrounding_whitespace() {
        let search = EventSearch::new().place_name("  배드민턴 ").event_name("수영");
        assert_eq!(search.place_name_term(), Some("  배드민턴 "));
        assert_eq!(search.event_name_term(), Some("수영"));
    }
}
