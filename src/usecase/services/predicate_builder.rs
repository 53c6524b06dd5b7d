use crate::domain::entities::condition::{Clause, Condition, Operand, Operator, ViewColumn};
use crate::domain::entities::search::EventSearch;

/// Turns an [`EventSearch`] into a [`Condition`], one clause per present field.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateBuilder;

impl PredicateBuilder {
    pub fn build(&self, search: &EventSearch) -> Condition {
        let mut condition = Condition::always();

        if let Some(term) = search.place_name_term() {
            condition = condition.and(Clause::new(
                ViewColumn::PlaceName,
                Operator::ContainsIgnoreCase,
                Operand::Text(term.to_string()),
            ));
        }
        if let Some(term) = search.event_name_term() {
            condition = condition.and(Clause::new(
                ViewColumn::EventName,
                Operator::ContainsIgnoreCase,
                Operand::Text(term.to_string()),
            ));
        }
        if let Some(status) = search.status {
            condition = condition.and(Clause::new(
                ViewColumn::EventStatus,
                Operator::Eq,
                Operand::Status(status),
            ));
        }
        if let Some(bound) = search.start_not_before {
            condition = condition.and(Clause::new(
                ViewColumn::EventStartDatetime,
                Operator::Ge,
                Operand::DateTime(bound),
            ));
        }
        if let Some(bound) = search.end_not_after {
            condition = condition.and(Clause::new(
                ViewColumn::EventEndDatetime,
                Operator::Le,
                Operand::DateTime(bound),
            ));
        }

        condition
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::entities::event::EventStatus;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("fixture datetime should be valid")
    }

    #[test]
    fn empty_search_builds_identity_condition() {
        let condition = PredicateBuilder.build(&EventSearch::new());
        assert!(condition.is_always_true());
    }

    #[test]
    fn blank_strings_add_no_clause() {
        let search = EventSearch::new().place_name("").event_name("   ");
        assert!(PredicateBuilder.build(&search).is_always_true());
    }

    #[test]
    fn each_present_field_adds_exactly_one_clause() {
        let search = EventSearch::new()
            .place_name("배드민턴")
            .event_name("운동1")
            .status(EventStatus::Opened)
            .start_not_before(at(2021, 1, 1, 0))
            .end_not_after(at(2021, 1, 2, 0));

        let condition = PredicateBuilder.build(&search);

        assert_eq!(
            condition.clauses(),
            &[
                Clause::new(
                    ViewColumn::PlaceName,
                    Operator::ContainsIgnoreCase,
                    Operand::Text("배드민턴".to_string()),
                ),
                Clause::new(
                    ViewColumn::EventName,
                    Operator::ContainsIgnoreCase,
                    Operand::Text("운동1".to_string()),
                ),
                Clause::new(
                    ViewColumn::EventStatus,
                    Operator::Eq,
                    Operand::Status(EventStatus::Opened),
                ),
                Clause::new(
                    ViewColumn::EventStartDatetime,
                    Operator::Ge,
                    Operand::DateTime(at(2021, 1, 1, 0)),
                ),
                Clause::new(
                    ViewColumn::EventEndDatetime,
                    Operator::Le,
                    Operand::DateTime(at(2021, 1, 2, 0)),
                ),
            ]
        );
    }

    #[test]
    fn single_field_is_independent_of_others() {
        let condition = PredicateBuilder.build(&EventSearch::new().status(EventStatus::Paused));

        assert_eq!(condition.clauses().len(), 1);
        assert_eq!(condition.clauses()[0].column, ViewColumn::EventStatus);
    }
}
