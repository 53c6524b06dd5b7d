use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::entities::event::{EventStatus, EventViewRow};
use crate::domain::entities::page::{PageRequest, PageResult};
use crate::domain::entities::search::EventSearch;
use crate::error::Result;
use crate::usecase::ports::repo::EventViewStore;
use crate::usecase::services::predicate_builder::PredicateBuilder;

/// Lists event view rows page by page under an optional search.
///
/// Stateless apart from the shared store handle, so one instance can serve
/// concurrent callers.
pub struct EventQueryService {
    repo: Arc<dyn EventViewStore>,
    predicates: PredicateBuilder,
}

impl EventQueryService {
    pub fn new(repo: Arc<dyn EventViewStore>) -> Self {
        Self {
            repo,
            predicates: PredicateBuilder,
        }
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(page_index = page.page_index(), page_size = page.page_size())
    )]
    pub fn find_event_view_page(
        &self,
        search: &EventSearch,
        page: &PageRequest,
    ) -> Result<PageResult<EventViewRow>> {
        let offset = page
            .offset()
            .inspect_err(|err| tracing::warn!(%err, "rejected page request"))?;
        let order = page.effective_order();
        let condition = self.predicates.build(search);
        tracing::debug!(clauses = condition.clauses().len(), "built event view condition");

        let total_elements = self.repo.count_matching(&condition)?;
        if offset >= total_elements {
            return Ok(PageResult::empty(total_elements, page));
        }

        let content = self
            .repo
            .select_matching(&condition, &order, page.page_size(), offset)?;
        tracing::debug!(total_elements, returned = content.len(), "fetched event view page");

        Ok(PageResult::new(content, total_elements, page))
    }

    /// Positional form of [`Self::find_event_view_page`].
    pub fn find_event_view_page_by_params(
        &self,
        place_name: Option<&str>,
        event_name: Option<&str>,
        event_status: Option<EventStatus>,
        event_start_datetime: Option<NaiveDateTime>,
        event_end_datetime: Option<NaiveDateTime>,
        page: &PageRequest,
    ) -> Result<PageResult<EventViewRow>> {
        let search = EventSearch {
            place_name_contains: place_name.map(str::to_string),
            event_name_contains: event_name.map(str::to_string),
            status: event_status,
            start_not_before: event_start_datetime,
            end_not_after: event_end_datetime,
        };
        self.find_event_view_page(&search, page)
    }
}
