use std::path::PathBuf;

use crate::domain::entities::condition::Condition;
use crate::domain::entities::event::{EventId, EventViewRow, NewEvent, NewPlace, PlaceId};
use crate::domain::entities::page::SortKey;
use crate::error::{Error, Result};
use crate::infra::sqlite::queries::{
    count_event_views, insert_event, insert_place, query_event_view_page,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{EventCatalog, EventViewStore};

/// SQLite-backed store. Opens a fresh connection for every call.
pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl SqliteRepo {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl EventViewStore for SqliteRepo {
    fn count_matching(&self, condition: &Condition) -> Result<u64> {
        count_event_views(&self.db_path, condition).map_err(Error::from)
    }

    fn select_matching(
        &self,
        condition: &Condition,
        order: &[SortKey],
        limit: u64,
        offset: u64,
    ) -> Result<Vec<EventViewRow>> {
        query_event_view_page(&self.db_path, condition, order, limit, offset).map_err(Error::from)
    }
}

impl EventCatalog for SqliteRepo {
    fn init(&self) -> Result<()> {
        init_db(&self.db_path).map_err(Error::from)
    }

    fn insert_place(&self, place: NewPlace) -> Result<PlaceId> {
        insert_place(&self.db_path, &place).map_err(Error::from)
    }

    fn insert_event(&self, event: NewEvent) -> Result<EventId> {
        insert_event(&self.db_path, &event).map_err(Error::from)
    }
}
