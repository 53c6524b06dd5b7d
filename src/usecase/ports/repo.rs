use crate::domain::entities::condition::Condition;
use crate::domain::entities::event::{EventId, EventViewRow, NewEvent, NewPlace, PlaceId};
use crate::domain::entities::page::SortKey;
use crate::error::Result;

/// Read side of the event/place join.
///
/// Both operations take the same [`Condition`] and apply it to the inner join of
/// events with their owning place. Implementations acquire whatever connection
/// they need per call and release it before returning. Failures are reported as
/// [`crate::error::Error::DataAccess`].
pub trait EventViewStore: Send + Sync {
    fn count_matching(&self, condition: &Condition) -> Result<u64>;

    fn select_matching(
        &self,
        condition: &Condition,
        order: &[SortKey],
        limit: u64,
        offset: u64,
    ) -> Result<Vec<EventViewRow>>;
}

/// Minimal write side, enough to bootstrap a store with places and events.
pub trait EventCatalog: Send + Sync {
    fn init(&self) -> Result<()>;

    fn insert_place(&self, place: NewPlace) -> Result<PlaceId>;

    fn insert_event(&self, event: NewEvent) -> Result<EventId>;
}
