use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::entities::condition::ViewColumn;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Error::invalid_page_request(format!(
                "unknown sort direction: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub column: ViewColumn,
    pub direction: SortDirection,
}

impl SortKey {
    pub const fn asc(column: ViewColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(column: ViewColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

/// Parses `field` or `field,direction`, e.g. `placeName,desc`.
impl FromStr for SortKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (field, direction) = match value.split_once(',') {
            Some((field, direction)) => (field, direction.parse()?),
            None => (value, SortDirection::Asc),
        };
        let column = ViewColumn::from_name(field).ok_or_else(|| {
            Error::invalid_page_request(format!("unknown sort field: {}", field.trim()))
        })?;
        Ok(SortKey { column, direction })
    }
}

/// Zero-based page request with an optional ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page_index: u64,
    page_size: u64,
    sort: Vec<SortKey>,
}

impl PageRequest {
    pub fn new(page_index: i64, page_size: i64) -> Result<Self> {
        if page_size <= 0 {
            return Err(Error::invalid_page_request(format!(
                "page_size must be greater than zero, got {page_size}"
            )));
        }
        if page_index < 0 {
            return Err(Error::invalid_page_request(format!(
                "page_index must not be negative, got {page_index}"
            )));
        }

        let request = Self {
            page_index: page_index.unsigned_abs(),
            page_size: page_size.unsigned_abs(),
            sort: Vec::new(),
        };
        request.offset()?;
        Ok(request)
    }

    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    /// Appends a sort key given by field name, rejecting names the view cannot order by.
    pub fn with_sort(mut self, field: &str, direction: SortDirection) -> Result<Self> {
        let column = ViewColumn::from_name(field).ok_or_else(|| {
            Error::invalid_page_request(format!("unknown sort field: {}", field.trim()))
        })?;
        self.sort.push(SortKey { column, direction });
        Ok(self)
    }

    pub fn sorted_by(self, keys: &[(&str, SortDirection)]) -> Result<Self> {
        keys.iter()
            .try_fold(self, |request, (field, direction)| {
                request.with_sort(field, *direction)
            })
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn sort(&self) -> &[SortKey] {
        &self.sort
    }

    /// Number of rows to skip; fails instead of wrapping when the product does not fit.
    pub fn offset(&self) -> Result<u64> {
        self.page_index
            .checked_mul(self.page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| {
                Error::invalid_page_request(format!(
                    "offset overflows for page_index {} and page_size {}",
                    self.page_index, self.page_size
                ))
            })
    }

    /// Requested keys followed by an id tiebreak, unless the keys already order by id.
    pub fn effective_order(&self) -> Vec<SortKey> {
        let mut order = self.sort.clone();
        if !order.iter().any(|key| key.column == ViewColumn::Id) {
            order.push(SortKey::asc(ViewColumn::Id));
        }
        order
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub page_index: u64,
    pub page_size: u64,
}

impl<T> PageResult<T> {
    pub fn new(content: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(request.page_size()),
            page_index: request.page_index(),
            page_size: request.page_size(),
        }
    }

    pub fn empty(total_elements: u64, request: &PageRequest) -> Self {
        Self::new(Vec::new(), total_elements, request)
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_page_size() {
        for size in [0, -1, i64::MIN] {
            let err = PageRequest::new(0, size).expect_err("page_size <= 0 should be rejected");
            assert!(matches!(err, Error::InvalidPageRequest(_)), "{err:?}");
        }
    }

    #[test]
    fn rejects_negative_page_index() {
        let err = PageRequest::new(-1, 5).expect_err("negative page_index should be rejected");
        assert!(matches!(err, Error::InvalidPageRequest(_)));
    }

    #[test]
    fn rejects_offset_overflow() {
        let err = PageRequest::new(i64::MAX, 2).expect_err("overflowing offset should be rejected");
        assert!(matches!(err, Error::InvalidPageRequest(_)));
    }

    #[test]
    fn offset_is_index_times_size() {
        let request = PageRequest::new(3, 5).expect("valid page request");
        assert_eq!(request.offset().expect("offset should fit"), 15);
    }

    #[test]
    fn total_pages_uses_ceiling_division() {
        let request = PageRequest::new(0, 5).expect("valid page request");

        assert_eq!(PageResult::<()>::empty(0, &request).total_pages, 0);
        assert_eq!(PageResult::<()>::empty(1, &request).total_pages, 1);
        assert_eq!(PageResult::<()>::empty(5, &request).total_pages, 1);
        assert_eq!(PageResult::<()>::empty(26, &request).total_pages, 6);
    }

    #[test]
    fn has_next_stops_on_last_page() {
        let first = PageRequest::new(0, 5).expect("valid page request");
        let last = PageRequest::new(5, 5).expect("valid page request");

        assert!(PageResult::<()>::empty(26, &first).has_next());
        assert!(!PageResult::<()>::empty(26, &last).has_next());
    }

    #[test]
    fn map_keeps_page_metadata() {
        let request = PageRequest::new(1, 2).expect("valid page request");
        let mapped = PageResult::new(vec![3, 4], 5, &request).map(|n| n * 10);

        assert_eq!(mapped.content, vec![30, 40]);
        assert_eq!(
            (mapped.total_elements, mapped.total_pages, mapped.page_index, mapped.page_size),
            (5, 3, 1, 2)
        );
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let err = PageRequest::new(0, 5)
            .expect("valid page request")
            .sorted_by(&[("placeName", SortDirection::Asc), ("eventType", SortDirection::Desc)])
            .expect_err("unknown sort field should be rejected");

        assert_eq!(err.to_string(), "invalid page request: unknown sort field: eventType");
    }

    #[test]
    fn default_order_is_id_ascending() {
        let request = PageRequest::new(0, 5).expect("valid page request");
        assert_eq!(request.effective_order(), vec![SortKey::asc(ViewColumn::Id)]);
    }

    #[test]
    fn explicit_order_gets_id_tiebreak() {
        let request = PageRequest::new(0, 5)
            .expect("valid page request")
            .sorted_by(&[("placeName", SortDirection::Asc), ("event_name", SortDirection::Desc)])
            .expect("known sort fields");

        assert_eq!(
            request.effective_order(),
            vec![
                SortKey::asc(ViewColumn::PlaceName),
                SortKey::desc(ViewColumn::EventName),
                SortKey::asc(ViewColumn::Id),
            ]
        );
    }

    #[test]
    fn explicit_id_order_is_not_duplicated() {
        let request = PageRequest::new(0, 5)
            .expect("valid page request")
            .with_sort_key(SortKey::desc(ViewColumn::Id));

        assert_eq!(request.effective_order(), vec![SortKey::desc(ViewColumn::Id)]);
    }

    #[test]
    fn sort_key_parses_field_and_direction() {
        let key: SortKey = "eventStartDatetime,desc".parse().expect("sort key should parse");
        assert_eq!(key, SortKey::desc(ViewColumn::EventStartDatetime));

        let key: SortKey = "capacity".parse().expect("sort key should parse");
        assert_eq!(key, SortKey::asc(ViewColumn::Capacity));

        assert!("capacity,sideways".parse::<SortKey>().is_err());
    }
}
