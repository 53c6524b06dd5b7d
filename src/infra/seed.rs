use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::entities::event::{EventStatus, NewEvent, NewPlace, PlaceType};
use crate::error::{Error, Result};
use crate::usecase::ports::repo::EventCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub places: usize,
    pub events: usize,
}

struct DemoPlace {
    place_type: PlaceType,
    name: &'static str,
    address: &'static str,
    phone_number: &'static str,
    capacity: i32,
    event_prefix: &'static str,
    event_count: u32,
}

const DEMO_PLACES: [DemoPlace; 4] = [
    DemoPlace {
        place_type: PlaceType::Sports,
        name: "서울 배드민턴장",
        address: "서울시 강남구 강남대로 1234",
        phone_number: "010-1234-5678",
        capacity: 30,
        event_prefix: "운동",
        event_count: 8,
    },
    DemoPlace {
        place_type: PlaceType::Sports,
        name: "서울 수영장",
        address: "서울시 송파구 올림픽로 424",
        phone_number: "010-2345-6789",
        capacity: 50,
        event_prefix: "수영",
        event_count: 6,
    },
    DemoPlace {
        place_type: PlaceType::Common,
        name: "강남 레스토랑",
        address: "서울시 강남구 테헤란로 100",
        phone_number: "02-555-0100",
        capacity: 20,
        event_prefix: "저녁 모임",
        event_count: 6,
    },
    DemoPlace {
        place_type: PlaceType::Party,
        name: "무도회장",
        address: "서울시 마포구 와우산로 94",
        phone_number: "02-333-0094",
        capacity: 100,
        event_prefix: "파티",
        event_count: 6,
    },
];

fn first_day() -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2021, 1, 1)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .ok_or_else(|| Error::from(anyhow::anyhow!("invalid seed start date")))
}

/// Inserts the demo places and their events: 4 places, 26 events.
///
/// Event `n` of a place (1-based) runs 09:00 to 12:00 on 2021-01-`n`, so the
/// first event of every place is `OPENED` on 2021-01-01.
pub fn seed_demo_data(catalog: &dyn EventCatalog) -> Result<SeedSummary> {
    catalog.init()?;
    let start = first_day()?;
    let mut summary = SeedSummary { places: 0, events: 0 };

    for demo in &DEMO_PLACES {
        let place_id = catalog.insert_place(NewPlace {
            place_type: demo.place_type,
            place_name: demo.name.to_string(),
            address: demo.address.to_string(),
            phone_number: demo.phone_number.to_string(),
            capacity: demo.capacity,
            memo: None,
        })?;
        summary.places += 1;

        for n in 1..=demo.event_count {
            let status = EventStatus::ALL[(n as usize - 1) % EventStatus::ALL.len()];
            let event_start = start + Duration::days(i64::from(n) - 1);
            catalog.insert_event(NewEvent {
                place_id,
                event_name: format!("{}{n}", demo.event_prefix),
                event_status: status,
                event_start_datetime: event_start,
                event_end_datetime: event_start + Duration::hours(3),
                current_number_of_people: 0,
                capacity: demo.capacity / 2,
                memo: Some(format!("{n} 회차")),
            })?;
            summary.events += 1;
        }
    }

    tracing::info!(places = summary.places, events = summary.events, "seeded demo data");
    Ok(summary)
}
